mod bind;
mod buffer;
mod builder;
mod column;
mod cond;
mod delete;
mod dialect;
mod error;
mod ident;
mod insert;
mod join;
mod order;
mod paginate;
mod raw;
mod select;
mod union;
mod update;

pub use bind::{Bind, IntoBind, IntoBinds};
pub use buffer::{Buffer, Mode};
pub use builder::{Alias, Build, Node};
pub use column::{Column, IntoColumn, IntoColumns, IntoTable, TableRef};
pub use cond::{Condition, Operator};
pub use delete::DeleteStmt;
pub use dialect::{Dialect, HasDialect, MySql, Postgres, Sqlite};
pub use error::{Error, Result};
pub use ident::{Ident, IntoIdent, IntoIdents};
pub use insert::InsertStmt;
pub use join::{Join, JoinKind, JoinOn};
pub use order::{Direction, Order};
pub use paginate::Paginator;
pub use raw::Raw;
pub use select::SelectStmt;
pub use union::Union;
pub use update::UpdateStmt;

pub fn select<C: IntoColumns>(columns: C) -> SelectStmt {
    SelectStmt::new().columns(columns)
}

pub fn insert_into<T: IntoIdent>(table: T) -> InsertStmt {
    InsertStmt::new(table)
}

pub fn update<T: IntoIdent>(table: T) -> UpdateStmt {
    UpdateStmt::new(table)
}

pub fn delete_from<T: IntoIdent>(table: T) -> DeleteStmt {
    DeleteStmt::new(table)
}

pub fn union<I, N>(members: I) -> Union
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Union::new(members, false)
}

pub fn union_all<I, N>(members: I) -> Union
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Union::new(members, true)
}

pub fn ident_static(value: &'static str) -> Ident {
    Ident::new_static(value)
}

pub fn ident(value: &str) -> Ident {
    Ident::new(value)
}

pub fn raw_static(value: &'static str) -> Raw {
    Raw::new_static(value)
}

pub fn raw(value: &str) -> Raw {
    Raw::new(value)
}

/// A raw fragment with its `?` markers bound to `binds`.
pub fn expr<B: IntoBinds>(sql: &str, binds: B) -> Raw {
    Raw::with_binds(sql, binds)
}

/// Builds a [`Raw`] fragment from a SQL string and any number of bound values.
///
/// ```
/// let fragment = sqlweave::raw!("id IN ? AND kind = ?", vec![1, 2, 3], "post");
/// assert_eq!(2, fragment.binds().len());
/// ```
#[macro_export]
macro_rules! raw {
    ($sql:expr) => {
        $crate::Raw::new($sql)
    };
    ($sql:expr, $($bind:expr),+ $(,)?) => {
        $crate::Raw::with_binds(
            $sql,
            ::std::vec![$($crate::IntoBind::into_bind($bind)),+],
        )
    };
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Build, Buffer, Dialect, Result};

    pub(crate) fn try_build_with<B: Build>(node: B, dialect: Dialect) -> Result<String> {
        let mut buf = Buffer::new();
        node.build(dialect, &mut buf)?;
        Ok(buf.into_parts().0)
    }

    pub(crate) fn build_with<B: Build>(node: B, dialect: Dialect) -> String {
        try_build_with(node, dialect).unwrap()
    }

    #[test]
    fn test_raw_macro() {
        let fragment = raw!("a = ? OR b IN ?", 1, vec!["x", "y"]);
        assert_eq!("a = $1 OR b IN ($2, $3)", build_with(fragment, Dialect::Postgres));
        assert_eq!("now()", build_with(raw!("now()"), Dialect::MySql));
    }
}
