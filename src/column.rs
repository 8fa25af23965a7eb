use smol_str::SmolStr;

use crate::{
    buffer::Buffer,
    builder::{Alias, Build, Node},
    delete::DeleteStmt,
    dialect::Dialect,
    error::{Error, Result},
    ident::Ident,
    insert::InsertStmt,
    raw::Raw,
    select::SelectStmt,
    union::Union,
    update::UpdateStmt,
};

/// Something a statement can project, filter on, group or order by.
///
/// Plain strings are SQL written by the caller and go out verbatim, so
/// `"count(id)"` or `"u.name"` work as is. Use an [`Ident`] to get quoting.
#[derive(Debug, Clone)]
pub enum Column {
    Verbatim(SmolStr),
    Node(Node),
}

impl Build for Column {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            Column::Verbatim(sql) => {
                buf.write_str(sql);
                Ok(())
            }
            Column::Node(node) => node.build_nested(dialect, buf),
        }
    }
}

pub(crate) fn build_list(columns: &[Column], dialect: Dialect, buf: &mut Buffer) -> Result<()> {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        column.build(dialect, buf)?;
    }
    Ok(())
}

/// ` RETURNING a, b`, which MySQL has no syntax for.
pub(crate) fn build_returning(
    columns: &[Column],
    dialect: Dialect,
    buf: &mut Buffer,
) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    if dialect == Dialect::MySql {
        return Err(Error::UnsupportedClause {
            clause: "RETURNING",
            dialect,
        });
    }
    buf.write_str(" RETURNING ");
    build_list(columns, dialect, buf)
}

pub trait IntoColumn {
    fn into_column(self) -> Column;
}

impl IntoColumn for Column {
    fn into_column(self) -> Column {
        self
    }
}

impl IntoColumn for &str {
    fn into_column(self) -> Column {
        Column::Verbatim(SmolStr::new(self))
    }
}

impl IntoColumn for &String {
    fn into_column(self) -> Column {
        Column::Verbatim(SmolStr::new(self))
    }
}

impl IntoColumn for String {
    fn into_column(self) -> Column {
        Column::Verbatim(SmolStr::from(self))
    }
}

impl IntoColumn for SmolStr {
    fn into_column(self) -> Column {
        Column::Verbatim(self)
    }
}

macro_rules! impl_into_column_node {
    ($($ty:ty),+) => {
        $(
            impl IntoColumn for $ty {
                fn into_column(self) -> Column {
                    Column::Node(self.into())
                }
            }
        )+
    };
}

impl_into_column_node!(Node, Ident, Raw, Alias, SelectStmt, Union);

/// A projection or column list, either one column or many.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Column>;
}

impl<T: IntoColumn> IntoColumns for Vec<T> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(IntoColumn::into_column).collect()
    }
}

impl<T: IntoColumn, const N: usize> IntoColumns for [T; N] {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(IntoColumn::into_column).collect()
    }
}

macro_rules! impl_into_columns_single {
    ($($ty:ty),+) => {
        $(
            impl IntoColumns for $ty {
                fn into_columns(self) -> Vec<Column> {
                    vec![self.into_column()]
                }
            }
        )+
    };
}

impl_into_columns_single!(Column, &str, &String, String, SmolStr, Ident, Raw, Alias);

/// The source of a statement: a quoted table or any node, such as an aliased
/// derived table.
#[derive(Debug, Clone)]
pub enum TableRef {
    Table(Ident),
    Node(Node),
}

impl Build for TableRef {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            TableRef::Table(ident) => ident.build(dialect, buf),
            TableRef::Node(node) => node.build_nested(dialect, buf),
        }
    }
}

pub trait IntoTable {
    fn into_table(self) -> TableRef;
}

impl IntoTable for TableRef {
    fn into_table(self) -> TableRef {
        self
    }
}

impl IntoTable for Ident {
    fn into_table(self) -> TableRef {
        TableRef::Table(self)
    }
}

impl IntoTable for &str {
    fn into_table(self) -> TableRef {
        TableRef::Table(Ident::new(self))
    }
}

impl IntoTable for &String {
    fn into_table(self) -> TableRef {
        TableRef::Table(Ident::new(self.as_str()))
    }
}

impl IntoTable for String {
    fn into_table(self) -> TableRef {
        TableRef::Table(Ident::new(self))
    }
}

impl IntoTable for SmolStr {
    fn into_table(self) -> TableRef {
        TableRef::Table(Ident::new(self))
    }
}

macro_rules! impl_into_table_node {
    ($($ty:ty),+) => {
        $(
            impl IntoTable for $ty {
                fn into_table(self) -> TableRef {
                    TableRef::Node(self.into())
                }
            }
        )+
    };
}

impl_into_table_node!(
    Node,
    Raw,
    Alias,
    SelectStmt,
    Union,
    InsertStmt,
    UpdateStmt,
    DeleteStmt
);

#[cfg(test)]
mod tests {
    use crate::{ident, raw, select, tests::build_with};

    use super::*;

    #[test]
    fn test_verbatim_column() {
        let column = "count(id)".into_column();
        assert_eq!("count(id)", build_with(column, Dialect::Postgres));
    }

    #[test]
    fn test_quoted_column() {
        let column = ident("users.id as uid").into_column();
        assert_eq!("`users`.`id` AS `uid`", build_with(column, Dialect::MySql));
    }

    #[test]
    fn test_subquery_column() {
        let column = select("max(id)").from("users").into_column();
        assert_eq!(
            "(SELECT max(id) FROM \"users\")",
            build_with(column, Dialect::Sqlite)
        );
    }

    #[test]
    fn test_into_columns() {
        let columns = vec!["id", "name"].into_columns();
        assert_eq!(2, columns.len());
        let columns = [ident("id").into_column(), raw("1").into_column()].into_columns();
        assert_eq!(2, columns.len());
        assert_eq!(1, "*".into_columns().len());
    }

    #[test]
    fn test_table_ref() {
        assert_eq!("\"users\" AS \"u\"", build_with("users as u".into_table(), Dialect::Postgres));
        let derived = select("*").from("users").alias("u").into_table();
        assert_eq!(
            "(SELECT * FROM `users`) AS `u`",
            build_with(derived, Dialect::MySql)
        );
    }
}
