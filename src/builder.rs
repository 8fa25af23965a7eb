use std::ops::Deref;

use crate::{
    bind::Bind,
    buffer::{Buffer, Mode},
    cond::Condition,
    delete::DeleteStmt,
    dialect::{Dialect, HasDialect},
    error::Result,
    ident::{Ident, IntoIdent},
    insert::InsertStmt,
    raw::Raw,
    select::SelectStmt,
    union::Union,
    update::UpdateStmt,
};

/// Anything that can write itself into a [`Buffer`].
///
/// Building never mutates the node, so the same tree can be built any number
/// of times, from any number of threads, each with its own buffer.
pub trait Build {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()>;

    /// Compiles to SQL text with placeholders and the arguments they bind.
    fn to_sql<D: HasDialect>(&self) -> Result<(String, Vec<Bind>)>
    where
        Self: Sized,
    {
        compile(self, D::DIALECT, Mode::Placeholder).map(Buffer::into_parts)
    }

    /// Compiles to one self-contained SQL string with every value inlined.
    fn to_sql_interpolated<D: HasDialect>(&self) -> Result<String>
    where
        Self: Sized,
    {
        compile(self, D::DIALECT, Mode::Interpolate).map(|buf| buf.into_parts().0)
    }
}

impl<D> Build for D
where
    D: Deref,
    D::Target: Build,
{
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        self.deref().build(dialect, buf)
    }
}

pub(crate) fn compile<B: Build + ?Sized>(
    node: &B,
    dialect: Dialect,
    mode: Mode,
) -> Result<Buffer> {
    let mut buf = Buffer::with_capacity(64, mode);
    match node.build(dialect, &mut buf) {
        Ok(()) => {
            tracing::debug!(
                target: "sqlweave::sql",
                %dialect,
                ?mode,
                sql = buf.sql(),
                binds = buf.binds().len(),
                "compiled statement"
            );
            Ok(buf)
        }
        Err(error) => {
            tracing::debug!(target: "sqlweave::sql", %dialect, %error, "compilation failed");
            Err(error)
        }
    }
}

/// Every kind of node a tree can hold.
#[derive(Debug, Clone)]
pub enum Node {
    Select(Box<SelectStmt>),
    Insert(Box<InsertStmt>),
    Update(Box<UpdateStmt>),
    Delete(Box<DeleteStmt>),
    Union(Box<Union>),
    Ident(Ident),
    Raw(Raw),
    Condition(Box<Condition>),
    Alias(Box<Alias>),
}

impl Node {
    /// Statements and unions need parentheses when nested in another statement.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Node::Select(_) | Node::Insert(_) | Node::Update(_) | Node::Delete(_) | Node::Union(_)
        )
    }

    pub fn alias<T: IntoIdent>(self, alias: T) -> Alias {
        Alias::new(self, alias)
    }

    /// Builds the node, wrapped in parentheses when it is a query.
    pub(crate) fn build_nested(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.is_query() {
            buf.write_char('(');
            self.build(dialect, buf)?;
            buf.write_char(')');
            Ok(())
        } else {
            self.build(dialect, buf)
        }
    }
}

impl Build for Node {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            Node::Select(select) => select.build(dialect, buf),
            Node::Insert(insert) => insert.build(dialect, buf),
            Node::Update(update) => update.build(dialect, buf),
            Node::Delete(delete) => delete.build(dialect, buf),
            Node::Union(union) => union.build(dialect, buf),
            Node::Ident(ident) => ident.build(dialect, buf),
            Node::Raw(raw) => raw.build(dialect, buf),
            Node::Condition(condition) => condition.build(dialect, buf),
            Node::Alias(alias) => alias.build(dialect, buf),
        }
    }
}

impl From<SelectStmt> for Node {
    fn from(value: SelectStmt) -> Self {
        Node::Select(Box::new(value))
    }
}

impl From<InsertStmt> for Node {
    fn from(value: InsertStmt) -> Self {
        Node::Insert(Box::new(value))
    }
}

impl From<UpdateStmt> for Node {
    fn from(value: UpdateStmt) -> Self {
        Node::Update(Box::new(value))
    }
}

impl From<DeleteStmt> for Node {
    fn from(value: DeleteStmt) -> Self {
        Node::Delete(Box::new(value))
    }
}

impl From<Union> for Node {
    fn from(value: Union) -> Self {
        Node::Union(Box::new(value))
    }
}

impl From<Ident> for Node {
    fn from(value: Ident) -> Self {
        Node::Ident(value)
    }
}

impl From<Raw> for Node {
    fn from(value: Raw) -> Self {
        Node::Raw(value)
    }
}

impl From<Condition> for Node {
    fn from(value: Condition) -> Self {
        Node::Condition(Box::new(value))
    }
}

impl From<Alias> for Node {
    fn from(value: Alias) -> Self {
        Node::Alias(Box::new(value))
    }
}

/// `(<query>) AS alias` or `<expr> AS alias`.
#[derive(Debug, Clone)]
pub struct Alias {
    inner: Node,
    alias: Ident,
}

impl Alias {
    pub fn new<N, T>(inner: N, alias: T) -> Self
    where
        N: Into<Node>,
        T: IntoIdent,
    {
        Self {
            inner: inner.into(),
            alias: alias.into_ident(),
        }
    }

    pub fn alias(&self) -> &Ident {
        &self.alias
    }
}

impl Build for Alias {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        self.inner.build_nested(dialect, buf)?;
        buf.write_str(" AS ");
        buf.write_quoted(dialect, self.alias.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, MySql, Postgres, Sqlite, ident, select, tests::build_with, union_all,
    };

    use super::*;

    #[test]
    fn test_alias_ident() {
        let alias = ident("suggestions.id").alias("id");
        assert_eq!("`suggestions`.`id` AS `id`", build_with(alias, Dialect::MySql));
    }

    #[test]
    fn test_alias_select() {
        let alias = select("*").from("suggestions").alias("count");
        assert_eq!(
            "(SELECT * FROM \"suggestions\") AS \"count\"",
            build_with(alias, Dialect::Postgres)
        );
    }

    #[test]
    fn test_alias_union() {
        let alias = union_all([select("*"), select("*")]).alias("subquery");
        assert_eq!(
            "(SELECT * UNION ALL SELECT *) AS \"subquery\"",
            build_with(alias, Dialect::Sqlite)
        );
    }

    #[test]
    fn test_alias_propagates_error() {
        let alias = select(Vec::<&str>::new()).from("users").alias("u");
        assert_eq!(Err(Error::ColumnNotSpecified), alias.to_sql::<MySql>());
    }

    #[test]
    fn test_to_sql_modes() {
        let stmt = select("*").from("users").where_eq("name", "o'neil");
        let (sql, binds) = stmt.to_sql::<Postgres>().unwrap();
        assert_eq!("SELECT * FROM \"users\" WHERE name = $1", sql);
        assert_eq!(vec![Bind::String("o'neil".into())], binds);
        assert_eq!(
            "SELECT * FROM \"users\" WHERE name = 'o''neil'",
            stmt.to_sql_interpolated::<Sqlite>().unwrap()
        );
    }

    #[test]
    fn test_boxed_node() {
        let node: Box<Node> = Box::new(Node::from(ident("users")));
        assert_eq!("\"users\"", build_with(node, Dialect::Postgres));
    }
}
