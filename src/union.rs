use crate::{
    buffer::Buffer,
    builder::{Alias, Build, Node},
    column::IntoColumn,
    dialect::Dialect,
    error::{Error, Result},
    ident::IntoIdent,
    order::{self, Order},
};

/// `UNION` or `UNION ALL` of any number of queries.
///
/// Ordering and limit apply to the combined result and are written once,
/// after the last member.
#[derive(Debug, Clone)]
pub struct Union {
    members: Vec<Node>,
    all: bool,
    orders: Vec<Order>,
    limit: u64,
}

impl Union {
    pub fn new<I, N>(members: I, all: bool) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
            all,
            orders: Vec::new(),
            limit: 0,
        }
    }

    pub fn push<N: Into<Node>>(mut self, member: N) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn order_by<C: IntoColumn>(mut self, column: C, ascending: bool) -> Self {
        self.orders.push(Order::new(column, ascending));
        self
    }

    /// Zero means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn alias<T: IntoIdent>(self, alias: T) -> Alias {
        Alias::new(self, alias)
    }

    fn build_member(member: &Node, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if dialect.parenthesize_union_members() {
            buf.write_str("( ");
            member.build(dialect, buf)?;
            buf.write_str(" )");
        } else if matches!(member, Node::Union(_)) {
            buf.write_char('(');
            member.build(dialect, buf)?;
            buf.write_char(')');
        } else {
            member.build(dialect, buf)?;
        }
        Ok(())
    }
}

impl Build for Union {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.members.is_empty() {
            return Err(Error::EmptyUnion);
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                buf.write_str(" UNION ");
                if self.all {
                    buf.write_str("ALL ");
                }
            }
            Self::build_member(member, dialect, buf)?;
        }
        order::build_order_by(&self.orders, dialect, buf)?;
        if self.limit > 0 {
            buf.write_str(" LIMIT ");
            buf.write_str(&self.limit.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Bind, MySql, Postgres, select,
        tests::{build_with, try_build_with},
        union, union_all,
    };

    use super::*;

    #[test]
    fn test_union_parenthesized_members() {
        let stmt = union([select("*"), select("*")]);
        assert_eq!("( SELECT * ) UNION ( SELECT * )", build_with(stmt.clone(), Dialect::MySql));
        assert_eq!("SELECT * UNION SELECT *", build_with(stmt, Dialect::Postgres));
    }

    #[test]
    fn test_union_all_order_limit() {
        let stmt = union_all([
            select("id").from("a").where_eq("x", 1),
            select("id").from("b").where_eq("y", 2),
        ])
        .order_by("id", true)
        .limit(10);
        let (sql, binds) = stmt.to_sql::<Postgres>().unwrap();
        assert_eq!(
            "SELECT id FROM \"a\" WHERE x = $1 UNION ALL SELECT id FROM \"b\" WHERE y = $2 \
             ORDER BY id ASC LIMIT 10",
            sql
        );
        assert_eq!(vec![Bind::I64(1), Bind::I64(2)], binds);
    }

    #[test]
    fn test_order_entries_in_insertion_order() {
        let stmt = union_all([select("*"), select("*"), select("*")])
            .order_by("a", false)
            .order_by("b", true)
            .limit(5);
        assert_eq!(
            "( SELECT * ) UNION ALL ( SELECT * ) UNION ALL ( SELECT * ) \
             ORDER BY a DESC, b ASC LIMIT 5",
            build_with(stmt, Dialect::MySql)
        );
    }

    #[test]
    fn test_limit_zero() {
        let stmt = union([select("*"), select("*")]).limit(0);
        assert_eq!("SELECT * UNION SELECT *", build_with(stmt, Dialect::Sqlite));
    }

    #[test]
    fn test_idempotent() {
        let stmt = union([select("*").from("a").where_eq("id", vec![1, 2])])
            .push(select("*").from("b").where_like("name", "x%"));
        let first = stmt.to_sql::<MySql>().unwrap();
        let second = stmt.to_sql::<MySql>().unwrap();
        assert_eq!(first, second);
        assert_eq!(3, first.1.len());
    }

    #[test]
    fn test_nested_union() {
        let inner = union([select("1"), select("2")]);
        let stmt = union_all([Node::from(inner), select("3").into()]);
        assert_eq!(
            "(SELECT 1 UNION SELECT 2) UNION ALL SELECT 3",
            build_with(stmt, Dialect::Postgres)
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Err(Error::EmptyUnion),
            try_build_with(union(Vec::<Node>::new()), Dialect::Postgres)
        );
        let stmt = union([select("*"), select(Vec::<&str>::new())]);
        assert_eq!(Err(Error::ColumnNotSpecified), try_build_with(stmt, Dialect::MySql));
    }
}
