use sqlweave_derive::Comparison;

use crate::{
    bind::{Bind, IntoBind, IntoBinds},
    buffer::Buffer,
    builder::{Build, Node},
    column::{Column, IntoColumn},
    dialect::Dialect,
    error::Result,
    raw::Raw,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Comparison)]
#[comparison(filters(
    crate::select::SelectStmt,
    crate::update::UpdateStmt,
    crate::delete::DeleteStmt
))]
pub enum Operator {
    #[comparison(sql = "=")]
    Eq,
    #[comparison(sql = "<>")]
    NotEq,
    #[comparison(sql = ">")]
    Gt,
    #[comparison(sql = ">=")]
    Gte,
    #[comparison(sql = "<")]
    Lt,
    #[comparison(sql = "<=")]
    Lte,
    #[comparison(sql = "LIKE")]
    Like,
    #[comparison(sql = "NOT LIKE")]
    NotLike,
}

/// A predicate tree.
///
/// Combinators with no children render nothing, so optional filters can be
/// collected without checking for emptiness first.
#[derive(Debug, Clone)]
pub enum Condition {
    Compare {
        column: Column,
        operator: Operator,
        value: Bind,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
    Raw(Raw),
    In {
        column: Column,
        query: Box<Node>,
        negated: bool,
    },
    Exists {
        query: Box<Node>,
        negated: bool,
    },
}

impl Condition {
    pub fn compare<C, V>(column: C, operator: Operator, value: V) -> Self
    where
        C: IntoColumn,
        V: IntoBind,
    {
        Condition::Compare {
            column: column.into_column(),
            operator,
            value: value.into_bind(),
        }
    }

    pub fn and<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        Condition::And(children.into_iter().collect())
    }

    pub fn or<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        Condition::Or(children.into_iter().collect())
    }

    pub fn not(child: Condition) -> Self {
        Condition::Not(Box::new(child))
    }

    pub fn raw<B: IntoBinds>(sql: &str, binds: B) -> Self {
        Condition::Raw(Raw::with_binds(sql, binds))
    }

    pub fn is_null<C: IntoColumn>(column: C) -> Self {
        Self::compare(column, Operator::Eq, Bind::Null)
    }

    pub fn is_not_null<C: IntoColumn>(column: C) -> Self {
        Self::compare(column, Operator::NotEq, Bind::Null)
    }

    pub fn in_query<C, Q>(column: C, query: Q) -> Self
    where
        C: IntoColumn,
        Q: Into<Node>,
    {
        Condition::In {
            column: column.into_column(),
            query: Box::new(query.into()),
            negated: false,
        }
    }

    pub fn not_in_query<C, Q>(column: C, query: Q) -> Self
    where
        C: IntoColumn,
        Q: Into<Node>,
    {
        Condition::In {
            column: column.into_column(),
            query: Box::new(query.into()),
            negated: true,
        }
    }

    pub fn exists<Q: Into<Node>>(query: Q) -> Self {
        Condition::Exists {
            query: Box::new(query.into()),
            negated: false,
        }
    }

    pub fn not_exists<Q: Into<Node>>(query: Q) -> Self {
        Condition::Exists {
            query: Box::new(query.into()),
            negated: true,
        }
    }

    /// True when the condition renders nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::And(children) | Condition::Or(children) => {
                children.iter().all(Condition::is_empty)
            }
            Condition::Not(child) => child.is_empty(),
            Condition::Raw(raw) => raw.is_blank(),
            _ => false,
        }
    }

    /// Whether the condition has to be parenthesized when it sits next to
    /// siblings inside a combinator.
    fn needs_group(&self) -> bool {
        match self {
            Condition::And(children) | Condition::Or(children) => {
                let mut rendered = children.iter().filter(|c| !c.is_empty());
                match (rendered.next(), rendered.next()) {
                    (Some(_), Some(_)) => true,
                    (Some(only), None) => only.needs_group(),
                    _ => false,
                }
            }
            Condition::Raw(_) => true,
            _ => false,
        }
    }
}

impl Build for Condition {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => build_compare(column, *operator, value, dialect, buf),
            Condition::And(children) => build_group(children, " AND ", dialect, buf),
            Condition::Or(children) => build_group(children, " OR ", dialect, buf),
            Condition::Not(child) => {
                if child.is_empty() {
                    return Ok(());
                }
                buf.write_str("NOT (");
                child.build(dialect, buf)?;
                buf.write_char(')');
                Ok(())
            }
            Condition::Raw(raw) => raw.build(dialect, buf),
            Condition::In {
                column,
                query,
                negated,
            } => {
                column.build(dialect, buf)?;
                buf.write_str(if *negated { " NOT IN (" } else { " IN (" });
                query.build(dialect, buf)?;
                buf.write_char(')');
                Ok(())
            }
            Condition::Exists { query, negated } => {
                buf.write_str(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                query.build(dialect, buf)?;
                buf.write_char(')');
                Ok(())
            }
        }
    }
}

fn build_compare(
    column: &Column,
    operator: Operator,
    value: &Bind,
    dialect: Dialect,
    buf: &mut Buffer,
) -> Result<()> {
    match (operator, value) {
        (Operator::Eq | Operator::NotEq, Bind::List(items)) if items.is_empty() => {
            // nothing is in an empty set
            buf.write_str(dialect.encode_bool(operator == Operator::NotEq));
            Ok(())
        }
        (Operator::Eq | Operator::NotEq, Bind::List(_)) => {
            column.build(dialect, buf)?;
            buf.write_str(if operator == Operator::Eq { " IN " } else { " NOT IN " });
            buf.write_value(dialect, value)
        }
        (_, Bind::List(_)) => Err(dialect.unsupported("list")),
        (Operator::Eq, Bind::Null) => {
            column.build(dialect, buf)?;
            buf.write_str(" IS NULL");
            Ok(())
        }
        (Operator::NotEq, Bind::Null) => {
            column.build(dialect, buf)?;
            buf.write_str(" IS NOT NULL");
            Ok(())
        }
        _ => {
            column.build(dialect, buf)?;
            buf.write_char(' ');
            buf.write_str(operator.as_sql());
            buf.write_char(' ');
            buf.write_value(dialect, value)
        }
    }
}

/// Joins the non-empty children with `keyword`. Children that would change
/// meaning without parentheses are wrapped when there is more than one.
fn build_group(
    children: &[Condition],
    keyword: &str,
    dialect: Dialect,
    buf: &mut Buffer,
) -> Result<()> {
    let rendered = children.iter().filter(|c| !c.is_empty()).count();
    for (i, child) in children.iter().filter(|c| !c.is_empty()).enumerate() {
        if i > 0 {
            buf.write_str(keyword);
        }
        if rendered > 1 && child.needs_group() {
            buf.write_char('(');
            child.build(dialect, buf)?;
            buf.write_char(')');
        } else {
            child.build(dialect, buf)?;
        }
    }
    Ok(())
}

/// Writes `keyword` followed by the conjunction of `conditions`, or nothing
/// when every condition is empty.
pub(crate) fn build_clause(
    conditions: &[Condition],
    keyword: &str,
    dialect: Dialect,
    buf: &mut Buffer,
) -> Result<()> {
    if conditions.iter().all(Condition::is_empty) {
        return Ok(());
    }
    buf.write_str(keyword);
    build_group(conditions, " AND ", dialect, buf)
}

/// Filter methods shared by every statement carrying a `wheres` list.
macro_rules! impl_filters {
    ($($target:ty),+) => {
        $(
            impl $target {
                /// Adds a condition, and-ed with the ones already present.
                pub fn where_cond(mut self, condition: $crate::cond::Condition) -> Self {
                    self.wheres.push(condition);
                    self
                }

                /// Or-s a condition with everything filtered so far.
                pub fn or_where_cond(mut self, condition: $crate::cond::Condition) -> Self {
                    let existing = ::std::mem::take(&mut self.wheres);
                    self.wheres.push($crate::cond::Condition::or([
                        $crate::cond::Condition::And(existing),
                        condition,
                    ]));
                    self
                }

                pub fn where_raw<B: $crate::IntoBinds>(self, sql: &str, binds: B) -> Self {
                    self.where_cond($crate::cond::Condition::raw(sql, binds))
                }

                pub fn where_null<C: $crate::IntoColumn>(self, column: C) -> Self {
                    self.where_cond($crate::cond::Condition::is_null(column))
                }

                pub fn where_not_null<C: $crate::IntoColumn>(self, column: C) -> Self {
                    self.where_cond($crate::cond::Condition::is_not_null(column))
                }

                pub fn where_in<C, Q>(self, column: C, query: Q) -> Self
                where
                    C: $crate::IntoColumn,
                    Q: Into<$crate::Node>,
                {
                    self.where_cond($crate::cond::Condition::in_query(column, query))
                }

                pub fn where_exists<Q: Into<$crate::Node>>(self, query: Q) -> Self {
                    self.where_cond($crate::cond::Condition::exists(query))
                }
            }
        )+
    };
}

pub(crate) use impl_filters;
