use indexmap::IndexMap;

use crate::{
    bind::{Bind, IntoBind, IntoBinds},
    buffer::Buffer,
    builder::Build,
    column::{self, Column, IntoColumn, IntoColumns},
    cond::{self, Condition, impl_filters},
    dialect::Dialect,
    error::{Error, Result},
    ident::{Ident, IntoIdent},
    order::{self, Direction, Order},
    raw::Raw,
};

#[derive(Debug, Clone)]
enum SetValue {
    Value(Bind),
    Raw(Raw),
    /// `col = col + n`, negative for a decrement.
    Increment(i64),
}

/// `UPDATE` statement.
///
/// Assignments keep the position of the first `set` of a column, a later
/// `set` of the same column only replaces its value.
#[derive(Debug, Clone, Default)]
pub struct UpdateStmt {
    table: Ident,
    sets: IndexMap<Ident, SetValue>,
    wheres: Vec<Condition>,
    orders: Vec<Order>,
    maybe_limit: Option<u64>,
    returning: Vec<Column>,
}

impl_filters!(UpdateStmt);

impl UpdateStmt {
    pub fn new<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            ..Self::default()
        }
    }

    pub fn set<C, V>(mut self, column: C, value: V) -> Self
    where
        C: IntoIdent,
        V: IntoBind,
    {
        self.sets
            .insert(column.into_ident(), SetValue::Value(value.into_bind()));
        self
    }

    /// Assigns a raw expression, `set_raw("count", "count + ?", (1,))`.
    pub fn set_raw<C, B>(mut self, column: C, sql: &str, binds: B) -> Self
    where
        C: IntoIdent,
        B: IntoBinds,
    {
        self.sets
            .insert(column.into_ident(), SetValue::Raw(Raw::with_binds(sql, binds)));
        self
    }

    pub fn increment<C: IntoIdent>(mut self, column: C, amount: i64) -> Self {
        self.sets
            .insert(column.into_ident(), SetValue::Increment(amount));
        self
    }

    pub fn decrement<C: IntoIdent>(self, column: C, amount: i64) -> Self {
        self.increment(column, amount.saturating_neg())
    }

    pub fn order_by<C, D>(mut self, column: C, direction: D) -> Self
    where
        C: IntoColumn,
        D: Into<Direction>,
    {
        self.orders.push(Order::new(column, direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.maybe_limit = Some(limit);
        self
    }

    pub fn returning<C: IntoColumns>(mut self, columns: C) -> Self {
        self.returning.extend(columns.into_columns());
        self
    }
}

impl Build for UpdateStmt {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }
        if self.sets.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }
        check_order_limit(&self.orders, self.maybe_limit, dialect)?;

        buf.write_str("UPDATE ");
        self.table.build(dialect, buf)?;
        for (i, (column, value)) in self.sets.iter().enumerate() {
            buf.write_str(if i == 0 { " SET " } else { ", " });
            buf.write_ident(dialect, column.as_str());
            buf.write_str(" = ");
            match value {
                SetValue::Value(Bind::List(_)) => return Err(dialect.unsupported("list")),
                SetValue::Value(value) => buf.write_value(dialect, value)?,
                SetValue::Raw(raw) => raw.build(dialect, buf)?,
                SetValue::Increment(amount) => {
                    buf.write_ident(dialect, column.as_str());
                    buf.write_str(if *amount < 0 { " - " } else { " + " });
                    buf.write_value(dialect, &Bind::U64(amount.unsigned_abs()))?;
                }
            }
        }

        cond::build_clause(&self.wheres, " WHERE ", dialect, buf)?;
        order::build_order_by(&self.orders, dialect, buf)?;
        build_limit(self.maybe_limit, buf);
        column::build_returning(&self.returning, dialect, buf)
    }
}

/// Postgres has no ORDER BY or LIMIT on UPDATE and DELETE.
pub(crate) fn check_order_limit(
    orders: &[Order],
    maybe_limit: Option<u64>,
    dialect: Dialect,
) -> Result<()> {
    if dialect != Dialect::Postgres {
        return Ok(());
    }
    if !orders.is_empty() {
        return Err(Error::UnsupportedClause {
            clause: "ORDER BY",
            dialect,
        });
    }
    if maybe_limit.is_some() {
        return Err(Error::UnsupportedClause {
            clause: "LIMIT",
            dialect,
        });
    }
    Ok(())
}

pub(crate) fn build_limit(maybe_limit: Option<u64>, buf: &mut Buffer) {
    if let Some(limit) = maybe_limit {
        buf.write_str(" LIMIT ");
        buf.write_str(&limit.to_string());
    }
}
