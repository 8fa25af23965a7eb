use crate::{
    buffer::Buffer,
    builder::Build,
    column::{self, Column, IntoColumn, IntoColumns},
    cond::{self, Condition, impl_filters},
    dialect::Dialect,
    error::{Error, Result},
    ident::{Ident, IntoIdent},
    order::{self, Direction, Order},
    update::{build_limit, check_order_limit},
};

#[derive(Debug, Clone, Default)]
pub struct DeleteStmt {
    table: Ident,
    wheres: Vec<Condition>,
    orders: Vec<Order>,
    maybe_limit: Option<u64>,
    returning: Vec<Column>,
}

impl_filters!(DeleteStmt);

impl DeleteStmt {
    pub fn new<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            ..Self::default()
        }
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

impl Build for DeleteStmt {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }
        check_order_limit(&self.orders, self.maybe_limit, dialect)?;

        buf.write_str("DELETE FROM ");
        self.table.build(dialect, buf)?;
        cond::build_clause(&self.wheres, " WHERE ", dialect, buf)?;
        order::build_order_by(&self.orders, dialect, buf)?;
        build_limit(self.maybe_limit, buf);
        column::build_returning(&self.returning, dialect, buf)
    }
}
