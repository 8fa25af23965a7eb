use crate::{
    buffer::Buffer,
    builder::{Alias, Build},
    column::{self, Column, IntoColumn, IntoColumns, IntoTable, TableRef},
    cond::{self, Condition, impl_filters},
    dialect::Dialect,
    error::{Error, Result},
    ident::IntoIdent,
    join::{Join, JoinKind, JoinOn},
    order::{self, Direction, Order},
    paginate::Paginator,
};

/// `SELECT` statement. Clauses render in SQL order whatever order the
/// builder methods were called in.
#[derive(Debug, Clone, Default)]
pub struct SelectStmt {
    distinct: bool,
    columns: Vec<Column>,
    maybe_table: Option<TableRef>,
    joins: Vec<Join>,
    wheres: Vec<Condition>,
    groups: Vec<Column>,
    havings: Vec<Condition>,
    orders: Vec<Order>,
    page: Paginator,
    for_update: bool,
}

impl_filters!(SelectStmt);

impl SelectStmt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the projection.
    pub fn columns<C: IntoColumns>(mut self, columns: C) -> Self {
        self.columns = columns.into_columns();
        self
    }

    pub fn add_columns<C: IntoColumns>(mut self, columns: C) -> Self {
        self.columns.extend(columns.into_columns());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from<T: IntoTable>(mut self, table: T) -> Self {
        self.maybe_table = Some(table.into_table());
        self
    }

    pub fn join<T, O>(mut self, table: T, on: O) -> Self
    where
        T: IntoTable,
        O: Into<JoinOn>,
    {
        self.joins.push(Join::new(JoinKind::Inner, table, on));
        self
    }

    pub fn left_join<T, O>(mut self, table: T, on: O) -> Self
    where
        T: IntoTable,
        O: Into<JoinOn>,
    {
        self.joins.push(Join::new(JoinKind::Left, table, on));
        self
    }

    pub fn right_join<T, O>(mut self, table: T, on: O) -> Self
    where
        T: IntoTable,
        O: Into<JoinOn>,
    {
        self.joins.push(Join::new(JoinKind::Right, table, on));
        self
    }

    pub fn full_join<T, O>(mut self, table: T, on: O) -> Self
    where
        T: IntoTable,
        O: Into<JoinOn>,
    {
        self.joins.push(Join::new(JoinKind::Full, table, on));
        self
    }

    pub fn cross_join<T: IntoTable>(mut self, table: T) -> Self {
        self.joins.push(Join::cross(table));
        self
    }

    pub fn group_by<C: IntoColumns>(mut self, columns: C) -> Self {
        self.groups.extend(columns.into_columns());
        self
    }

    pub fn having(mut self, condition: Condition) -> Self {
        self.havings.push(condition);
        self
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
        self.page.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.page.offset(offset);
        self
    }

    /// Selects the `page`th page of `per_page` rows, counting from 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        self.page.paginate(page, per_page);
        self
    }

    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    pub fn alias<T: IntoIdent>(self, alias: T) -> Alias {
        Alias::new(self, alias)
    }
}

impl Build for SelectStmt {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }
        if self.for_update && dialect == Dialect::Sqlite {
            return Err(Error::UnsupportedClause {
                clause: "FOR UPDATE",
                dialect,
            });
        }

        buf.write_str("SELECT ");
        if self.distinct {
            buf.write_str("DISTINCT ");
        }
        column::build_list(&self.columns, dialect, buf)?;

        if let Some(table) = &self.maybe_table {
            buf.write_str(" FROM ");
            table.build(dialect, buf)?;
        }

        for join in &self.joins {
            buf.write_char(' ');
            join.build(dialect, buf)?;
        }

        cond::build_clause(&self.wheres, " WHERE ", dialect, buf)?;

        if !self.groups.is_empty() {
            buf.write_str(" GROUP BY ");
            column::build_list(&self.groups, dialect, buf)?;
        }

        cond::build_clause(&self.havings, " HAVING ", dialect, buf)?;
        order::build_order_by(&self.orders, dialect, buf)?;
        self.page.build(dialect, buf)?;

        if self.for_update {
            buf.write_str(" FOR UPDATE");
        }
        Ok(())
    }
}
