use crate::{
    buffer::Buffer,
    builder::Build,
    column::{Column, IntoColumn},
    dialect::Dialect,
    error::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl From<bool> for Direction {
    /// `true` is ascending.
    fn from(ascending: bool) -> Self {
        if ascending {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    column: Column,
    direction: Direction,
}

impl Order {
    pub fn new<C, D>(column: C, direction: D) -> Self
    where
        C: IntoColumn,
        D: Into<Direction>,
    {
        Self {
            column: column.into_column(),
            direction: direction.into(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Build for Order {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        self.column.build(dialect, buf)?;
        buf.write_char(' ');
        buf.write_str(self.direction.as_sql());
        Ok(())
    }
}

/// ` ORDER BY a ASC, b DESC`, or nothing without entries.
pub(crate) fn build_order_by(orders: &[Order], dialect: Dialect, buf: &mut Buffer) -> Result<()> {
    for (i, order) in orders.iter().enumerate() {
        buf.write_str(if i == 0 { " ORDER BY " } else { ", " });
        order.build(dialect, buf)?;
    }
    Ok(())
}
