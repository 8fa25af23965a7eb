use smol_str::SmolStr;

use crate::{
    buffer::Buffer,
    builder::Build,
    column::{IntoTable, TableRef},
    cond::Condition,
    dialect::Dialect,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub const fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// The predicate of a join: caller written SQL such as `u.id = p.user_id`, or
/// a condition tree.
#[derive(Debug, Clone)]
pub enum JoinOn {
    Verbatim(SmolStr),
    Condition(Condition),
}

impl From<&str> for JoinOn {
    fn from(value: &str) -> Self {
        JoinOn::Verbatim(SmolStr::new(value))
    }
}

impl From<String> for JoinOn {
    fn from(value: String) -> Self {
        JoinOn::Verbatim(SmolStr::from(value))
    }
}

impl From<Condition> for JoinOn {
    fn from(value: Condition) -> Self {
        JoinOn::Condition(value)
    }
}

impl JoinOn {
    fn is_empty(&self) -> bool {
        match self {
            JoinOn::Verbatim(sql) => sql.trim().is_empty(),
            JoinOn::Condition(condition) => condition.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    kind: JoinKind,
    table: TableRef,
    on: Option<JoinOn>,
}

impl Join {
    pub fn new<T, O>(kind: JoinKind, table: T, on: O) -> Self
    where
        T: IntoTable,
        O: Into<JoinOn>,
    {
        Self {
            kind,
            table: table.into_table(),
            on: Some(on.into()),
        }
    }

    pub fn cross<T: IntoTable>(table: T) -> Self {
        Self {
            kind: JoinKind::Cross,
            table: table.into_table(),
            on: None,
        }
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }
}

impl Build for Join {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.kind == JoinKind::Full && dialect == Dialect::MySql {
            return Err(Error::UnsupportedClause {
                clause: "FULL JOIN",
                dialect,
            });
        }
        buf.write_str(self.kind.as_sql());
        buf.write_char(' ');
        self.table.build(dialect, buf)?;
        match &self.on {
            Some(on) if !on.is_empty() => {
                buf.write_str(" ON ");
                match on {
                    JoinOn::Verbatim(sql) => buf.write_str(sql),
                    JoinOn::Condition(condition) => condition.build(dialect, buf)?,
                }
            }
            _ => {}
        }
        Ok(())
    }
}
