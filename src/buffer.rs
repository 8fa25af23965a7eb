use crate::{
    bind::Bind,
    dialect::Dialect,
    error::{Error, Result},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Values become placeholders and are collected as arguments.
    #[default]
    Placeholder,
    /// Values are encoded as literals straight into the text.
    Interpolate,
}

/// SQL text and its ordered arguments, filled by one compilation.
///
/// The nth placeholder written into the text is bound to the nth argument.
#[derive(Debug, Default)]
pub struct Buffer {
    sql: String,
    binds: Vec<Bind>,
    mode: Mode,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpolated() -> Self {
        Self {
            mode: Mode::Interpolate,
            ..Self::default()
        }
    }

    pub fn with_capacity(capacity: usize, mode: Mode) -> Self {
        Self {
            sql: String::with_capacity(capacity),
            binds: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn write_str(&mut self, value: &str) {
        self.sql.push_str(value);
    }

    pub fn write_char(&mut self, value: char) {
        self.sql.push(value);
    }

    pub fn write_ident(&mut self, dialect: Dialect, name: &str) {
        dialect.write_ident(&mut self.sql, name);
    }

    pub fn write_quoted(&mut self, dialect: Dialect, name: &str) {
        dialect.write_quoted(&mut self.sql, name);
    }

    /// Writes one value in the current mode.
    ///
    /// A sequence expands to `(v1, v2, ...)` with one placeholder or literal
    /// per element.
    pub fn write_value(&mut self, dialect: Dialect, value: &Bind) -> Result<()> {
        match value {
            Bind::List(items) => {
                if items.is_empty() {
                    return Err(Error::EmptySequence);
                }
                self.sql.push('(');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.sql.push_str(", ");
                    }
                    if matches!(item, Bind::List(_)) {
                        return Err(dialect.unsupported("nested list"));
                    }
                    self.write_scalar(dialect, item)?;
                }
                self.sql.push(')');
                Ok(())
            }
            scalar => self.write_scalar(dialect, scalar),
        }
    }

    fn write_scalar(&mut self, dialect: Dialect, value: &Bind) -> Result<()> {
        match self.mode {
            Mode::Placeholder => {
                self.binds.push(value.clone());
                dialect.write_placeholder(&mut self.sql, self.binds.len());
                Ok(())
            }
            Mode::Interpolate => dialect.encode(&mut self.sql, value),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    pub fn into_parts(self) -> (String, Vec<Bind>) {
        (self.sql, self.binds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_order() {
        let mut buf = Buffer::new();
        buf.write_str("a = ");
        buf.write_value(Dialect::Postgres, &Bind::I64(1)).unwrap();
        buf.write_str(" AND b IN ");
        buf.write_value(
            Dialect::Postgres,
            &Bind::List(vec![Bind::I64(2), Bind::I64(3)]),
        )
        .unwrap();
        assert_eq!("a = $1 AND b IN ($2, $3)", buf.sql());
        assert_eq!(&[Bind::I64(1), Bind::I64(2), Bind::I64(3)], buf.binds());
    }

    #[test]
    fn test_interpolate() {
        let mut buf = Buffer::interpolated();
        buf.write_str("name IN ");
        buf.write_value(
            Dialect::MySql,
            &Bind::List(vec![Bind::String("a'b".into()), Bind::Null]),
        )
        .unwrap();
        let (sql, binds) = buf.into_parts();
        assert_eq!("name IN ('a\\'b', NULL)", sql);
        assert!(binds.is_empty());
    }

    #[test]
    fn test_empty_and_nested_sequences() {
        let mut buf = Buffer::new();
        assert_eq!(
            Err(Error::EmptySequence),
            buf.write_value(Dialect::Sqlite, &Bind::List(Vec::new()))
        );
        let nested = Bind::List(vec![Bind::List(vec![Bind::I64(1)])]);
        assert_eq!(
            Err(Error::UnsupportedValue {
                kind: "nested list",
                dialect: Dialect::Sqlite
            }),
            buf.write_value(Dialect::Sqlite, &nested)
        );
    }
}
