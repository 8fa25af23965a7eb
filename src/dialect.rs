use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    bind::Bind,
    error::{Error, Result},
};

/// Target database. Everything that differs between databases when compiling
/// a tree is answered by a method on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => f.write_str("postgres"),
            Dialect::MySql => f.write_str("mysql"),
            Dialect::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl Dialect {
    pub const fn quote_char(self) -> char {
        match self {
            Dialect::Postgres | Dialect::Sqlite => '"',
            Dialect::MySql => '`',
        }
    }

    /// Whether each member of a `UNION` has to be wrapped in parentheses.
    pub const fn parenthesize_union_members(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// The LIMIT meaning "every row", for an OFFSET without a LIMIT. Postgres
    /// accepts a bare OFFSET.
    pub const fn limit_all(self) -> Option<&'static str> {
        match self {
            Dialect::Postgres => None,
            Dialect::MySql => Some("18446744073709551615"),
            Dialect::Sqlite => Some("-1"),
        }
    }

    /// Writes a dotted name, quoting each segment on its own.
    pub fn write_ident(self, out: &mut String, name: &str) {
        for (i, part) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            self.write_quoted(out, part);
        }
    }

    /// Quotes a single name, dots included.
    pub fn write_quoted(self, out: &mut String, part: &str) {
        if part == "*" {
            out.push('*');
            return;
        }

        let quote = self.quote_char();
        out.push(quote);
        // duplicate the quote if present
        let mut last = 0;
        for (index, char) in part.char_indices() {
            if char == quote {
                out.push_str(&part[last..index]);
                out.push(quote);
                out.push(quote);
                last = index + char.len_utf8();
            }
        }
        out.push_str(&part[last..]);
        out.push(quote);
    }

    /// Writes the marker for the `position`th bound argument, starting at 1.
    pub fn write_placeholder(self, out: &mut String, position: usize) {
        match self {
            Dialect::MySql => out.push('?'),
            Dialect::Postgres => {
                out.push('$');
                out.push_str(&position.to_string());
            }
            Dialect::Sqlite => {
                out.push('?');
                out.push_str(&position.to_string());
            }
        }
    }

    pub const fn encode_bool(self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::Postgres, true) => "TRUE",
            (Dialect::Postgres, false) => "FALSE",
            (Dialect::MySql | Dialect::Sqlite, true) => "1",
            (Dialect::MySql | Dialect::Sqlite, false) => "0",
        }
    }

    pub fn encode_string(self, out: &mut String, value: &str) {
        out.push('\'');
        match self {
            Dialect::MySql => {
                for char in value.chars() {
                    match char {
                        '\0' => out.push_str("\\0"),
                        '\'' => out.push_str("\\'"),
                        '"' => out.push_str("\\\""),
                        '\x08' => out.push_str("\\b"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        '\x1a' => out.push_str("\\Z"),
                        '\\' => out.push_str("\\\\"),
                        other => out.push(other),
                    }
                }
            }
            Dialect::Postgres | Dialect::Sqlite => {
                for char in value.chars() {
                    if char == '\'' {
                        out.push('\'');
                    }
                    out.push(char);
                }
            }
        }
        out.push('\'');
    }

    pub fn encode_bytes(self, out: &mut String, value: &[u8]) {
        match self {
            Dialect::Postgres => out.push_str("E'\\\\x"),
            Dialect::MySql | Dialect::Sqlite => out.push_str("X'"),
        }
        for byte in value {
            out.push_str(&format!("{byte:02x}"));
        }
        out.push('\'');
    }

    pub fn encode_timestamp(self, out: &mut String, value: &NaiveDateTime) {
        let formatted = value.format("%Y-%m-%d %H:%M:%S%.6f").to_string();
        self.encode_string(out, &formatted);
    }

    pub fn encode_date(self, out: &mut String, value: &NaiveDate) {
        let formatted = value.format("%Y-%m-%d").to_string();
        self.encode_string(out, &formatted);
    }

    /// Writes `value` as a self-contained SQL literal.
    ///
    /// Sequences are not scalars and are rejected here; the buffer expands
    /// them before reaching this point.
    pub fn encode(self, out: &mut String, value: &Bind) -> Result<()> {
        match value {
            Bind::Null => out.push_str("NULL"),
            Bind::Bool(value) => out.push_str(self.encode_bool(*value)),
            Bind::I64(value) => out.push_str(&value.to_string()),
            Bind::U64(value) => out.push_str(&value.to_string()),
            Bind::F64(value) => {
                if !value.is_finite() {
                    return Err(self.unsupported(value_kind(value)));
                }
                out.push_str(&value.to_string());
            }
            Bind::String(value) => self.encode_string(out, value),
            Bind::Bytes(value) => self.encode_bytes(out, value),
            Bind::Timestamp(value) => self.encode_timestamp(out, value),
            Bind::Date(value) => self.encode_date(out, value),
            #[cfg(feature = "uuid")]
            Bind::Uuid(value) => self.encode_string(out, &value.to_string()),
            #[cfg(feature = "json")]
            Bind::Json(value) => self.encode_string(out, &value.to_string()),
            Bind::List(_) => return Err(self.unsupported("list")),
        }
        Ok(())
    }

    pub(crate) fn unsupported(self, kind: &'static str) -> Error {
        Error::UnsupportedValue {
            kind,
            dialect: self,
        }
    }
}

fn value_kind(value: &f64) -> &'static str {
    if value.is_nan() { "nan" } else { "infinite float" }
}

pub trait HasDialect {
    const DIALECT: Dialect;
}

pub struct Postgres;

impl HasDialect for Postgres {
    const DIALECT: Dialect = Dialect::Postgres;
}

pub struct MySql;

impl HasDialect for MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

pub struct Sqlite;

impl HasDialect for Sqlite {
    const DIALECT: Dialect = Dialect::Sqlite;
}
