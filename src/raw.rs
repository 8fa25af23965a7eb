use smol_str::SmolStr;

use crate::{
    bind::{Bind, IntoBinds},
    buffer::Buffer,
    builder::Build,
    dialect::Dialect,
    error::{Error, Result},
};

/// A literal SQL fragment whose `?` markers are bound, in order, to `binds`.
///
/// A sequence bound to a marker expands to a parenthesized list with one
/// placeholder per element, so `id IN ?` with three ids compiles to
/// `id IN (?, ?, ?)`.
#[derive(Debug, Clone)]
pub struct Raw {
    sql: SmolStr,
    binds: Vec<Bind>,
}

impl Raw {
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self {
            sql: value.into(),
            binds: Vec::new(),
        }
    }

    pub fn new_static(value: &'static str) -> Self {
        Self {
            sql: SmolStr::new_static(value),
            binds: Vec::new(),
        }
    }

    pub fn with_binds<T, B>(value: T, binds: B) -> Self
    where
        T: Into<SmolStr>,
        B: IntoBinds,
    {
        Self {
            sql: value.into(),
            binds: binds.into_binds(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.sql.as_str()
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    /// True when there is no SQL text and nothing bound.
    pub fn is_blank(&self) -> bool {
        self.binds.is_empty() && self.sql.trim().is_empty()
    }
}

impl Build for Raw {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        let sql = self.sql.as_str();
        let markers = placeholders(sql, dialect);
        if markers.len() != self.binds.len() {
            return Err(Error::PlaceholderCount {
                placeholders: markers.len(),
                args: self.binds.len(),
            });
        }

        let mut span_start = 0;
        for (index, bind) in markers.into_iter().zip(&self.binds) {
            buf.write_str(&sql[span_start..index]);
            buf.write_value(dialect, bind)?;
            span_start = index + 1;
        }
        buf.write_str(&sql[span_start..]);
        Ok(())
    }
}

/// Byte offsets of every `?` that stands for a bound value.
///
/// Markers inside string literals and quoted identifiers are text. With
/// postgres `??`, `?|` and `?&` are jsonb operators, not markers.
fn placeholders(sql: &str, dialect: Dialect) -> Vec<usize> {
    enum State {
        Normal,
        Quoted(char),
    }

    let mut state = State::Normal;
    let mut found = Vec::new();
    let mut chars = sql.char_indices().peekable();
    while let Some((index, char)) = chars.next() {
        match state {
            State::Normal => match char {
                '\'' | '"' | '`' => state = State::Quoted(char),
                '?' => {
                    let is_operator = matches!(dialect, Dialect::Postgres)
                        && matches!(chars.peek(), Some(&(_, '?' | '|' | '&')));
                    if is_operator {
                        chars.next();
                    } else {
                        found.push(index);
                    }
                }
                _ => {}
            },
            State::Quoted(quote) => {
                if char == '\\' && matches!(dialect, Dialect::MySql) && quote != '`' {
                    // backslash escapes in mysql literals
                    chars.next();
                } else if char == quote {
                    // doubled quote stays inside the literal
                    if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use crate::{
        bind::IntoBind,
        tests::{build_with, try_build_with},
    };

    use super::*;

    #[test]
    fn test_raw_str() {
        let value = Raw::new_static("'te?st'");
        assert_eq!("'te?st'", build_with(value, Dialect::Postgres));
    }

    #[test]
    fn test_raw_double_quote() {
        let value = Raw::new_static("'te''? st'");
        assert_eq!("'te''? st'", build_with(value, Dialect::Postgres));
    }

    #[test]
    fn test_raw_bind() {
        let value = Raw::with_binds("'test' = ?", ("test",));
        assert_eq!("'test' = $1", build_with(value.clone(), Dialect::Postgres));
        assert_eq!("'test' = ?", build_with(value.clone(), Dialect::MySql));
        assert_eq!("'test' = ?1", build_with(value, Dialect::Sqlite));
    }

    #[test]
    fn test_raw_ident() {
        let value = Raw::with_binds("\"te? ? \"\"st\" = ?", (1,));
        assert_eq!("\"te? ? \"\"st\" = $1", build_with(value, Dialect::Postgres));
    }

    #[test]
    fn test_mysql_escapes() {
        let value = Raw::with_binds("`a?` = 'it\\'s ?' AND b = ?", (1,));
        assert_eq!("`a?` = 'it\\'s ?' AND b = ?", build_with(value, Dialect::MySql));
    }

    #[test]
    fn test_jsonb_operators() {
        let value = Raw::new_static("data ?? 'a' AND data ?| array['b']");
        assert_eq!(
            "data ?? 'a' AND data ?| array['b']",
            build_with(value, Dialect::Postgres)
        );
    }

    #[test]
    fn test_sequence_expansion() {
        let value = Raw::with_binds("id IN ? AND kind = ?", (vec![1, 2, 3, 4, 5], "a"));
        let mut buf = Buffer::new();
        value.build(Dialect::Postgres, &mut buf).unwrap();
        assert_eq!("id IN ($1, $2, $3, $4, $5) AND kind = $6", buf.sql());
        assert_eq!(6, buf.binds().len());
        assert_eq!(&"a".into_bind(), &buf.binds()[5]);

        let single = Raw::with_binds("id IN ?", (vec![7],));
        assert_eq!("id IN (?)", build_with(single, Dialect::MySql));
    }

    #[test]
    fn test_empty_sequence() {
        let value = Raw::with_binds("id IN ?", (Vec::<i64>::new(),));
        assert_eq!(Err(Error::EmptySequence), try_build_with(value, Dialect::MySql));
    }

    #[test]
    fn test_placeholder_count() {
        let value = Raw::with_binds("a = ? AND b = ?", (1,));
        assert_eq!(
            Err(Error::PlaceholderCount {
                placeholders: 2,
                args: 1
            }),
            try_build_with(value, Dialect::MySql)
        );
    }
}
