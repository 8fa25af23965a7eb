use crate::{
    bind::{Bind, IntoBind, IntoBinds},
    buffer::Buffer,
    builder::{Build, Node},
    column::{self, Column, IntoColumns},
    dialect::Dialect,
    error::{Error, Result},
    ident::{Ident, IntoIdent, IntoIdents},
};

#[derive(Debug, Clone, Default)]
enum Conflict {
    #[default]
    Fail,
    Ignore,
    Update {
        targets: Vec<Ident>,
        updates: Vec<Ident>,
    },
}

/// `INSERT` statement, from literal rows or from a query.
#[derive(Debug, Clone, Default)]
pub struct InsertStmt {
    table: Ident,
    columns: Vec<Ident>,
    rows: Vec<Vec<Bind>>,
    maybe_source: Option<Node>,
    conflict: Conflict,
    returning: Vec<Column>,
}

impl InsertStmt {
    pub fn new<T: IntoIdent>(table: T) -> Self {
        Self {
            table: table.into_ident(),
            ..Self::default()
        }
    }

    pub fn columns<C: IntoIdents>(mut self, columns: C) -> Self {
        self.columns = columns.into_idents();
        self
    }

    /// Adds one row, its values in column order.
    pub fn values<B: IntoBinds>(mut self, row: B) -> Self {
        self.rows.push(row.into_binds());
        self
    }

    /// Adds a column and its value to the first row.
    pub fn pair<C, V>(mut self, column: C, value: V) -> Self
    where
        C: IntoIdent,
        V: IntoBind,
    {
        self.columns.push(column.into_ident());
        match self.rows.first_mut() {
            Some(row) => row.push(value.into_bind()),
            None => self.rows.push(vec![value.into_bind()]),
        }
        self
    }

    /// Inserts the rows produced by `query` instead of literal values.
    pub fn from_select<Q: Into<Node>>(mut self, query: Q) -> Self {
        self.maybe_source = Some(query.into());
        self
    }

    /// Skips rows that would violate a unique constraint.
    pub fn ignore(mut self) -> Self {
        self.conflict = Conflict::Ignore;
        self
    }

    /// Upsert: on a conflict over `targets`, overwrite `updates` with the
    /// values of the row being inserted. MySQL has no conflict target and
    /// ignores `targets`.
    pub fn on_conflict<T, U>(mut self, targets: T, updates: U) -> Self
    where
        T: IntoIdents,
        U: IntoIdents,
    {
        self.conflict = Conflict::Update {
            targets: targets.into_idents(),
            updates: updates.into_idents(),
        };
        self
    }

    pub fn returning<C: IntoColumns>(mut self, columns: C) -> Self {
        self.returning.extend(columns.into_columns());
        self
    }

    fn ignores_conflicts(&self, dialect: Dialect) -> bool {
        match &self.conflict {
            Conflict::Ignore => true,
            // nothing to update, the duplicate is dropped
            Conflict::Update { updates, .. } => dialect == Dialect::MySql && updates.is_empty(),
            Conflict::Fail => false,
        }
    }

    fn has_upsert_clause(&self, dialect: Dialect) -> bool {
        match &self.conflict {
            Conflict::Fail => false,
            Conflict::Ignore => dialect == Dialect::Postgres,
            Conflict::Update { .. } => dialect != Dialect::MySql,
        }
    }

    fn build_rows(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        let expected = self.columns.len();
        if self.rows.is_empty() {
            return Err(Error::ValueCount {
                row: 0,
                expected,
                found: 0,
            });
        }

        buf.write_str(" VALUES ");
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != expected {
                return Err(Error::ValueCount {
                    row: i,
                    expected,
                    found: row.len(),
                });
            }
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_char('(');
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    buf.write_str(", ");
                }
                if matches!(value, Bind::List(_)) {
                    return Err(dialect.unsupported(value.kind()));
                }
                buf.write_value(dialect, value)?;
            }
            buf.write_char(')');
        }
        Ok(())
    }

    fn build_conflict(&self, dialect: Dialect, buf: &mut Buffer) {
        match (&self.conflict, dialect) {
            (Conflict::Fail, _) => {}
            (Conflict::Ignore, Dialect::Postgres) => buf.write_str(" ON CONFLICT DO NOTHING"),
            (Conflict::Ignore, _) => {}
            (Conflict::Update { updates, .. }, Dialect::MySql) => {
                for (i, column) in updates.iter().enumerate() {
                    buf.write_str(if i == 0 { " ON DUPLICATE KEY UPDATE " } else { ", " });
                    buf.write_ident(dialect, column.as_str());
                    buf.write_str(" = VALUES(");
                    buf.write_ident(dialect, column.as_str());
                    buf.write_char(')');
                }
            }
            (Conflict::Update { targets, updates }, _) => {
                buf.write_str(" ON CONFLICT");
                if !targets.is_empty() {
                    buf.write_str(" (");
                    write_ident_list(targets, dialect, buf);
                    buf.write_char(')');
                }
                if updates.is_empty() {
                    buf.write_str(" DO NOTHING");
                    return;
                }
                for (i, column) in updates.iter().enumerate() {
                    buf.write_str(if i == 0 { " DO UPDATE SET " } else { ", " });
                    buf.write_ident(dialect, column.as_str());
                    buf.write_str(" = EXCLUDED.");
                    buf.write_ident(dialect, column.as_str());
                }
            }
        }
    }
}

fn write_ident_list(idents: &[Ident], dialect: Dialect, buf: &mut Buffer) {
    for (i, ident) in idents.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        buf.write_ident(dialect, ident.as_str());
    }
}

impl Build for InsertStmt {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::TableNotSpecified);
        }
        if self.columns.is_empty() {
            return Err(Error::ColumnNotSpecified);
        }
        if let Conflict::Update { targets, updates } = &self.conflict {
            if dialect != Dialect::MySql && targets.is_empty() && !updates.is_empty() {
                return Err(Error::UnsupportedClause {
                    clause: "ON CONFLICT DO UPDATE without a conflict target",
                    dialect,
                });
            }
        }

        let head = match (self.ignores_conflicts(dialect), dialect) {
            (true, Dialect::MySql) => "INSERT IGNORE INTO ",
            (true, Dialect::Sqlite) => "INSERT OR IGNORE INTO ",
            _ => "INSERT INTO ",
        };
        buf.write_str(head);
        buf.write_ident(dialect, self.table.as_str());
        buf.write_str(" (");
        write_ident_list(&self.columns, dialect, buf);
        buf.write_char(')');

        match &self.maybe_source {
            // sqlite reads the ON of an upsert as a join constraint of the source
            Some(source) if dialect == Dialect::Sqlite && self.has_upsert_clause(dialect) => {
                buf.write_str(" SELECT * FROM (");
                source.build(dialect, buf)?;
                buf.write_str(") WHERE TRUE");
            }
            Some(source) => {
                buf.write_char(' ');
                source.build(dialect, buf)?;
            }
            None => self.build_rows(dialect, buf)?,
        }

        self.build_conflict(dialect, buf);
        column::build_returning(&self.returning, dialect, buf)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        MySql, Postgres, insert_into, select,
        tests::{build_with, try_build_with},
    };

    use super::*;

    #[test]
    fn test_insert_rows() {
        let stmt = insert_into("users")
            .columns(["name", "age"])
            .values(("bob", 30))
            .values(("alice", None::<i32>));
        let (sql, binds) = stmt.to_sql::<Postgres>().unwrap();
        assert_eq!(
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES ($1, $2), ($3, $4)",
            sql
        );
        assert_eq!(
            vec![
                Bind::String("bob".into()),
                Bind::I64(30),
                Bind::String("alice".into()),
                Bind::Null
            ],
            binds
        );
    }

    #[test]
    fn test_insert_pairs() {
        let stmt = insert_into("users").pair("name", "o'neil").pair("admin", false);
        assert_eq!(
            "INSERT INTO `users` (`name`, `admin`) VALUES ('o\\'neil', 0)",
            stmt.to_sql_interpolated::<MySql>().unwrap()
        );
    }

    #[test]
    fn test_value_count() {
        let stmt = insert_into("users").columns(["a", "b"]).values((1, 2)).values((3,));
        assert_eq!(
            Err(Error::ValueCount {
                row: 1,
                expected: 2,
                found: 1
            }),
            try_build_with(stmt, Dialect::MySql)
        );
        let stmt = insert_into("users").columns("a");
        assert_eq!(
            Err(Error::ValueCount {
                row: 0,
                expected: 1,
                found: 0
            }),
            try_build_with(stmt, Dialect::MySql)
        );
    }

    #[test]
    fn test_missing_parts() {
        assert_eq!(
            Err(Error::TableNotSpecified),
            try_build_with(insert_into("").pair("a", 1), Dialect::Sqlite)
        );
        assert_eq!(
            Err(Error::ColumnNotSpecified),
            try_build_with(insert_into("users"), Dialect::Sqlite)
        );
    }

    #[test]
    fn test_list_value_rejected() {
        let stmt = insert_into("users").pair("tags", vec!["a", "b"]);
        assert_eq!(
            Err(Error::UnsupportedValue {
                kind: "list",
                dialect: Dialect::Postgres
            }),
            try_build_with(stmt, Dialect::Postgres)
        );
    }

    #[test]
    fn test_insert_select() {
        let stmt = insert_into("archive")
            .columns(["id", "name"])
            .from_select(
                select("id, name")
                    .from("users")
                    .where_lt("created_at", "2020-01-01"),
            );
        assert_eq!(
            "INSERT INTO \"archive\" (\"id\", \"name\") SELECT id, name FROM \"users\" \
             WHERE created_at < ?1",
            build_with(stmt, Dialect::Sqlite)
        );
    }

    #[test]
    fn test_ignore() {
        let stmt = insert_into("tags").pair("name", "rust").ignore();
        assert_eq!(
            "INSERT IGNORE INTO `tags` (`name`) VALUES (?)",
            build_with(stmt.clone(), Dialect::MySql)
        );
        assert_eq!(
            "INSERT OR IGNORE INTO \"tags\" (\"name\") VALUES (?1)",
            build_with(stmt.clone(), Dialect::Sqlite)
        );
        assert_eq!(
            "INSERT INTO \"tags\" (\"name\") VALUES ($1) ON CONFLICT DO NOTHING",
            build_with(stmt, Dialect::Postgres)
        );
    }

    #[test]
    fn test_upsert() {
        let stmt = insert_into("counters")
            .pair("key", "visits")
            .pair("value", 1)
            .on_conflict("key", "value");
        assert_eq!(
            "INSERT INTO \"counters\" (\"key\", \"value\") VALUES ($1, $2) \
             ON CONFLICT (\"key\") DO UPDATE SET \"value\" = EXCLUDED.\"value\"",
            build_with(stmt.clone(), Dialect::Postgres)
        );
        assert_eq!(
            "INSERT INTO `counters` (`key`, `value`) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE `value` = VALUES(`value`)",
            build_with(stmt, Dialect::MySql)
        );
    }

    #[test]
    fn test_upsert_from_select() {
        let stmt = insert_into("t")
            .columns("a")
            .from_select(select("a").from("b").where_gt("a", 1))
            .on_conflict("a", "a");
        assert_eq!(
            "INSERT INTO \"t\" (\"a\") SELECT * FROM (SELECT a FROM \"b\" WHERE a > ?1) \
             WHERE TRUE ON CONFLICT (\"a\") DO UPDATE SET \"a\" = EXCLUDED.\"a\"",
            build_with(stmt.clone(), Dialect::Sqlite)
        );
        assert_eq!(
            "INSERT INTO \"t\" (\"a\") SELECT a FROM \"b\" WHERE a > $1 \
             ON CONFLICT (\"a\") DO UPDATE SET \"a\" = EXCLUDED.\"a\"",
            build_with(stmt, Dialect::Postgres)
        );

        let stmt = insert_into("t")
            .columns("a")
            .from_select(select("a").from("b"))
            .ignore();
        assert_eq!(
            "INSERT OR IGNORE INTO \"t\" (\"a\") SELECT a FROM \"b\"",
            build_with(stmt, Dialect::Sqlite)
        );
    }

    #[test]
    fn test_upsert_without_updates() {
        let stmt = insert_into("tags")
            .pair("name", "rust")
            .on_conflict("name", Vec::<&str>::new());
        assert_eq!(
            "INSERT INTO \"tags\" (\"name\") VALUES (?1) ON CONFLICT (\"name\") DO NOTHING",
            build_with(stmt.clone(), Dialect::Sqlite)
        );
        assert_eq!(
            "INSERT IGNORE INTO `tags` (`name`) VALUES (?)",
            build_with(stmt, Dialect::MySql)
        );
    }

    #[test]
    fn test_upsert_requires_target() {
        let stmt = insert_into("tags")
            .pair("name", "rust")
            .on_conflict(Vec::<&str>::new(), "name");
        assert!(matches!(
            try_build_with(stmt, Dialect::Postgres),
            Err(Error::UnsupportedClause { .. })
        ));
    }

    #[test]
    fn test_returning() {
        let stmt = insert_into("users").pair("name", "bob").returning("id");
        assert_eq!(
            "INSERT INTO \"users\" (\"name\") VALUES ($1) RETURNING id",
            build_with(stmt.clone(), Dialect::Postgres)
        );
        assert_eq!(
            Err(Error::UnsupportedClause {
                clause: "RETURNING",
                dialect: Dialect::MySql
            }),
            try_build_with(stmt, Dialect::MySql)
        );
    }
}
