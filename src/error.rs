use thiserror::Error;

use crate::dialect::Dialect;

pub type Result<T> = std::result::Result<T, Error>;

/// Compilation failures.
///
/// All of them are deterministic: building the same tree under the same
/// dialect fails the same way, so none are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bound value has no encoding in this dialect or position.
    #[error("unsupported value kind `{kind}` for {dialect}")]
    UnsupportedValue { kind: &'static str, dialect: Dialect },

    /// A raw fragment's `?` markers do not match its arguments.
    #[error("raw fragment has {placeholders} placeholder(s) but {args} argument(s)")]
    PlaceholderCount { placeholders: usize, args: usize },

    /// A zero length sequence was bound to a raw fragment placeholder.
    #[error("cannot expand an empty sequence into a placeholder list")]
    EmptySequence,

    /// A clause the target dialect has no syntax for.
    #[error("{clause} is not supported by {dialect}")]
    UnsupportedClause {
        clause: &'static str,
        dialect: Dialect,
    },

    #[error("table not specified")]
    TableNotSpecified,

    #[error("column not specified")]
    ColumnNotSpecified,

    #[error("row {row} has {found} value(s) but {expected} column(s) were given")]
    ValueCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("union requires at least one member")]
    EmptyUnion,
}
