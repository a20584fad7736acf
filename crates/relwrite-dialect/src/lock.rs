//! Row-locking clause rendering.

use crate::limit::ClausePosition;

/// Requested pessimistic lock mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Shared lock for reading.
    PessimisticRead,
    /// Exclusive lock for writing.
    PessimisticWrite,
}

/// Lock request for a query: the mode (or none) and the tables in its
/// FROM clause, first table first.
#[derive(Debug, Clone, Default)]
pub struct LockOptions {
    /// Requested mode; `None` requests no locking.
    pub mode: Option<LockMode>,
    /// Unquoted table names the query selects from.
    pub tables: Vec<String>,
}

impl LockOptions {
    /// Lock request for a single table.
    pub fn of(mode: LockMode, table: impl Into<String>) -> Self {
        LockOptions {
            mode: Some(mode),
            tables: vec![table.into()],
        }
    }

    /// A request for no locking.
    pub fn none() -> Self {
        LockOptions::default()
    }
}

/// Renders the textual lock clause fragment for a dialect.
///
/// Implementations return an empty string for unsupported modes rather
/// than failing.
pub trait LockClause: Send + Sync {
    /// The lock clause fragment, or `""` when the mode is absent or
    /// unsupported.
    fn lock(&self, options: &LockOptions) -> String;

    /// Position of the clause relative to ORDER BY.
    fn position(&self) -> ClausePosition;
}
