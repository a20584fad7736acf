//! Limit and offset clause rendering.

/// Where a clause is placed relative to the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClausePosition {
    /// Clause is rendered before ORDER BY.
    BeforeOrderBy,
    /// Clause is rendered after ORDER BY.
    AfterOrderBy,
}

/// Renders the textual limit, offset and combined limit/offset clauses
/// for a dialect.
pub trait LimitClause: Send + Sync {
    /// Clause limiting the result to `limit` rows.
    fn limit(&self, limit: u64) -> String;

    /// Clause skipping the first `offset` rows.
    fn offset(&self, offset: u64) -> String;

    /// Combined clause applying both `limit` and `offset`.
    fn limit_offset(&self, limit: u64, offset: u64) -> String;

    /// Position of the clause relative to ORDER BY.
    fn position(&self) -> ClausePosition;
}
