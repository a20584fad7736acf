//! SQLite dialect.

use crate::array::{ArraySupport, NoArraySupport};
use crate::identifiers::IdentifierProcessing;
use crate::limit::{ClausePosition, LimitClause};
use crate::lock::{LockClause, LockOptions};
use crate::Dialect;

/// The SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

struct SqliteLimit;

impl LimitClause for SqliteLimit {
    fn limit(&self, limit: u64) -> String {
        format!("LIMIT {limit}")
    }

    fn offset(&self, offset: u64) -> String {
        // A negative limit means "no limit" in SQLite.
        format!("LIMIT -1 OFFSET {offset}")
    }

    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

struct SqliteLock;

impl LockClause for SqliteLock {
    fn lock(&self, _options: &LockOptions) -> String {
        // SQLite locks at database level; there is no row-lock syntax.
        String::new()
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

impl Dialect for SqliteDialect {
    fn limit(&self) -> &dyn LimitClause {
        &SqliteLimit
    }

    fn lock(&self) -> &dyn LockClause {
        &SqliteLock
    }

    fn array_support(&self) -> &dyn ArraySupport {
        &NoArraySupport
    }

    fn identifier_processing(&self) -> IdentifierProcessing {
        IdentifierProcessing::ANSI_AS_IS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::LockMode;

    #[test]
    fn test_limit_clauses() {
        let limit = SqliteDialect.limit();
        assert_eq!(limit.limit(5), "LIMIT 5");
        assert_eq!(limit.offset(7), "LIMIT -1 OFFSET 7");
        assert_eq!(limit.limit_offset(5, 7), "LIMIT 5 OFFSET 7");
        assert_eq!(limit.position(), ClausePosition::AfterOrderBy);
    }

    #[test]
    fn test_lock_always_empty() {
        let lock = SqliteDialect.lock();
        assert_eq!(
            lock.lock(&LockOptions::of(LockMode::PessimisticWrite, "t")),
            ""
        );
        assert_eq!(lock.lock(&LockOptions::none()), "");
    }

    #[test]
    fn test_no_array_support() {
        assert!(!SqliteDialect.array_support().supported());
    }

    #[test]
    fn test_identifier_processing_keeps_casing() {
        let processing = SqliteDialect.identifier_processing();
        assert_eq!(processing.quote("MyTable"), "\"MyTable\"");
        assert_eq!(processing.standardize("MyTable"), "MyTable");
    }
}
