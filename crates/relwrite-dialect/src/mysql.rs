//! MySQL dialect.

use crate::array::{ArraySupport, NoArraySupport};
use crate::identifiers::IdentifierProcessing;
use crate::limit::{ClausePosition, LimitClause};
use crate::lock::{LockClause, LockMode, LockOptions};
use crate::Dialect;

/// The MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

struct MySqlLimit;

impl LimitClause for MySqlLimit {
    fn limit(&self, limit: u64) -> String {
        format!("LIMIT {limit}")
    }

    fn offset(&self, offset: u64) -> String {
        // MySQL has no standalone OFFSET; an offset requires a limit, so
        // the row count is pinned to the documented maximum.
        format!("LIMIT {offset}, 18446744073709551615")
    }

    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {offset}, {limit}")
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

struct MySqlLock;

impl LockClause for MySqlLock {
    fn lock(&self, options: &LockOptions) -> String {
        // MySQL locks all tables of the statement; no OF clause.
        match options.mode {
            Some(LockMode::PessimisticWrite) => "FOR UPDATE".to_string(),
            Some(LockMode::PessimisticRead) => "LOCK IN SHARE MODE".to_string(),
            None => String::new(),
        }
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

impl Dialect for MySqlDialect {
    fn limit(&self) -> &dyn LimitClause {
        &MySqlLimit
    }

    fn lock(&self) -> &dyn LockClause {
        &MySqlLock
    }

    fn array_support(&self) -> &dyn ArraySupport {
        &NoArraySupport
    }

    fn identifier_processing(&self) -> IdentifierProcessing {
        IdentifierProcessing::BACKTICK
    }
}
