//! PostgreSQL dialect.

use relwrite_core::{Error, Result, SqlType};

use crate::array::ArraySupport;
use crate::identifiers::IdentifierProcessing;
use crate::limit::{ClausePosition, LimitClause};
use crate::lock::{LockClause, LockMode, LockOptions};
use crate::Dialect;

/// The PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

struct PostgresLimit;

impl LimitClause for PostgresLimit {
    fn limit(&self, limit: u64) -> String {
        format!("LIMIT {limit}")
    }

    fn offset(&self, offset: u64) -> String {
        format!("OFFSET {offset}")
    }

    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

struct PostgresLock;

impl LockClause for PostgresLock {
    fn lock(&self, options: &LockOptions) -> String {
        let Some(table) = options.tables.first() else {
            return String::new();
        };
        let table = PostgresDialect.identifier_processing().quote(table);

        match options.mode {
            Some(LockMode::PessimisticWrite) => format!("FOR UPDATE OF {table}"),
            Some(LockMode::PessimisticRead) => format!("FOR SHARE OF {table}"),
            None => String::new(),
        }
    }

    fn position(&self) -> ClausePosition {
        ClausePosition::AfterOrderBy
    }
}

struct PostgresArrays;

impl ArraySupport for PostgresArrays {
    fn supported(&self) -> bool {
        true
    }

    fn array_type(&self, component: &SqlType) -> Result<SqlType> {
        match component {
            // Nested arrays are stored flat in Postgres; declaring them as
            // a component type is rejected.
            SqlType::Array(_) => Err(Error::Unsupported(
                "nested array component types are not supported".to_string(),
            )),
            // Postgres has no single-byte integer.
            SqlType::TinyInt => Ok(SqlType::SmallInt),
            other => Ok(other.clone()),
        }
    }
}

impl Dialect for PostgresDialect {
    fn limit(&self) -> &dyn LimitClause {
        &PostgresLimit
    }

    fn lock(&self) -> &dyn LockClause {
        &PostgresLock
    }

    fn array_support(&self) -> &dyn ArraySupport {
        &PostgresArrays
    }

    fn identifier_processing(&self) -> IdentifierProcessing {
        IdentifierProcessing::ANSI_LOWER
    }
}
