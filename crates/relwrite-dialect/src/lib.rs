//! Per-database SQL dialect strategies.
//!
//! A [`Dialect`] bundles the vendor-specific pieces of SQL rendering this
//! core needs to abstract over: limit/offset clauses, lock clauses, array
//! column capability and identifier quoting. Dialect implementations are
//! immutable value objects, safe for unsynchronized concurrent use; they
//! are constructed once at startup and passed explicitly to consumers.

pub mod array;
pub mod identifiers;
pub mod limit;
pub mod lock;
mod mysql;
mod postgres;
mod sqlite;

pub use array::ArraySupport;
pub use identifiers::{IdentifierProcessing, LetterCasing, Quoting};
pub use limit::{ClausePosition, LimitClause};
pub use lock::{LockClause, LockMode, LockOptions};
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Vendor-specific SQL rendering strategy.
pub trait Dialect: Send + Sync {
    /// The limit/offset clause strategy.
    fn limit(&self) -> &dyn LimitClause;

    /// The row-locking clause strategy.
    fn lock(&self) -> &dyn LockClause;

    /// Array column capability and component type resolution.
    fn array_support(&self) -> &dyn ArraySupport;

    /// Quoting style and letter-casing normalization for identifiers.
    fn identifier_processing(&self) -> IdentifierProcessing;
}
