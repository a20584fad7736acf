//! relwrite - aggregate persistence for relational databases.
//!
//! relwrite converts object aggregates into ordered plans of typed
//! database actions and interprets those plans against a pluggable data
//! access strategy, with a dialect abstraction describing the SQL
//! variations between database vendors:
//!
//! - Explicit schema registry instead of runtime reflection
//! - Write plans as dependency-ordered action arenas
//! - Back-reference identifiers resolved from the nearest ancestor id
//! - Stateless dialect descriptors for Postgres, MySQL and SQLite
//!
//! # Quick Start
//!
//! ```ignore
//! use relwrite::prelude::*;
//!
//! let registry = SchemaRegistry::builder()
//!     .entity(
//!         EntityDescriptor::new("order", "orders")
//!             .with_id(IdDescriptor::generated("id", SqlType::BigInt))
//!             .with_association(AssociationDescriptor::many("lines", "order_line")),
//!     )
//!     .entity(EntityDescriptor::new("order_line", "order_line"))
//!     .build()?;
//!
//! let order = EntityData::new("order")
//!     .with_value("customer", "ACME")
//!     .with_many(
//!         "lines",
//!         vec![EntityData::new("order_line").with_value("qty", 3_i64)],
//!     );
//!
//! let writer = AggregateWriter::new(&registry);
//! writer.save(&order, &strategy)?;
//! ```

pub mod writer;

pub use relwrite_core::{
    AssociationData, AssociationDescriptor, Cardinality, DefaultNamingStrategy, EntityData,
    EntityDescriptor, Error, IdDescriptor, Identifier, IdentifierPart, MappingErrorKind,
    NamingStrategy, PropertyDescriptor, PropertyPath, Result, SchemaRegistry,
    SchemaRegistryBuilder, SqlType, Value,
};
pub use relwrite_dialect::{
    ArraySupport, ClausePosition, Dialect, IdentifierProcessing, LetterCasing, LimitClause,
    LockClause, LockMode, LockOptions, MySqlDialect, PostgresDialect, Quoting, SqliteDialect,
};
pub use relwrite_engine::{
    ActionId, DataAccessStrategy, DbAction, Interpreter, WritePlan, WritingContext,
};
pub use writer::AggregateWriter;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::{
        AggregateWriter,
        AssociationData,
        AssociationDescriptor,
        Cardinality,
        DataAccessStrategy,
        DbAction,
        Dialect,
        EntityData,
        EntityDescriptor,
        Error,
        IdDescriptor,
        Identifier,
        MySqlDialect,
        PostgresDialect,
        PropertyDescriptor,
        PropertyPath,
        Result,
        SchemaRegistry,
        SqlType,
        SqliteDialect,
        Value,
        WritePlan,
        WritingContext,
    };
}
