//! Core types for relwrite.
//!
//! This crate provides the foundational abstractions shared by the action
//! graph builder, the interpreter and the dialect layer:
//!
//! - `Value` for dynamically-typed SQL values
//! - `SqlType` for declared column types
//! - `EntityData` for aggregate object trees
//! - `SchemaRegistry` as the entity schema provider
//! - `PropertyPath` for locating nodes within an aggregate
//! - `Identifier` for back-reference column/value pairs

pub mod entity;
pub mod error;
pub mod identifier;
pub mod path;
pub mod schema;
pub mod types;
pub mod value;

pub use entity::{AssociationData, EntityData};
pub use error::{
    DataAccessError, Error, IdResolutionError, MappingError, MappingErrorKind, Result,
};
pub use identifier::{Identifier, IdentifierPart};
pub use path::PropertyPath;
pub use schema::{
    AssociationDescriptor, Cardinality, DefaultNamingStrategy, EntityDescriptor, IdDescriptor,
    NamingStrategy, PropertyDescriptor, SchemaRegistry, SchemaRegistryBuilder,
};
pub use types::SqlType;
pub use value::Value;
