//! Error types for relwrite operations.

use std::fmt;

use crate::path::PropertyPath;

/// Result alias using the relwrite [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error type for all relwrite operations.
#[derive(Debug)]
pub enum Error {
    /// Structural errors: the aggregate graph cannot be resolved against
    /// the schema registry. Surfaced before any action executes.
    Mapping(MappingError),
    /// No ancestor in an insert's owning chain yields a resolvable id.
    /// Surfaced at interpretation time.
    IdResolution(IdResolutionError),
    /// Failure reported by the underlying data access strategy,
    /// propagated unchanged.
    DataAccess(DataAccessError),
    /// Requested capability is not available (e.g. array columns on a
    /// dialect without native array support).
    Unsupported(String),
    /// Custom error with message.
    Custom(String),
}

/// Structural error raised while resolving an aggregate against the schema.
#[derive(Debug)]
pub struct MappingError {
    pub kind: MappingErrorKind,
    /// The entity type being resolved when the error occurred.
    pub entity_type: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorKind {
    /// Entity type not present in the schema registry.
    UnknownEntity,
    /// Association name not declared for the entity.
    UnknownAssociation,
    /// Singular data supplied for a collection association or vice versa.
    CardinalityMismatch,
    /// Child entity type does not match the association's declared target.
    TypeMismatch,
    /// Operation requires an identifier the entity does not declare or carry.
    MissingId,
    /// The same property path classified a node as both new and existing.
    ConflictingClassification,
}

/// Illegal-state error: an insert's owning chain has no resolvable id.
#[derive(Debug)]
pub struct IdResolutionError {
    /// Path of the insert whose identifier could not be computed.
    pub path: PropertyPath,
    pub detail: String,
}

/// Error reported by the data access strategy.
#[derive(Debug)]
pub struct DataAccessError {
    /// The operation that failed ("insert", "update", "delete", ...).
    pub operation: &'static str,
    pub entity_type: String,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Shorthand for a structural mapping error.
    pub fn mapping(
        kind: MappingErrorKind,
        entity_type: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Error::Mapping(MappingError {
            kind,
            entity_type: entity_type.into(),
            detail: detail.into(),
        })
    }

    /// Shorthand for an identifier-resolution error.
    pub fn id_resolution(path: PropertyPath, detail: impl Into<String>) -> Self {
        Error::IdResolution(IdResolutionError {
            path,
            detail: detail.into(),
        })
    }

    /// Shorthand for a data access error without a source.
    pub fn data_access(
        operation: &'static str,
        entity_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::DataAccess(DataAccessError {
            operation,
            entity_type: entity_type.into(),
            message: message.into(),
            source: None,
        })
    }

    /// Check whether this is a structural mapping error.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Error::Mapping(_))
    }

    /// Check whether this is an identifier-resolution error.
    pub fn is_id_resolution(&self) -> bool {
        matches!(self, Error::IdResolution(_))
    }
}

impl fmt::Display for MappingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MappingErrorKind::UnknownEntity => "unknown entity type",
            MappingErrorKind::UnknownAssociation => "unknown association",
            MappingErrorKind::CardinalityMismatch => "cardinality mismatch",
            MappingErrorKind::TypeMismatch => "type mismatch",
            MappingErrorKind::MissingId => "missing identifier",
            MappingErrorKind::ConflictingClassification => "conflicting new/existing classification",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Mapping(e) => write!(
                f,
                "mapping error for entity '{}': {}: {}",
                e.entity_type, e.kind, e.detail
            ),
            Error::IdResolution(e) => write!(
                f,
                "cannot resolve parent identifier for insert at '{}': {}",
                e.path, e.detail
            ),
            Error::DataAccess(e) => write!(
                f,
                "data access failure during {} of '{}': {}",
                e.operation, e.entity_type, e.message
            ),
            Error::Unsupported(msg) => write!(f, "unsupported operation: {}", msg),
            Error::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DataAccess(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}
