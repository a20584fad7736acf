//! Array column capability per dialect.

use relwrite_core::{Error, Result, SqlType};

/// Reports whether a dialect supports native array columns and resolves
/// component types to their canonical storage type.
pub trait ArraySupport: Send + Sync {
    /// Whether the dialect has native array columns.
    fn supported(&self) -> bool;

    /// Resolve a user-supplied component type to the canonical storage
    /// type of the array column.
    ///
    /// Fails on dialects without array support and for component types
    /// that cannot be stored in an array.
    fn array_type(&self, component: &SqlType) -> Result<SqlType>;
}

/// Array support for dialects without native array columns.
pub(crate) struct NoArraySupport;

impl ArraySupport for NoArraySupport {
    fn supported(&self) -> bool {
        false
    }

    fn array_type(&self, _component: &SqlType) -> Result<SqlType> {
        Err(Error::Unsupported(
            "array columns are not supported by this dialect".to_string(),
        ))
    }
}
