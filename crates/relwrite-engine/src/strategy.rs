//! The data access strategy consumed by the interpreter.

use relwrite_core::{EntityData, Identifier, PropertyPath, Result, Value};

/// Low-level write operations against the database.
///
/// All persistence side effects of interpretation go through this trait;
/// SQL rendering and driver execution live behind it. Implementations may
/// block on I/O. Failures are propagated unchanged by the interpreter;
/// transactional atomicity is the caller's responsibility.
pub trait DataAccessStrategy {
    /// Insert the aggregate root, returning the generated key if the
    /// database produced one.
    fn insert_root(&self, entity: &EntityData) -> Result<Option<Value>>;

    /// Insert a non-root entity with the back-references in `identifier`,
    /// returning the generated key if the database produced one.
    fn insert(
        &self,
        entity: &EntityData,
        entity_type: &'static str,
        identifier: &Identifier,
    ) -> Result<Option<Value>>;

    /// Update an existing row from the entity's own key and values.
    fn update(&self, entity: &EntityData) -> Result<()>;

    /// Delete a non-root row at the given path.
    fn delete(&self, entity_type: &'static str, id: &Value, path: &PropertyPath) -> Result<()>;

    /// Delete every row at the given path, resolved transitively from the
    /// aggregate root's id. Rows back-reference their nearest keyed
    /// ancestor, so nested paths require joining through the intermediate
    /// tables back to the root row.
    fn delete_at_path(
        &self,
        entity_type: &'static str,
        root_id: &Value,
        path: &PropertyPath,
    ) -> Result<()>;

    /// Delete the aggregate root row.
    fn delete_root(&self, entity_type: &'static str, id: &Value) -> Result<()>;
}
