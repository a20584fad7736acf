//! Typed database actions and the write plan arena.

use relwrite_core::{EntityData, PropertyPath, Value};

/// Index of an action within a [`WritePlan`].
///
/// Non-root actions reference their owning action by index rather than by
/// a shared mutable reference; a generated id produced later is observed
/// by descendants through an arena lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    /// The arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One instruction to persist, update or delete one entity instance at
/// one property path.
#[derive(Debug, Clone, PartialEq)]
pub enum DbAction {
    /// Insert the aggregate root.
    InsertRoot {
        /// The root entity instance.
        entity: EntityData,
    },
    /// Insert a non-root entity.
    Insert {
        /// The entity instance.
        entity: EntityData,
        /// Path from the aggregate root to this node.
        path: PropertyPath,
        /// The owning action, always an earlier arena entry.
        owner: ActionId,
    },
    /// Update the aggregate root.
    UpdateRoot {
        /// The root entity instance.
        entity: EntityData,
    },
    /// Update an existing non-root entity.
    Update {
        /// The entity instance.
        entity: EntityData,
        /// Path from the aggregate root to this node.
        path: PropertyPath,
    },
    /// Delete a non-root row.
    Delete {
        /// Entity type of the row.
        entity_type: &'static str,
        /// Identifier of the row.
        id: Value,
        /// Path from the aggregate root to the removed node.
        path: PropertyPath,
    },
    /// Delete every row at a path, resolved transitively from the
    /// aggregate root. Emitted for collections of entities without ids of
    /// their own, where orphans cannot be addressed individually.
    DeleteAtPath {
        /// Entity type of the rows.
        entity_type: &'static str,
        /// Identifier of the aggregate root.
        root_id: Value,
        /// Path whose rows are removed.
        path: PropertyPath,
    },
    /// Delete the aggregate root row.
    DeleteRoot {
        /// Entity type of the root.
        entity_type: &'static str,
        /// Identifier of the root row.
        id: Value,
    },
}

impl DbAction {
    /// The entity type this action targets.
    pub fn entity_type(&self) -> &'static str {
        match self {
            DbAction::InsertRoot { entity }
            | DbAction::UpdateRoot { entity }
            | DbAction::Insert { entity, .. }
            | DbAction::Update { entity, .. } => entity.entity_type(),
            DbAction::Delete { entity_type, .. }
            | DbAction::DeleteAtPath { entity_type, .. }
            | DbAction::DeleteRoot { entity_type, .. } => entity_type,
        }
    }

    /// The property path this action targets; the root path for root
    /// actions.
    pub fn path(&self) -> PropertyPath {
        match self {
            DbAction::InsertRoot { .. }
            | DbAction::UpdateRoot { .. }
            | DbAction::DeleteRoot { .. } => PropertyPath::root(),
            DbAction::Insert { path, .. }
            | DbAction::Update { path, .. }
            | DbAction::Delete { path, .. }
            | DbAction::DeleteAtPath { path, .. } => path.clone(),
        }
    }

    /// The owning action for non-root inserts.
    pub fn owner(&self) -> Option<ActionId> {
        match self {
            DbAction::Insert { owner, .. } => Some(*owner),
            _ => None,
        }
    }

    /// Check if this is an insert (root or nested).
    pub fn is_insert(&self) -> bool {
        matches!(self, DbAction::InsertRoot { .. } | DbAction::Insert { .. })
    }

    /// Check if this is a delete (root, nested or by path).
    pub fn is_delete(&self) -> bool {
        matches!(
            self,
            DbAction::Delete { .. } | DbAction::DeleteAtPath { .. } | DbAction::DeleteRoot { .. }
        )
    }
}

/// One arena entry: the action plus its write-once generated-id slot.
#[derive(Debug)]
pub struct ActionEntry {
    action: DbAction,
    generated_id: Option<Value>,
}

impl ActionEntry {
    /// The action.
    pub fn action(&self) -> &DbAction {
        &self.action
    }

    /// The id generated when this action executed, if any.
    pub fn generated_id(&self) -> Option<&Value> {
        self.generated_id.as_ref()
    }
}

/// An ordered arena of actions produced for one save, update or delete
/// call.
///
/// Plans are transient: built per write operation, consumed once by the
/// interpreter, then discarded. Executed strictly in order, a plan never
/// writes a child row before the parent row it back-references.
#[derive(Debug, Default)]
pub struct WritePlan {
    entries: Vec<ActionEntry>,
}

impl WritePlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action, returning its arena index.
    pub fn push(&mut self, action: DbAction) -> ActionId {
        let id = ActionId(self.entries.len());
        self.entries.push(ActionEntry {
            action,
            generated_id: None,
        });
        id
    }

    /// Number of actions in the plan.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at the given index.
    pub fn entry(&self, id: ActionId) -> &ActionEntry {
        &self.entries[id.0]
    }

    /// The action at the given index.
    pub fn action(&self, id: ActionId) -> &DbAction {
        &self.entries[id.0].action
    }

    /// The generated id recorded for the given action, if any.
    pub fn generated_id(&self, id: ActionId) -> Option<&Value> {
        self.entries[id.0].generated_id.as_ref()
    }

    /// Record the id generated by executing the given action.
    ///
    /// The slot is write-once; a second write for the same action is a
    /// logic error.
    pub fn set_generated_id(&mut self, id: ActionId, value: Value) {
        debug_assert!(self.entries[id.0].generated_id.is_none());
        self.entries[id.0].generated_id = Some(value);
    }

    /// Iterate over the action ids in execution order.
    pub fn ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.entries.len()).map(ActionId)
    }

    /// Iterate over the actions in execution order.
    pub fn actions(&self) -> impl Iterator<Item = &DbAction> {
        self.entries.iter().map(|e| &e.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relwrite_core::EntityData;

    fn insert_root(entity_type: &'static str) -> DbAction {
        DbAction::InsertRoot {
            entity: EntityData::new(entity_type),
        }
    }

    #[test]
    fn test_push_returns_sequential_ids() {
        let mut plan = WritePlan::new();
        let a = plan.push(insert_root("container"));
        let b = plan.push(DbAction::Insert {
            entity: EntityData::new("element"),
            path: PropertyPath::from("element"),
            owner: a,
        });

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_generated_id_slot() {
        let mut plan = WritePlan::new();
        let root = plan.push(insert_root("container"));

        assert_eq!(plan.generated_id(root), None);
        plan.set_generated_id(root, Value::BigInt(23));
        assert_eq!(plan.generated_id(root), Some(&Value::BigInt(23)));
    }

    #[test]
    fn test_owner_accessor() {
        let mut plan = WritePlan::new();
        let root = plan.push(insert_root("container"));
        let child = plan.push(DbAction::Insert {
            entity: EntityData::new("element"),
            path: PropertyPath::from("element"),
            owner: root,
        });

        assert_eq!(plan.action(root).owner(), None);
        assert_eq!(plan.action(child).owner(), Some(root));
    }

    #[test]
    fn test_action_classification() {
        let insert = insert_root("container");
        assert!(insert.is_insert());
        assert!(!insert.is_delete());

        let delete = DbAction::DeleteRoot {
            entity_type: "container",
            id: Value::BigInt(1),
        };
        assert!(delete.is_delete());
        assert_eq!(delete.entity_type(), "container");
        assert!(delete.path().is_empty());
    }

    #[test]
    fn test_ids_iterate_in_order() {
        let mut plan = WritePlan::new();
        plan.push(insert_root("a"));
        plan.push(insert_root("b"));

        let indices: Vec<_> = plan.ids().map(ActionId::index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
