//! The writing context: converts aggregates into write plans.
//!
//! Traversal is depth-first from the root; parent actions are emitted
//! before all of their descendant actions, and deletes for removed
//! collection elements are emitted before inserts of new elements at the
//! same path. Structural errors abort before any action is produced for
//! the offending node.

use relwrite_core::{
    AssociationData, AssociationDescriptor, Cardinality, EntityData, Error, MappingErrorKind,
    PropertyPath, Result, SchemaRegistry, Value,
};

use crate::action::{ActionId, DbAction, WritePlan};

/// Builds ordered [`WritePlan`]s from aggregate roots.
///
/// Stateless; one instance can be shared across threads. All per-call
/// mutable state lives in the plan being built.
pub struct WritingContext<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> WritingContext<'a> {
    /// Create a writing context over the given schema registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        WritingContext { registry }
    }

    /// Produce the plan persisting `root` and its aggregate.
    ///
    /// A root with no identifier value is classified as new and produces
    /// an insert-root followed by pre-order inserts for every descendant.
    /// A root carrying an identifier is persisted as an update with no
    /// known previous state: existing children are updated, new children
    /// inserted.
    pub fn save(&self, root: &EntityData) -> Result<WritePlan> {
        let mut plan = WritePlan::new();

        if root.is_new() {
            self.registry.require(root.entity_type())?;
            let owner = plan.push(DbAction::InsertRoot {
                entity: root.clone(),
            });
            self.insert_children(&mut plan, root, owner, &PropertyPath::root())?;
        } else {
            self.update_into(&mut plan, root, None)?;
        }

        tracing::debug!(
            entity_type = root.entity_type(),
            actions = plan.len(),
            "built save plan"
        );
        Ok(plan)
    }

    /// Produce the plan updating an existing aggregate.
    ///
    /// `previous` is the previously persisted state of the same aggregate;
    /// children present there but absent from `root` produce delete
    /// actions (orphan removal).
    pub fn update(&self, root: &EntityData, previous: Option<&EntityData>) -> Result<WritePlan> {
        let mut plan = WritePlan::new();
        self.update_into(&mut plan, root, previous)?;

        tracing::debug!(
            entity_type = root.entity_type(),
            actions = plan.len(),
            "built update plan"
        );
        Ok(plan)
    }

    /// Produce the plan deleting an existing aggregate: child rows
    /// leaf-first, the root row last.
    pub fn delete(&self, root: &EntityData) -> Result<WritePlan> {
        let descriptor = self.registry.require(root.entity_type())?;
        let Some(id) = root.id() else {
            return Err(Error::mapping(
                MappingErrorKind::MissingId,
                root.entity_type(),
                "delete requires a root identifier",
            ));
        };

        let mut plan = WritePlan::new();
        self.delete_children(&mut plan, root, &PropertyPath::root(), id)?;
        plan.push(DbAction::DeleteRoot {
            entity_type: descriptor.entity_type,
            id: id.clone(),
        });

        tracing::debug!(
            entity_type = root.entity_type(),
            actions = plan.len(),
            "built delete plan"
        );
        Ok(plan)
    }

    fn update_into(
        &self,
        plan: &mut WritePlan,
        root: &EntityData,
        previous: Option<&EntityData>,
    ) -> Result<()> {
        self.registry.require(root.entity_type())?;
        let Some(root_id) = root.id() else {
            return Err(Error::mapping(
                MappingErrorKind::MissingId,
                root.entity_type(),
                "update requires a root identifier",
            ));
        };
        let root_id = root_id.clone();
        if let Some(prev) = previous {
            if prev.entity_type() != root.entity_type() {
                return Err(Error::mapping(
                    MappingErrorKind::TypeMismatch,
                    root.entity_type(),
                    format!(
                        "previous state has entity type '{}'",
                        prev.entity_type()
                    ),
                ));
            }
        }

        let owner = plan.push(DbAction::UpdateRoot {
            entity: root.clone(),
        });
        self.diff_children(plan, root, previous, owner, &PropertyPath::root(), &root_id)
    }

    /// Emit pre-order inserts for every descendant of `node`.
    fn insert_children(
        &self,
        plan: &mut WritePlan,
        node: &EntityData,
        owner: ActionId,
        base: &PropertyPath,
    ) -> Result<()> {
        for (name, slot) in node.associations() {
            let association = self.resolve_association(node, name, slot)?;
            let path = base.append(association.name);
            for child in slot.children() {
                self.check_child_type(node, association, child)?;
                let child_action = plan.push(DbAction::Insert {
                    entity: child.clone(),
                    path: path.clone(),
                    owner,
                });
                self.insert_children(plan, child, child_action, &path)?;
            }
        }
        Ok(())
    }

    /// Diff `node` against its previous state: deletes for orphans first,
    /// then inserts for new children and updates for surviving ones.
    ///
    /// Previous children without ids cannot be matched individually, so a
    /// slot containing any falls back to clearing the whole path and
    /// re-inserting every current child. Slots the previous state has but
    /// the current node omits are treated as emptied.
    fn diff_children(
        &self,
        plan: &mut WritePlan,
        node: &EntityData,
        previous: Option<&EntityData>,
        owner: ActionId,
        base: &PropertyPath,
        root_id: &Value,
    ) -> Result<()> {
        for (name, slot) in node.associations() {
            let association = self.resolve_association(node, name, slot)?;
            let path = base.append(association.name);
            let prev_slot = previous.and_then(|p| p.association(name));

            let current: Vec<&EntityData> = slot.children().collect();
            self.check_distinct_ids(node, &path, &current)?;

            // Orphan removal before inserts at the same path.
            let replace_wholesale =
                prev_slot.is_some_and(|s| s.children().any(|c| c.id().is_none()));
            if replace_wholesale {
                if let Some(prev_slot) = prev_slot {
                    for prev_child in prev_slot.children() {
                        self.delete_children(plan, prev_child, &path, root_id)?;
                    }
                }
                plan.push(DbAction::DeleteAtPath {
                    entity_type: association.target_type,
                    root_id: root_id.clone(),
                    path: path.clone(),
                });
            } else if let Some(prev_slot) = prev_slot {
                for prev_child in prev_slot.children() {
                    let Some(prev_id) = prev_child.id() else {
                        continue;
                    };
                    let survives = current.iter().any(|c| c.id() == Some(prev_id));
                    if !survives {
                        self.delete_subtree(plan, prev_child, &path, root_id)?;
                    }
                }
            }

            for child in current {
                self.check_child_type(node, association, child)?;
                if child.is_new() || replace_wholesale {
                    let child_action = plan.push(DbAction::Insert {
                        entity: child.clone(),
                        path: path.clone(),
                        owner,
                    });
                    self.insert_children(plan, child, child_action, &path)?;
                } else {
                    let matched_prev = prev_slot
                        .and_then(|s| s.children().find(|p| p.id() == child.id()));
                    let child_action = plan.push(DbAction::Update {
                        entity: child.clone(),
                        path: path.clone(),
                    });
                    self.diff_children(plan, child, matched_prev, child_action, &path, root_id)?;
                }
            }
        }

        // A slot present in the previous state but missing from the
        // current node counts as emptied: everything under it is removed.
        if let Some(prev) = previous {
            for (name, prev_slot) in prev.associations() {
                if node.association(name).is_some() {
                    continue;
                }
                self.delete_slot(plan, prev, name, prev_slot, base, root_id)?;
            }
        }
        Ok(())
    }

    /// Emit deletes for `node` and its subtree, leaf-first.
    fn delete_subtree(
        &self,
        plan: &mut WritePlan,
        node: &EntityData,
        path: &PropertyPath,
        root_id: &Value,
    ) -> Result<()> {
        self.delete_children(plan, node, path, root_id)?;
        if let Some(id) = node.id() {
            plan.push(DbAction::Delete {
                entity_type: node.entity_type(),
                id: id.clone(),
                path: path.clone(),
            });
        }
        Ok(())
    }

    /// Emit deletes for every row below `node`, leaf-first.
    fn delete_children(
        &self,
        plan: &mut WritePlan,
        node: &EntityData,
        base: &PropertyPath,
        root_id: &Value,
    ) -> Result<()> {
        for (name, slot) in node.associations() {
            self.delete_slot(plan, node, name, slot, base, root_id)?;
        }
        Ok(())
    }

    /// Emit deletes for the rows of one association slot and everything
    /// below them. A slot holding children without ids is cleared with a
    /// single path delete covering all rows at that path.
    fn delete_slot(
        &self,
        plan: &mut WritePlan,
        node: &EntityData,
        name: &str,
        slot: &AssociationData,
        base: &PropertyPath,
        root_id: &Value,
    ) -> Result<()> {
        let association = self.resolve_association(node, name, slot)?;
        let path = base.append(association.name);
        for child in slot.children() {
            self.delete_children(plan, child, &path, root_id)?;
        }
        if slot.children().any(|c| c.id().is_none()) {
            plan.push(DbAction::DeleteAtPath {
                entity_type: association.target_type,
                root_id: root_id.clone(),
                path,
            });
        } else {
            for child in slot.children() {
                if let Some(id) = child.id() {
                    plan.push(DbAction::Delete {
                        entity_type: child.entity_type(),
                        id: id.clone(),
                        path: path.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve an association slot against the schema, checking the name
    /// and cardinality.
    fn resolve_association(
        &self,
        node: &EntityData,
        name: &str,
        slot: &AssociationData,
    ) -> Result<&AssociationDescriptor> {
        let descriptor = self.registry.require(node.entity_type())?;
        let association = descriptor.association(name).ok_or_else(|| {
            Error::mapping(
                MappingErrorKind::UnknownAssociation,
                node.entity_type(),
                format!("no association named '{name}'"),
            )
        })?;

        let cardinality_matches = matches!(
            (association.cardinality, slot),
            (Cardinality::One, AssociationData::One(_))
                | (Cardinality::Many, AssociationData::Many(_))
        );
        if !cardinality_matches {
            return Err(Error::mapping(
                MappingErrorKind::CardinalityMismatch,
                node.entity_type(),
                format!("association '{name}' has the wrong cardinality"),
            ));
        }
        Ok(association)
    }

    fn check_child_type(
        &self,
        node: &EntityData,
        association: &AssociationDescriptor,
        child: &EntityData,
    ) -> Result<()> {
        if child.entity_type() != association.target_type {
            return Err(Error::mapping(
                MappingErrorKind::TypeMismatch,
                node.entity_type(),
                format!(
                    "association '{}' expects '{}' but got '{}'",
                    association.name,
                    association.target_type,
                    child.entity_type()
                ),
            ));
        }
        Ok(())
    }

    /// Duplicate non-null ids within one collection would classify the
    /// same path as both versions of one row.
    fn check_distinct_ids(
        &self,
        node: &EntityData,
        path: &PropertyPath,
        children: &[&EntityData],
    ) -> Result<()> {
        let mut seen: Vec<&Value> = Vec::new();
        for child in children {
            let Some(id) = child.id() else { continue };
            if seen.contains(&id) {
                return Err(Error::mapping(
                    MappingErrorKind::ConflictingClassification,
                    node.entity_type(),
                    format!("duplicate child id at path '{path}'"),
                ));
            }
            seen.push(id);
        }
        Ok(())
    }
}
