//! Executes write plans against a data access strategy.

use relwrite_core::{
    Error, Identifier, PropertyPath, Result, SchemaRegistry, Value,
};

use crate::action::{ActionId, DbAction, WritePlan};
use crate::strategy::DataAccessStrategy;

/// Interprets the actions of a [`WritePlan`] in order.
///
/// Stateless apart from the schema registry reference; all mutable state
/// (the generated-id slots) lives in the plan. Failures are propagated
/// unchanged and abort the remaining actions; no rollback is attempted at
/// this layer.
pub struct Interpreter<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over the given schema registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Interpreter { registry }
    }

    /// Execute every action of the plan in order.
    #[tracing::instrument(level = "debug", skip(self, plan, strategy), fields(actions = plan.len()))]
    pub fn execute<S: DataAccessStrategy>(
        &self,
        plan: &mut WritePlan,
        strategy: &S,
    ) -> Result<()> {
        for id in plan.ids().collect::<Vec<_>>() {
            self.interpret(plan, id, strategy)?;
        }
        Ok(())
    }

    /// Execute one action, recording any generated identifier in the
    /// plan's arena entry.
    pub fn interpret<S: DataAccessStrategy>(
        &self,
        plan: &mut WritePlan,
        id: ActionId,
        strategy: &S,
    ) -> Result<()> {
        tracing::trace!(index = id.index(), "interpreting action");

        let generated = match plan.action(id) {
            DbAction::InsertRoot { entity } => strategy.insert_root(entity)?,
            DbAction::Insert {
                entity,
                path,
                owner,
            } => {
                let identifier = self.back_reference_identifier(plan, *owner, path)?;
                strategy.insert(entity, entity.entity_type(), &identifier)?
            }
            DbAction::UpdateRoot { entity } | DbAction::Update { entity, .. } => {
                strategy.update(entity)?;
                None
            }
            DbAction::Delete {
                entity_type,
                id: row_id,
                path,
            } => {
                strategy.delete(entity_type, row_id, path)?;
                None
            }
            DbAction::DeleteAtPath {
                entity_type,
                root_id,
                path,
            } => {
                strategy.delete_at_path(entity_type, root_id, path)?;
                None
            }
            DbAction::DeleteRoot {
                entity_type,
                id: row_id,
            } => {
                strategy.delete_root(entity_type, row_id)?;
                None
            }
        };

        if let Some(value) = generated {
            plan.set_generated_id(id, value);
        }
        Ok(())
    }

    /// Compute the back-reference identifier for an insert by walking its
    /// owning chain.
    ///
    /// The nearest resolvable id wins: the owner's generated id, else the
    /// owner entity's natural id, else the owner's own owning action, up
    /// to the root. The ancestor that supplies the id also supplies the
    /// back-reference name (from the association segment leaving it along
    /// the child's path) and the declared id target type.
    fn back_reference_identifier(
        &self,
        plan: &WritePlan,
        owner: ActionId,
        child_path: &PropertyPath,
    ) -> Result<Identifier> {
        let mut current = owner;
        loop {
            let entry = plan.entry(current);
            let (entity, depth, next_owner) = match entry.action() {
                DbAction::InsertRoot { entity } | DbAction::UpdateRoot { entity } => {
                    (entity, 0, None)
                }
                DbAction::Insert {
                    entity,
                    path,
                    owner,
                } => (entity, path.len(), Some(*owner)),
                DbAction::Update { entity, path } => (entity, path.len(), None),
                DbAction::Delete { .. }
                | DbAction::DeleteAtPath { .. }
                | DbAction::DeleteRoot { .. } => {
                    return Err(Error::id_resolution(
                        child_path.clone(),
                        "owning chain contains a delete action",
                    ));
                }
            };

            let resolved: Option<Value> = entry
                .generated_id()
                .or_else(|| entity.id())
                .cloned();

            if let Some(value) = resolved {
                return self.identifier_for(entity.entity_type(), depth, child_path, value);
            }

            match next_owner {
                Some(next) => current = next,
                None => {
                    return Err(Error::id_resolution(
                        child_path.clone(),
                        "no ancestor in the owning chain carries a resolvable id",
                    ));
                }
            }
        }
    }

    /// Build the single-entry identifier referencing the id-supplying
    /// ancestor at the given depth along the child's path.
    fn identifier_for(
        &self,
        ancestor_type: &str,
        depth: usize,
        child_path: &PropertyPath,
        value: Value,
    ) -> Result<Identifier> {
        let descriptor = self.registry.require(ancestor_type)?;
        let Some(id_descriptor) = &descriptor.id else {
            return Err(Error::id_resolution(
                child_path.clone(),
                format!("entity '{ancestor_type}' carries an id value but declares no id column"),
            ));
        };

        let Some(segment) = child_path.segment(depth) else {
            return Err(Error::id_resolution(
                child_path.clone(),
                "owning chain does not lie on the insert's path",
            ));
        };
        let association = descriptor.association(segment).ok_or_else(|| {
            Error::id_resolution(
                child_path.clone(),
                format!("entity '{ancestor_type}' has no association '{segment}'"),
            )
        })?;

        Ok(Identifier::of(
            association.back_reference_column(),
            value,
            id_descriptor.target_type.clone(),
        ))
    }
}
