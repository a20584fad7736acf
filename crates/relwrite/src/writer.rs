//! High-level aggregate write orchestration.
//!
//! [`AggregateWriter`] ties the two halves of the engine together: it asks
//! a [`WritingContext`] to convert an aggregate into a [`WritePlan`] and
//! immediately hands the plan to an [`Interpreter`] for execution against
//! the caller's [`DataAccessStrategy`]. Callers that need to inspect or
//! reorder plans can use the engine types directly; the writer covers the
//! common save-then-execute path.

use relwrite_core::{EntityData, Result, SchemaRegistry, Value};
use relwrite_engine::{DataAccessStrategy, Interpreter, WritePlan, WritingContext};

/// Converts aggregates to write plans and executes them in one call.
///
/// Cheap to construct; holds only a registry reference. Each call builds
/// a fresh plan, so a writer may be shared freely across operations.
pub struct AggregateWriter<'a> {
    context: WritingContext<'a>,
    interpreter: Interpreter<'a>,
}

impl<'a> AggregateWriter<'a> {
    /// Create a writer over the given schema registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        AggregateWriter {
            context: WritingContext::new(registry),
            interpreter: Interpreter::new(registry),
        }
    }

    /// Persist the aggregate and return the executed plan.
    ///
    /// A root without an identifier is inserted along with every nested
    /// entity; a root with one is treated as an update of the whole
    /// aggregate. The returned plan carries any database-generated ids in
    /// its arena entries, with the root's available via [`root_id`].
    ///
    /// [`root_id`]: Self::root_id
    #[tracing::instrument(level = "debug", skip(self, root, strategy), fields(entity_type = root.entity_type()))]
    pub fn save<S: DataAccessStrategy>(
        &self,
        root: &EntityData,
        strategy: &S,
    ) -> Result<WritePlan> {
        let mut plan = self.context.save(root)?;
        self.interpreter.execute(&mut plan, strategy)?;
        Ok(plan)
    }

    /// Update an existing aggregate, diffing against its previously
    /// loaded state when one is supplied.
    ///
    /// Without a previous state, children without ids are inserted and
    /// children carrying ids updated, with no deletes emitted; with one,
    /// children absent from the current aggregate are deleted and
    /// surviving children updated in place.
    #[tracing::instrument(level = "debug", skip_all, fields(entity_type = root.entity_type()))]
    pub fn update<S: DataAccessStrategy>(
        &self,
        root: &EntityData,
        previous: Option<&EntityData>,
        strategy: &S,
    ) -> Result<WritePlan> {
        let mut plan = self.context.update(root, previous)?;
        self.interpreter.execute(&mut plan, strategy)?;
        Ok(plan)
    }

    /// Delete the aggregate, nested entities first.
    #[tracing::instrument(level = "debug", skip(self, root, strategy), fields(entity_type = root.entity_type()))]
    pub fn delete<S: DataAccessStrategy>(
        &self,
        root: &EntityData,
        strategy: &S,
    ) -> Result<WritePlan> {
        let mut plan = self.context.delete(root)?;
        self.interpreter.execute(&mut plan, strategy)?;
        Ok(plan)
    }

    /// The root identifier recorded in an executed plan: the id the
    /// database generated for the first action, if any.
    pub fn root_id(plan: &WritePlan) -> Option<&Value> {
        plan.ids().next().and_then(|id| plan.generated_id(id))
    }
}
