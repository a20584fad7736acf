//! Aggregate-to-action conversion and interpretation.
//!
//! The [`WritingContext`] walks an aggregate's object graph from its root
//! and produces a [`WritePlan`]: a dependency-ordered arena of typed
//! database actions with back-reference placeholders. The
//! [`Interpreter`] executes a plan in order against a
//! [`DataAccessStrategy`], resolving each insert's back-reference to a
//! concrete parent identifier before issuing the write.

pub mod action;
pub mod interpreter;
pub mod strategy;
pub mod writer;

pub use action::{ActionId, DbAction, WritePlan};
pub use interpreter::Interpreter;
pub use strategy::DataAccessStrategy;
pub use writer::WritingContext;
