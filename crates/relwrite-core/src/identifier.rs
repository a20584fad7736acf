//! Back-reference identifiers passed to insert operations.

use crate::types::SqlType;
use crate::value::Value;

/// One column/value pair of an [`Identifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierPart {
    /// Back-reference column name.
    pub name: String,
    /// The parent key value.
    pub value: Value,
    /// Declared type of the referenced id column.
    pub target_type: SqlType,
}

/// An ordered mapping from back-reference column names to parent key
/// values, built for each insert action from its owning chain.
///
/// In the base case an identifier holds a single entry referencing the
/// nearest ancestor with a resolvable id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Identifier {
    parts: Vec<IdentifierPart>,
}

impl Identifier {
    /// An identifier with no parts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an identifier with a single part.
    pub fn of(name: impl Into<String>, value: Value, target_type: SqlType) -> Self {
        Identifier {
            parts: vec![IdentifierPart {
                name: name.into(),
                value,
                target_type,
            }],
        }
    }

    /// Return a new identifier with an additional part appended.
    pub fn with(mut self, name: impl Into<String>, value: Value, target_type: SqlType) -> Self {
        self.parts.push(IdentifierPart {
            name: name.into(),
            value,
            target_type,
        });
        self
    }

    /// The parts of this identifier, in insertion order.
    pub fn parts(&self) -> &[IdentifierPart] {
        &self.parts
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check whether this identifier has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Look up a part's value by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parts.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}
