//! Aggregate object trees.
//!
//! An aggregate is represented as an explicit tree of [`EntityData`] nodes:
//! one root entity plus its transitively reachable associated entities and
//! collections. Nodes carry their column values and association slots; the
//! tree shape is validated against the schema registry by the action graph
//! builder, not on construction.

use crate::value::Value;

/// The data held by one association slot of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum AssociationData {
    /// One-to-one association; `None` when unset.
    One(Option<Box<EntityData>>),
    /// One-to-many association. No ordering is guaranteed between elements
    /// when the aggregate is persisted.
    Many(Vec<EntityData>),
}

impl AssociationData {
    /// Iterate over the child entities in this slot.
    pub fn children(&self) -> impl Iterator<Item = &EntityData> {
        match self {
            AssociationData::One(child) => {
                AssociationChildren::One(child.as_deref().into_iter())
            }
            AssociationData::Many(children) => AssociationChildren::Many(children.iter()),
        }
    }

    /// Check whether the slot holds no children.
    pub fn is_empty(&self) -> bool {
        match self {
            AssociationData::One(child) => child.is_none(),
            AssociationData::Many(children) => children.is_empty(),
        }
    }
}

enum AssociationChildren<'a> {
    One(std::option::IntoIter<&'a EntityData>),
    Many(std::slice::Iter<'a, EntityData>),
}

impl<'a> Iterator for AssociationChildren<'a> {
    type Item = &'a EntityData;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            AssociationChildren::One(iter) => iter.next(),
            AssociationChildren::Many(iter) => iter.next(),
        }
    }
}

/// One node of an aggregate tree: an entity instance with its column
/// values and association slots.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityData {
    entity_type: &'static str,
    id: Option<Value>,
    values: Vec<(&'static str, Value)>,
    associations: Vec<(&'static str, AssociationData)>,
}

impl EntityData {
    /// Create a node of the given entity type with no id, values or
    /// associations.
    pub fn new(entity_type: &'static str) -> Self {
        EntityData {
            entity_type,
            id: None,
            values: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Set the natural (pre-assigned) identifier value.
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a column value.
    pub fn with_value(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    /// Set a one-to-one association.
    pub fn with_one(mut self, name: &'static str, child: EntityData) -> Self {
        self.associations
            .push((name, AssociationData::One(Some(Box::new(child)))));
        self
    }

    /// Record a one-to-one association as empty. Used on updates to state
    /// that the slot was emptied rather than left unmentioned.
    pub fn with_empty_one(mut self, name: &'static str) -> Self {
        self.associations.push((name, AssociationData::One(None)));
        self
    }

    /// Set a one-to-many association.
    pub fn with_many(mut self, name: &'static str, children: Vec<EntityData>) -> Self {
        self.associations.push((name, AssociationData::Many(children)));
        self
    }

    /// The entity type name, used for schema lookup.
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// The natural identifier value, if assigned.
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// Check whether this entity is new, i.e. carries no identifier value.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Column values in insertion order.
    pub fn values(&self) -> &[(&'static str, Value)] {
        &self.values
    }

    /// Association slots in insertion order.
    pub fn associations(&self) -> &[(&'static str, AssociationData)] {
        &self.associations
    }

    /// Look up an association slot by name.
    pub fn association(&self, name: &str) -> Option<&AssociationData> {
        self.associations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, data)| data)
    }
}
