//! Entity schema descriptors and the schema registry.
//!
//! The registry is the explicit replacement for a reflective mapping
//! context: for every entity type it reports persistent properties, the
//! declared id and the association paths to nested entities. It is built
//! once at startup, applies the naming strategy to resolve back-reference
//! column names, and is immutable afterwards.

use std::collections::HashMap;

use crate::error::{Error, MappingErrorKind, Result};
use crate::types::SqlType;

/// Association cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// One-to-one association.
    One,
    /// One-to-many association.
    Many,
}

/// Derives back-reference column names for associations that do not
/// declare one explicitly.
pub trait NamingStrategy: Send + Sync {
    /// The back-reference column written into child rows of the given
    /// owning entity.
    fn back_reference_column(&self, owner_table: &str) -> String;
}

/// Default naming strategy: the back-reference column is named after the
/// owning entity's table.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn back_reference_column(&self, owner_table: &str) -> String {
        owner_table.to_string()
    }
}

/// Descriptor of an entity's identifier column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdDescriptor {
    /// Column name of the id.
    pub column: &'static str,
    /// Declared type of the id column; carried into back-reference
    /// identifiers as the target type.
    pub target_type: SqlType,
    /// Whether the database generates the value at insert time.
    pub generated: bool,
}

impl IdDescriptor {
    /// A database-generated identifier.
    pub fn generated(column: &'static str, target_type: SqlType) -> Self {
        IdDescriptor {
            column,
            target_type,
            generated: true,
        }
    }

    /// A natural (application-assigned) identifier.
    pub fn natural(column: &'static str, target_type: SqlType) -> Self {
        IdDescriptor {
            column,
            target_type,
            generated: false,
        }
    }
}

/// Descriptor of a plain persistent property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: &'static str,
    /// Database column name.
    pub column: &'static str,
    /// Declared column type.
    pub sql_type: SqlType,
}

impl PropertyDescriptor {
    pub fn new(name: &'static str, column: &'static str, sql_type: SqlType) -> Self {
        PropertyDescriptor {
            name,
            column,
            sql_type,
        }
    }
}

/// Descriptor of an association to a nested entity or collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDescriptor {
    /// Association (property) name; one segment of a property path.
    pub name: &'static str,
    /// Entity type of the associated nodes.
    pub target_type: &'static str,
    /// Singular or collection cardinality.
    pub cardinality: Cardinality,
    /// Back-reference column written into child rows. Resolved via the
    /// naming strategy at registry build time when left empty.
    back_reference: String,
}

impl AssociationDescriptor {
    /// A one-to-one association.
    pub fn one(name: &'static str, target_type: &'static str) -> Self {
        AssociationDescriptor {
            name,
            target_type,
            cardinality: Cardinality::One,
            back_reference: String::new(),
        }
    }

    /// A one-to-many association.
    pub fn many(name: &'static str, target_type: &'static str) -> Self {
        AssociationDescriptor {
            name,
            target_type,
            cardinality: Cardinality::Many,
            back_reference: String::new(),
        }
    }

    /// Override the back-reference column name instead of deriving it
    /// from the naming strategy.
    pub fn back_reference(mut self, column: impl Into<String>) -> Self {
        self.back_reference = column.into();
        self
    }

    /// The resolved back-reference column name.
    pub fn back_reference_column(&self) -> &str {
        &self.back_reference
    }
}

/// Descriptor of one entity type: its table, id, properties and
/// associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Entity type name used for registry lookup.
    pub entity_type: &'static str,
    /// Database table name.
    pub table: &'static str,
    /// Identifier descriptor; entities nested in an aggregate may have
    /// none of their own.
    pub id: Option<IdDescriptor>,
    /// Plain persistent properties, in declaration order.
    pub properties: Vec<PropertyDescriptor>,
    /// Associations to nested entities, in declaration order.
    pub associations: Vec<AssociationDescriptor>,
}

impl EntityDescriptor {
    /// Create a descriptor with no id, properties or associations.
    pub fn new(entity_type: &'static str, table: &'static str) -> Self {
        EntityDescriptor {
            entity_type,
            table,
            id: None,
            properties: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Declare the identifier.
    pub fn with_id(mut self, id: IdDescriptor) -> Self {
        self.id = Some(id);
        self
    }

    /// Declare a persistent property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare an association.
    pub fn with_association(mut self, association: AssociationDescriptor) -> Self {
        self.associations.push(association);
        self
    }

    /// Look up an association by name.
    pub fn association(&self, name: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|a| a.name == name)
    }
}

/// Immutable lookup table from entity type to [`EntityDescriptor`].
///
/// Built once via [`SchemaRegistryBuilder`]; safe for unsynchronized
/// concurrent use.
#[derive(Debug)]
pub struct SchemaRegistry {
    entities: HashMap<&'static str, EntityDescriptor>,
}

impl SchemaRegistry {
    /// Start building a registry with the default naming strategy.
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Look up an entity descriptor.
    pub fn entity(&self, entity_type: &str) -> Option<&EntityDescriptor> {
        self.entities.get(entity_type)
    }

    /// Look up an entity descriptor, failing with a structural mapping
    /// error when the type is unknown.
    pub fn require(&self, entity_type: &str) -> Result<&EntityDescriptor> {
        self.entity(entity_type).ok_or_else(|| {
            Error::mapping(
                MappingErrorKind::UnknownEntity,
                entity_type,
                "entity type is not registered",
            )
        })
    }

    /// Number of registered entity types.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Builder for [`SchemaRegistry`].
pub struct SchemaRegistryBuilder {
    naming: Box<dyn NamingStrategy>,
    entities: Vec<EntityDescriptor>,
}

impl SchemaRegistryBuilder {
    /// Create a builder using the default naming strategy.
    pub fn new() -> Self {
        SchemaRegistryBuilder {
            naming: Box::new(DefaultNamingStrategy),
            entities: Vec::new(),
        }
    }

    /// Replace the naming strategy used to resolve back-reference columns.
    pub fn naming_strategy(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Register an entity descriptor.
    pub fn entity(mut self, descriptor: EntityDescriptor) -> Self {
        self.entities.push(descriptor);
        self
    }

    /// Resolve back-reference columns, validate association targets and
    /// freeze the registry.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut entities: HashMap<&'static str, EntityDescriptor> = HashMap::new();

        for mut descriptor in self.entities {
            for association in &mut descriptor.associations {
                if association.back_reference.is_empty() {
                    association.back_reference =
                        self.naming.back_reference_column(descriptor.table);
                }
            }
            entities.insert(descriptor.entity_type, descriptor);
        }

        // Association targets must themselves be registered.
        for descriptor in entities.values() {
            for association in &descriptor.associations {
                if !entities.contains_key(association.target_type) {
                    return Err(Error::mapping(
                        MappingErrorKind::UnknownEntity,
                        descriptor.entity_type,
                        format!(
                            "association '{}' targets unregistered entity type '{}'",
                            association.name, association.target_type
                        ),
                    ));
                }
            }
        }

        tracing::debug!(entities = entities.len(), "schema registry built");
        Ok(SchemaRegistry { entities })
    }
}

impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
