//! End-to-end save semantics through the public API: plan construction,
//! back-reference identifier resolution and execution ordering.

use std::cell::RefCell;

use relwrite::prelude::*;

/// Records every strategy call in order; generates sequential BigInt ids
/// for the entity types listed in `generate_for`.
#[derive(Default)]
struct RecordingStrategy {
    generate_for: Vec<&'static str>,
    next_id: std::cell::Cell<i64>,
    calls: RefCell<Vec<Call>>,
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    InsertRoot(&'static str),
    Insert(&'static str, Identifier),
    Update(&'static str),
    Delete(&'static str, Value),
    DeleteAtPath(&'static str, Value, PropertyPath),
    DeleteRoot(&'static str, Value),
}

impl RecordingStrategy {
    fn generating(types: Vec<&'static str>, first_id: i64) -> Self {
        RecordingStrategy {
            generate_for: types,
            next_id: std::cell::Cell::new(first_id),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(&self) -> Value {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Value::BigInt(id)
    }
}

impl DataAccessStrategy for RecordingStrategy {
    fn insert_root(&self, entity: &EntityData) -> Result<Option<Value>> {
        self.calls
            .borrow_mut()
            .push(Call::InsertRoot(entity.entity_type()));
        if self.generate_for.contains(&entity.entity_type()) {
            Ok(Some(self.next()))
        } else {
            Ok(None)
        }
    }

    fn insert(
        &self,
        entity: &EntityData,
        entity_type: &'static str,
        identifier: &Identifier,
    ) -> Result<Option<Value>> {
        self.calls
            .borrow_mut()
            .push(Call::Insert(entity_type, identifier.clone()));
        if self.generate_for.contains(&entity.entity_type()) {
            Ok(Some(self.next()))
        } else {
            Ok(None)
        }
    }

    fn update(&self, entity: &EntityData) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::Update(entity.entity_type()));
        Ok(())
    }

    fn delete(&self, entity_type: &'static str, id: &Value, _path: &PropertyPath) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::Delete(entity_type, id.clone()));
        Ok(())
    }

    fn delete_at_path(
        &self,
        entity_type: &'static str,
        root_id: &Value,
        path: &PropertyPath,
    ) -> Result<()> {
        self.calls.borrow_mut().push(Call::DeleteAtPath(
            entity_type,
            root_id.clone(),
            path.clone(),
        ));
        Ok(())
    }

    fn delete_root(&self, entity_type: &'static str, id: &Value) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::DeleteRoot(entity_type, id.clone()));
        Ok(())
    }
}

/// container -> element -> element1, id only on the root.
fn container_schema() -> SchemaRegistry {
    SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::one("element", "element")),
        )
        .entity(
            EntityDescriptor::new("element", "element")
                .with_association(AssociationDescriptor::one("element1", "element1")),
        )
        .entity(EntityDescriptor::new("element1", "element1"))
        .build()
        .unwrap()
}

fn container_identifier(value: i64) -> Identifier {
    Identifier::of("container", Value::BigInt(value), SqlType::BigInt)
}

#[test]
fn save_new_root_with_preassigned_id_passes_it_to_child_insert() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let root = EntityData::new("container")
        .with_id(23_i64)
        .with_one("element", EntityData::new("element"));

    writer.save(&root, &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::InsertRoot("container"),
            Call::Insert("element", container_identifier(23)),
        ]
    );
}

#[test]
fn save_new_root_with_generated_id_passes_it_to_child_insert() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::generating(vec!["container"], 23);

    let root =
        EntityData::new("container").with_one("element", EntityData::new("element"));

    let plan = writer.save(&root, &strategy).unwrap();

    assert_eq!(AggregateWriter::root_id(&plan), Some(&Value::BigInt(23)));
    assert_eq!(
        strategy.calls(),
        vec![
            Call::InsertRoot("container"),
            Call::Insert("element", container_identifier(23)),
        ]
    );
}

#[test]
fn root_id_propagates_to_grandchild_insert() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::generating(vec!["container"], 23);

    let root = EntityData::new("container").with_one(
        "element",
        EntityData::new("element").with_one("element1", EntityData::new("element1")),
    );

    writer.save(&root, &strategy).unwrap();

    // The intermediate element has no id of its own; the grandchild's
    // back reference still resolves to the root's id and column name.
    assert_eq!(
        strategy.calls(),
        vec![
            Call::InsertRoot("container"),
            Call::Insert("element", container_identifier(23)),
            Call::Insert("element1", container_identifier(23)),
        ]
    );
}

#[test]
fn every_entity_is_written_exactly_once() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("elements", "element")),
        )
        .entity(EntityDescriptor::new("element", "element"))
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::generating(vec!["container"], 23);

    let root = EntityData::new("container").with_many(
        "elements",
        vec![
            EntityData::new("element").with_value("name", "a"),
            EntityData::new("element").with_value("name", "b"),
            EntityData::new("element").with_value("name", "c"),
        ],
    );

    writer.save(&root, &strategy).unwrap();

    let calls = strategy.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::InsertRoot("container"));
    for call in &calls[1..] {
        assert_eq!(*call, Call::Insert("element", container_identifier(23)));
    }
}

#[test]
fn parents_are_written_before_their_children() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::generating(vec!["container"], 1);

    let root = EntityData::new("container").with_one(
        "element",
        EntityData::new("element").with_one("element1", EntityData::new("element1")),
    );

    let plan = writer.save(&root, &strategy).unwrap();

    // Every non-root insert references an earlier arena entry.
    for (index, action) in plan.actions().enumerate() {
        if let Some(owner) = action.owner() {
            assert!(owner.index() < index);
        }
    }
}

#[test]
fn save_existing_root_updates_and_inserts_new_children() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let root = EntityData::new("container")
        .with_id(42_i64)
        .with_one("element", EntityData::new("element"));

    writer.save(&root, &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::Update("container"),
            Call::Insert("element", container_identifier(42)),
        ]
    );
}

#[test]
fn save_without_resolvable_ancestor_id_fails() {
    let registry = container_schema();
    let writer = AggregateWriter::new(&registry);
    // No generation configured and no pre-assigned root id.
    let strategy = RecordingStrategy::default();

    let root =
        EntityData::new("container").with_one("element", EntityData::new("element"));

    let err = writer.save(&root, &strategy).unwrap_err();
    assert!(err.is_id_resolution());
}

#[test]
fn delete_removes_children_before_the_root() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("elements", "element")),
        )
        .entity(
            EntityDescriptor::new("element", "element")
                .with_id(IdDescriptor::natural("id", SqlType::BigInt)),
        )
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let root = EntityData::new("container").with_id(1_i64).with_many(
        "elements",
        vec![
            EntityData::new("element").with_id(10_i64),
            EntityData::new("element").with_id(11_i64),
        ],
    );

    writer.delete(&root, &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::Delete("element", Value::BigInt(10)),
            Call::Delete("element", Value::BigInt(11)),
            Call::DeleteRoot("container", Value::BigInt(1)),
        ]
    );
}

#[test]
fn update_deletes_orphans_before_inserting_replacements() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("elements", "element")),
        )
        .entity(
            EntityDescriptor::new("element", "element")
                .with_id(IdDescriptor::natural("id", SqlType::BigInt)),
        )
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let previous = EntityData::new("container").with_id(1_i64).with_many(
        "elements",
        vec![EntityData::new("element").with_id(10_i64)],
    );
    let current = EntityData::new("container")
        .with_id(1_i64)
        .with_many("elements", vec![EntityData::new("element")]);

    writer.update(&current, Some(&previous), &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::Update("container"),
            Call::Delete("element", Value::BigInt(10)),
            Call::Insert("element", container_identifier(1)),
        ]
    );
}

#[test]
fn update_deletes_children_of_slots_absent_from_the_current_graph() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("elements", "element")),
        )
        .entity(
            EntityDescriptor::new("element", "element")
                .with_id(IdDescriptor::natural("id", SqlType::BigInt)),
        )
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let previous = EntityData::new("container").with_id(1_i64).with_many(
        "elements",
        vec![EntityData::new("element").with_id(7_i64)],
    );
    // The current aggregate does not mention the slot at all.
    let current = EntityData::new("container").with_id(1_i64);

    writer.update(&current, Some(&previous), &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::Update("container"),
            Call::Delete("element", Value::BigInt(7)),
        ]
    );
}

#[test]
fn delete_clears_unkeyed_children_before_the_root() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("tags", "tag")),
        )
        .entity(EntityDescriptor::new("tag", "tag"))
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let root = EntityData::new("container").with_id(1_i64).with_many(
        "tags",
        vec![EntityData::new("tag").with_value("label", "old")],
    );

    writer.delete(&root, &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::DeleteAtPath("tag", Value::BigInt(1), PropertyPath::from("tags")),
            Call::DeleteRoot("container", Value::BigInt(1)),
        ]
    );
}

#[test]
fn update_clears_unkeyed_collection_by_back_reference() {
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::many("tags", "tag")),
        )
        .entity(EntityDescriptor::new("tag", "tag"))
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::default();

    let previous = EntityData::new("container").with_id(1_i64).with_many(
        "tags",
        vec![EntityData::new("tag").with_value("label", "old")],
    );
    let current = EntityData::new("container").with_id(1_i64).with_many(
        "tags",
        vec![EntityData::new("tag").with_value("label", "new")],
    );

    writer.update(&current, Some(&previous), &strategy).unwrap();

    assert_eq!(
        strategy.calls(),
        vec![
            Call::Update("container"),
            Call::DeleteAtPath("tag", Value::BigInt(1), PropertyPath::from("tags")),
            Call::Insert("tag", container_identifier(1)),
        ]
    );
}

#[test]
fn intermediate_id_shadows_the_root_id() {
    // When the middle entity declares and carries its own id, the
    // grandchild's back reference resolves against it, not the root.
    let registry = SchemaRegistry::builder()
        .entity(
            EntityDescriptor::new("container", "container")
                .with_id(IdDescriptor::generated("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::one("element", "element")),
        )
        .entity(
            EntityDescriptor::new("element", "element")
                .with_id(IdDescriptor::natural("id", SqlType::BigInt))
                .with_association(AssociationDescriptor::one("element1", "element1")),
        )
        .entity(EntityDescriptor::new("element1", "element1"))
        .build()
        .unwrap();
    let writer = AggregateWriter::new(&registry);
    let strategy = RecordingStrategy::generating(vec!["container"], 23);

    let root = EntityData::new("container").with_one(
        "element",
        EntityData::new("element")
            .with_id(7_i64)
            .with_one("element1", EntityData::new("element1")),
    );

    writer.save(&root, &strategy).unwrap();

    let calls = strategy.calls();
    assert_eq!(calls[1], Call::Insert("element", container_identifier(23)));
    assert_eq!(
        calls[2],
        Call::Insert(
            "element1",
            Identifier::of("element", Value::BigInt(7), SqlType::BigInt),
        )
    );
}
