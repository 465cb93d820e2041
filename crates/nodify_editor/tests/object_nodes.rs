// SPDX-License-Identifier: MIT OR Apache-2.0
//! Object-backed nodes built by the factory, linked through `this` pins.

mod common;

use common::{init_tracing, EventLog};
use egui::Pos2;
use nodify_editor::{GraphEditor, NodeLayout, PointerKind, SocketOutcome};
use nodify_graph::{
    EntityFactory, FactoryArgs, Graph, GraphEventKind, ObjectRef, PinValue, ValueAccess, OBJECT_NODE,
};

/// Root object `{ name: "root", child: { size: 3 } }` and the child object
fn objects() -> (PinValue, PinValue) {
    let child = PinValue::Object(ObjectRef::from_fields([("size", PinValue::Number(3.0))]));
    let root = PinValue::Object(ObjectRef::from_fields([
        ("name", PinValue::from("root")),
        ("child", child.clone()),
    ]));
    (root, child)
}

#[test]
fn test_child_field_links_to_child_this_pin() {
    init_tracing();
    let factory = EntityFactory::with_builtins();
    let (root, child) = objects();
    let root_node = factory
        .create_node(OBJECT_NODE, [0.0, 0.0], "root", &FactoryArgs::new(root))
        .unwrap();
    let child_node = factory
        .create_node(OBJECT_NODE, [300.0, 0.0], "child", &FactoryArgs::new(child))
        .unwrap();

    // Outputs follow field order: name, child.
    assert_eq!(root_node.outputs()[1].label, "child");
    assert_eq!(child_node.inputs()[0].value_access(), ValueAccess::This);

    let mut graph = Graph::new("objects");
    graph.add_node(root_node).unwrap();
    graph.add_node(child_node).unwrap();
    let mut editor = GraphEditor::new(graph);
    let geometry = NodeLayout::default().layout(editor.graph());
    let log = EventLog::attach(editor.graph());

    // Root's second output row sits at y = 24 + 20 + 10; the child's this pin at y = 34.
    let child_field = Pos2::new(150.0, 54.0);
    let this_pin = Pos2::new(300.0, 34.0);
    editor.pointer(&geometry, PointerKind::Down, child_field).unwrap();
    editor.pointer(&geometry, PointerKind::Move, Pos2::new(220.0, 40.0)).unwrap();
    let outcome = editor.pointer(&geometry, PointerKind::Up, this_pin).unwrap();

    assert!(matches!(outcome, SocketOutcome::Connected(_)));
    assert_eq!(log.kinds(), [GraphEventKind::AddLink]);
}

#[test]
fn test_unrelated_object_rejected_by_this_pin() {
    init_tracing();
    let factory = EntityFactory::with_builtins();
    let (root, _) = objects();
    let (_, other_child) = objects();
    let root_node = factory
        .create_node(OBJECT_NODE, [0.0, 0.0], "root", &FactoryArgs::new(root))
        .unwrap();
    let other_node = factory
        .create_node(OBJECT_NODE, [300.0, 0.0], "other", &FactoryArgs::new(other_child))
        .unwrap();

    let mut graph = Graph::new("objects");
    graph.add_node(root_node).unwrap();
    graph.add_node(other_node).unwrap();
    let mut editor = GraphEditor::new(graph);
    let geometry = NodeLayout::default().layout(editor.graph());

    editor.pointer(&geometry, PointerKind::Down, Pos2::new(150.0, 54.0)).unwrap();
    editor.pointer(&geometry, PointerKind::Move, Pos2::new(220.0, 40.0)).unwrap();
    let outcome = editor.pointer(&geometry, PointerKind::Up, Pos2::new(300.0, 34.0)).unwrap();
    assert_eq!(outcome, SocketOutcome::Discarded);
    assert_eq!(editor.graph().link_count(), 0);
}

#[test]
fn test_delete_selected_node_cascades() {
    init_tracing();
    let factory = EntityFactory::with_builtins();
    let (root, child) = objects();
    let root_node = factory
        .create_node(OBJECT_NODE, [0.0, 0.0], "root", &FactoryArgs::new(root))
        .unwrap();
    let child_node = factory
        .create_node(OBJECT_NODE, [300.0, 0.0], "child", &FactoryArgs::new(child))
        .unwrap();
    let root_id = root_node.id();
    let child_id = child_node.id();

    let mut graph = Graph::new("objects");
    graph.add_node(root_node).unwrap();
    graph.add_node(child_node).unwrap();
    let mut editor = GraphEditor::new(graph);
    let geometry = NodeLayout::default().layout(editor.graph());
    editor.pointer(&geometry, PointerKind::Down, Pos2::new(150.0, 54.0)).unwrap();
    editor.pointer(&geometry, PointerKind::Move, Pos2::new(220.0, 40.0)).unwrap();
    editor.pointer(&geometry, PointerKind::Up, Pos2::new(300.0, 34.0)).unwrap();
    assert_eq!(editor.graph().link_count(), 1);

    let log = EventLog::attach(editor.graph());
    editor.single_select(root_id);
    assert_eq!(editor.delete_selected().unwrap(), 1);

    assert_eq!(log.kinds(), [GraphEventKind::DelNode, GraphEventKind::DelLink]);
    assert_eq!(editor.graph().link_count(), 0);
    assert!(editor.graph().links_for_node(child_id).is_empty());
    let child = editor.graph().node(child_id).unwrap();
    assert!(child.pins().all(|pin| !pin.is_connected()));
    assert!(editor.graph().invariant_violations().is_empty());
}
