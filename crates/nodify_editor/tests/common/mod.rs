// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared fixtures for the editor integration tests.

#![allow(dead_code)]

use egui::Pos2;
use nodify_editor::{GraphEditor, InteractionConfig, NodeLayout, PointerKind, SocketGeometryCache, SocketOutcome};
use nodify_graph::{
    Graph, GraphEventKind, LinkId, Node, Pin, PinAddress, PinBinding, PinDirection, PinKind, PinValue,
    Subscription,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Install a test subscriber once; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "nodify_graph=debug,nodify_editor=debug".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Records the kinds of graph events in arrival order
pub struct EventLog {
    events: Rc<RefCell<Vec<GraphEventKind>>>,
    _subscriptions: Vec<Subscription>,
}

impl EventLog {
    /// Start recording every event kind on `graph`
    pub fn attach(graph: &Graph) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let subscriptions = [
            GraphEventKind::AddNode,
            GraphEventKind::DelNode,
            GraphEventKind::AddLink,
            GraphEventKind::DelLink,
            GraphEventKind::Relink,
        ]
        .into_iter()
        .map(|kind| {
            let events = Rc::clone(&events);
            graph.subscribe(kind, move |event| events.borrow_mut().push(event.kind()))
        })
        .collect();
        Self {
            events,
            _subscriptions: subscriptions,
        }
    }

    /// Recorded kinds
    pub fn kinds(&self) -> Vec<GraphEventKind> {
        self.events.borrow().clone()
    }

    /// Number of recorded events of `kind`
    pub fn count(&self, kind: GraphEventKind) -> usize {
        self.events.borrow().iter().filter(|k| **k == kind).count()
    }
}

/// Three nodes laid out with [`NodeLayout::default`]:
///
/// - A at (0, 0) with boolean output P1, socket at (150, 34)
/// - B at (300, 0) with boolean input P2, socket at (300, 34)
/// - C at (300, 200) with boolean input P3 at (300, 234) and string input S at (300, 254)
pub struct Scene {
    pub editor: GraphEditor,
    pub geometry: SocketGeometryCache,
    pub p1: PinAddress,
    pub p2: PinAddress,
    pub p3: PinAddress,
    pub s: PinAddress,
}

pub const P1_SOCKET: Pos2 = Pos2::new(150.0, 34.0);
pub const P2_SOCKET: Pos2 = Pos2::new(300.0, 34.0);
pub const P3_SOCKET: Pos2 = Pos2::new(300.0, 234.0);
pub const S_SOCKET: Pos2 = Pos2::new(300.0, 254.0);
pub const EMPTY_CANVAS: Pos2 = Pos2::new(700.0, 600.0);

fn boolean_pin(direction: PinDirection) -> Pin {
    Pin::new(direction, PinKind::Boolean, PinBinding::Value(PinValue::Bool(false)))
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(InteractionConfig::default())
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        let mut a = Node::new().with_label("A").with_position(0.0, 0.0);
        let p1 = a.add_output(boolean_pin(PinDirection::Output)).unwrap();
        let mut b = Node::new().with_label("B").with_position(300.0, 0.0);
        let p2 = b.add_input(boolean_pin(PinDirection::Input)).unwrap();
        let mut c = Node::new().with_label("C").with_position(300.0, 200.0);
        let p3 = c.add_input(boolean_pin(PinDirection::Input)).unwrap();
        let s = c
            .add_input(Pin::input(PinKind::String, PinBinding::Value(PinValue::from("text"))))
            .unwrap();

        let addresses = (
            PinAddress::new(a.id(), p1),
            PinAddress::new(b.id(), p2),
            PinAddress::new(c.id(), p3),
            PinAddress::new(c.id(), s),
        );

        let mut graph = Graph::new("scene");
        for node in [a, b, c] {
            graph.add_node(node).unwrap();
        }
        let geometry = NodeLayout::default().layout(&graph);

        Self {
            editor: GraphEditor::with_config(graph, config),
            geometry,
            p1: addresses.0,
            p2: addresses.1,
            p3: addresses.2,
            s: addresses.3,
        }
    }

    /// Press at `from`, move through `via`, release at `to`
    pub fn drag(&mut self, from: Pos2, via: &[Pos2], to: Pos2) -> SocketOutcome {
        self.pointer(PointerKind::Down, from);
        for pos in via {
            self.pointer(PointerKind::Move, *pos);
        }
        self.pointer(PointerKind::Up, to)
    }

    pub fn pointer(&mut self, kind: PointerKind, pos: Pos2) -> SocketOutcome {
        self.editor.pointer(&self.geometry, kind, pos).unwrap()
    }

    pub fn graph(&self) -> &Graph {
        self.editor.graph()
    }

    pub fn connection(&self, pin: PinAddress) -> Option<LinkId> {
        self.graph().pin(pin).unwrap().connection()
    }
}
