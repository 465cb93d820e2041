// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor facade: a graph, its socket controller and the selection.

use crate::config::InteractionConfig;
use crate::error::Result;
use crate::geometry::SocketGeometry;
use crate::hit_test::find_socket_at;
use crate::socket::{LinkPreview, PointerEvent, PointerKind, SocketController, SocketOutcome};
use egui::Pos2;
use indexmap::IndexSet;
use nodify_graph::{EntityKind, Graph, GraphError, LinkId, NodeId};

/// Selected nodes and links
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Selected nodes in selection order
    pub nodes: IndexSet<NodeId>,
    /// Selected links in selection order
    pub links: IndexSet<LinkId>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a node is selected
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Check if a link is selected
    pub fn contains_link(&self, id: LinkId) -> bool {
        self.links.contains(&id)
    }

    /// Toggle a node in the selection
    pub fn toggle_node(&mut self, id: NodeId) {
        if !self.nodes.shift_remove(&id) {
            self.nodes.insert(id);
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Get the number of selected entities
    pub fn len(&self) -> usize {
        self.nodes.len() + self.links.len()
    }
}

/// A graph together with the state needed to edit it
#[derive(Debug)]
pub struct GraphEditor {
    graph: Graph,
    controller: SocketController,
    selection: Selection,
    config: InteractionConfig,
}

impl GraphEditor {
    /// Create an editor with default settings
    pub fn new(graph: Graph) -> Self {
        Self::with_config(graph, InteractionConfig::default())
    }

    /// Create an editor with the given settings
    pub fn with_config(graph: Graph, config: InteractionConfig) -> Self {
        Self {
            graph,
            controller: SocketController::new(&config),
            selection: Selection::new(),
            config,
        }
    }

    /// The edited graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The edited graph, for registry calls
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Take the graph back
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Current settings
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Replace the settings
    pub fn set_config(&mut self, config: InteractionConfig) {
        self.controller.configure(&config);
        self.config = config;
    }

    /// Socket state machine
    pub fn controller(&self) -> &SocketController {
        &self.controller
    }

    /// Link to draw for the drag in progress
    pub fn preview(&self) -> Option<&LinkPreview> {
        self.controller.preview()
    }

    /// Points to draw the drag preview with
    pub fn preview_points(&self) -> Option<Vec<Pos2>> {
        self.preview()
            .map(|preview| preview.curve().flatten(self.config.curve_segments))
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Route a pointer event whose target the host already resolved
    pub fn handle_pointer<G>(&mut self, geometry: &G, event: &PointerEvent) -> Result<SocketOutcome>
    where
        G: SocketGeometry + ?Sized,
    {
        let outcome = self.controller.handle(&mut self.graph, geometry, event)?;
        match outcome {
            SocketOutcome::Clicked(_) => self.clear_selection(),
            SocketOutcome::Relinked { old, new } => {
                if self.selection.links.shift_remove(&old) {
                    self.selection.links.insert(new);
                }
            }
            _ => {}
        }
        self.prune_selection();
        Ok(outcome)
    }

    /// Route a pointer event at `position`, hit testing sockets with `geometry`
    pub fn pointer<G>(&mut self, geometry: &G, kind: PointerKind, position: Pos2) -> Result<SocketOutcome>
    where
        G: SocketGeometry + ?Sized,
    {
        let target = find_socket_at(&self.graph, geometry, position);
        let event = PointerEvent::new(kind, position).with_target(target);
        self.handle_pointer(geometry, &event)
    }

    /// Select only `node`
    pub fn single_select(&mut self, node: NodeId) {
        self.clear_selection();
        if self.graph.contains_node(node) {
            self.selection.nodes.insert(node);
        }
    }

    /// Replace the selection with `nodes`
    pub fn multi_select(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.clear_selection();
        let graph = &self.graph;
        self.selection
            .nodes
            .extend(nodes.into_iter().filter(|id| graph.contains_node(*id)));
    }

    /// Toggle `node` in the selection
    pub fn toggle_node(&mut self, node: NodeId) {
        if self.graph.contains_node(node) {
            self.selection.toggle_node(node);
        }
    }

    /// Add a link to the selection
    pub fn select_link(&mut self, link: LinkId) {
        if self.graph.link(link).is_some() {
            self.selection.links.insert(link);
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Move `node` and every other selected node.
    ///
    /// An unselected node becomes the only selection first.
    pub fn move_node(&mut self, node: NodeId, dx: f32, dy: f32) -> Result<()> {
        if !self.selection.contains_node(node) {
            if !self.graph.contains_node(node) {
                return Err(GraphError::UnknownEntity {
                    kind: EntityKind::Node,
                    id: node.to_string(),
                }
                .into());
            }
            self.single_select(node);
        }
        for id in &self.selection.nodes {
            self.graph.move_node(*id, dx, dy)?;
        }
        Ok(())
    }

    /// Delete selected links, then selected nodes with their links.
    ///
    /// Returns the number of deleted entities.
    pub fn delete_selected(&mut self) -> Result<usize> {
        let mut deleted = 0;
        for link in std::mem::take(&mut self.selection.links) {
            if self.graph.link(link).is_some() {
                self.graph.del_link(link)?;
                deleted += 1;
            }
        }
        for node in std::mem::take(&mut self.selection.nodes) {
            if self.graph.contains_node(node) {
                self.graph.del_node(node)?;
                deleted += 1;
            }
        }
        tracing::debug!("Deleted {} selected entities", deleted);
        Ok(deleted)
    }

    /// Drop selected entities that are no longer in the graph
    fn prune_selection(&mut self) {
        let graph = &self.graph;
        self.selection.links.retain(|id| graph.link(*id).is_some());
        self.selection.nodes.retain(|id| graph.contains_node(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NodeLayout;
    use nodify_graph::{Link, Node, Pin, PinAddress, PinBinding, PinKind, PinValue};

    fn number_node(x: f32, inputs: usize, outputs: usize) -> Node {
        let mut node = Node::new().with_position(x, 0.0);
        for _ in 0..inputs {
            node.add_input(Pin::input(PinKind::Number, PinBinding::Value(PinValue::Number(0.0))))
                .unwrap();
        }
        for _ in 0..outputs {
            node.add_output(Pin::output(PinKind::Number, PinBinding::Value(PinValue::Number(1.0))))
                .unwrap();
        }
        node
    }

    #[test]
    fn test_single_and_multi_select() {
        let mut graph = Graph::default();
        let a = graph.add_node(number_node(0.0, 0, 1)).unwrap();
        let b = graph.add_node(number_node(300.0, 1, 0)).unwrap();
        let mut editor = GraphEditor::new(graph);

        editor.single_select(a);
        assert!(editor.selection().contains_node(a));
        editor.multi_select([a, b, NodeId::new()]);
        assert_eq!(editor.selection().nodes.len(), 2);
        editor.toggle_node(a);
        assert!(!editor.selection().contains_node(a));
        editor.clear_selection();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_move_unselected_node_selects_it() {
        let mut graph = Graph::default();
        let a = graph.add_node(number_node(0.0, 0, 1)).unwrap();
        let b = graph.add_node(number_node(300.0, 1, 0)).unwrap();
        let mut editor = GraphEditor::new(graph);

        editor.single_select(b);
        editor.move_node(a, 5.0, 5.0).unwrap();
        assert!(editor.selection().contains_node(a));
        assert!(!editor.selection().contains_node(b));
        assert_eq!(editor.graph().node(a).unwrap().position, [5.0, 5.0]);
        assert_eq!(editor.graph().node(b).unwrap().position, [300.0, 0.0]);

        editor.multi_select([a, b]);
        editor.move_node(b, 1.0, 0.0).unwrap();
        assert_eq!(editor.graph().node(a).unwrap().position, [6.0, 5.0]);
        assert_eq!(editor.graph().node(b).unwrap().position, [301.0, 0.0]);
        assert!(editor.move_node(NodeId::new(), 1.0, 1.0).is_err());
    }

    #[test]
    fn test_delete_selected() {
        let mut graph = Graph::default();
        let left = number_node(0.0, 0, 2);
        let right = number_node(300.0, 2, 0);
        let first = Link::new(
            PinAddress::new(left.id(), left.outputs()[0].id()),
            PinAddress::new(right.id(), right.inputs()[0].id()),
        );
        let second = Link::new(
            PinAddress::new(left.id(), left.outputs()[1].id()),
            PinAddress::new(right.id(), right.inputs()[1].id()),
        );
        graph.add_node(left.clone()).unwrap();
        graph.add_node(right.clone()).unwrap();
        graph.add_link(first).unwrap();
        graph.add_link(second).unwrap();
        let mut editor = GraphEditor::new(graph);

        editor.select_link(first.id);
        editor.toggle_node(right.id());
        assert_eq!(editor.delete_selected().unwrap(), 2);
        assert_eq!(editor.graph().node_count(), 1);
        assert_eq!(editor.graph().link_count(), 0);
        assert!(editor.selection().is_empty());
        assert!(editor.graph().invariant_violations().is_empty());
    }

    #[test]
    fn test_socket_click_clears_selection() {
        let mut graph = Graph::default();
        let node = number_node(0.0, 0, 1);
        graph.add_node(node.clone()).unwrap();
        let mut editor = GraphEditor::new(graph);
        let geometry = NodeLayout::default().layout(editor.graph());
        editor.single_select(node.id());

        // Default layout puts the first output socket at (150, 34).
        let socket = Pos2::new(150.0, 34.0);
        let outcome = editor.pointer(&geometry, PointerKind::Down, socket).unwrap();
        assert!(matches!(outcome, SocketOutcome::Pressed(_)));
        let outcome = editor.pointer(&geometry, PointerKind::Up, socket).unwrap();
        assert!(matches!(outcome, SocketOutcome::Clicked(_)));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_preview_points() {
        let mut graph = Graph::default();
        graph.add_node(number_node(0.0, 0, 1)).unwrap();
        let config = InteractionConfig { curve_segments: 8, ..Default::default() };
        let mut editor = GraphEditor::with_config(graph, config);
        let geometry = NodeLayout::default().layout(editor.graph());

        assert!(editor.preview_points().is_none());
        editor.pointer(&geometry, PointerKind::Down, Pos2::new(150.0, 34.0)).unwrap();
        editor.pointer(&geometry, PointerKind::Move, Pos2::new(250.0, 80.0)).unwrap();
        let points = editor.preview_points().unwrap();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], Pos2::new(150.0, 34.0));
        assert_eq!(points[8], Pos2::new(250.0, 80.0));
    }
}
