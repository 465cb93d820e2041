// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph registry: nodes, per-node link adjacency and change notifications.
//!
//! All topology mutation goes through [`Graph::add_node`],
//! [`Graph::del_node`], [`Graph::add_link`], [`Graph::del_link`] and
//! [`Graph::relink`]. Between calls the following hold:
//!
//! 1. every link's endpoint nodes are registered;
//! 2. a link is listed under exactly its endpoint nodes;
//! 3. a pin's `connection` is set iff a listed link names that pin;
//! 4. at most one link occupies a pin.

use crate::connection::{Link, LinkId, PinAddress};
use crate::error::{EntityKind, GraphError, Result};
use crate::events::{EventBus, GraphEvent, GraphEventKind, Subscription};
use crate::node::{Node, NodeId};
use crate::pin::{Pin, PinDirection, VisualHandle};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// A node graph
#[derive(Debug)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in insertion order
    nodes: IndexMap<NodeId, Node>,
    /// Links touching each node
    links: IndexMap<NodeId, Vec<Link>>,
    /// Change notifications
    events: EventBus,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexMap::new(),
            events: EventBus::new(),
        }
    }

    /// Register `handler` for changes of `kind`
    pub fn subscribe<F>(&self, kind: GraphEventKind, handler: F) -> Subscription
    where
        F: Fn(&GraphEvent<'_>) + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    /// The event bus changes are published on
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateEntity {
                kind: EntityKind::Node,
                id: id.to_string(),
            });
        }

        // A node enters the graph without links.
        node.clear_connections();
        self.nodes.insert(id, node);
        self.links.insert(id, Vec::new());
        tracing::debug!("Added node {} to graph '{}'", id, self.name);

        self.events.emit(&GraphEvent::AddNode(&self.nodes[&id]));
        Ok(id)
    }

    /// Remove a node and every link touching it.
    ///
    /// The removed node is returned with its pins disconnected. Each removed
    /// link is reported with its own `DelLink` event after `DelNode`.
    pub fn del_node(&mut self, node_id: NodeId) -> Result<Node> {
        let mut node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or_else(|| GraphError::unknown_node(node_id))?;
        // Snapshot first: unlinking rewrites the lists being scanned.
        let mut doomed: IndexMap<LinkId, Link> = IndexMap::new();
        let own = self.links.shift_remove(&node_id).unwrap_or_default();
        let others = self.links.values().flat_map(|list| list.iter());
        for link in own.iter().chain(others).filter(|l| l.involves_node(node_id)) {
            doomed.entry(link.id).or_insert(*link);
        }
        tracing::debug!("Removed node {} from graph '{}'", node_id, self.name);

        self.events.emit(&GraphEvent::DelNode(&node));
        for link in doomed.values() {
            self.detach(link);
            self.events.emit(&GraphEvent::DelLink(link));
        }

        node.clear_connections();
        Ok(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Whether a node is registered
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Translate a node on the canvas
    pub fn move_node(&mut self, node_id: NodeId, dx: f32, dy: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| GraphError::unknown_node(node_id))?;
        node.position[0] += dx;
        node.position[1] += dy;
        Ok(())
    }

    /// Store the renderer's handle for a node
    pub fn set_node_visual(&mut self, node_id: NodeId, visual: Option<VisualHandle>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| GraphError::unknown_node(node_id))?;
        node.visual = visual;
        Ok(())
    }

    /// Store the renderer's handle for a pin
    pub fn set_pin_visual(&mut self, address: PinAddress, visual: Option<VisualHandle>) -> Result<()> {
        let pin = self
            .nodes
            .get_mut(&address.node)
            .ok_or_else(|| GraphError::unknown_node(address.node))?
            .pin_mut(address.pin)
            .ok_or_else(|| GraphError::unknown_pin(address.pin))?;
        pin.visual = visual;
        Ok(())
    }

    /// Store the renderer's handle for a link, in every adjacency list holding it
    pub fn set_link_visual(&mut self, link_id: LinkId, visual: Option<VisualHandle>) -> Result<()> {
        let mut found = false;
        for link in self.links.values_mut().flat_map(|list| list.iter_mut()) {
            if link.id == link_id {
                link.visual = visual;
                found = true;
            }
        }
        if found {
            Ok(())
        } else {
            Err(GraphError::unknown_link(link_id))
        }
    }

    /// Get a pin through its address
    pub fn pin(&self, address: PinAddress) -> Option<&Pin> {
        self.nodes.get(&address.node)?.pin(address.pin)
    }

    /// Add a link between two registered pins.
    ///
    /// Compatibility is not checked here; see
    /// [`can_connect`](crate::connection::can_connect).
    pub fn add_link(&mut self, link: Link) -> Result<LinkId> {
        self.check_endpoints(&link, None)?;
        if self.link(link.id).is_some() {
            return Err(GraphError::DuplicateEntity {
                kind: EntityKind::Link,
                id: link.id.to_string(),
            });
        }

        self.attach(link);
        tracing::debug!(
            "Added link {} ({} -> {})",
            link.id,
            link.output.pin,
            link.input.pin
        );
        self.events.emit(&GraphEvent::AddLink(&link));
        Ok(link.id)
    }

    /// Remove a link and disconnect both endpoint pins
    pub fn del_link(&mut self, link_id: LinkId) -> Result<Link> {
        let link = *self.link(link_id).ok_or_else(|| GraphError::unknown_link(link_id))?;
        for node_id in [link.output.node, link.input.node] {
            if !self.nodes.contains_key(&node_id) {
                return Err(GraphError::unknown_node(node_id));
            }
        }

        self.detach(&link);
        tracing::debug!("Removed link {}", link_id);
        self.events.emit(&GraphEvent::DelLink(&link));
        Ok(link)
    }

    /// Replace a link by a new link between `output` and `input`.
    ///
    /// The pins held by the old link count as free. Observers see a single
    /// `Relink` event. The new link has a fresh ID and is returned.
    pub fn relink(&mut self, link_id: LinkId, output: PinAddress, input: PinAddress) -> Result<Link> {
        let old = *self.link(link_id).ok_or_else(|| GraphError::unknown_link(link_id))?;
        let new = Link { visual: old.visual, ..Link::new(output, input) };
        self.check_endpoints(&new, Some(link_id))?;

        self.detach(&old);
        self.attach(new);
        tracing::debug!("Relinked {} as {} ({} -> {})", old.id, new.id, output.pin, input.pin);
        self.events.emit(&GraphEvent::Relink { old: &old, new: &new });
        Ok(new)
    }

    /// Get a link by ID
    pub fn link(&self, link_id: LinkId) -> Option<&Link> {
        self.links
            .values()
            .flat_map(|list| list.iter())
            .find(|l| l.id == link_id)
    }

    /// Get all links, each once, in first-seen order
    pub fn links(&self) -> Vec<&Link> {
        let mut seen = IndexSet::new();
        self.links
            .values()
            .flat_map(|list| list.iter())
            .filter(|l| seen.insert(l.id))
            .collect()
    }

    /// Links touching a node, in the order they were added
    pub fn links_for_node(&self, node_id: NodeId) -> &[Link] {
        self.links.get(&node_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links().len()
    }

    /// Describe every broken structural invariant. Empty when consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut occupancy: HashMap<_, usize> = HashMap::new();

        for (owner, list) in &self.links {
            if !self.nodes.contains_key(owner) {
                violations.push(format!("adjacency list for unregistered node {owner}"));
            }
            for link in list {
                for end in [link.output, link.input] {
                    if !self.nodes.contains_key(&end.node) {
                        violations.push(format!("link {} names unregistered node {}", link.id, end.node));
                    }
                }
                if !link.involves_node(*owner) {
                    violations.push(format!("link {} listed under unrelated node {owner}", link.id));
                }
                let expected = if link.output.node == link.input.node { 2 } else { 1 };
                let listed = list.iter().filter(|l| l.id == link.id).count();
                if listed != expected {
                    violations.push(format!("link {} listed {listed} times under {owner}", link.id));
                }
            }
        }

        for link in self.links() {
            for node in [link.output.node, link.input.node] {
                if !self.links_for_node(node).iter().any(|l| l.id == link.id) {
                    violations.push(format!("link {} missing from node {node}", link.id));
                }
            }
            *occupancy.entry(link.output.pin).or_default() += 1;
            *occupancy.entry(link.input.pin).or_default() += 1;
        }

        for node in self.nodes.values() {
            let list = self.links_for_node(node.id());
            for pin in node.pins() {
                let naming: Vec<_> = list.iter().filter(|l| l.involves_pin(pin.id())).collect();
                match pin.connection() {
                    Some(link_id) if !naming.iter().any(|l| l.id == link_id) => {
                        violations.push(format!("pin {} points at foreign link {link_id}", pin.id()));
                    }
                    None if !naming.is_empty() => {
                        violations.push(format!("pin {} is linked but has no connection", pin.id()));
                    }
                    _ => {}
                }
                if occupancy.get(&pin.id()).copied().unwrap_or(0) > 1 {
                    violations.push(format!("pin {} is occupied by several links", pin.id()));
                }
            }
        }

        violations
    }

    /// Validate that `link` may be stored, treating `freed`'s pins as available
    fn check_endpoints(&self, link: &Link, freed: Option<LinkId>) -> Result<()> {
        for (end, direction) in [(link.output, PinDirection::Output), (link.input, PinDirection::Input)] {
            let node = self
                .nodes
                .get(&end.node)
                .ok_or_else(|| GraphError::unknown_node(end.node))?;
            let pin = node.pin(end.pin).ok_or_else(|| GraphError::unknown_pin(end.pin))?;
            if pin.direction() != direction {
                return Err(GraphError::InvalidEndpoint { pin: end.pin, expected: direction });
            }
            if let Some(current) = pin.connection() {
                if Some(current) != freed {
                    return Err(GraphError::PinOccupied { pin: end.pin, link: current });
                }
            }
        }
        Ok(())
    }

    fn attach(&mut self, link: Link) {
        for node_id in [link.output.node, link.input.node] {
            if let Some(list) = self.links.get_mut(&node_id) {
                list.push(link);
            }
        }
        self.set_connection(link.output, Some(link.id));
        self.set_connection(link.input, Some(link.id));
    }

    /// Drop `link` from both adjacency lists and free its pins, without notifying
    fn detach(&mut self, link: &Link) {
        // Source and sink lists are filtered independently.
        for node_id in [link.output.node, link.input.node] {
            if let Some(list) = self.links.get_mut(&node_id) {
                list.retain(|l| l.id != link.id);
            }
        }
        for end in [link.output, link.input] {
            if self.pin(end).and_then(Pin::connection) == Some(link.id) {
                self.set_connection(end, None);
            }
        }
    }

    fn set_connection(&mut self, address: PinAddress, link: Option<LinkId>) {
        if let Some(pin) = self
            .nodes
            .get_mut(&address.node)
            .and_then(|node| node.pin_mut(address.pin))
        {
            pin.set_connection(link);
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
