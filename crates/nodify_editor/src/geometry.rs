// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket geometry as supplied by the renderer.

use egui::{Pos2, Rect, Vec2};
use indexmap::IndexMap;
use nodify_graph::{Graph, Pin, PinId};

/// Source of on-screen socket rectangles
pub trait SocketGeometry {
    /// Bounding rectangle of a pin's socket, if it is currently laid out
    fn socket_rect(&self, pin: &Pin) -> Option<Rect>;

    /// Center of a pin's socket
    fn socket_center(&self, pin: &Pin) -> Option<Pos2> {
        self.socket_rect(pin).map(|rect| rect.center())
    }
}

/// Socket rectangles keyed by pin
#[derive(Debug, Clone, Default)]
pub struct SocketGeometryCache {
    rects: IndexMap<PinId, Rect>,
}

impl SocketGeometryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the socket rectangle of a pin
    pub fn insert(&mut self, pin: PinId, rect: Rect) {
        self.rects.insert(pin, rect);
    }

    /// Forget a pin's socket
    pub fn remove(&mut self, pin: PinId) -> Option<Rect> {
        self.rects.shift_remove(&pin)
    }

    /// Forget every socket
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Number of laid out sockets
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether no socket is laid out
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl SocketGeometry for SocketGeometryCache {
    fn socket_rect(&self, pin: &Pin) -> Option<Rect> {
        self.rects.get(&pin.id()).copied()
    }
}

/// Fixed node layout: inputs on the left edge, outputs on the right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    /// Node width
    pub node_width: f32,
    /// Height of the title bar
    pub header_height: f32,
    /// Height of one pin row
    pub row_height: f32,
    /// Side length of a socket square
    pub socket_size: f32,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            header_height: 24.0,
            row_height: 20.0,
            socket_size: 12.0,
        }
    }
}

impl NodeLayout {
    /// Lay out every socket in the graph from node positions
    pub fn layout(&self, graph: &Graph) -> SocketGeometryCache {
        let mut cache = SocketGeometryCache::new();
        let size = Vec2::splat(self.socket_size);
        for node in graph.nodes() {
            let [x, y] = node.position;
            for (edge, pins) in [(x, node.inputs()), (x + self.node_width, node.outputs())] {
                for (i, pin) in pins.iter().enumerate() {
                    let center_y = y + self.header_height + i as f32 * self.row_height + self.row_height / 2.0;
                    cache.insert(pin.id(), Rect::from_center_size(Pos2::new(edge, center_y), size));
                }
            }
        }
        cache
    }
}
