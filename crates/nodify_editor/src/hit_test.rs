// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer hit testing against sockets.

use crate::geometry::SocketGeometry;
use egui::Pos2;
use nodify_graph::{Graph, PinAddress};

/// Find the socket under `pos`.
///
/// Nodes added later are drawn on top, so they are tested first. Within a
/// node the last pin in display order is on top. A point on a socket's
/// boundary counts as inside.
pub fn find_socket_at<G>(graph: &Graph, geometry: &G, pos: Pos2) -> Option<PinAddress>
where
    G: SocketGeometry + ?Sized,
{
    let nodes: Vec<_> = graph.nodes().collect();
    nodes.into_iter().rev().find_map(|node| {
        node.pins()
            .filter(|pin| geometry.socket_rect(pin).is_some_and(|rect| rect.contains(pos)))
            .last()
            .map(|pin| PinAddress::new(node.id(), pin.id()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SocketGeometryCache;
    use egui::{Rect, Vec2};
    use nodify_graph::{Node, Pin, PinBinding, PinKind, PinValue};

    fn node_with_output() -> Node {
        let mut node = Node::new();
        node.add_output(Pin::output(PinKind::Boolean, PinBinding::Value(PinValue::Bool(true))))
            .unwrap();
        node
    }

    #[test]
    fn test_find_socket() {
        let node = node_with_output();
        let mut graph = Graph::default();
        graph.add_node(node.clone()).unwrap();
        let mut geometry = SocketGeometryCache::new();
        let pin = node.outputs()[0].id();
        geometry.insert(pin, Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::splat(10.0)));

        assert_eq!(
            find_socket_at(&graph, &geometry, Pos2::new(15.0, 15.0)),
            Some(PinAddress::new(node.id(), pin))
        );
        assert_eq!(
            find_socket_at(&graph, &geometry, Pos2::new(20.0, 20.0)),
            Some(PinAddress::new(node.id(), pin))
        );
        assert!(find_socket_at(&graph, &geometry, Pos2::new(25.0, 15.0)).is_none());
    }

    #[test]
    fn test_topmost_node_wins() {
        let below = node_with_output();
        let above = node_with_output();
        let mut graph = Graph::default();
        graph.add_node(below.clone()).unwrap();
        graph.add_node(above.clone()).unwrap();

        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0));
        let mut geometry = SocketGeometryCache::new();
        geometry.insert(below.outputs()[0].id(), rect);
        geometry.insert(above.outputs()[0].id(), rect);

        let hit = find_socket_at(&graph, &geometry, Pos2::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.node, above.id());
    }

    #[test]
    fn test_last_overlapping_pin_wins() {
        let mut node = node_with_output();
        let second = node
            .add_output(Pin::output(PinKind::Boolean, PinBinding::Value(PinValue::Bool(false))))
            .unwrap();
        let mut graph = Graph::default();
        graph.add_node(node.clone()).unwrap();

        let mut geometry = SocketGeometryCache::new();
        geometry.insert(node.outputs()[0].id(), Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0)));
        geometry.insert(second, Rect::from_min_size(Pos2::new(5.0, 5.0), Vec2::splat(10.0)));

        let hit = find_socket_at(&graph, &geometry, Pos2::new(7.0, 7.0)).unwrap();
        assert_eq!(hit, PinAddress::new(node.id(), second));
        let hit = find_socket_at(&graph, &geometry, Pos2::new(2.0, 2.0)).unwrap();
        assert_eq!(hit.pin, node.outputs()[0].id());
    }
}
