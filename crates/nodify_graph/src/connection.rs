// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions and the rules deciding whether two pins may be linked.

use crate::node::NodeId;
use crate::pin::{Pin, PinDirection, PinId, VisualHandle};
use crate::value::ValueAccess;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Create a new random link ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A pin addressed through its owning node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinAddress {
    /// Owning node
    pub node: NodeId,
    /// Pin on that node
    pub pin: PinId,
}

impl PinAddress {
    /// Create a new pin address
    pub fn new(node: NodeId, pin: PinId) -> Self {
        Self { node, pin }
    }

    /// Address of an attached pin
    pub fn of(pin: &Pin) -> Option<Self> {
        pin.owner().map(|node| Self::new(node, pin.id()))
    }
}

/// A link from an output pin to an input pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Unique link ID
    pub id: LinkId,
    /// Output (source) endpoint
    pub output: PinAddress,
    /// Input (sink) endpoint
    pub input: PinAddress,
    /// Presentation handle assigned by the renderer
    pub visual: Option<VisualHandle>,
}

impl Link {
    /// Create a new link
    pub fn new(output: PinAddress, input: PinAddress) -> Self {
        Self {
            id: LinkId::new(),
            output,
            input,
            visual: None,
        }
    }

    /// Create a link between two pins in either order, output first.
    ///
    /// Returns `None` unless exactly one pin is an output and both are attached.
    pub fn between(a: &Pin, b: &Pin) -> Option<Self> {
        let (output, input) = match (a.direction(), b.direction()) {
            (PinDirection::Output, PinDirection::Input) => (a, b),
            (PinDirection::Input, PinDirection::Output) => (b, a),
            _ => return None,
        };
        Some(Self::new(PinAddress::of(output)?, PinAddress::of(input)?))
    }

    /// Endpoint on the given side
    pub fn endpoint(&self, direction: PinDirection) -> PinAddress {
        match direction {
            PinDirection::Output => self.output,
            PinDirection::Input => self.input,
        }
    }

    /// Check if this link involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.output.node == node_id || self.input.node == node_id
    }

    /// Check if this link involves a specific pin
    pub fn involves_pin(&self, pin_id: PinId) -> bool {
        self.output.pin == pin_id || self.input.pin == pin_id
    }

    /// The endpoint opposite to `pin_id`, if `pin_id` is an endpoint
    pub fn other_end(&self, pin_id: PinId) -> Option<PinAddress> {
        if self.output.pin == pin_id {
            Some(self.input)
        } else if self.input.pin == pin_id {
            Some(self.output)
        } else {
            None
        }
    }
}

/// Why two pins may not be linked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Both pins are inputs or both are outputs
    SameDirection,
    /// Both pins belong to the same node
    SameNode,
    /// Type tags differ and no `this` bridge applies
    IncompatibleTypes,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameDirection => f.write_str("pins have the same direction"),
            Self::SameNode => f.write_str("pins belong to the same node"),
            Self::IncompatibleTypes => f.write_str("pin types are incompatible"),
        }
    }
}

/// Check whether a link between `a` and `b` is legal
pub fn can_connect(a: &Pin, b: &Pin) -> bool {
    explain(a, b).is_none()
}

/// The first rule a link between `a` and `b` would break, if any
pub fn explain(a: &Pin, b: &Pin) -> Option<Rejection> {
    if a.direction() == b.direction() {
        return Some(Rejection::SameDirection);
    }

    // Unattached pins have no node to compare and are never linkable.
    match (a.owner(), b.owner()) {
        (Some(node_a), Some(node_b)) if node_a != node_b => {}
        _ => return Some(Rejection::SameNode),
    }

    if a.type_tag() == b.type_tag() || bridges_this(a, b) {
        None
    } else {
        Some(Rejection::IncompatibleTypes)
    }
}

/// A `this` pin may link to any pin exposing the very same object
fn bridges_this(a: &Pin, b: &Pin) -> bool {
    let either_this =
        a.value_access() == ValueAccess::This || b.value_access() == ValueAccess::This;
    either_this && a.value().is_same_reference(&b.value())
}
