// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph model.

use crate::error::{GraphError, Result};
use crate::pin::{Pin, PinDirection, PinId, PinKind, VisualHandle};
use crate::value::PinValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A node in the graph.
///
/// A node owns its pins. Pin order is display order and the pin lists are
/// fixed once the node is handed to a [`Graph`](crate::Graph).
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
    /// Display label
    pub label: String,
    /// Position on the canvas
    pub position: [f32; 2],
    /// Presentation handle assigned by the renderer
    pub visual: Option<VisualHandle>,
}

impl Node {
    /// Create a new node without pins. The label defaults to the node ID.
    pub fn new() -> Self {
        let id = NodeId::new();
        Self {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
            label: id.to_string(),
            position: [0.0, 0.0],
            visual: None,
        }
    }

    /// Create a node exposing the object `object`.
    ///
    /// The node gets one `this` input bound to the object and one output per
    /// field, in field order, reading the field by reference.
    pub fn for_object(label: impl Into<String>, object: &PinValue) -> Result<Self> {
        let Some(fields) = object.as_object() else {
            return Err(GraphError::InvalidPinDeclaration(
                "object node needs an object value".to_string(),
            ));
        };

        let mut node = Self::new().with_label(label);
        node.add_input(Pin::this(object)?)?;

        for (field, value) in fields.fields() {
            let kind = PinKind::for_value(&value)
                .ok_or_else(|| GraphError::UnsupportedFieldValue(field.clone()))?;
            node.add_output(Pin::by_reference(PinDirection::Output, kind, object, field)?)?;
        }

        Ok(node)
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Append an input pin, taking ownership of it
    pub fn add_input(&mut self, pin: Pin) -> Result<PinId> {
        self.attach(pin, PinDirection::Input)
    }

    /// Append an output pin, taking ownership of it
    pub fn add_output(&mut self, pin: Pin) -> Result<PinId> {
        self.attach(pin, PinDirection::Output)
    }

    fn attach(&mut self, mut pin: Pin, direction: PinDirection) -> Result<PinId> {
        if pin.direction() != direction {
            return Err(GraphError::InvalidEndpoint { pin: pin.id(), expected: direction });
        }
        if pin.owner().is_some() || self.pin(pin.id()).is_some() {
            return Err(GraphError::InvalidPinDeclaration(format!(
                "pin {} already belongs to a node",
                pin.id()
            )));
        }

        pin.set_owner(self.id);
        let id = pin.id();
        match direction {
            PinDirection::Input => self.inputs.push(pin),
            PinDirection::Output => self.outputs.push(pin),
        }
        Ok(id)
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Input pins in display order
    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    /// Output pins in display order
    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    /// Get an input pin by index
    pub fn input(&self, index: usize) -> Option<&Pin> {
        self.inputs.get(index)
    }

    /// Get an output pin by index
    pub fn output(&self, index: usize) -> Option<&Pin> {
        self.outputs.get(index)
    }

    /// Get a pin by ID, searching outputs first
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.outputs.iter().find(|p| p.id() == pin_id)
            .or_else(|| self.inputs.iter().find(|p| p.id() == pin_id))
    }

    pub(crate) fn pin_mut(&mut self, pin_id: PinId) -> Option<&mut Pin> {
        self.outputs.iter_mut().find(|p| p.id() == pin_id)
            .or_else(|| self.inputs.iter_mut().find(|p| p.id() == pin_id))
    }

    /// Get all pins, inputs first
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub(crate) fn clear_connections(&mut self) {
        for pin in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            pin.set_connection(None);
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
