// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::connection::LinkId;
use crate::error::Result;
use crate::node::NodeId;
use crate::value::{PinBinding, PinValue, ValueAccess};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque reference to a presentation object owned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Input pin
    Input,
    /// Output pin
    Output,
}

impl PinDirection {
    /// The other direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Kind of a pin, identified by its type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinKind {
    /// The node's backing object itself
    This,
    /// Boolean value
    Boolean,
    /// Numeric value
    Number,
    /// String value
    String,
    /// Object value
    Object,
    /// Externally registered kind
    Custom(String),
}

impl PinKind {
    /// Tag of the reserved `this` kind
    pub const THIS_TAG: &'static str = "this-pin";

    /// Type tag compared by the connection rules
    pub fn tag(&self) -> &str {
        match self {
            Self::This => Self::THIS_TAG,
            Self::Boolean => "boolean-pin",
            Self::Number => "number-pin",
            Self::String => "string-pin",
            Self::Object => "object-pin",
            Self::Custom(tag) => tag,
        }
    }

    /// Kind used to expose a field holding `value`
    pub fn for_value(value: &PinValue) -> Option<Self> {
        match value {
            PinValue::Bool(_) => Some(Self::Boolean),
            PinValue::Number(_) => Some(Self::Number),
            PinValue::String(_) => Some(Self::String),
            PinValue::Object(_) => Some(Self::Object),
            PinValue::Undefined => None,
        }
    }
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A pin on a node
#[derive(Debug, Clone)]
pub struct Pin {
    id: PinId,
    direction: PinDirection,
    kind: PinKind,
    binding: PinBinding,
    owner: Option<NodeId>,
    connection: Option<LinkId>,
    /// Display label
    pub label: String,
    /// Presentation handle assigned by the renderer
    pub visual: Option<VisualHandle>,
}

impl Pin {
    /// Create a new unowned pin. The label defaults to the pin ID.
    pub fn new(direction: PinDirection, kind: PinKind, binding: PinBinding) -> Self {
        let id = PinId::new();
        Self {
            id,
            direction,
            kind,
            binding,
            owner: None,
            connection: None,
            label: id.to_string(),
            visual: None,
        }
    }

    /// Create a new input pin
    pub fn input(kind: PinKind, binding: PinBinding) -> Self {
        Self::new(PinDirection::Input, kind, binding)
    }

    /// Create a new output pin
    pub fn output(kind: PinKind, binding: PinBinding) -> Self {
        Self::new(PinDirection::Output, kind, binding)
    }

    /// Create the `this` input standing for the backing object `target`
    pub fn this(target: &PinValue) -> Result<Self> {
        let binding = PinBinding::this(target)?;
        Ok(Self::input(PinKind::This, binding).with_label("this"))
    }

    /// Create a pin reading `field` of the object `target`, labelled with the field name
    pub fn by_reference(
        direction: PinDirection,
        kind: PinKind,
        target: &PinValue,
        field: impl Into<String>,
    ) -> Result<Self> {
        let field = field.into();
        let binding = PinBinding::by_reference(target, field.clone())?;
        Ok(Self::new(direction, kind, binding).with_label(field))
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Pin ID
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Pin direction
    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    /// Pin kind
    pub fn kind(&self) -> &PinKind {
        &self.kind
    }

    /// Type tag of the pin kind
    pub fn type_tag(&self) -> &str {
        self.kind.tag()
    }

    /// How the value is reached
    pub fn value_access(&self) -> ValueAccess {
        self.binding.access()
    }

    /// Value binding
    pub fn binding(&self) -> &PinBinding {
        &self.binding
    }

    /// Current value
    pub fn value(&self) -> PinValue {
        self.binding.resolve()
    }

    /// Owning node, once the pin is attached to one
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Link occupying this pin
    pub fn connection(&self) -> Option<LinkId> {
        self.connection
    }

    /// Whether a link occupies this pin
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
    }

    pub(crate) fn set_connection(&mut self, link: Option<LinkId>) {
        self.connection = link;
    }
}
