// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the graph model.
//!
//! Every variant is a caller contract violation. They are raised at the
//! point of detection and never retried.

use crate::connection::LinkId;
use crate::node::NodeId;
use crate::pin::{PinDirection, PinId};
use std::fmt;

/// Kind of entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A node
    Node,
    /// A pin
    Pin,
    /// A link
    Link,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Pin => f.write_str("pin"),
            Self::Link => f.write_str("link"),
        }
    }
}

/// Error raised by the graph registry, the entity factory and pin construction
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An entity with the same id is already registered
    #[error("{kind} {id} already added to graph")]
    DuplicateEntity {
        /// Entity kind
        kind: EntityKind,
        /// Offending id
        id: String,
    },

    /// The entity is not registered (or its owning node is not)
    #[error("{kind} {id} is not part of this graph")]
    UnknownEntity {
        /// Entity kind
        kind: EntityKind,
        /// Missing id
        id: String,
    },

    /// A factory constructed a different entity kind than requested
    #[error("factory '{key}' produced a {found}, expected a {expected}")]
    TypeMismatch {
        /// Factory key
        key: String,
        /// Requested kind
        expected: EntityKind,
        /// Kind actually produced
        found: EntityKind,
    },

    /// A factory with this key is already registered
    #[error("factory with the key '{0}' already exists")]
    DuplicateFactory(String),

    /// No factory is registered under this key
    #[error("unknown factory '{0}'")]
    UnknownFactory(String),

    /// A pin was declared with an access mode its value cannot satisfy
    #[error("invalid pin declaration: {0}")]
    InvalidPinDeclaration(String),

    /// An object field holds a value no pin kind can expose
    #[error("unsupported value for field '{0}'")]
    UnsupportedFieldValue(String),

    /// A link endpoint names a pin with the wrong direction
    #[error("pin {pin} cannot be used as {expected:?} endpoint")]
    InvalidEndpoint {
        /// The pin
        pin: PinId,
        /// Direction the endpoint requires
        expected: PinDirection,
    },

    /// The pin already carries a connection
    #[error("pin {pin} is already connected by link {link}")]
    PinOccupied {
        /// The pin
        pin: PinId,
        /// Link currently occupying it
        link: LinkId,
    },
}

impl GraphError {
    pub(crate) fn unknown_node(id: NodeId) -> Self {
        Self::UnknownEntity { kind: EntityKind::Node, id: id.to_string() }
    }

    pub(crate) fn unknown_pin(id: PinId) -> Self {
        Self::UnknownEntity { kind: EntityKind::Pin, id: id.to_string() }
    }

    pub(crate) fn unknown_link(id: LinkId) -> Self {
        Self::UnknownEntity { kind: EntityKind::Link, id: id.to_string() }
    }

    /// Whether this is an `UnknownEntity` error
    pub fn is_unknown_entity(&self) -> bool {
        matches!(self, Self::UnknownEntity { .. })
    }
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
