// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph model for the Nodify editor.
//!
//! This crate holds the consistency core of a visual node-graph editor:
//! - Typed input/output pins whose values are stored, referenced or `this`
//! - Nodes owning their pins
//! - Links from output pins to input pins
//! - A registry keeping nodes, per-node link adjacency and pin occupancy consistent
//! - Change notifications for renderers
//! - The rules deciding whether two pins may be linked
//!
//! ## Architecture
//!
//! [`Graph`] is the only place topology changes. Everything else either
//! builds entities ([`Node`], [`Pin`], [`EntityFactory`]) or answers
//! questions about them ([`can_connect`]).

pub mod value;
pub mod pin;
pub mod node;
pub mod connection;
pub mod events;
pub mod factory;
pub mod graph;
pub mod error;

pub use value::{ObjectRef, PinBinding, PinValue, ValueAccess};
pub use pin::{Pin, PinDirection, PinId, PinKind, VisualHandle};
pub use node::{Node, NodeId};
pub use connection::{can_connect, explain, Link, LinkId, PinAddress, Rejection};
pub use events::{EventBus, GraphEvent, GraphEventKind, Subscription};
pub use factory::{Entity, EntityFactory, FactoryArgs, OBJECT_NODE};
pub use graph::Graph;
pub use error::{EntityKind, GraphError, Result};
