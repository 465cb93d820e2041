// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction layer for the Nodify editor.
//!
//! This crate turns pointer input on sockets into graph changes:
//! - A socket state machine for drag-to-connect and rewiring
//! - Link curves and their flattening
//! - Socket geometry and hit testing
//! - Socket colors by pin type
//! - An editor facade holding the graph and the selection
//!
//! Drawing is left to the host. It supplies socket rectangles through
//! [`SocketGeometry`] and draws [`LinkPreview`] and link curves itself.

pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod hit_test;
pub mod path;
pub mod socket;
pub mod style;

pub use config::{InteractionConfig, OccupiedTarget, RewireNotification};
pub use editor::{GraphEditor, Selection};
pub use error::{ConfigError, EditorError, Result};
pub use geometry::{NodeLayout, SocketGeometry, SocketGeometryCache};
pub use hit_test::find_socket_at;
pub use path::CubicBezier;
pub use socket::{
    DragSession, LinkPreview, PointerEvent, PointerKind, SocketController, SocketInteraction,
    SocketOutcome,
};
pub use style::{PinStyles, FALLBACK_COLOR};
