// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket interaction: turning pointer events on sockets into links.
//!
//! A session starts with a pointer-down on a socket and ends with the next
//! pointer-up. Dragging from a free pin creates a link; dragging from a
//! connected pin grabs that end of its link and either moves it to another
//! pin or, if dropped elsewhere, deletes the link. The link being dragged is
//! only a [`LinkPreview`] until the pointer is released.

use crate::config::{InteractionConfig, OccupiedTarget, RewireNotification};
use crate::error::Result;
use crate::geometry::SocketGeometry;
use crate::path::CubicBezier;
use egui::Pos2;
use nodify_graph::{explain, Graph, Link, LinkId, PinAddress, PinDirection};

/// Pointer event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Button pressed
    Down,
    /// Pointer moved
    Move,
    /// Button released
    Up,
}

/// A pointer event with the socket under the pointer, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Event phase
    pub kind: PointerKind,
    /// Canvas position
    pub position: Pos2,
    /// Socket under the pointer
    pub target: Option<PinAddress>,
}

impl PointerEvent {
    /// Event over empty canvas
    pub fn new(kind: PointerKind, position: Pos2) -> Self {
        Self {
            kind,
            position,
            target: None,
        }
    }

    /// Set the socket under the pointer
    pub fn with_target(mut self, target: impl Into<Option<PinAddress>>) -> Self {
        self.target = target.into();
        self
    }
}

/// The link drawn while dragging.
///
/// Exactly one end is bound to a pin during a drag. The other end floats
/// at the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkPreview {
    /// Output end, if bound
    pub output: Option<PinAddress>,
    /// Input end, if bound
    pub input: Option<PinAddress>,
    /// Output end position
    pub output_pos: Pos2,
    /// Input end position
    pub input_pos: Pos2,
}

impl LinkPreview {
    /// Zero-length preview bound to `pin` on its `direction` side
    pub fn new(pin: PinAddress, direction: PinDirection, pos: Pos2) -> Self {
        let (output, input) = match direction {
            PinDirection::Output => (Some(pin), None),
            PinDirection::Input => (None, Some(pin)),
        };
        Self {
            output,
            input,
            output_pos: pos,
            input_pos: pos,
        }
    }

    /// Side following the pointer
    pub fn floating(&self) -> PinDirection {
        if self.output.is_none() {
            PinDirection::Output
        } else {
            PinDirection::Input
        }
    }

    /// The bound end
    pub fn anchored(&self) -> Option<PinAddress> {
        match self.floating() {
            PinDirection::Output => self.input,
            PinDirection::Input => self.output,
        }
    }

    /// Move the floating end
    pub fn set_floating_pos(&mut self, pos: Pos2) {
        match self.floating() {
            PinDirection::Output => self.output_pos = pos,
            PinDirection::Input => self.input_pos = pos,
        }
    }

    /// Position of the floating end
    pub fn floating_pos(&self) -> Pos2 {
        match self.floating() {
            PinDirection::Output => self.output_pos,
            PinDirection::Input => self.input_pos,
        }
    }

    /// Curve to draw
    pub fn curve(&self) -> CubicBezier {
        CubicBezier::link(self.output_pos, self.input_pos)
    }
}

/// An ongoing drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pin the drag started on
    pub grabbed: PinAddress,
    /// Link being rewired, `None` when creating
    pub link: Option<LinkId>,
    /// Transient link
    pub preview: LinkPreview,
}

/// Socket interaction state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SocketInteraction {
    /// No session
    #[default]
    Idle,
    /// Pointer down on a socket, not moved yet
    Pressed {
        /// Pin under the pointer-down
        grabbed: PinAddress,
        /// Socket center at the pointer-down
        origin: Pos2,
    },
    /// Creating a link from a free output pin
    CreatingFromOutput(DragSession),
    /// Creating a link from a free input pin
    CreatingFromInput(DragSession),
    /// Moving the output end of an existing link
    RewiringOutputEnd(DragSession),
    /// Moving the input end of an existing link
    RewiringInputEnd(DragSession),
}

impl SocketInteraction {
    /// The drag in progress, if any
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::CreatingFromOutput(s)
            | Self::CreatingFromInput(s)
            | Self::RewiringOutputEnd(s)
            | Self::RewiringInputEnd(s) => Some(s),
            Self::Idle | Self::Pressed { .. } => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::CreatingFromOutput(s)
            | Self::CreatingFromInput(s)
            | Self::RewiringOutputEnd(s)
            | Self::RewiringInputEnd(s) => Some(s),
            Self::Idle | Self::Pressed { .. } => None,
        }
    }
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketOutcome {
    /// Event had no effect
    Ignored,
    /// A session started on this pin
    Pressed(PinAddress),
    /// The preview moved
    Dragging,
    /// Released without moving
    Clicked(PinAddress),
    /// A new link was added
    Connected(LinkId),
    /// A link was moved to another pin
    Relinked {
        /// Removed link
        old: LinkId,
        /// Link that replaced it
        new: LinkId,
    },
    /// A grabbed link was dropped back on its own pin
    Unchanged(LinkId),
    /// A new link was dropped on no valid target
    Discarded,
    /// A grabbed link was dropped on no valid target and deleted
    Disconnected(LinkId),
}

/// Drives the socket state machine against a graph
#[derive(Debug, Clone, Default)]
pub struct SocketController {
    state: SocketInteraction,
    occupied_target: OccupiedTarget,
    rewire_notification: RewireNotification,
}

impl SocketController {
    /// Create an idle controller
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            state: SocketInteraction::Idle,
            occupied_target: config.occupied_target,
            rewire_notification: config.rewire_notification,
        }
    }

    /// Adopt new settings; a session in progress keeps running
    pub fn configure(&mut self, config: &InteractionConfig) {
        self.occupied_target = config.occupied_target;
        self.rewire_notification = config.rewire_notification;
    }

    /// Current state
    pub fn state(&self) -> &SocketInteraction {
        &self.state
    }

    /// Whether no session is running
    pub fn is_idle(&self) -> bool {
        self.state == SocketInteraction::Idle
    }

    /// Link to draw for the drag in progress
    pub fn preview(&self) -> Option<&LinkPreview> {
        self.state.session().map(|s| &s.preview)
    }

    /// Feed one pointer event
    pub fn handle<G>(&mut self, graph: &mut Graph, geometry: &G, event: &PointerEvent) -> Result<SocketOutcome>
    where
        G: SocketGeometry + ?Sized,
    {
        match event.kind {
            PointerKind::Down => Ok(self.pointer_down(graph, geometry, event)),
            PointerKind::Move => Ok(self.pointer_move(graph, geometry, event)),
            PointerKind::Up => self.pointer_up(graph, event),
        }
    }

    fn pointer_down<G>(&mut self, graph: &Graph, geometry: &G, event: &PointerEvent) -> SocketOutcome
    where
        G: SocketGeometry + ?Sized,
    {
        if !self.is_idle() {
            tracing::debug!("Ignoring pointer down during {:?}", self.state);
            return SocketOutcome::Ignored;
        }
        let Some(grabbed) = event.target else {
            return SocketOutcome::Ignored;
        };
        let Some(pin) = graph.pin(grabbed) else {
            tracing::warn!("Pointer down on unknown pin {}", grabbed.pin);
            return SocketOutcome::Ignored;
        };

        let origin = geometry.socket_center(pin).unwrap_or(event.position);
        self.state = SocketInteraction::Pressed { grabbed, origin };
        tracing::trace!("Pressed pin {}", grabbed.pin);
        SocketOutcome::Pressed(grabbed)
    }

    fn pointer_move<G>(&mut self, graph: &Graph, geometry: &G, event: &PointerEvent) -> SocketOutcome
    where
        G: SocketGeometry + ?Sized,
    {
        if let SocketInteraction::Pressed { grabbed, origin } = self.state {
            match begin_drag(graph, geometry, grabbed, origin) {
                Some(state) => {
                    tracing::debug!("Started drag from pin {}: {:?}", grabbed.pin, state);
                    self.state = state;
                }
                None => {
                    tracing::debug!("Grabbed pin {} vanished before the drag", grabbed.pin);
                    self.state = SocketInteraction::Idle;
                    return SocketOutcome::Discarded;
                }
            }
        }

        let pos = snap(graph, geometry, event);
        match self.state.session_mut() {
            Some(session) => {
                session.preview.set_floating_pos(pos);
                SocketOutcome::Dragging
            }
            None => SocketOutcome::Ignored,
        }
    }

    fn pointer_up(&mut self, graph: &mut Graph, event: &PointerEvent) -> Result<SocketOutcome> {
        match std::mem::take(&mut self.state) {
            SocketInteraction::Idle => Ok(SocketOutcome::Ignored),
            SocketInteraction::Pressed { grabbed, .. } => Ok(SocketOutcome::Clicked(grabbed)),
            SocketInteraction::CreatingFromOutput(session) | SocketInteraction::CreatingFromInput(session) => {
                self.finish_create(graph, &session, event.target)
            }
            SocketInteraction::RewiringOutputEnd(session) | SocketInteraction::RewiringInputEnd(session) => {
                self.finish_rewire(graph, &session, event.target)
            }
        }
    }

    fn finish_create(
        &self,
        graph: &mut Graph,
        session: &DragSession,
        target: Option<PinAddress>,
    ) -> Result<SocketOutcome> {
        let Some(grabbed) = graph.pin(session.grabbed) else {
            return Ok(SocketOutcome::Discarded);
        };
        let Some(target_pin) = target.and_then(|t| graph.pin(t)) else {
            tracing::debug!("Dropped new link on no pin");
            return Ok(SocketOutcome::Discarded);
        };
        if let Some(reason) = explain(grabbed, target_pin) {
            tracing::debug!("Rejected new link: {}", reason);
            return Ok(SocketOutcome::Discarded);
        }
        let Some(link) = Link::between(grabbed, target_pin) else {
            return Ok(SocketOutcome::Discarded);
        };
        if grabbed.is_connected() {
            return Ok(SocketOutcome::Discarded);
        }

        if let Some(existing) = target_pin.connection() {
            match self.occupied_target {
                OccupiedTarget::Reject => {
                    tracing::debug!("Rejected new link: target pin is connected");
                    return Ok(SocketOutcome::Discarded);
                }
                OccupiedTarget::Replace => {
                    graph.del_link(existing)?;
                }
            }
        }

        let id = graph.add_link(link)?;
        Ok(SocketOutcome::Connected(id))
    }

    fn finish_rewire(
        &self,
        graph: &mut Graph,
        session: &DragSession,
        target: Option<PinAddress>,
    ) -> Result<SocketOutcome> {
        let Some(link_id) = session.link.filter(|&id| graph.link(id).is_some()) else {
            return Ok(SocketOutcome::Discarded);
        };
        if target == Some(session.grabbed) {
            return Ok(SocketOutcome::Unchanged(link_id));
        }

        let Some((output, input, occupant)) = self.rewire_plan(graph, session, link_id, target) else {
            graph.del_link(link_id)?;
            tracing::debug!("Disconnected link {}", link_id);
            return Ok(SocketOutcome::Disconnected(link_id));
        };

        if let Some(existing) = occupant {
            graph.del_link(existing)?;
        }
        let new = match self.rewire_notification {
            RewireNotification::Relink => graph.relink(link_id, output, input)?.id,
            RewireNotification::DeleteThenAdd => {
                let old = graph.del_link(link_id)?;
                graph.add_link(Link { visual: old.visual, ..Link::new(output, input) })?
            }
        };
        Ok(SocketOutcome::Relinked { old: link_id, new })
    }

    /// Endpoints of the rewired link and the link to evict from the target
    fn rewire_plan(
        &self,
        graph: &Graph,
        session: &DragSession,
        link_id: LinkId,
        target: Option<PinAddress>,
    ) -> Option<(PinAddress, PinAddress, Option<LinkId>)> {
        let anchored = graph.pin(session.preview.anchored()?)?;
        let target_pin = graph.pin(target?)?;
        if let Some(reason) = explain(anchored, target_pin) {
            tracing::debug!("Rejected rewire: {}", reason);
            return None;
        }
        let link = Link::between(anchored, target_pin)?;

        let occupant = target_pin.connection().filter(|&id| id != link_id);
        if occupant.is_some() && self.occupied_target == OccupiedTarget::Reject {
            tracing::debug!("Rejected rewire: target pin is connected");
            return None;
        }
        Some((link.output, link.input, occupant))
    }
}

/// State entered on the first move after pressing `grabbed`
fn begin_drag<G>(graph: &Graph, geometry: &G, grabbed: PinAddress, origin: Pos2) -> Option<SocketInteraction>
where
    G: SocketGeometry + ?Sized,
{
    let pin = graph.pin(grabbed)?;
    let direction = pin.direction();

    let Some(link_id) = pin.connection() else {
        let session = DragSession {
            grabbed,
            link: None,
            preview: LinkPreview::new(grabbed, direction, origin),
        };
        return Some(match direction {
            PinDirection::Output => SocketInteraction::CreatingFromOutput(session),
            PinDirection::Input => SocketInteraction::CreatingFromInput(session),
        });
    };

    let link = graph.link(link_id)?;
    let center = |end: PinAddress| {
        graph
            .pin(end)
            .and_then(|p| geometry.socket_center(p))
            .unwrap_or(origin)
    };
    let mut preview = LinkPreview {
        output: Some(link.output),
        input: Some(link.input),
        output_pos: center(link.output),
        input_pos: center(link.input),
    };
    match direction {
        PinDirection::Output => preview.output = None,
        PinDirection::Input => preview.input = None,
    }
    let session = DragSession {
        grabbed,
        link: Some(link_id),
        preview,
    };
    Some(match direction {
        PinDirection::Output => SocketInteraction::RewiringOutputEnd(session),
        PinDirection::Input => SocketInteraction::RewiringInputEnd(session),
    })
}

/// Pointer position, or the center of the socket it hovers
fn snap<G>(graph: &Graph, geometry: &G, event: &PointerEvent) -> Pos2
where
    G: SocketGeometry + ?Sized,
{
    event
        .target
        .and_then(|t| graph.pin(t))
        .and_then(|pin| geometry.socket_center(pin))
        .unwrap_or(event.position)
}
