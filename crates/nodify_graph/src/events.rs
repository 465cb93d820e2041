// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications emitted by the graph registry.
//!
//! Renderers subscribe per event kind and keep the returned
//! [`Subscription`] alive for as long as they want to be called.

use crate::connection::Link;
use crate::node::Node;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Kind of a graph change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphEventKind {
    /// A node was added
    AddNode,
    /// A node was removed
    DelNode,
    /// A link was added
    AddLink,
    /// A link was removed
    DelLink,
    /// A link was replaced by another in one step
    Relink,
}

/// A graph change, borrowing the affected entity
#[derive(Debug, Clone, Copy)]
pub enum GraphEvent<'a> {
    /// A node was added
    AddNode(&'a Node),
    /// A node was removed
    DelNode(&'a Node),
    /// A link was added
    AddLink(&'a Link),
    /// A link was removed
    DelLink(&'a Link),
    /// A link was replaced
    Relink {
        /// The link that no longer exists
        old: &'a Link,
        /// The link that took its place
        new: &'a Link,
    },
}

impl GraphEvent<'_> {
    /// Kind of this event
    pub fn kind(&self) -> GraphEventKind {
        match self {
            Self::AddNode(_) => GraphEventKind::AddNode,
            Self::DelNode(_) => GraphEventKind::DelNode,
            Self::AddLink(_) => GraphEventKind::AddLink,
            Self::DelLink(_) => GraphEventKind::DelLink,
            Self::Relink { .. } => GraphEventKind::Relink,
        }
    }
}

type Handler = Rc<dyn Fn(&GraphEvent<'_>)>;

#[derive(Clone)]
struct Listener {
    id: u64,
    kind: GraphEventKind,
    handler: Handler,
}

/// Publish/subscribe hub for graph events
#[derive(Default)]
pub struct EventBus {
    listeners: Rc<RefCell<Vec<Listener>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    /// Create a new bus without listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`
    pub fn subscribe<F>(&self, kind: GraphEventKind, handler: F) -> Subscription
    where
        F: Fn(&GraphEvent<'_>) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            kind,
            handler: Rc::new(handler),
        });
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Deliver `event` to every listener of its kind, in subscription order
    pub(crate) fn emit(&self, event: &GraphEvent<'_>) {
        let kind = event.kind();
        // Snapshot so handlers may drop subscriptions while being called.
        let handlers: Vec<Handler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of listeners for `kind`
    pub fn listener_count(&self, kind: GraphEventKind) -> usize {
        self.listeners.borrow().iter().filter(|l| l.kind == kind).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

/// Handle keeping a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Vec<Listener>>>,
}

impl Subscription {
    /// Remove the listener now
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|l| l.id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
