//! Event dispatch through installed dispatchers.
//!
//! Each element carries at most one dispatcher per event type. The
//! dispatcher reads the node's *current* callback list at dispatch time, so
//! the reconciler can swap callbacks every pass without reinstalling.

use crate::document::{Document, NodeId};
use std::rc::Rc;

pub type Callback = Rc<dyn Fn(&mut Event)>;

/// Pointer details supplied by the host. `column` is the character cell
/// under the pointer, measured by the host against the target node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseState {
    pub buttons: u16,
    pub button: u16,
    pub column: Option<u32>,
    pub delta_x: f64,
    pub delta_y: f64,
}

#[derive(Debug)]
pub struct Event {
    kind: String,
    target: NodeId,
    current_target: NodeId,
    pub mouse: Option<MouseState>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: NodeId::INVALID,
            current_target: NodeId::INVALID,
            mouse: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn with_mouse(mut self, mouse: MouseState) -> Self {
        self.mouse = Some(mouse);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose dispatcher is currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl Document {
    /// Delivers `event` to `target` and bubbles it towards the root.
    ///
    /// Returns false when a callback prevented the default action.
    pub fn dispatch(&self, target: NodeId, event: &mut Event) -> bool {
        event.target = target;
        let mut current = Some(target);
        while let Some(node) = current {
            if let Some(listener) = self.listener(node, event.kind()) {
                let callbacks = Rc::clone(&listener.callbacks);
                event.current_target = node;
                log::trace!(
                    target: "dom.event",
                    "{} on {node:?}: {} callback(s)",
                    event.kind(),
                    callbacks.len()
                );
                for callback in callbacks.iter() {
                    callback(event);
                }
            }
            if event.propagation_stopped {
                break;
            }
            current = self.parent(node);
        }
        !event.default_prevented
    }
}
