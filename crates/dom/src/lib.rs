//! Retained host tree and its reconciler.
//!
//! Application code builds a fresh [`Descriptor`] tree every pass with
//! [`tag`] (or the `div!`/`pre!`/`span!`/`el!` macros) and applies it to the
//! previous pass's node. The reconciler performs the minimal set of
//! mutations on the [`Document`] arena and returns the same [`NodeId`] when a
//! node could be kept.

pub mod builder;
pub mod document;
pub mod event;
pub mod schedule;
pub mod stats;
pub mod thunk;

mod error;
mod reconcile;
mod serialize;

pub use crate::builder::{
    Attr, Child, Descriptor, Element, ForeignRef, Handler, attr, click, cls, id, mousedown,
    mousemove, mouseover, mouseup, mousewheel, on, style, tag, try_tag,
};
pub use crate::document::{Document, NodeId};
pub use crate::error::BuildError;
pub use crate::event::{Callback, Event, MouseState};
pub use crate::schedule::RedrawScheduler;
pub use crate::stats::MutationStats;
pub use crate::thunk::{Thunk, thunk};
