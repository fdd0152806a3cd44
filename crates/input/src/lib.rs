//! # input
//!
//! Translates host input into editor requests:
//! - key presses into editor key strings ([`encode_key`])
//! - primary-button pointer activity and vertical wheel scrolls into `mouse`
//! - viewport changes into `resize`, once per change ([`ResizeTracker`])
//!
//! Measuring which cell a pointer is over is left to the host.

mod keys;
mod pointer;
mod resize;

pub use keys::{Modifiers, encode_key, key_request, named_key};
pub use pointer::{PointerPhase, pointer_request, wheel_request};
pub use resize::ResizeTracker;
