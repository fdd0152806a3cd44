//! Generated style classes backed by one shared sheet.

mod cache;
mod normalize;

pub use crate::cache::{ClassCache, DEFAULT_PREFIX};
pub use crate::normalize::normalize;
