//! Editor viewer: screen state, theme, descriptor mapping and the session
//! that ties them to the host tree.

pub mod config;
pub mod outbox;
pub mod render;
pub mod session;
pub mod state;
pub mod theme;

pub use config::{ConfigError, ViewerConfig};
pub use outbox::Outbox;
pub use render::{Layout, Painter};
pub use session::Session;
pub use state::ViewerState;
pub use theme::Theme;
