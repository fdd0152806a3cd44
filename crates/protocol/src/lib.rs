//! Wire types of the editor's JSON-RPC user interface.

mod error;
mod message;
mod request;
mod types;

pub use crate::error::ProtocolError;
pub use crate::message::{
    Cursor, Draw, DrawStatus, Info, InfoStyle, Menu, MenuStyle, UiMessage, decode_frame,
};
pub use crate::request::{MouseKind, Request};
pub use crate::types::{Atom, Coord, Face, InfoText, Line, line_len, line_text};
