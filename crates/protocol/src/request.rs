use crate::error::ProtocolError;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseKind {
    PressLeft,
    Move,
    ReleaseLeft,
    WheelUp,
    WheelDown,
}

impl MouseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MouseKind::PressLeft => "press_left",
            MouseKind::Move => "move",
            MouseKind::ReleaseLeft => "release_left",
            MouseKind::WheelUp => "wheel_up",
            MouseKind::WheelDown => "wheel_down",
        }
    }
}

/// Outbound JSON-RPC notification to the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Keys(String),
    Mouse {
        kind: MouseKind,
        line: u32,
        column: u32,
    },
    Resize {
        rows: u32,
        cols: u32,
    },
}

#[derive(Serialize)]
struct Wire<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<Value>,
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Request::Keys(_) => "keys",
            Request::Mouse { .. } => "mouse",
            Request::Resize { .. } => "resize",
        }
    }

    fn params(&self) -> Vec<Value> {
        match self {
            Request::Keys(key) => vec![json!(key)],
            Request::Mouse { kind, line, column } => {
                vec![json!(kind.as_str()), json!(line), json!(column)]
            }
            Request::Resize { rows, cols } => vec![json!(rows), json!(cols)],
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        let wire = Wire {
            jsonrpc: "2.0",
            method: self.method(),
            params: self.params(),
        };
        serde_json::to_string(&wire).map_err(ProtocolError::Encode)
    }
}
