//! Inbound UI messages.
//!
//! A frame is one JSON-RPC notification object or an array of them. A frame
//! decodes completely or not at all; unknown methods are kept as
//! [`UiMessage::Unsupported`] so callers can log and skip them.

use crate::error::ProtocolError;
use crate::types::{Coord, Face, InfoText, Line};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    pub lines: Vec<Line>,
    pub default_face: Face,
    pub padding_face: Face,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawStatus {
    pub status_line: Line,
    pub mode_line: Line,
    pub default_face: Face,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuStyle {
    Prompt,
    Search,
    Inline,
    Other(String),
}

impl From<&str> for MenuStyle {
    fn from(value: &str) -> Self {
        match value {
            "prompt" => MenuStyle::Prompt,
            "search" => MenuStyle::Search,
            "inline" => MenuStyle::Inline,
            other => MenuStyle::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    pub items: Vec<Line>,
    pub anchor: Coord,
    pub selected_face: Face,
    pub face: Face,
    pub style: MenuStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InfoStyle {
    Prompt,
    MenuDoc,
    Other(String),
}

impl From<&str> for InfoStyle {
    fn from(value: &str) -> Self {
        match value {
            "prompt" => InfoStyle::Prompt,
            "menuDoc" => InfoStyle::MenuDoc,
            other => InfoStyle::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Info {
    pub title: InfoText,
    pub content: InfoText,
    pub anchor: Coord,
    pub face: Face,
    pub style: InfoStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cursor {
    pub mode: String,
    pub coord: Coord,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiMessage {
    Draw(Draw),
    DrawStatus(DrawStatus),
    MenuShow(Menu),
    /// `None` when the editor deselects (it sends a negative index).
    MenuSelect(Option<usize>),
    MenuHide,
    InfoShow(Info),
    InfoHide,
    SetCursor(Cursor),
    SetUiOptions(BTreeMap<String, String>),
    Refresh { force: bool },
    Unsupported { method: String, params: Value },
}

impl UiMessage {
    pub fn method(&self) -> &str {
        match self {
            UiMessage::Draw(_) => "draw",
            UiMessage::DrawStatus(_) => "draw_status",
            UiMessage::MenuShow(_) => "menu_show",
            UiMessage::MenuSelect(_) => "menu_select",
            UiMessage::MenuHide => "menu_hide",
            UiMessage::InfoShow(_) => "info_show",
            UiMessage::InfoHide => "info_hide",
            UiMessage::SetCursor(_) => "set_cursor",
            UiMessage::SetUiOptions(_) => "set_ui_options",
            UiMessage::Refresh { .. } => "refresh",
            UiMessage::Unsupported { method, .. } => method,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    params: Value,
}

fn params<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(params).map_err(|source| ProtocolError::Params {
        method: method.to_string(),
        source,
    })
}

fn decode_message(envelope: Envelope) -> Result<UiMessage, ProtocolError> {
    let Envelope { method, params: raw } = envelope;
    let m = method.as_str();
    let message = match m {
        "draw" => {
            // Newer editors put the cursor position second.
            let with_cursor = raw.as_array().is_some_and(|a| a.len() == 4);
            let (lines, default_face, padding_face) = if with_cursor {
                let (lines, _cursor, default_face, padding_face): (Vec<Line>, Coord, Face, Face) =
                    params(m, raw)?;
                (lines, default_face, padding_face)
            } else {
                params(m, raw)?
            };
            UiMessage::Draw(Draw {
                lines,
                default_face,
                padding_face,
            })
        }
        "draw_status" => {
            let (status_line, mode_line, default_face): (Line, Line, Face) = params(m, raw)?;
            UiMessage::DrawStatus(DrawStatus {
                status_line,
                mode_line,
                default_face,
            })
        }
        "menu_show" => {
            let (items, anchor, selected_face, face, style): (Vec<Line>, Coord, Face, Face, String) =
                params(m, raw)?;
            UiMessage::MenuShow(Menu {
                items,
                anchor,
                selected_face,
                face,
                style: MenuStyle::from(style.as_str()),
            })
        }
        "menu_select" => {
            let (selected,): (i64,) = params(m, raw)?;
            UiMessage::MenuSelect(usize::try_from(selected).ok())
        }
        "menu_hide" => UiMessage::MenuHide,
        "info_show" => {
            let (title, content, anchor, face, style): (InfoText, InfoText, Coord, Face, String) =
                params(m, raw)?;
            UiMessage::InfoShow(Info {
                title,
                content,
                anchor,
                face,
                style: InfoStyle::from(style.as_str()),
            })
        }
        "info_hide" => UiMessage::InfoHide,
        "set_cursor" => {
            let (mode, coord): (String, Coord) = params(m, raw)?;
            UiMessage::SetCursor(Cursor { mode, coord })
        }
        "set_ui_options" => {
            let (options,): (BTreeMap<String, String>,) = params(m, raw)?;
            UiMessage::SetUiOptions(options)
        }
        "refresh" => {
            let force = raw
                .as_array()
                .and_then(|a| a.first())
                .and_then(Value::as_bool)
                .unwrap_or(false);
            UiMessage::Refresh { force }
        }
        _ => UiMessage::Unsupported { method, params: raw },
    };
    Ok(message)
}

/// Decodes one websocket payload.
pub fn decode_frame(text: &str) -> Result<Vec<UiMessage>, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::Frame)?;
    let entries = match value {
        Value::Array(entries) => entries,
        other => vec![other],
    };
    let mut messages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let envelope: Envelope =
            serde_json::from_value(entry).map_err(|_| ProtocolError::NotAMessage { index })?;
        let message = decode_message(envelope)?;
        if let UiMessage::Unsupported { method, .. } = &message {
            log::warn!(target: "protocol", "unsupported method `{method}`");
        }
        messages.push(message);
    }
    log::trace!(target: "protocol", "decoded {} messages", messages.len());
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACE: &str = r#"{"fg":"default","bg":"default","attributes":[]}"#;

    fn atom(text: &str) -> String {
        format!(r#"{{"face":{FACE},"contents":"{text}"}}"#)
    }

    #[test]
    fn decodes_single_object_frame() {
        let frame = format!(
            r#"{{"jsonrpc":"2.0","method":"draw","params":[[[{}]],{FACE},{FACE}]}}"#,
            atom("hi")
        );
        let messages = decode_frame(&frame).expect("frame");
        let [UiMessage::Draw(draw)] = messages.as_slice() else {
            panic!("expected one draw, got {messages:?}");
        };
        assert_eq!(draw.lines.len(), 1);
        assert_eq!(draw.lines[0][0].contents, "hi");
    }

    #[test]
    fn draw_with_cursor_position_is_accepted() {
        let frame = format!(
            r#"{{"jsonrpc":"2.0","method":"draw","params":[[[{}]],{{"line":0,"column":1}},{FACE},{FACE}]}}"#,
            atom("x")
        );
        let messages = decode_frame(&frame).expect("frame");
        assert!(matches!(messages[0], UiMessage::Draw(_)));
    }

    #[test]
    fn decodes_batches_in_order() {
        let frame = format!(
            r#"[{{"jsonrpc":"2.0","method":"menu_select","params":[2]}},
                {{"jsonrpc":"2.0","method":"menu_hide","params":[]}},
                {{"jsonrpc":"2.0","method":"info_show","params":["t","body",{{"line":1,"column":2}},{FACE},"prompt"]}},
                {{"jsonrpc":"2.0","method":"refresh","params":[true]}}]"#
        );
        let messages = decode_frame(&frame).expect("frame");
        let methods: Vec<_> = messages.iter().map(UiMessage::method).collect();
        assert_eq!(methods, ["menu_select", "menu_hide", "info_show", "refresh"]);
        assert_eq!(messages[0], UiMessage::MenuSelect(Some(2)));
        let UiMessage::InfoShow(info) = &messages[2] else {
            panic!("info");
        };
        assert_eq!(info.style, InfoStyle::Prompt);
        assert_eq!(info.content.to_plain(), "body");
        assert_eq!(messages[3], UiMessage::Refresh { force: true });
    }

    #[test]
    fn negative_selection_means_none() {
        let messages =
            decode_frame(r#"{"jsonrpc":"2.0","method":"menu_select","params":[-1]}"#).expect("frame");
        assert_eq!(messages, vec![UiMessage::MenuSelect(None)]);
    }

    #[test]
    fn unknown_methods_are_kept() {
        let messages =
            decode_frame(r#"{"jsonrpc":"2.0","method":"bell","params":[1]}"#).expect("frame");
        assert_eq!(messages[0].method(), "bell");
        assert!(matches!(messages[0], UiMessage::Unsupported { .. }));
    }

    #[test]
    fn bad_params_fail_the_whole_frame() {
        let err = decode_frame(
            r#"[{"jsonrpc":"2.0","method":"menu_hide"},{"jsonrpc":"2.0","method":"draw","params":[1]}]"#,
        )
        .expect_err("bad draw");
        assert!(matches!(err, ProtocolError::Params { ref method, .. } if method == "draw"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            decode_frame("[1]"),
            Err(ProtocolError::NotAMessage { index: 0 })
        ));
        assert!(matches!(decode_frame("{"), Err(ProtocolError::Frame(_))));
    }
}
