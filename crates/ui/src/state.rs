//! Editor screen state as last reported.

use core_types::Viewport;
use protocol::{Cursor, Draw, DrawStatus, Info, Menu, UiMessage};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewerState {
    pub main: Option<Draw>,
    pub status: Option<DrawStatus>,
    pub menu: Option<Menu>,
    pub selected: Option<usize>,
    pub info: Option<Info>,
    pub cursor: Option<Cursor>,
    pub ui_options: BTreeMap<String, String>,
    pub viewport: Viewport,
}

impl ViewerState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// A screen can be drawn once both the buffer and the status line have
    /// been received.
    pub fn is_ready(&self) -> bool {
        self.main.is_some() && self.status.is_some()
    }

    /// Menu items that fit above the status line.
    pub fn menu_capacity(&self) -> usize {
        self.viewport.rows.saturating_sub(3) as usize
    }

    pub fn apply(&mut self, message: UiMessage) {
        match message {
            UiMessage::Draw(draw) => self.main = Some(draw),
            UiMessage::DrawStatus(status) => self.status = Some(status),
            UiMessage::MenuShow(menu) => self.menu = Some(menu),
            UiMessage::MenuSelect(selected) => self.selected = selected,
            UiMessage::MenuHide => {
                self.menu = None;
                self.selected = None;
            }
            UiMessage::InfoShow(info) => self.info = Some(info),
            UiMessage::InfoHide => self.info = None,
            UiMessage::SetCursor(cursor) => self.cursor = Some(cursor),
            UiMessage::SetUiOptions(options) => self.ui_options = options,
            UiMessage::Refresh { .. } => {}
            UiMessage::Unsupported { method, params } => {
                log::debug!(target: "ui.state", "skipping {method} {params}");
            }
        }
    }

    pub fn apply_all(&mut self, messages: impl IntoIterator<Item = UiMessage>) -> usize {
        let mut applied = 0;
        for message in messages {
            self.apply(message);
            applied += 1;
        }
        applied
    }
}
