use core_types::Viewport;
use protocol::Request;

/// Remembers the last viewport reported to the editor.
#[derive(Debug, Default)]
pub struct ResizeTracker {
    current: Option<Viewport>,
}

impl ResizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Viewport> {
        self.current
    }

    /// Returns a resize request when `viewport` differs from the last one
    /// observed. Empty viewports are never reported.
    pub fn observe(&mut self, viewport: Viewport) -> Option<Request> {
        if viewport.is_empty() || self.current == Some(viewport) {
            return None;
        }
        log::debug!(target: "input.resize", "{}x{}", viewport.rows, viewport.cols);
        self.current = Some(viewport);
        Some(Request::Resize {
            rows: viewport.rows,
            cols: viewport.cols,
        })
    }
}
