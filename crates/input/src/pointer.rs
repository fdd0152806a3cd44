use core_types::CellPos;
use protocol::{MouseKind, Request};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

impl PointerPhase {
    fn kind(self) -> MouseKind {
        match self {
            PointerPhase::Press => MouseKind::PressLeft,
            PointerPhase::Move => MouseKind::Move,
            PointerPhase::Release => MouseKind::ReleaseLeft,
        }
    }
}

/// Pointer event over a screen cell. `buttons` is the held-buttons mask and
/// `button` the index of the button that changed, as hosts report them.
///
/// Only events with some button held and the primary button as the changed
/// one are forwarded.
pub fn pointer_request(phase: PointerPhase, buttons: u16, button: u16, pos: CellPos) -> Option<Request> {
    if buttons == 0 || button != 0 {
        return None;
    }
    Some(Request::Mouse {
        kind: phase.kind(),
        line: pos.line,
        column: pos.column,
    })
}

/// Wheel scroll. Events with horizontal movement are dropped.
pub fn wheel_request(delta_x: f64, delta_y: f64) -> Option<Request> {
    if delta_x != 0.0 {
        return None;
    }
    let kind = if delta_y < 0.0 {
        MouseKind::WheelUp
    } else {
        MouseKind::WheelDown
    };
    Some(Request::Mouse {
        kind,
        line: 0,
        column: 0,
    })
}
