//! Redraw coalescing.
//!
//! Triggers arrive from message receipt and periodic ticks. At most one pass
//! is pending at a time; a pass that has started always runs to completion.

#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: bool,
    passes: u64,
    coalesced: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a pass. Returns false when one was already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            return false;
        }
        self.pending = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consumes the pending flag. Returns whether a pass should run now.
    pub fn begin(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.passes += 1;
        true
    }

    /// Runs `pass` if one is pending.
    pub fn run_pending<T>(&mut self, pass: impl FnOnce() -> T) -> Option<T> {
        if self.begin() { Some(pass()) } else { None }
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Requests that were folded into an already pending pass.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
