use tracing::trace;

/// Coalesces redraw requests into at most one pending frame.
///
/// Hosts call [`Self::take_pending`] from their animation-frame callback;
/// requests made while a redraw is already pending are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawScheduler {
    pending: bool,
    coalesced: u64,
}

impl RedrawScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when this call scheduled a new redraw.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            trace!(coalesced = self.coalesced, "redraw already pending");
            return false;
        }
        self.pending = true;
        true
    }

    /// Clears and returns the pending flag.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self.pending
    }

    /// Requests dropped because a redraw was already pending.
    #[must_use]
    pub fn coalesced_requests(self) -> u64 {
        self.coalesced
    }
}
