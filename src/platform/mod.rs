//! Platform abstraction layer
//!
//! The simulation is platform-free; hosts live here. The browser host drives
//! the frame loop from `requestAnimationFrame` and forwards output to JS.
//! The native headless runner is the binary in `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Tracks the one outstanding host frame request.
///
/// Every request gets a ticket; cancelling or re-arming invalidates older
/// tickets, so a callback that was already queued when the loop restarted
/// finds its ticket stale and does nothing.
#[derive(Debug, Default)]
pub struct FrameSlot {
    generation: u64,
    pending: Option<i32>,
}

impl FrameSlot {
    /// Ticket for the request about to be made
    pub fn next_ticket(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Record the host handle of the request made with the latest ticket
    pub fn armed(&mut self, handle: i32) {
        self.pending = Some(handle);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// A callback fired. True only for the current request, which is consumed.
    pub fn claim(&mut self, ticket: u64) -> bool {
        if ticket != self.generation || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }

    /// Drop the current request; returns its handle for the host to cancel
    pub fn cancel(&mut self) -> Option<i32> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take()
    }
}
