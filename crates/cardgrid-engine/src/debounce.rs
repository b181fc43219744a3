#![forbid(unsafe_code)]

//! Debounced viewport resize tracking.
//!
//! Viewport resize events arrive in bursts while the user drags the
//! window edge. The debouncer holds the latest width and an explicit
//! deadline; every new event cancels and restarts the settle timer, and
//! only the final width in a burst is ever applied (latest wins). The
//! host drives [`poll`] from its timer/tick source.
//!
//! [`poll`]: ResizeDebouncer::poll

use std::time::{Duration, Instant};

/// Default settle delay before a resize is applied.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
struct Pending {
    width: u32,
    deadline: Instant,
}

/// Cancel-and-restart settle timer over viewport widths.
#[derive(Debug)]
pub struct ResizeDebouncer {
    settle: Duration,
    pending: Option<Pending>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl ResizeDebouncer {
    /// Create a debouncer with an explicit settle delay.
    #[must_use]
    pub const fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: None,
        }
    }

    /// Record a resize event, canceling any pending deadline.
    pub fn submit(&mut self, width: u32, now: Instant) {
        self.pending = Some(Pending {
            width,
            deadline: now + self.settle,
        });
    }

    /// Return the settled width once the delay has elapsed.
    ///
    /// Consumes the pending entry; subsequent polls return `None` until
    /// the next submit.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        let pending = self.pending.as_ref()?;
        if now < pending.deadline {
            return None;
        }
        let width = pending.width;
        self.pending = None;
        Some(width)
    }

    /// True while a resize is waiting to settle.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending resize without applying it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
