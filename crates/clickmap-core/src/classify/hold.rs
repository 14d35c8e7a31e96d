// Clickmap Hold Scheduler
// Deferred hold-checks, serviced on the event-processing context

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{Button, Timestamp};

/// A deferred "is this button still held?" check.
///
/// There is no explicit cancellation: `guard` is the press timestamp the
/// check was scheduled for, and the check is a no-op once the button's
/// state no longer carries that timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HoldCheck {
    pub due: Timestamp,
    pub button: Button,
    pub guard: Timestamp,
}

/// Min-heap of pending hold-checks ordered by due time.
#[derive(Debug, Default)]
pub struct HoldScheduler {
    pending: BinaryHeap<Reverse<HoldCheck>>,
}

impl HoldScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, check: HoldCheck) {
        log::trace!("hold-check for {} scheduled at {}", check.button, check.due);
        self.pending.push(Reverse(check));
    }

    /// Pop the earliest check if it is due at or before `now`
    pub fn pop_due(&mut self, now: Timestamp) -> Option<HoldCheck> {
        match self.pending.peek() {
            Some(Reverse(check)) if check.due <= now => self.pending.pop().map(|Reverse(c)| c),
            _ => None,
        }
    }

    /// Due time of the earliest pending check
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.pending.peek().map(|Reverse(c)| c.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
