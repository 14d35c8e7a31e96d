// Clickmap Classification
// Click classifier state machine and hold-check scheduling

mod classifier;
pub mod hold;

use std::time::Duration;

pub use classifier::{ClickClassifier, Outcome};
pub use hold::{HoldCheck, HoldScheduler};

/// Default debounce window between a release and the next press of a double click
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;

/// Default minimum press duration for a hold
pub const DEFAULT_HOLD_MS: u64 = 300;

/// Timing windows for the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub double_click_window: Duration,
    pub hold_threshold: Duration,
}

impl ClassifierConfig {
    pub fn from_millis(double_click_ms: u64, hold_ms: u64) -> Self {
        Self {
            double_click_window: Duration::from_millis(double_click_ms),
            hold_threshold: Duration::from_millis(hold_ms),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_millis(DEFAULT_DOUBLE_CLICK_MS, DEFAULT_HOLD_MS)
    }
}
