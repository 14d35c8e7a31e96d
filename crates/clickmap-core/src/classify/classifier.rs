// Clickmap Click Classifier
// Per-button state machine turning raw transitions into settled triggers
//
// Idle --Down--> Pressed --Up (short)--> Idle        [Click / DoubleClick]
// Pressed --hold-check--> Holding [Hold] --Up--> Idle [nothing]

use super::hold::HoldCheck;
use super::ClassifierConfig;
use crate::input::{RawEvent, Transition};
use crate::state::{ButtonState, ButtonStore};
use crate::{Button, ClickKind, ModifierSet, Timestamp, Trigger};

/// Result of classifying one raw transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not ours: forward unchanged
    Passthrough,
    /// Ours, nothing to dispatch
    Suppress,
    /// A press started; the caller must schedule the hold-check. Suppressed.
    Pressed(HoldCheck),
    /// A press/release cycle settled into a trigger to dispatch. Suppressed.
    Settled(Trigger),
}

/// Click classifier for every button.
#[derive(Debug)]
pub struct ClickClassifier {
    config: ClassifierConfig,
    buttons: ButtonStore,
}

impl ClickClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            buttons: ButtonStore::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Current state for a button, if it has seen any event
    pub fn state(&self, button: Button) -> Option<&ButtonState> {
        self.buttons.get(button)
    }

    pub fn buttons(&self) -> &ButtonStore {
        &self.buttons
    }

    /// Classify one raw transition.
    ///
    /// `enabled` is the global flag from the snapshot the caller is using
    /// for this event. While disabled, state is left untouched.
    pub fn classify(&mut self, event: &RawEvent, enabled: bool) -> Outcome {
        let Some(button) = event.button() else {
            return Outcome::Passthrough;
        };
        if !button.is_classified() || !enabled {
            return Outcome::Passthrough;
        }

        match event.transition {
            Transition::Down => self.press(button, event.timestamp, event.modifiers),
            Transition::Up => self.release(button, event.timestamp),
        }
    }

    fn press(&mut self, button: Button, t: Timestamp, modifiers: ModifierSet) -> Outcome {
        let double_click_window = self.config.double_click_window;
        let hold_threshold = self.config.hold_threshold;
        let Some(state) = self.buttons.get_or_create(button) else {
            return Outcome::Passthrough;
        };

        if state.pressed {
            // The Up for the previous press never arrived; this press supersedes it
            log::debug!("{} pressed again without release, restarting session", button);
        }

        let within_window = state
            .last_release_time
            .map(|released| t.saturating_since(released) < double_click_window)
            .unwrap_or(false);
        state.pending_click_count = if within_window {
            state.pending_click_count.saturating_add(1)
        } else {
            1
        };
        state.pressed = true;
        state.held = false;
        state.press_time = Some(t);
        state.modifiers_at_press = modifiers;

        log::trace!(
            "{} down @{} count={} mods={:?}",
            button,
            t,
            state.pending_click_count,
            modifiers
        );

        Outcome::Pressed(HoldCheck {
            due: t + hold_threshold,
            button,
            guard: t,
        })
    }

    fn release(&mut self, button: Button, t: Timestamp) -> Outcome {
        let hold_threshold = self.config.hold_threshold;
        let Some(state) = self.buttons.get_mut(button) else {
            return Outcome::Passthrough;
        };
        let press_time = match state.press_time {
            Some(press_time) if state.pressed => press_time,
            _ => return Outcome::Passthrough,
        };

        let duration = t.saturating_since(press_time);
        let held = std::mem::take(&mut state.held);
        state.pressed = false;
        state.last_release_time = Some(t);

        // The Up may be stamped before the threshold yet read after the
        // hold-check fired on wall-clock time
        if held || duration >= hold_threshold {
            log::trace!("{} up after hold ({:?})", button, duration);
            return Outcome::Suppress;
        }

        let kind = if state.pending_click_count >= 2 {
            ClickKind::DoubleClick
        } else {
            ClickKind::Click
        };
        Outcome::Settled(Trigger::new(button, kind, state.modifiers_at_press))
    }

    /// Run a due hold-check. Returns the Hold trigger to dispatch, if any.
    ///
    /// Stale checks (button released, or re-pressed since) are silent no-ops.
    /// The button stays pressed so its eventual Up is swallowed.
    pub fn check_hold(&mut self, check: HoldCheck, enabled: bool) -> Option<Trigger> {
        if !enabled {
            return None;
        }
        let state = self.buttons.get_mut(check.button)?;
        if !state.is_current_press(check.guard) || state.held {
            return None;
        }
        state.held = true;
        Some(Trigger::new(check.button, ClickKind::Hold, state.modifiers_at_press))
    }
}

impl Default for ClickClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
