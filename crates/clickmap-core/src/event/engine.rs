// Clickmap Event Engine
// The serialized event context: classification, hold-checks and dispatch

use std::sync::Arc;

use crate::classify::{ClassifierConfig, ClickClassifier, HoldScheduler, Outcome};
use crate::dispatch::{DispatchSnapshot, DispatchTable};
use crate::input::{RawEvent, Verdict};
use crate::output::ActionSink;
use crate::{Timestamp, Trigger};

/// Owns all per-button state and runs on a single context.
///
/// Raw events and hold-checks are serviced in timestamp order: before an
/// event is classified, every hold-check due at or before its timestamp
/// runs first. The event loop calls [`Engine::advance_to`] on poll timeout
/// so holds fire without waiting for the next event.
pub struct Engine<S: ActionSink> {
    classifier: ClickClassifier,
    holds: HoldScheduler,
    table: Arc<DispatchTable>,
    sink: S,
}

impl<S: ActionSink> Engine<S> {
    pub fn new(config: ClassifierConfig, table: Arc<DispatchTable>, sink: S) -> Self {
        Self {
            classifier: ClickClassifier::new(config),
            holds: HoldScheduler::new(),
            table,
            sink,
        }
    }

    /// Handle one raw transition and return its verdict.
    pub fn handle(&mut self, event: &RawEvent) -> Verdict {
        self.advance_to(event.timestamp);

        let snapshot = self.table.snapshot();
        match self.classifier.classify(event, snapshot.is_enabled()) {
            Outcome::Passthrough => Verdict::Passthrough,
            Outcome::Suppress => Verdict::Suppress,
            Outcome::Pressed(check) => {
                self.holds.schedule(check);
                Verdict::Suppress
            }
            Outcome::Settled(trigger) => {
                self.dispatch(&snapshot, &trigger);
                Verdict::Suppress
            }
        }
    }

    /// Run every hold-check due at or before `now`.
    ///
    /// Returns the number of Hold triggers that resolved to an action.
    pub fn advance_to(&mut self, now: Timestamp) -> usize {
        let mut dispatched = 0;
        while let Some(check) = self.holds.pop_due(now) {
            let snapshot = self.table.snapshot();
            let Some(trigger) = self.classifier.check_hold(check, snapshot.is_enabled()) else {
                continue;
            };
            if self.dispatch(&snapshot, &trigger) {
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Resolve `trigger` against the snapshot that gated it
    fn dispatch(&self, snapshot: &DispatchSnapshot, trigger: &Trigger) -> bool {
        let Some(mapping) = snapshot.lookup(trigger) else {
            log::debug!("{} unmapped", trigger);
            return false;
        };
        log::debug!("{} -> {} ({})", trigger, mapping.action, mapping.id);
        self.sink.submit(mapping.action.clone());
        true
    }

    /// Earliest pending hold-check, for bounding the poll timeout
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.holds.next_deadline()
    }

    pub fn pending_holds(&self) -> usize {
        self.holds.len()
    }

    pub fn classifier(&self) -> &ClickClassifier {
        &self.classifier
    }

    pub fn table(&self) -> &Arc<DispatchTable> {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
