// Clickmap Effector Queue
// Fire-and-forget hand-off from the event context to the action effector

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use crate::Action;

/// Errors reported by a concrete action effector.
///
/// These never reach the classifier; the queue worker logs and drops them.
#[derive(Debug, thiserror::Error)]
pub enum EffectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported system hotkey: {0}")]
    UnsupportedHotkey(u32),

    #[error("Unsupported button for simulated click: {0}")]
    UnsupportedButton(String),

    #[error("Output device error: {0}")]
    Device(String),
}

/// Something that carries out a resolved action.
pub trait ActionEffector: Send {
    fn execute(&mut self, action: &Action) -> Result<(), EffectorError>;
}

/// Non-blocking sink the engine submits resolved actions to.
pub trait ActionSink {
    fn submit(&self, action: Action);
}

impl<S: ActionSink + ?Sized> ActionSink for std::sync::Arc<S> {
    fn submit(&self, action: Action) {
        (**self).submit(action)
    }
}

/// Effector that only logs what it would do
#[derive(Debug, Default)]
pub struct LogEffector;

impl ActionEffector for LogEffector {
    fn execute(&mut self, action: &Action) -> Result<(), EffectorError> {
        log::info!("action: {}", action);
        Ok(())
    }
}

/// Sends actions over a channel to a worker thread that owns the effector.
///
/// `submit` never blocks. A slow effector only delays later actions,
/// never event processing. Dropping the queue closes the channel and
/// joins the worker after it drains.
pub struct EffectorQueue {
    sender: Option<Sender<Action>>,
    worker: Option<JoinHandle<()>>,
}

impl EffectorQueue {
    /// Spawn the worker thread around `effector`
    pub fn spawn<E: ActionEffector + 'static>(mut effector: E) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Action>();
        let worker = thread::Builder::new()
            .name("clickmap-effector".to_string())
            .spawn(move || {
                for action in receiver {
                    if action.is_noop() {
                        continue;
                    }
                    if let Err(e) = effector.execute(&action) {
                        log::warn!("action {} failed: {}", action, e);
                    }
                }
                log::debug!("effector worker exiting");
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl ActionSink for EffectorQueue {
    fn submit(&self, action: Action) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(e) = sender.send(action) {
            log::warn!("effector worker is gone, dropping {}", e.0);
        }
    }
}

impl Drop for EffectorQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker's receive loop
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("effector worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recording(Arc<Mutex<Vec<Action>>>);

    impl ActionEffector for Recording {
        fn execute(&mut self, action: &Action) -> Result<(), EffectorError> {
            self.0.lock().push(action.clone());
            Ok(())
        }
    }

    struct Failing(Arc<Mutex<usize>>);

    impl ActionEffector for Failing {
        fn execute(&mut self, _action: &Action) -> Result<(), EffectorError> {
            *self.0.lock() += 1;
            Err(EffectorError::UnsupportedHotkey(0))
        }
    }

    #[test]
    fn test_queue_runs_actions_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let queue = EffectorQueue::spawn(Recording(Arc::clone(&seen))).unwrap();
        queue.submit(Action::SystemHotkey { id: 1 });
        queue.submit(Action::NoOp);
        queue.submit(Action::SystemHotkey { id: 2 });
        drop(queue);

        assert_eq!(
            *seen.lock(),
            vec![Action::SystemHotkey { id: 1 }, Action::SystemHotkey { id: 2 }]
        );
    }

    #[test]
    fn test_failures_do_not_stop_the_worker() {
        let calls = Arc::new(Mutex::new(0));
        let queue = EffectorQueue::spawn(Failing(Arc::clone(&calls))).unwrap();
        for id in 0..3 {
            queue.submit(Action::SystemHotkey { id });
        }
        drop(queue);
        assert_eq!(*calls.lock(), 3);
    }

    #[test]
    fn test_log_effector_accepts_everything() {
        let mut effector = LogEffector;
        assert!(effector.execute(&Action::RunCommand { command: "true".into() }).is_ok());
    }
}
