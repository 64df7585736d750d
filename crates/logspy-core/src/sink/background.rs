use crate::errors::{LogSpyError, Result};
use crate::sink::LogSink;
use logspy_core_types::schema::DIAGNOSTICS_TARGET;
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

/// Hands formatted text to a worker thread that writes to `inner`
///
/// Lines reach the inner sink in the order they were written. Dropping the
/// sink closes the queue and waits for the worker to drain it.
pub struct BackgroundSink {
    sender: Mutex<Option<Sender<String>>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundSink {
    /// Start a worker thread that owns `inner`
    ///
    /// # Errors
    /// * `Init` - If the worker thread cannot be spawned
    pub fn spawn<S: LogSink + 'static>(inner: S) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<String>();
        let worker = std::thread::Builder::new()
            .name("logspy-sink".to_string())
            .spawn(move || {
                for line in receiver {
                    inner.write(&line);
                }
            })
            .map_err(|err| LogSpyError::Init {
                reason: format!("failed to spawn sink worker: {}", err),
            })?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Some(worker),
        })
    }
}

impl LogSink for BackgroundSink {
    fn write(&self, text: &str) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            if sender.send(text.to_string()).is_err() {
                tracing::debug!(target: DIAGNOSTICS_TARGET, "sink worker has stopped");
            }
        }
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        self.sender
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for BackgroundSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundSink").finish_non_exhaustive()
    }
}
