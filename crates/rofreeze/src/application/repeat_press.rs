//! The background key-repeat loop that runs while a freeze is active.
//!
//! # Lifecycle
//!
//! [`RepeatPressTask::spawn`] starts a named thread that taps the repeat key,
//! then waits up to one interval on a stop channel.  [`RepeatPressTask::stop`]
//! signals the channel and joins the thread: once it returns, no further tap
//! can happen.  Dropping the task stops it the same way.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rofreeze_core::VirtualKey;
use tracing::{debug, error, warn};

use crate::infrastructure::input_injection::InputInjector;

pub struct RepeatPressTask {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl RepeatPressTask {
    /// Starts tapping `key` every `interval` on a dedicated thread.
    ///
    /// The first tap happens immediately.  Injection errors are logged and the
    /// loop keeps going.
    pub fn spawn(
        injector: Arc<dyn InputInjector>,
        key: VirtualKey,
        interval: Duration,
    ) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("rofreeze-repeat".to_string())
            .spawn(move || {
                let mut taps: u64 = 0;
                let mut failures: u64 = 0;
                loop {
                    match injector.tap_key(key) {
                        Ok(()) => taps += 1,
                        Err(e) => {
                            failures += 1;
                            if failures == 1 {
                                warn!(%key, "repeat key tap failed: {e}");
                            } else {
                                debug!(%key, failures, "repeat key tap failed: {e}");
                            }
                        }
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // Stop signal or the task handle was dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!(taps, failures, "repeat-press loop finished");
                taps
            })?;

        debug!(%key, ?interval, "repeat-press loop started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Returns `true` until [`stop`](Self::stop) has been called.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the loop and waits for the thread to exit.
    ///
    /// Returns the number of successful taps.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(tx) = self.stop_tx.take() {
            // The loop may already be gone; a failed send is fine.
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                error!("repeat-press thread panicked");
                0
            }),
            None => 0,
        }
    }
}

impl Drop for RepeatPressTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
