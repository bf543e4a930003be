//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::error::{CacheError, Result};

// == Sweeper ==
/// Handle to a running expiration sweeper.
///
/// The sweeper is Running from `spawn` until a stop signal is observed, then
/// Stopped for good. Dropping the handle closes the stop channel, which the
/// task treats as a stop signal.
#[derive(Debug)]
pub struct Sweeper {
    /// Sender to signal shutdown to the sweep loop
    shutdown_tx: watch::Sender<bool>,
    /// Task handle, taken by `join`
    handle: Mutex<Option<JoinHandle<()>>>,
    /// Period between sweeps
    interval: Duration,
}

impl Sweeper {
    // == Spawn ==
    /// Spawns a task on the current Tokio runtime that calls `sweep` every
    /// `interval`.
    ///
    /// `sweep` returns the number of entries it removed, used for logging.
    ///
    /// # Errors
    /// - `CacheError::InvalidInterval` if `interval` is zero
    /// - `CacheError::RuntimeUnavailable` if called outside a Tokio runtime
    pub fn spawn<F>(interval: Duration, sweep: F) -> Result<Self>
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        if interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = runtime.spawn(run(interval, sweep, shutdown_rx));

        Ok(Self {
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
            interval,
        })
    }

    // == Stop ==
    /// Signals the sweep loop to exit. Idempotent and non-blocking.
    ///
    /// Once the loop has observed the signal no further sweeps run.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Returns true until the sweep task has exited.
    pub fn is_running(&self) -> bool {
        let handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Waits for the sweep task to exit.
    ///
    /// Does not send the stop signal itself; call `stop` first or this waits
    /// for as long as the sweeper keeps running.
    pub async fn join(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            // The task never panics on its own; a JoinError here means the
            // runtime cancelled it, which is also a stop.
            let _ = handle.await;
        }
    }

    /// Returns the period between sweeps.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

// == Sweep Loop ==
async fn run<F>(interval: Duration, sweep: F, mut shutdown_rx: watch::Receiver<bool>)
where
    F: Fn() -> usize,
{
    info!(
        "Starting expiration sweeper with interval of {}ms",
        interval.as_millis()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first sweep waits a full interval.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                // Err means the owning handle was dropped
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                let removed = sweep();
                if removed > 0 {
                    info!("Expiration sweep: removed {} expired entries", removed);
                } else {
                    debug!("Expiration sweep: no expired entries found");
                }
            }
        }
    }

    info!("Expiration sweeper stopped");
}
