//! Controller Handle - background polling for multi-threaded consumers
//!
//! The core [`Controller`](crate::controller::Controller) is single-threaded: its
//! components are only touched from inside `update()`. This handle moves a PS3
//! controller onto a dedicated blocking task, polls it at a fixed interval and
//! broadcasts an owned [`Ps3Snapshot`] over a `watch` channel whenever any value
//! changed. Readers on other threads only ever see snapshots.

use crate::controller::controller::ControllerError;
use crate::profile::{ps3, Ps3, Ps3Layout, Ps3Snapshot};
use crate::source::{EventSource, SourceError};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Configuration settings for the polling task
///
/// # Examples
///
/// ```rust
/// use padstate::controller::ControllerSettings;
///
/// // Tight loop for latency sensitive consumers
/// let settings = ControllerSettings { poll_interval_ms: 2 };
/// assert_eq!(settings.poll_interval_ms, 2);
/// ```
#[derive(Clone, Debug)]
pub struct ControllerSettings {
    /// Pause between two `update()` cycles in milliseconds
    ///
    /// Events queue up in the source in the meantime and are drained as one
    /// batch, so a longer interval costs latency but never loses events.
    pub poll_interval_ms: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

/// Handle for a PS3 controller polled on a background task
///
/// Dropping the handle (and every subscribed receiver) ends the polling loop at
/// its next cycle, which releases the device.
pub struct ControllerHandle {
    state_receiver: watch::Receiver<Ps3Snapshot>,
    cancel: CancellationToken,
    task: JoinHandle<Result<(), ControllerError>>,
}

impl ControllerHandle {
    /// Spawns the polling task.
    ///
    /// The source is built by `make_source` on the blocking task itself, so
    /// sources that must stay on the thread that created them (such as a gilrs
    /// context) are supported. Must be called from within a tokio runtime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use padstate::controller::{ControllerHandle, InputEvent};
    /// use padstate::source::ScriptedSource;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let handle = ControllerHandle::spawn(None, || {
    ///     Ok(ScriptedSource::from_batches([vec![InputEvent::key("BTN_START", 1)]]))
    /// });
    ///
    /// let mut state = handle.subscribe();
    /// state.wait_for(|snapshot| snapshot.buttons.start).await?;
    /// handle.shutdown().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn<S, F>(settings: Option<ControllerSettings>, make_source: F) -> Self
    where
        S: EventSource + 'static,
        F: FnOnce() -> Result<S, SourceError> + Send + 'static,
    {
        let settings = settings.unwrap_or_default();
        info!("Spawning controller task with settings: {:?}", settings);

        let (state_sender, state_receiver) = watch::channel(Ps3Layout::new().snapshot());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::task::spawn_blocking(move || {
            let source = make_source().map_err(|e| {
                error!("Failed to create event source: {}", e);
                ControllerError::Source(e)
            })?;
            info!("Event source ready, starting polling loop");

            let result = run_polling_loop(ps3(source), &settings, &state_sender, &token);
            match &result {
                Ok(()) => info!("Controller task finished"),
                Err(e) => error!("Controller task terminated with error: {}", e),
            }
            result
        });

        Self {
            state_receiver,
            cancel,
            task,
        }
    }

    /// Get a receiver for controller snapshots
    pub fn subscribe(&self) -> watch::Receiver<Ps3Snapshot> {
        debug!("New subscriber to controller state");
        self.state_receiver.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop polling and wait for the task to release the source.
    pub async fn shutdown(self) -> Result<(), ControllerError> {
        info!("Shutting down controller task");
        self.cancel.cancel();
        self.join().await
    }

    /// Wait for the task to end on its own, e.g. after a device failure.
    pub async fn join(self) -> Result<(), ControllerError> {
        self.task
            .await
            .map_err(|e| ControllerError::TaskError(e.to_string()))?
    }
}

fn run_polling_loop<S: EventSource>(
    mut pad: Ps3<S>,
    settings: &ControllerSettings,
    state_sender: &watch::Sender<Ps3Snapshot>,
    cancel: &CancellationToken,
) -> Result<(), ControllerError> {
    let interval = Duration::from_millis(settings.poll_interval_ms);

    // Stats for performance monitoring
    let mut cycles: u64 = 0;
    let mut total_events: usize = 0;
    let mut last_stats_time = Instant::now();
    let stats_interval = Duration::from_secs(30);

    loop {
        if cancel.is_cancelled() {
            info!("Controller polling cancelled");
            return Ok(());
        }
        if state_sender.is_closed() {
            info!("No subscribers left, stopping controller polling");
            return Ok(());
        }

        total_events += pad.update()?;
        cycles += 1;

        let snapshot = pad.snapshot();
        let published = state_sender.send_if_modified(|current| {
            if *current != snapshot {
                *current = snapshot;
                true
            } else {
                false
            }
        });
        if published {
            debug!("Published new controller snapshot");
        }

        if last_stats_time.elapsed() > stats_interval {
            let elapsed_seconds = last_stats_time.elapsed().as_secs_f64();
            info!(
                "Controller stats: {} cycles, {} events in {:.0} seconds ({:.2} events/sec)",
                cycles,
                total_events,
                elapsed_seconds,
                total_events as f64 / elapsed_seconds
            );
            cycles = 0;
            total_events = 0;
            last_stats_time = Instant::now();
        }

        std::thread::sleep(interval);
    }
}
