//! Display loop controller for previewing processed frames.
//!
//! While streaming, a background task ticks at a nominal fixed interval. Each
//! tick acquires a frame reference from a [`FrameSource`], folds the tick time
//! into a smoothed frame rate, and pushes the frame, statistics and status to a
//! [`ViewerSurface`].
//!
//! # Lifecycle
//!
//! 1. [`DisplayLoop::new`] creates an idle controller and shows "Ready"
//! 2. [`DisplayLoop::start`] spawns the tick task (no-op if already streaming)
//! 3. [`DisplayLoop::stop`] clears the streaming flag and signals the task
//! 4. [`DisplayLoop::dispose`] stops and waits for the task to finish
//!
//! Each tick runs to completion under the controller lock, so ticks never
//! interleave with each other or with start/stop. The task only suspends
//! between ticks. Stopping is signalled over a watch channel so a sleeping
//! task wakes and exits immediately; the tick itself also re-checks the
//! streaming flag, so a tick that races with `stop()` does nothing.

mod smoothing;
mod source;
mod state;
mod surface;

pub use smoothing::{FpsSmoother, FPS_SMOOTHING_ALPHA};
pub use source::{
    FrameRef, FrameSample, FrameSource, PlaceholderSource, PLACEHOLDER_PROCESSING_MS,
};
pub use state::{Controls, FrameStats, LoopPhase, Resolution, StreamState};
pub use surface::{ConsoleSurface, ViewerSurface};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use viewer_shared::viewer_client::ViewerClient;
use viewer_shared::FrameInfo;

use crate::error::ViewerError;

/// Nominal spacing between ticks (~10 frames per second).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Time `disconnect()` spends in "Disconnecting..." before reporting "Disconnected".
pub const DISCONNECT_SETTLE: Duration = Duration::from_millis(500);

/// Status strings pushed to the surface.
pub mod status {
    pub const READY: &str = "Ready";
    pub const STREAMING: &str = "Streaming";
    pub const STOPPED: &str = "Stopped";
    pub const CONNECTING: &str = "Connecting...";
    pub const CONNECTED: &str = "Connected";
    pub const CONNECTION_ERROR: &str = "Connection Error";
    pub const DISCONNECTING: &str = "Disconnecting...";
    pub const DISCONNECTED: &str = "Disconnected";
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Delay between the end of one tick and the start of the next
    pub tick_interval: Duration,
    /// Resolution reported in the statistics panel
    pub resolution: Resolution,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            resolution: Resolution::VGA,
        }
    }
}

/// Point-in-time copy of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSnapshot {
    pub stream: StreamState,
    pub stats: FrameStats,
    pub status: String,
    pub controls: Controls,
}

impl LoopSnapshot {
    pub fn phase(&self) -> LoopPhase {
        self.stream.phase()
    }
}

struct Inner<S> {
    stream: StreamState,
    stats: FrameStats,
    smoother: FpsSmoother,
    source: Box<dyn FrameSource>,
    surface: S,
    status: String,
    controls: Controls,
    /// Bumped on every start; a task only ticks while its generation is current
    generation: u64,
}

impl<S: ViewerSurface> Inner<S> {
    fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.surface.set_status(status);
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
        self.surface.set_controls(controls);
    }

    /// Perform one tick. Returns whether the loop should reschedule.
    fn tick(&mut self, now: Instant) -> bool {
        if !self.stream.is_streaming {
            return false;
        }

        self.stream.frame_count += 1;
        let previous = self.stream.last_frame_timestamp.replace(now);
        self.stats.smoothed_fps = self.smoother.record(previous, now);

        let sample = self.source.acquire();
        if let Err(e) = self.surface.show_frame(&sample.frame) {
            warn!("Failed to display frame {}: {}", self.stream.frame_count, e);
        }

        self.stats.last_processing_time_ms = sample.processing_time_ms;
        self.surface.set_stats(&self.stats);
        true
    }

    fn tick_for(&mut self, generation: u64, now: Instant) -> bool {
        generation == self.generation && self.tick(now)
    }
}

struct LoopTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owned display loop controller.
///
/// `start` must be called from within a Tokio runtime.
pub struct DisplayLoop<S: ViewerSurface + 'static> {
    inner: Arc<Mutex<Inner<S>>>,
    task: Mutex<Option<LoopTask>>,
    tick_interval: Duration,
}

impl<S: ViewerSurface + 'static> DisplayLoop<S> {
    /// Create an idle controller that shows placeholder frames.
    pub fn new(surface: S, config: LoopConfig) -> Self {
        let source = PlaceholderSource::new(config.resolution);
        Self::with_source(surface, source, config)
    }

    pub fn with_source(
        surface: S,
        source: impl FrameSource + 'static,
        config: LoopConfig,
    ) -> Self {
        let mut inner = Inner {
            stream: StreamState::default(),
            stats: FrameStats::new(config.resolution),
            smoother: FpsSmoother::new(),
            source: Box::new(source),
            surface,
            status: String::new(),
            controls: Controls::IDLE,
            generation: 0,
        };
        inner.set_controls(Controls::for_phase(LoopPhase::Idle));
        inner.set_status(status::READY);

        Self {
            inner: Arc::new(Mutex::new(inner)),
            task: Mutex::new(None),
            tick_interval: config.tick_interval,
        }
    }

    /// Begin streaming. Does nothing if already streaming.
    pub fn start(&self) {
        let mut slot = lock(&self.task);

        let generation = {
            let mut inner = lock(&self.inner);
            if inner.stream.is_streaming {
                return;
            }
            inner.stream.is_streaming = true;
            inner.set_controls(Controls::for_phase(LoopPhase::Streaming));
            inner.set_status(status::STREAMING);
            inner.generation += 1;
            inner.generation
        };

        if let Some(previous) = slot.take() {
            let _ = previous.stop_tx.send(true);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.inner),
            generation,
            self.tick_interval,
            stop_rx,
        ));
        *slot = Some(LoopTask { stop_tx, handle });

        info!("Display loop started (generation {})", generation);
    }

    /// Stop streaming. Does nothing while idle.
    pub fn stop(&self) {
        let slot = lock(&self.task);

        {
            let mut inner = lock(&self.inner);
            if !inner.stream.is_streaming {
                return;
            }
            inner.stream.is_streaming = false;
            inner.set_controls(Controls::for_phase(LoopPhase::Idle));
            inner.set_status(status::STOPPED);
            info!(
                "Display loop stopped after {} frames",
                inner.stream.frame_count
            );
        }

        if let Some(task) = slot.as_ref() {
            let _ = task.stop_tx.send(true);
        }
    }

    /// Run one tick immediately, outside the schedule.
    ///
    /// Returns `false` without touching any state when not streaming.
    pub fn tick(&self) -> bool {
        lock(&self.inner).tick(Instant::now())
    }

    /// Stop streaming and wait for the tick task to exit.
    pub async fn dispose(self) {
        self.stop();
        let task = lock(&self.task).take();
        if let Some(task) = task {
            drop(task.stop_tx);
            if let Err(e) = task.handle.await {
                warn!("Display loop task ended abnormally: {}", e);
            }
        }
        debug!("Display loop disposed");
    }

    /// Probe the stub server for a frame and report the outcome in the status line.
    pub async fn connect(&self, client: &ViewerClient) -> Result<FrameInfo, ViewerError> {
        lock(&self.inner).set_status(status::CONNECTING);
        info!("Connecting to frame server at {}", client.base_url());

        match probe_frame(client).await {
            Ok(frame) => {
                lock(&self.inner).set_status(status::CONNECTED);
                info!(
                    "Connected to frame server ({}x{} frames)",
                    frame.width, frame.height
                );
                Ok(frame)
            }
            Err(e) => {
                lock(&self.inner).set_status(status::CONNECTION_ERROR);
                warn!("Failed to connect to {}: {}", client.base_url(), e);
                Err(e)
            }
        }
    }

    pub async fn disconnect(&self) {
        lock(&self.inner).set_status(status::DISCONNECTING);
        info!("Disconnecting from frame server");
        tokio::time::sleep(DISCONNECT_SETTLE).await;
        lock(&self.inner).set_status(status::DISCONNECTED);
        info!("Disconnected from frame server");
    }

    pub fn snapshot(&self) -> LoopSnapshot {
        let inner = lock(&self.inner);
        LoopSnapshot {
            stream: inner.stream,
            stats: inner.stats,
            status: inner.status.clone(),
            controls: inner.controls,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        lock(&self.inner).stream.phase()
    }

    /// Inspect the surface under the controller lock.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.inner).surface)
    }
}

async fn probe_frame(client: &ViewerClient) -> Result<FrameInfo, ViewerError> {
    let frame = client.frame().await?;
    frame.validate()?;
    Ok(frame)
}

async fn run_loop<S: ViewerSurface>(
    inner: Arc<Mutex<Inner<S>>>,
    generation: u64,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        if *stop_rx.borrow_and_update() {
            break;
        }

        if !lock(&inner).tick_for(generation, Instant::now()) {
            break;
        }

        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!("Display loop task {} exited", generation);
}
