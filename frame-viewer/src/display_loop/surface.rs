//! Sinks the display loop renders into.

use tracing::{debug, info};

use super::source::FrameRef;
use super::state::{Controls, FrameStats};
use crate::error::ViewerError;

/// Where the display loop puts its output.
///
/// A surface owns the frame view, the status line, the statistics panel and
/// the start/stop controls. The controller only pushes values; it never reads
/// anything back.
pub trait ViewerSurface: Send {
    /// Replace the displayed frame. An error is logged and the tick carries on.
    fn show_frame(&mut self, frame: &FrameRef) -> Result<(), ViewerError>;

    fn set_status(&mut self, status: &str);

    fn set_stats(&mut self, stats: &FrameStats);

    fn set_controls(&mut self, controls: Controls);
}

/// Surface that reports everything through `tracing`.
///
/// Frames are logged at debug level; statistics are logged at info level every
/// `report_every` frames so a 10 Hz loop does not flood the console.
pub struct ConsoleSurface {
    report_every: u64,
    frames_shown: u64,
}

impl ConsoleSurface {
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every: report_every.max(1),
            frames_shown: 0,
        }
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ViewerSurface for ConsoleSurface {
    fn show_frame(&mut self, frame: &FrameRef) -> Result<(), ViewerError> {
        self.frames_shown += 1;
        debug!("Frame {}: {}", self.frames_shown, frame);
        Ok(())
    }

    fn set_status(&mut self, status: &str) {
        info!("Status: {}", status);
    }

    fn set_stats(&mut self, stats: &FrameStats) {
        if self.frames_shown % self.report_every == 0 {
            info!(
                "FPS: {} | Resolution: {} | Processing: {}",
                stats.fps_label(),
                stats.resolution_label(),
                stats.processing_time_label()
            );
        }
    }

    fn set_controls(&mut self, controls: Controls) {
        debug!(
            "Controls: start {}, stop {}",
            if controls.start_enabled { "enabled" } else { "disabled" },
            if controls.stop_enabled { "enabled" } else { "disabled" }
        );
    }
}
