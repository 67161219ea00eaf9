use std::fmt;
use tokio::time::Instant;

/// Whether the display loop is producing ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPhase {
    #[default]
    Idle,
    Streaming,
}

/// Streaming flag and frame counters owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamState {
    pub is_streaming: bool,
    /// Ticks performed while streaming, over the controller's lifetime
    pub frame_count: u64,
    /// Monotonic time of the most recent tick, `None` before the first one
    pub last_frame_timestamp: Option<Instant>,
}

impl StreamState {
    pub fn phase(&self) -> LoopPhase {
        if self.is_streaming {
            LoopPhase::Streaming
        } else {
            LoopPhase::Idle
        }
    }
}

/// Enablement of the start/stop affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    pub const IDLE: Controls = Controls {
        start_enabled: true,
        stop_enabled: false,
    };

    pub const STREAMING: Controls = Controls {
        start_enabled: false,
        stop_enabled: true,
    };

    pub fn for_phase(phase: LoopPhase) -> Self {
        match phase {
            LoopPhase::Idle => Self::IDLE,
            LoopPhase::Streaming => Self::STREAMING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Statistics shown next to the frame, recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub smoothed_fps: f64,
    pub resolution: Resolution,
    pub last_processing_time_ms: u32,
}

impl FrameStats {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            smoothed_fps: 0.0,
            resolution,
            last_processing_time_ms: 0,
        }
    }

    /// Frame rate with one decimal place, e.g. `"9.7"`.
    pub fn fps_label(&self) -> String {
        format!("{:.1}", self.smoothed_fps)
    }

    pub fn resolution_label(&self) -> String {
        self.resolution.to_string()
    }

    /// Processing time with unit suffix, e.g. `"12 ms"`.
    pub fn processing_time_label(&self) -> String {
        format!("{} ms", self.last_processing_time_ms)
    }
}
