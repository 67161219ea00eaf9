use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::Range;
use std::time::{SystemTime, UNIX_EPOCH};

use super::state::Resolution;

/// Handle to a displayable frame, typically a URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRef(String);

impl FrameRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One acquisition from a [`FrameSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSample {
    pub frame: FrameRef,
    pub processing_time_ms: u32,
}

/// Supplies a frame reference and its processing time on every tick.
pub trait FrameSource: Send {
    fn acquire(&mut self) -> FrameSample;
}

/// Processing times reported by [`PlaceholderSource`], in milliseconds.
pub const PLACEHOLDER_PROCESSING_MS: Range<u32> = 5..25;

/// Random placeholder images from picsum.photos with a synthetic processing time.
pub struct PlaceholderSource {
    resolution: Resolution,
    rng: StdRng,
}

impl PlaceholderSource {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic processing-time sequence for tests.
    pub fn seeded(resolution: Resolution, seed: u64) -> Self {
        Self {
            resolution,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn frame_uri(&self) -> String {
        // Cache-busting query keeps the browser from reusing the previous image
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!(
            "https://picsum.photos/{}/{}?random={millis}",
            self.resolution.width, self.resolution.height
        )
    }
}

impl FrameSource for PlaceholderSource {
    fn acquire(&mut self) -> FrameSample {
        FrameSample {
            frame: FrameRef::new(self.frame_uri()),
            processing_time_ms: self.rng.random_range(PLACEHOLDER_PROCESSING_MS),
        }
    }
}
