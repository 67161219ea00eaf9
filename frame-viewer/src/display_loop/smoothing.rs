//! Exponential moving average of the tick rate.

use tokio::time::Instant;

/// Weight given to the newest instantaneous sample.
pub const FPS_SMOOTHING_ALPHA: f64 = 0.1;

/// Smooths instantaneous frame rate as `fps = (1 - α) * fps + α * sample`.
///
/// The average starts at zero and is not seeded from the first sample, so the
/// first interval contributes only `α * sample`. Intervals of zero length are
/// skipped to keep the average finite. The caller owns the previous frame
/// time; the smoother only holds the running average.
#[derive(Debug, Clone, Default)]
pub struct FpsSmoother {
    fps: f64,
}

impl FpsSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the interval from `previous` to `now` into the average and return it.
    ///
    /// With no previous frame the average is returned unchanged.
    pub fn record(&mut self, previous: Option<Instant>, now: Instant) -> f64 {
        if let Some(last) = previous {
            let interval_ms = now.saturating_duration_since(last).as_nanos() as f64 / 1e6;
            if interval_ms > 0.0 {
                let instant_fps = 1000.0 / interval_ms;
                self.fps = (1.0 - FPS_SMOOTHING_ALPHA) * self.fps
                    + FPS_SMOOTHING_ALPHA * instant_fps;
            }
        }
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_frame_reports_zero() {
        let mut smoother = FpsSmoother::new();
        assert_eq!(smoother.record(None, Instant::now()), 0.0);
    }

    #[test]
    fn test_first_interval_is_damped() {
        let mut smoother = FpsSmoother::new();
        let t0 = Instant::now();
        let fps = smoother.record(Some(t0), t0 + Duration::from_millis(100));
        assert!((fps - 1.0).abs() < 1e-9, "fps = {fps}");
    }

    #[test]
    fn test_converges_toward_steady_rate() {
        let mut smoother = FpsSmoother::new();
        let mut t = Instant::now();
        let mut prev = 0.0;
        for _ in 0..100 {
            let next = t + Duration::from_millis(50);
            let fps = smoother.record(Some(t), next);
            assert!(fps > prev && fps < 20.0);
            prev = fps;
            t = next;
        }
        assert!((prev - 20.0).abs() < 0.01, "fps = {prev}");
    }

    #[test]
    fn test_zero_interval_keeps_average_finite() {
        let mut smoother = FpsSmoother::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(100);
        smoother.record(Some(t0), t1);
        let fps = smoother.record(Some(t1), t1);
        assert!(fps.is_finite());
        assert!((fps - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_irregular_intervals_stay_non_negative() {
        let mut smoother = FpsSmoother::new();
        let mut last = None;
        let mut t = Instant::now();
        for ms in [1u64, 1000, 3, 250, 7, 100_000, 1, 42] {
            t += Duration::from_millis(ms);
            let fps = smoother.record(last, t);
            assert!(fps.is_finite() && fps >= 0.0, "fps = {fps}");
            last = Some(t);
        }
    }
}
