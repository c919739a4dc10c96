//! Frame clock
//!
//! Turns host animation-frame timestamps (ms) into tick deltas.

/// Longest delta a single frame may report (ms)
pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct Clock {
    /// Timestamp of the previous frame; None until the first frame after a resync
    last: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous frame, clamped to `[0, MAX_FRAME_DELTA_MS]`.
    /// The first frame after construction or a resync yields 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last = Some(now_ms);
        delta
    }

    /// Forget the reference timestamp (after pause or a stage transition)
    pub fn resync(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.delta(12_345.0), 0.0);
        assert_eq!(clock.delta(12_361.0), 16.0);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = Clock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(5_000.0), MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = Clock::new();
        clock.delta(100.0);
        assert_eq!(clock.delta(50.0), 0.0);
    }

    #[test]
    fn test_resync_skips_the_gap() {
        let mut clock = Clock::new();
        clock.delta(0.0);
        clock.delta(16.0);
        clock.resync();
        // A long pause does not leak into the next delta
        assert_eq!(clock.delta(60_000.0), 0.0);
        assert_eq!(clock.delta(60_016.0), 16.0);
    }
}
