//! Frame time tracking
//!
//! All times are milliseconds as `f64`, matching the timestamps handed out by
//! the platform's animation-frame primitive.

/// Upper bound applied to a single frame's delta when nothing else is configured.
pub const DEFAULT_DELTA_TIME_UPPER_THRESHOLD: f64 = 160.0;

/// Delta produced by [`FrameClock::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    pub current_time: f64,
    pub delta_time: f64,
    /// True when the raw delta exceeded the threshold and was clamped.
    pub was_clamped: bool,
}

/// Tracks the previous frame timestamp and produces clamped deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous_time: Option<f64>,
    upper_threshold: f64,
    frame_count: u64,
}

impl FrameClock {
    pub fn new(upper_threshold: f64) -> Self {
        Self {
            previous_time: None,
            upper_threshold: upper_threshold.max(0.0),
            frame_count: 0,
        }
    }

    /// Advance to `current_time`.
    ///
    /// The first frame after construction or [`reset`](Self::reset) has a zero
    /// delta. Time going backwards also yields zero.
    pub fn advance(&mut self, current_time: f64) -> FrameDelta {
        let raw = match self.previous_time {
            Some(previous) => (current_time - previous).max(0.0),
            None => 0.0,
        };
        self.previous_time = Some(current_time);
        self.frame_count += 1;

        let was_clamped = raw > self.upper_threshold;
        FrameDelta {
            current_time,
            delta_time: raw.min(self.upper_threshold),
            was_clamped,
        }
    }

    /// Forget the previous timestamp, e.g. when the loop pauses.
    pub fn reset(&mut self) {
        self.previous_time = None;
    }

    pub fn set_upper_threshold(&mut self, upper_threshold: f64) {
        self.upper_threshold = upper_threshold.max(0.0);
    }

    #[inline]
    pub fn upper_threshold(&self) -> f64 {
        self.upper_threshold
    }

    #[inline]
    pub fn previous_time(&self) -> Option<f64> {
        self.previous_time
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_DELTA_TIME_UPPER_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::default();
        let frame = clock.advance(1000.0);
        assert_eq!(frame.delta_time, 0.0);
        assert!(!frame.was_clamped);

        let frame = clock.advance(1016.0);
        assert_eq!(frame.delta_time, 16.0);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn large_gaps_are_clamped() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(0.0);
        let frame = clock.advance(5000.0);
        assert_eq!(frame.delta_time, 100.0);
        assert!(frame.was_clamped);
    }

    #[test]
    fn reset_forgets_previous_time() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.previous_time(), None);
        assert_eq!(clock.advance(3000.0).delta_time, 0.0);
    }

    #[test]
    fn backwards_time_yields_zero_delta() {
        let mut clock = FrameClock::default();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0).delta_time, 0.0);
    }
}
