//! Animation frame timing
//!
//! The animator owns the clock, so frames are recorded from the delta it
//! computed rather than by sampling `Instant` here.

use super::ring_buffer::RingBuffer;

pub struct FrameTimer {
    frame_deltas_ms: RingBuffer<f64>,
    total_frames: u64,
    clamped_frames: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frame_deltas_ms: RingBuffer::new(capacity),
            total_frames: 0,
            clamped_frames: 0,
        }
    }

    /// Record one animation frame. `was_clamped` marks frames whose raw delta
    /// exceeded the animator's upper threshold.
    pub fn record(&mut self, delta_ms: f64, was_clamped: bool) {
        self.frame_deltas_ms.push(delta_ms);
        self.total_frames += 1;
        if was_clamped {
            self.clamped_frames += 1;
        }
    }

    pub fn fps(&self) -> f64 {
        let avg = self.frame_deltas_ms.average();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_deltas_ms.average()
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        self.frame_deltas_ms.min_max().unwrap_or((0.0, 0.0))
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }

    /// Forget rolling samples, e.g. after the loop self-paused.
    pub fn reset_window(&mut self) {
        self.frame_deltas_ms.clear();
    }
}
