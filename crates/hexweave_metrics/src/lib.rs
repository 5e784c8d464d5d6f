//! Hexweave Metrics - frame and job statistics for the animator
//!
//! Provides zero-cost abstractions for metrics collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use hexweave_metrics::{FrameTimer, JobCounter};
//!
//! let mut timer = FrameTimer::new(120); // Track last 120 frames
//! timer.record(16.7, false);
//! println!("FPS: {:.1}", timer.fps());
//!
//! let mut jobs = JobCounter::new();
//! jobs.record_start("PanJob");
//! ```
//!
//! Without the `metrics` feature every type below is an empty stub.

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod job_counter;
#[cfg(feature = "metrics")]
mod ring_buffer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use job_counter::{JobCounter, JobTally};
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn record(&mut self, _delta_ms: f64, _was_clamped: bool) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
    pub fn total_frames(&self) -> u64 { 0 }
    pub fn clamped_frames(&self) -> u64 { 0 }
    pub fn reset_window(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobTally {
    pub started: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[cfg(not(feature = "metrics"))]
pub struct JobCounter;

#[cfg(not(feature = "metrics"))]
impl JobCounter {
    pub fn new() -> Self { Self }
    pub fn record_start(&mut self, _kind: &'static str) {}
    pub fn record_finish(&mut self, _kind: &'static str, _cancelled: bool) {}
    pub fn tally(&self, _kind: &str) -> JobTally { JobTally::default() }
    pub fn in_flight(&self) -> u64 { 0 }
}

#[cfg(not(feature = "metrics"))]
impl Default for JobCounter {
    fn default() -> Self { Self }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_without_metrics() {
        // Ensure stubs compile when metrics feature is disabled
        let mut timer = super::FrameTimer::new(60);
        timer.record(16.0, false);
        let mut _buffer = super::RingBuffer::<f64>::new(10);
        let mut counter = super::JobCounter::new();
        counter.record_start("LineJob");
        let _ = counter.tally("LineJob");
    }
}
