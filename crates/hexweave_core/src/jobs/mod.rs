//! Animation jobs
//!
//! Every job owns a [`JobState`] carrying its timing and completion callback.
//! Persistent jobs (waves, resets, the grid driver) run until cancelled;
//! transient jobs complete on their own.
//!
//! Constructors take the job's config by value plus the target, and every
//! job accepts `with_duration` and `on_complete` builders.

mod color_shift;
mod dilate;
mod fade_post;
mod grid_job;
mod highlight_hover;
mod line;
mod lines_radiate;
mod pan;
mod post_transition;
mod radiate;
mod reset;
mod spread;
mod tile_border;
mod wave;

pub use color_shift::{ColorShiftConfig, ColorShiftJob};
pub use dilate::{DilateConfig, DilateSectorsJob};
pub use fade_post::{FadePostConfig, FadePostJob};
pub use grid_job::GridJob;
pub use highlight_hover::{HighlightHoverConfig, HighlightHoverJob};
pub use line::{junction_position, Junction, LineConfig, LineJob, RandomLineJob};
pub use lines_radiate::LinesRadiateJob;
pub use pan::{PanConfig, PanJob};
pub use post_transition::{ClosePostJob, OpenPostJob, PostTransitionConfig};
pub use radiate::{
    DisplacementRadiateConfig, DisplacementRadiateJob, HighlightRadiateConfig, HighlightRadiateJob,
    RadiateRing, RingConfig, ShimmerRadiateConfig, ShimmerRadiateJob,
};
pub use reset::{ColorResetJob, DisplacementResetJob};
pub use spread::{SpreadConfig, SpreadJob};
pub use tile_border::{TileBorderConfig, TileBorderJob};
pub use wave::{ColorWaveConfig, ColorWaveJob, DisplacementWaveConfig, DisplacementWaveJob};

use crate::animator::{JobCallback, JobContext, JobOutcome};
use crate::config::{ensure, ConfigError};
use crate::easing;
use serde::{Deserialize, Serialize};

// ============================================================================
// Shared lifecycle state
// ============================================================================

/// Timing and completion bookkeeping shared by every job.
pub struct JobState {
    pub start_time: f64,
    pub duration: f64,
    is_started: bool,
    is_complete: bool,
    on_complete: Option<JobCallback>,
}

impl JobState {
    pub fn new(duration: f64) -> Self {
        Self {
            start_time: 0.0,
            duration,
            is_started: false,
            is_complete: false,
            on_complete: None,
        }
    }

    pub fn set_callback(&mut self, callback: JobCallback) {
        self.on_complete = Some(callback);
    }

    pub fn start(&mut self, current_time: f64) {
        self.start_time = current_time;
        self.is_started = true;
    }

    #[inline]
    pub fn elapsed(&self, current_time: f64) -> f64 {
        current_time - self.start_time
    }

    /// Linear progress through `duration`, clamped to `[0, 1]`.
    #[inline]
    pub fn progress(&self, current_time: f64) -> f32 {
        easing::progress(current_time, self.start_time, self.duration)
    }

    #[inline]
    pub fn is_elapsed(&self, current_time: f64) -> bool {
        self.elapsed(current_time) >= self.duration
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.is_started
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Mark the job complete and fire the callback. Later calls are no-ops.
    pub fn finish(&mut self, ctx: &mut JobContext<'_>, outcome: JobOutcome) {
        if self.is_complete {
            return;
        }
        self.is_complete = true;
        if let Some(callback) = self.on_complete.take() {
            callback(ctx, outcome);
        }
    }

    #[inline]
    pub fn complete(&mut self, ctx: &mut JobContext<'_>) {
        self.finish(ctx, JobOutcome::Completed);
    }

    #[inline]
    pub fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.finish(ctx, JobOutcome::Cancelled);
    }
}

/// `with_duration` / `on_complete` builders for types holding a [`JobState`].
macro_rules! job_builders {
    ($job:ty) => {
        impl $job {
            /// Override the configured duration for this instance.
            pub fn with_duration(mut self, duration: f64) -> Self {
                self.state.duration = duration;
                self
            }

            pub fn on_complete(
                mut self,
                callback: impl FnOnce(&mut $crate::animator::JobContext<'_>, $crate::animator::JobOutcome) + 'static,
            ) -> Self {
                self.state.set_callback(Box::new(callback));
                self
            }
        }
    };
}
pub(crate) use job_builders;

// ============================================================================
// Configuration
// ============================================================================

/// Per-job configuration, copied into each job at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobsConfig {
    pub color_shift: ColorShiftConfig,
    pub color_wave: ColorWaveConfig,
    pub displacement_wave: DisplacementWaveConfig,
    pub highlight_hover: HighlightHoverConfig,
    pub highlight_radiate: HighlightRadiateConfig,
    pub shimmer_radiate: ShimmerRadiateConfig,
    pub displacement_radiate: DisplacementRadiateConfig,
    pub spread: SpreadConfig,
    pub pan: PanConfig,
    pub dilate: DilateConfig,
    pub fade_post: FadePostConfig,
    pub open_post: PostTransitionConfig,
    pub close_post: PostTransitionConfig,
    pub line: LineConfig,
    pub lines_radiate: LineConfig,
    pub tile_border: TileBorderConfig,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            color_shift: ColorShiftConfig::default(),
            color_wave: ColorWaveConfig::default(),
            displacement_wave: DisplacementWaveConfig::default(),
            highlight_hover: HighlightHoverConfig::default(),
            highlight_radiate: HighlightRadiateConfig::default(),
            shimmer_radiate: ShimmerRadiateConfig::default(),
            displacement_radiate: DisplacementRadiateConfig::default(),
            spread: SpreadConfig::default(),
            pan: PanConfig::default(),
            dilate: DilateConfig::default(),
            fade_post: FadePostConfig::default(),
            open_post: PostTransitionConfig::opening(),
            close_post: PostTransitionConfig::closing(),
            line: LineConfig::default(),
            lines_radiate: LineConfig::radiating(),
            tile_border: TileBorderConfig::default(),
        }
    }
}

impl JobsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("jobs.highlightHover.duration", self.highlight_hover.duration),
            ("jobs.highlightRadiate.duration", self.highlight_radiate.duration),
            ("jobs.shimmerRadiate.duration", self.shimmer_radiate.duration),
            ("jobs.displacementRadiate.duration", self.displacement_radiate.duration),
            ("jobs.spread.duration", self.spread.duration),
            ("jobs.pan.duration", self.pan.duration),
            ("jobs.dilate.duration", self.dilate.duration),
            ("jobs.fadePost.duration", self.fade_post.duration),
            ("jobs.openPost.duration", self.open_post.duration),
            ("jobs.closePost.duration", self.close_post.duration),
            ("jobs.line.duration", self.line.duration),
            ("jobs.linesRadiate.duration", self.lines_radiate.duration),
            ("jobs.tileBorder.duration", self.tile_border.duration),
        ] {
            ensure(value >= 0.0 && value.is_finite(), field, value, "finite and non-negative")?;
        }
        for (field, value) in [
            ("jobs.colorShift.periodMin", self.color_shift.period_min),
            ("jobs.colorWave.period", self.color_wave.period),
            ("jobs.colorWave.wavelength", self.color_wave.wavelength as f64),
            ("jobs.displacementWave.period", self.displacement_wave.period),
            ("jobs.displacementWave.wavelength", self.displacement_wave.wavelength as f64),
            ("jobs.line.segmentDuration", self.line.segment_duration),
            ("jobs.linesRadiate.segmentDuration", self.lines_radiate.segment_duration),
        ] {
            ensure(value > 0.0, field, value, "positive")?;
        }
        ensure(
            self.color_shift.period_max >= self.color_shift.period_min,
            "jobs.colorShift.periodMax",
            self.color_shift.period_max,
            "at least periodMin",
        )?;
        for (field, value) in [
            ("jobs.highlightRadiate.waveWidth", self.highlight_radiate.ring.wave_width),
            ("jobs.shimmerRadiate.waveWidth", self.shimmer_radiate.ring.wave_width),
            ("jobs.displacementRadiate.waveWidth", self.displacement_radiate.ring.wave_width),
        ] {
            ensure(value > 0.0, field, value as f64, "positive")?;
        }
        self.open_post.validate("jobs.openPost")?;
        self.close_post.validate("jobs.closePost")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::animator::{AnimationJob, Animator, NoopScheduler};
    use crate::config::HexConfig;
    use crate::math::Vec2;
    use crate::scene::Scene;

    pub fn scene() -> Scene {
        Scene::new(HexConfig::default(), Vec::new(), Vec2::new(800.0, 600.0), 7)
    }

    pub fn scene_with_posts(count: usize) -> Scene {
        let posts = (0..count)
            .map(|i| crate::post::PostData {
                id: format!("post-{i}"),
                ..Default::default()
            })
            .collect();
        Scene::new(HexConfig::default(), posts, Vec2::new(800.0, 600.0), 7)
    }

    pub fn animator() -> Animator {
        Animator::new(&HexConfig::default().animator, Box::new(NoopScheduler))
    }

    /// Tick until the animator drains or `limit` ms pass. Returns the final time.
    pub fn run_until_idle(animator: &mut Animator, scene: &mut Scene, mut time: f64, limit: f64) -> f64 {
        let end = time + limit;
        while animator.job_count() > 0 && time < end {
            time += 16.0;
            animator.tick(scene, time);
        }
        time
    }

    pub fn start(animator: &mut Animator, scene: &mut Scene, job: impl AnimationJob + 'static) -> u64 {
        animator.start_job(scene, Box::new(job), 0.0)
    }
}
