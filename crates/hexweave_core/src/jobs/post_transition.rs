//! Open/close orchestrators
//!
//! Neither job animates anything itself. They flip the grid's post flags,
//! build or tear down the sectors and page post, and start their sub-jobs at
//! fixed fractions of their own duration. Completion is gated purely on
//! duration, so sub-jobs may still be running when the parent completes.

use super::{DilateSectorsJob, FadePostJob, JobState, JobsConfig, PanJob, SpreadConfig, SpreadJob};
use crate::animator::{AnimationJob, JobContext, JobId};
use crate::config::{ensure, ConfigError};
use crate::grid::Grid;
use crate::topology::TileId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Sub-job start offsets as fractions of the transition duration. `None`
/// skips that sub-job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostTransitionConfig {
    pub duration: f64,
    pub spread_offset: Option<f32>,
    pub pan_offset: Option<f32>,
    pub dilate_offset: Option<f32>,
    pub fade_offset: Option<f32>,
}

impl Default for PostTransitionConfig {
    fn default() -> Self {
        Self::opening()
    }
}

impl PostTransitionConfig {
    pub fn opening() -> Self {
        Self {
            duration: 1_200.0,
            spread_offset: Some(0.0),
            pan_offset: Some(0.0),
            dilate_offset: Some(0.25),
            fade_offset: Some(0.6),
        }
    }

    pub fn closing() -> Self {
        Self {
            duration: 1_000.0,
            spread_offset: None,
            pan_offset: Some(0.3),
            dilate_offset: Some(0.2),
            fade_offset: Some(0.0),
        }
    }

    /// Check every offset lies in `[0, 1]`. `field` names the config section.
    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        for offset in [self.spread_offset, self.pan_offset, self.dilate_offset, self.fade_offset]
            .into_iter()
            .flatten()
        {
            ensure((0.0..=1.0).contains(&offset), field, offset as f64, "offsets within [0, 1]")?;
        }
        Ok(())
    }
}

/// Sub-jobs not yet started, paired with their start fraction.
struct Schedule {
    pending: Vec<(f32, Box<dyn AnimationJob>)>,
    started: Vec<JobId>,
}

impl Schedule {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
            started: Vec::new(),
        }
    }

    fn push(&mut self, offset: Option<f32>, job: impl AnimationJob + 'static) {
        if let Some(offset) = offset {
            self.pending.push((offset, Box::new(job)));
        }
    }

    /// Start every sub-job whose offset is at or below `ratio`.
    fn start_due(&mut self, ctx: &mut JobContext<'_>, ratio: f32) {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(offset, _)| *offset <= ratio);
        self.pending = later;
        for (_, job) in due {
            self.started.push(ctx.start_job(job));
        }
    }

    /// Cancel started sub-jobs and drop the rest.
    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        for id in self.started.drain(..) {
            ctx.cancel_job(id);
        }
        self.pending.clear();
    }

    fn ratio(state: &JobState, current_time: f64) -> f32 {
        if state.duration <= 0.0 {
            1.0
        } else {
            (state.elapsed(current_time) / state.duration) as f32
        }
    }
}

fn close_grid(grid: &mut Grid) {
    grid.destroy_sectors();
    grid.destroy_page_post();
    grid.is_post_open = false;
    grid.is_transitioning = false;
    grid.expanded_tile = None;
}

// ============================================================================
// Open
// ============================================================================

pub struct OpenPostJob {
    state: JobState,
    tile: TileId,
    schedule: Schedule,
}

impl OpenPostJob {
    pub fn new(jobs: &JobsConfig, tile: TileId) -> Self {
        let config = &jobs.open_post;
        let mut schedule = Schedule::new();
        schedule.push(config.spread_offset, SpreadJob::new(jobs.spread.clone(), tile));
        schedule.push(config.pan_offset, PanJob::new(jobs.pan.clone(), Some(tile)));
        schedule.push(config.dilate_offset, DilateSectorsJob::new(jobs.dilate.clone(), true));
        schedule.push(config.fade_offset, FadePostJob::new(jobs.fade_post.clone(), true));
        Self {
            state: JobState::new(config.duration),
            tile,
            schedule,
        }
    }

    #[inline]
    pub fn tile(&self) -> TileId {
        self.tile
    }
}

super::job_builders!(OpenPostJob);

impl AnimationJob for OpenPostJob {
    fn name(&self) -> &'static str {
        "OpenPostJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let grid = &mut ctx.scene.grid;
        if grid.is_post_open {
            debug!("replacing the open post");
            close_grid(grid);
        }
        grid.is_post_open = true;
        grid.is_transitioning = true;
        grid.expanded_tile = Some(self.tile);
        grid.create_sectors(self.tile);
        if grid.create_page_post(self.tile) {
            if let Some(post) = ctx.scene.open_post() {
                info!(post = %post.id, "opening post");
            }
        }
        self.schedule.start_due(ctx, 0.0);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        if self.state.is_elapsed(ctx.current_time) {
            self.schedule.start_due(ctx, f32::INFINITY);
            ctx.scene.grid.is_transitioning = false;
            self.state.complete(ctx);
        } else {
            let ratio = Schedule::ratio(&self.state, ctx.current_time);
            self.schedule.start_due(ctx, ratio);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.schedule.cancel(ctx);
        close_grid(&mut ctx.scene.grid);
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

// ============================================================================
// Close
// ============================================================================

pub struct ClosePostJob {
    state: JobState,
    schedule: Schedule,
    /// Spread around the expanded tile, resolved at start.
    spread: Option<(f32, SpreadConfig)>,
}

impl ClosePostJob {
    pub fn new(jobs: &JobsConfig) -> Self {
        let config = &jobs.close_post;
        let mut schedule = Schedule::new();
        schedule.push(config.fade_offset, FadePostJob::new(jobs.fade_post.clone(), false));
        schedule.push(config.dilate_offset, DilateSectorsJob::new(jobs.dilate.clone(), false));
        schedule.push(config.pan_offset, PanJob::new(jobs.pan.clone(), None));
        Self {
            state: JobState::new(config.duration),
            schedule,
            spread: config.spread_offset.map(|offset| (offset, jobs.spread.clone())),
        }
    }
}

super::job_builders!(ClosePostJob);

impl AnimationJob for ClosePostJob {
    fn name(&self) -> &'static str {
        "ClosePostJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        if let Some(post) = ctx.scene.open_post() {
            info!(post = %post.id, "closing post");
        }
        ctx.scene.grid.is_transitioning = true;
        if let (Some((offset, config)), Some(tile)) = (self.spread.take(), ctx.scene.grid.expanded_tile) {
            self.schedule.push(Some(offset), SpreadJob::new(config, tile));
        }
        self.schedule.start_due(ctx, 0.0);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        if self.state.is_elapsed(ctx.current_time) {
            self.schedule.start_due(ctx, f32::INFINITY);
            close_grid(&mut ctx.scene.grid);
            self.state.complete(ctx);
        } else {
            let ratio = Schedule::ratio(&self.state, ctx.current_time);
            self.schedule.start_due(ctx, ratio);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.schedule.cancel(ctx);
        close_grid(&mut ctx.scene.grid);
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}
