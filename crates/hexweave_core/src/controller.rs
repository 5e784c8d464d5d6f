//! Controller: the composition root
//!
//! Owns the [`Scene`] and the [`Animator`], registers the persistent jobs,
//! turns pointer input into transitions and effects, and runs the schedule
//! of recurring transient jobs. Only one open/close transition is ever in
//! flight; starting another cancels the previous one first.

use crate::animator::{AnimationJob, Animator, FrameScheduler, JobId};
use crate::annotations::AnnotationsJob;
use crate::config::{ensure, ConfigError, HexConfig};
use crate::jobs::{
    ClosePostJob, ColorResetJob, ColorShiftJob, ColorWaveJob, DisplacementRadiateJob, DisplacementResetJob,
    DisplacementWaveJob, GridJob, HighlightHoverJob, HighlightRadiateJob, LineJob, LinesRadiateJob, OpenPostJob,
    RandomLineJob, ShimmerRadiateJob, SpreadJob, TileBorderJob,
};
use crate::layout::DIRECTION_COUNT;
use crate::math::Vec2;
use crate::post::PostData;
use crate::scene::Scene;
use crate::topology::TileId;
use crate::visual::DisplayList;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// One-shot jobs the controller can start on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransientJobKind {
    HighlightHover,
    HighlightRadiate,
    ShimmerRadiate,
    DisplacementRadiate,
    Spread,
    TileBorder,
    Line,
    RandomLine,
    LinesRadiate,
}

impl TransientJobKind {
    pub const ALL: [TransientJobKind; 9] = [
        TransientJobKind::HighlightHover,
        TransientJobKind::HighlightRadiate,
        TransientJobKind::ShimmerRadiate,
        TransientJobKind::DisplacementRadiate,
        TransientJobKind::Spread,
        TransientJobKind::TileBorder,
        TransientJobKind::Line,
        TransientJobKind::RandomLine,
        TransientJobKind::LinesRadiate,
    ];
}

/// A transient job started at random intervals of `avg_delay ± delay_deviation` ms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringJobConfig {
    pub kind: TransientJobKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub avg_delay: f64,
    #[serde(default)]
    pub delay_deviation: f64,
    /// Whether the job may start while a post is open.
    #[serde(default)]
    pub can_run_with_open_grid: bool,
}

fn default_true() -> bool {
    true
}

impl RecurringJobConfig {
    pub fn new(kind: TransientJobKind, avg_delay: f64, delay_deviation: f64) -> Self {
        Self {
            kind,
            enabled: true,
            avg_delay,
            delay_deviation,
            can_run_with_open_grid: false,
        }
    }

    fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.delay_deviation > 0.0 {
            self.avg_delay + rng.gen_range(-self.delay_deviation..=self.delay_deviation)
        } else {
            self.avg_delay
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    pub recurring_jobs: Vec<RecurringJobConfig>,
    /// Flash the tile under the pointer when the hover moves onto it.
    pub highlight_on_hover: bool,
    /// Effects started when a tile without content is pressed.
    pub press_effects: Vec<TransientJobKind>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            recurring_jobs: vec![
                RecurringJobConfig {
                    can_run_with_open_grid: true,
                    ..RecurringJobConfig::new(TransientJobKind::RandomLine, 2_500.0, 1_500.0)
                },
                RecurringJobConfig::new(TransientJobKind::LinesRadiate, 7_000.0, 3_000.0),
                RecurringJobConfig::new(TransientJobKind::HighlightRadiate, 11_000.0, 4_000.0),
                RecurringJobConfig::new(TransientJobKind::DisplacementRadiate, 13_000.0, 5_000.0),
                RecurringJobConfig {
                    enabled: false,
                    ..RecurringJobConfig::new(TransientJobKind::ShimmerRadiate, 9_000.0, 3_000.0)
                },
            ],
            highlight_on_hover: true,
            press_effects: vec![
                TransientJobKind::DisplacementRadiate,
                TransientJobKind::HighlightRadiate,
                TransientJobKind::LinesRadiate,
            ],
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for recurring in &self.recurring_jobs {
            ensure(
                recurring.avg_delay > 0.0,
                "controller.recurringJobs.avgDelay",
                recurring.avg_delay,
                "positive",
            )?;
            ensure(
                recurring.delay_deviation >= 0.0 && recurring.delay_deviation < recurring.avg_delay,
                "controller.recurringJobs.delayDeviation",
                recurring.delay_deviation,
                "non-negative and below avgDelay",
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct Controller {
    scene: Scene,
    animator: Animator,
    /// The open/close job in flight, if any.
    transition: Option<JobId>,
    /// Next start time per recurring job, parallel to the config list.
    next_recurring: Vec<Option<f64>>,
    current_time: f64,
}

impl Controller {
    /// Build the scene and register the persistent jobs.
    pub fn new(
        mut config: HexConfig,
        posts: Vec<PostData>,
        viewport: Vec2,
        scheduler: Box<dyn FrameScheduler>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.compute_dependent_values();
        config.validate()?;
        let animator = Animator::new(&config.animator, scheduler);
        let scene = Scene::new(config, posts, viewport, seed);
        let mut controller = Self {
            scene,
            animator,
            transition: None,
            next_recurring: Vec::new(),
            current_time: 0.0,
        };
        controller.start_persistent_jobs();
        info!(
            posts = controller.scene.posts.len(),
            tiles = controller.scene.grid.all_tiles().len(),
            "controller ready"
        );
        Ok(controller)
    }

    fn start_persistent_jobs(&mut self) {
        let jobs = self.scene.config.jobs.clone();
        let annotations = self.scene.config.annotations.clone();
        let persistent: [Box<dyn AnimationJob>; 7] = [
            Box::new(GridJob::new()),
            Box::new(ColorResetJob::new()),
            Box::new(DisplacementResetJob::new()),
            Box::new(ColorShiftJob::new(jobs.color_shift)),
            Box::new(ColorWaveJob::new(jobs.color_wave)),
            Box::new(DisplacementWaveJob::new(jobs.displacement_wave)),
            Box::new(AnnotationsJob::new(annotations)),
        ];
        for job in persistent {
            self.animator.start_job(&mut self.scene, job, self.current_time);
        }
        self.next_recurring = vec![None; self.scene.config.controller.recurring_jobs.len()];
    }

    /// Cancel everything, rebuild the grid for `viewport` and restart the
    /// persistent jobs.
    pub fn resize(&mut self, viewport: Vec2, current_time: f64) {
        self.current_time = current_time;
        self.animator.cancel_all(&mut self.scene, current_time);
        self.transition = None;
        self.scene.resize(viewport);
        self.start_persistent_jobs();
    }

    /// Run one animation frame, first starting any recurring jobs that are due.
    pub fn tick(&mut self, current_time: f64) {
        self.current_time = current_time;
        self.run_recurring_jobs(current_time);
        self.animator.tick(&mut self.scene, current_time);
    }

    fn run_recurring_jobs(&mut self, current_time: f64) {
        let recurring_jobs = self.scene.config.controller.recurring_jobs.clone();
        for (index, recurring) in recurring_jobs.iter().enumerate() {
            if !recurring.enabled {
                continue;
            }
            let Some(slot) = self.next_recurring.get(index).copied() else { continue };
            let due = match slot {
                Some(next) => next,
                None => {
                    let next = current_time + recurring.next_delay(&mut self.scene.rng);
                    self.next_recurring[index] = Some(next);
                    next
                }
            };
            if current_time < due {
                continue;
            }
            let grid = &self.scene.grid;
            if !grid.is_transitioning && (recurring.can_run_with_open_grid || !grid.is_post_open) {
                self.start_transient_job(recurring.kind, None, current_time);
            }
            self.next_recurring[index] = Some(current_time + recurring.next_delay(&mut self.scene.rng));
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Move the hover highlight to the tile under `point`.
    pub fn pointer_moved(&mut self, point: Vec2, current_time: f64) {
        let tile = self.scene.grid.tile_at(point);
        if tile == self.scene.grid.hovered_tile() {
            return;
        }
        self.scene.grid.set_hovered_tile(tile);
        if let (Some(tile), true) = (tile, self.scene.config.controller.highlight_on_hover) {
            self.start_transient_job(TransientJobKind::HighlightHover, Some(tile), current_time);
        }
    }

    pub fn pointer_left(&mut self) {
        self.scene.grid.set_hovered_tile(None);
    }

    /// Open the post under `point`, close the open post, or play the press
    /// effects on a tile without content.
    pub fn pointer_pressed(&mut self, point: Vec2, current_time: f64) {
        let grid = &self.scene.grid;
        let tile = grid.tile_at(point);
        if grid.is_post_open {
            if tile.is_none() || tile != grid.expanded_tile {
                self.close_post(current_time);
            }
            return;
        }

        let Some(tile) = tile.or_else(|| grid.nearest_tile(point)) else { return };
        if grid.tile(tile).is_some_and(|t| t.holds_content()) {
            self.open_post(tile, current_time);
        } else {
            for kind in self.scene.config.controller.press_effects.clone() {
                self.start_transient_job(kind, Some(tile), current_time);
            }
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn cancel_transition(&mut self, current_time: f64) {
        if let Some(id) = self.transition.take() {
            if self.animator.is_running(id) {
                debug!(id, "cancelling in-flight transition");
                self.animator.cancel_job(&mut self.scene, id, current_time);
            }
        }
    }

    /// Expand the grid around `tile` and show its post. Returns false when
    /// the tile holds no content.
    pub fn open_post(&mut self, tile: TileId, current_time: f64) -> bool {
        self.current_time = current_time;
        if !self.scene.grid.tile(tile).is_some_and(|t| t.holds_content()) {
            return false;
        }
        self.cancel_transition(current_time);
        let job = OpenPostJob::new(&self.scene.config.jobs, tile);
        self.transition = Some(self.animator.start_job(&mut self.scene, Box::new(job), current_time));
        true
    }

    /// Collapse the grid. Returns false when no post is open.
    pub fn close_post(&mut self, current_time: f64) -> bool {
        self.current_time = current_time;
        if !self.scene.grid.is_post_open {
            return false;
        }
        self.cancel_transition(current_time);
        let job = ClosePostJob::new(&self.scene.config.jobs);
        self.transition = Some(self.animator.start_job(&mut self.scene, Box::new(job), current_time));
        true
    }

    // ========================================================================
    // Transient jobs
    // ========================================================================

    /// Start a one-shot job on `tile`, or on a random active tile when `None`.
    pub fn start_transient_job(
        &mut self,
        kind: TransientJobKind,
        tile: Option<TileId>,
        current_time: f64,
    ) -> Option<JobId> {
        let scene = &mut self.scene;
        let tile = match tile {
            Some(tile) => tile,
            None => *scene.grid.all_tiles().choose(&mut scene.rng)?,
        };
        let point = scene.grid.tile(tile)?.particle.position;
        let jobs = &scene.config.jobs;
        let job: Box<dyn AnimationJob> = match kind {
            TransientJobKind::HighlightHover => Box::new(HighlightHoverJob::new(jobs.highlight_hover.clone(), tile)),
            TransientJobKind::HighlightRadiate => {
                Box::new(HighlightRadiateJob::new(jobs.highlight_radiate.clone(), point))
            }
            TransientJobKind::ShimmerRadiate => Box::new(ShimmerRadiateJob::new(jobs.shimmer_radiate.clone(), point)),
            TransientJobKind::DisplacementRadiate => {
                Box::new(DisplacementRadiateJob::new(jobs.displacement_radiate.clone(), point))
            }
            TransientJobKind::Spread => Box::new(SpreadJob::new(jobs.spread.clone(), tile)),
            TransientJobKind::TileBorder => Box::new(TileBorderJob::new(jobs.tile_border.clone(), tile)),
            TransientJobKind::Line => {
                let corner = scene.rng.gen_range(0..DIRECTION_COUNT);
                Box::new(LineJob::new(jobs.line.clone(), tile, corner))
            }
            TransientJobKind::RandomLine => Box::new(RandomLineJob::new(jobs.line.clone())),
            TransientJobKind::LinesRadiate => Box::new(LinesRadiateJob::new(jobs.lines_radiate.clone(), tile)),
        };
        Some(self.animator.start_job(&mut self.scene, job, current_time))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn config(&self) -> &HexConfig {
        &self.scene.config
    }

    /// Mutable access for live editing; call [`Controller::apply_config`] afterwards.
    pub fn config_mut(&mut self) -> &mut HexConfig {
        &mut self.scene.config
    }

    /// Recompute derived values, validate and restart with the edited config.
    pub fn apply_config(&mut self, current_time: f64) -> Result<(), ConfigError> {
        self.scene.config.compute_dependent_values();
        self.scene.config.validate()?;
        self.animator.apply_config(&self.scene.config.animator);
        self.scene.display.background = self.scene.config.grid.background_color;
        let viewport = self.scene.viewport();
        self.resize(viewport, current_time);
        info!("configuration applied");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn tile_at(&self, point: Vec2) -> Option<TileId> {
        self.scene.grid.tile_at(point)
    }

    /// Post shown by the open page post.
    pub fn open_post_data(&self) -> Option<&PostData> {
        self.scene.open_post()
    }

    pub fn display(&self) -> &DisplayList {
        &self.scene.display
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some_and(|id| self.animator.is_running(id))
    }
}
