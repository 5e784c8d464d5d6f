//! Expanding-ring effects
//!
//! A ring of width `wave_width` grows outward from a start point at `speed`
//! pixels per millisecond. Tiles inside `[max - wave_width, max]` are affected
//! in proportion to how centred they are in the ring and to the remaining
//! time budget.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::HslDelta;
use crate::grid::Grid;
use crate::math::Vec2;
use crate::topology::TileId;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingConfig {
    /// Pixels per millisecond.
    pub speed: f32,
    pub wave_width: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            speed: 0.9,
            wave_width: 300.0,
        }
    }
}

/// Distances of every active tile from the start point, measured once at start.
pub struct RadiateRing {
    origin: Vec2,
    config: RingConfig,
    distances: Vec<(TileId, f32)>,
    nearest: f32,
}

impl RadiateRing {
    pub fn new(origin: Vec2, config: RingConfig) -> Self {
        Self {
            origin,
            config,
            distances: Vec::new(),
            nearest: 0.0,
        }
    }

    pub fn measure(&mut self, grid: &Grid) {
        self.distances = grid
            .active_tiles()
            .map(|tile| (tile.id, tile.particle.position.distance(self.origin)))
            .collect();
        self.nearest = self
            .distances
            .iter()
            .map(|&(_, distance)| distance)
            .fold(f32::INFINITY, f32::min);
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Outer edge of the ring after `elapsed` milliseconds.
    #[inline]
    pub fn max_distance(&self, elapsed: f64) -> f32 {
        elapsed as f32 * self.config.speed
    }

    /// Tiles inside the ring with their centredness in `[0, 1]`.
    pub fn tiles_in_ring(&self, elapsed: f64) -> impl Iterator<Item = (TileId, f32, f32)> + '_ {
        let max = self.max_distance(elapsed);
        let half_width = self.config.wave_width * 0.5;
        let center = max - half_width;
        self.distances
            .iter()
            .filter(move |&&(_, distance)| distance <= max && distance >= max - self.config.wave_width)
            .map(move |&(id, distance)| (id, distance, 1.0 - (distance - center).abs() / half_width))
    }

    /// Stop tracking tiles at arena index `first` or beyond.
    pub fn release_tiles(&mut self, first: usize) {
        self.distances.retain(|(id, _)| id.index() < first);
    }

    /// True once the ring has reached the nearest tile and no longer covers any.
    pub fn is_exhausted(&self, elapsed: f64) -> bool {
        self.max_distance(elapsed) >= self.nearest && self.tiles_in_ring(elapsed).next().is_none()
    }
}

/// Shared frame logic: returns false once the job should complete.
fn ring_frame(
    state: &JobState,
    ring: &RadiateRing,
    current_time: f64,
    mut apply: impl FnMut(TileId, f32, f32, f32),
) -> bool {
    if state.is_elapsed(current_time) {
        return false;
    }
    let elapsed = state.elapsed(current_time);
    if ring.is_exhausted(elapsed) {
        return false;
    }
    let remaining = 1.0 - state.progress(current_time);
    for (id, distance, centered) in ring.tiles_in_ring(elapsed) {
        apply(id, distance, centered, remaining);
    }
    true
}

// ============================================================================
// Highlight
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightRadiateConfig {
    pub duration: f64,
    pub ring: RingConfig,
    pub delta: HslDelta,
}

impl Default for HighlightRadiateConfig {
    fn default() -> Self {
        Self {
            duration: 1_500.0,
            ring: RingConfig::default(),
            delta: HslDelta::new(0.0, 20.0, 22.0),
        }
    }
}

pub struct HighlightRadiateJob {
    state: JobState,
    ring: RadiateRing,
    delta: HslDelta,
}

impl HighlightRadiateJob {
    pub fn new(config: HighlightRadiateConfig, start_point: Vec2) -> Self {
        Self {
            state: JobState::new(config.duration),
            ring: RadiateRing::new(start_point, config.ring),
            delta: config.delta,
        }
    }
}

super::job_builders!(HighlightRadiateJob);

impl AnimationJob for HighlightRadiateJob {
    fn name(&self) -> &'static str {
        "HighlightRadiateJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        self.ring.measure(&ctx.scene.grid);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let grid = &mut ctx.scene.grid;
        let delta = self.delta;
        let running = ring_frame(&self.state, &self.ring, ctx.current_time, |id, _, centered, remaining| {
            if let Some(tile) = grid.tile_mut(id) {
                tile.add_color(delta * (centered * remaining));
            }
        });
        if !running {
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.ring.release_tiles(first);
        true
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

// ============================================================================
// Shimmer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShimmerRadiateConfig {
    pub duration: f64,
    pub ring: RingConfig,
    pub delta: HslDelta,
    /// Shimmer period in milliseconds.
    pub period: f64,
    /// Distance between shimmer crests in pixels.
    pub wavelength: f32,
}

impl Default for ShimmerRadiateConfig {
    fn default() -> Self {
        Self {
            duration: 2_000.0,
            ring: RingConfig {
                speed: 0.6,
                wave_width: 400.0,
            },
            delta: HslDelta::new(24.0, 12.0, 10.0),
            period: 300.0,
            wavelength: 180.0,
        }
    }
}

pub struct ShimmerRadiateJob {
    config: ShimmerRadiateConfig,
    state: JobState,
    ring: RadiateRing,
}

impl ShimmerRadiateJob {
    pub fn new(config: ShimmerRadiateConfig, start_point: Vec2) -> Self {
        Self {
            state: JobState::new(config.duration),
            ring: RadiateRing::new(start_point, config.ring.clone()),
            config,
        }
    }
}

super::job_builders!(ShimmerRadiateJob);

impl AnimationJob for ShimmerRadiateJob {
    fn name(&self) -> &'static str {
        "ShimmerRadiateJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        self.ring.measure(&ctx.scene.grid);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let grid = &mut ctx.scene.grid;
        let config = &self.config;
        let time = (self.state.elapsed(ctx.current_time) / config.period) as f32;
        let running = ring_frame(&self.state, &self.ring, ctx.current_time, |id, distance, centered, remaining| {
            let shimmer = ((time - distance / config.wavelength) * TAU).sin();
            if let Some(tile) = grid.tile_mut(id) {
                tile.add_color(config.delta * (shimmer * centered * remaining));
            }
        });
        if !running {
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.ring.release_tiles(first);
        true
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

// ============================================================================
// Displacement
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplacementRadiateConfig {
    pub duration: f64,
    pub ring: RingConfig,
    /// Peak outward force.
    pub force: f32,
}

impl Default for DisplacementRadiateConfig {
    fn default() -> Self {
        Self {
            duration: 1_200.0,
            ring: RingConfig {
                speed: 0.8,
                wave_width: 240.0,
            },
            force: 0.003,
        }
    }
}

/// Pushes tiles in the ring away from the start point; the springs pull them back.
pub struct DisplacementRadiateJob {
    state: JobState,
    ring: RadiateRing,
    force: f32,
}

impl DisplacementRadiateJob {
    pub fn new(config: DisplacementRadiateConfig, start_point: Vec2) -> Self {
        Self {
            state: JobState::new(config.duration),
            ring: RadiateRing::new(start_point, config.ring),
            force: config.force,
        }
    }
}

super::job_builders!(DisplacementRadiateJob);

impl AnimationJob for DisplacementRadiateJob {
    fn name(&self) -> &'static str {
        "DisplacementRadiateJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        self.ring.measure(&ctx.scene.grid);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let grid = &mut ctx.scene.grid;
        let origin = self.ring.origin();
        let force = self.force;
        let running = ring_frame(&self.state, &self.ring, ctx.current_time, |id, _, centered, remaining| {
            if let Some(tile) = grid.tile_mut(id) {
                let outward = (tile.particle.position - origin).normalize_or_zero();
                tile.apply_external_force(outward * (force * centered * remaining));
            }
        });
        if !running {
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.ring.release_tiles(first);
        true
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{test_support, ColorResetJob, GridJob};

    #[test]
    fn ring_window_tracks_elapsed_time() {
        let scene = test_support::scene();
        let origin = scene.grid.tile(scene.grid.all_tiles()[0]).unwrap().particle.position;
        let mut ring = RadiateRing::new(origin, RingConfig { speed: 1.0, wave_width: 100.0 });
        ring.measure(&scene.grid);

        for (id, distance, centered) in ring.tiles_in_ring(500.0) {
            assert!((400.0..=500.0).contains(&distance), "{id:?} at {distance}");
            assert!((0.0..=1.0).contains(&centered));
        }
        assert!(!ring.is_exhausted(0.0));
        assert!(ring.is_exhausted(1.0e7));
    }

    #[test]
    fn highlight_brightens_then_completes_before_duration() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        test_support::start(&mut animator, &mut scene, ColorResetJob::new());
        let center = scene.viewport() * 0.5;
        let config = HighlightRadiateConfig {
            duration: 100_000.0,
            ..Default::default()
        };
        let id = test_support::start(&mut animator, &mut scene, HighlightRadiateJob::new(config, center));

        animator.tick(&mut scene, 200.0);
        let brightened = scene
            .grid
            .active_tiles()
            .filter(|tile| tile.current_color.l > tile.original_color.l)
            .count();
        assert!(brightened > 0);

        let mut time = 200.0;
        while animator.is_running(id) {
            time += 16.0;
            animator.tick(&mut scene, time);
            assert!(time < 20_000.0, "ring never exhausted");
        }
    }

    #[test]
    fn displacement_pushes_tiles_outward() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        test_support::start(&mut animator, &mut scene, GridJob::new());
        let center = scene.viewport() * 0.5;
        let config = DisplacementRadiateConfig::default();
        test_support::start(&mut animator, &mut scene, DisplacementRadiateJob::new(config, center));

        for frame in 1..30 {
            animator.tick(&mut scene, frame as f64 * 16.0);
        }
        let moved_out = scene.grid.active_tiles().any(|tile| {
            tile.particle.position.distance(center) > tile.original_anchor.distance(center) + 0.5
        });
        assert!(moved_out);
    }
}
