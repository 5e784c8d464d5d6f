//! Slow random per-tile colour drift.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::HslDelta;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorShiftConfig {
    /// Peak colour offset.
    pub delta: HslDelta,
    /// Shortest per-tile oscillation period in milliseconds.
    pub period_min: f64,
    pub period_max: f64,
}

impl Default for ColorShiftConfig {
    fn default() -> Self {
        Self {
            delta: HslDelta::new(4.0, 4.0, 3.0),
            period_min: 3_000.0,
            period_max: 9_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Oscillator {
    phase: f32,
    period: f64,
}

/// Persistent. Each tile oscillates around its colour with its own random
/// phase and period.
pub struct ColorShiftJob {
    config: ColorShiftConfig,
    state: JobState,
    /// Indexed by arena slot; grows lazily when sectors add tiles.
    oscillators: Vec<Oscillator>,
}

impl ColorShiftJob {
    pub fn new(config: ColorShiftConfig) -> Self {
        Self {
            config,
            state: JobState::new(0.0),
            oscillators: Vec::new(),
        }
    }

    fn ensure_oscillators<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        while self.oscillators.len() < count {
            let period = if self.config.period_max > self.config.period_min {
                rng.gen_range(self.config.period_min..self.config.period_max)
            } else {
                self.config.period_min
            };
            self.oscillators.push(Oscillator {
                phase: rng.gen_range(0.0..TAU),
                period,
            });
        }
    }
}

super::job_builders!(ColorShiftJob);

impl AnimationJob for ColorShiftJob {
    fn name(&self) -> &'static str {
        "ColorShiftJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let count = ctx.scene.grid.tiles().len();
        self.ensure_oscillators(count, &mut ctx.scene.rng);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let scene = &mut *ctx.scene;
        self.ensure_oscillators(scene.grid.tiles().len(), &mut scene.rng);

        let elapsed = self.state.elapsed(ctx.current_time);
        let delta = self.config.delta;
        let oscillators = &self.oscillators;
        scene.grid.for_each_active_tile(|tile| {
            if let Some(oscillator) = oscillators.get(tile.id.index()) {
                let angle = (elapsed / oscillator.period) as f32 * TAU + oscillator.phase;
                tile.add_color(delta * angle.sin());
            }
        });
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{test_support, ColorResetJob};

    #[test]
    fn shift_stays_within_delta() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let config = ColorShiftConfig::default();
        test_support::start(&mut animator, &mut scene, ColorResetJob::new());
        test_support::start(&mut animator, &mut scene, ColorShiftJob::new(config.clone()));

        let mut changed = false;
        for frame in 1..40 {
            animator.tick(&mut scene, frame as f64 * 100.0);
            for tile in scene.grid.active_tiles() {
                let offset = tile.current_color.l - tile.original_color.l;
                assert!(offset.abs() <= config.delta.l + 1e-4);
                changed |= offset.abs() > 1e-3;
            }
        }
        assert!(changed);
    }
}
