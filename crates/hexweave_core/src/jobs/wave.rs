//! Travelling waves
//!
//! Each tile's phase is its distance from the wave origin modulo the
//! wavelength, so the wave travels outward without any tile-to-tile
//! communication.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::HslDelta;
use crate::math::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Phase in `[0, 1)` of a tile at `distance` from the origin.
#[inline]
fn wave_phase(distance: f32, wavelength: f32) -> f32 {
    distance.rem_euclid(wavelength) / wavelength
}

/// Sinusoidal value in `[-1, 1]` of a tile with `phase` after `elapsed` ms.
#[inline]
fn wave_value(elapsed: f64, period: f64, phase: f32) -> f32 {
    (((elapsed / period) as f32 - phase) * TAU).sin()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorWaveConfig {
    /// Wave origin as a fraction of the viewport.
    pub origin_ratio: Vec2,
    pub wavelength: f32,
    /// Time for one crest to travel one wavelength, in milliseconds.
    pub period: f64,
    pub delta: HslDelta,
}

impl Default for ColorWaveConfig {
    fn default() -> Self {
        Self {
            origin_ratio: Vec2::ZERO,
            wavelength: 1_600.0,
            period: 8_000.0,
            delta: HslDelta::new(6.0, 2.0, 4.0),
        }
    }
}

/// Persistent colour wave.
pub struct ColorWaveJob {
    config: ColorWaveConfig,
    state: JobState,
}

impl ColorWaveJob {
    pub fn new(config: ColorWaveConfig) -> Self {
        Self {
            config,
            state: JobState::new(0.0),
        }
    }
}

super::job_builders!(ColorWaveJob);

impl AnimationJob for ColorWaveJob {
    fn name(&self) -> &'static str {
        "ColorWaveJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let elapsed = self.state.elapsed(ctx.current_time);
        let origin = ctx.scene.viewport() * self.config.origin_ratio;
        let config = &self.config;
        ctx.scene.grid.for_each_active_tile(|tile| {
            let phase = wave_phase(tile.original_anchor.distance(origin), config.wavelength);
            tile.add_color(config.delta * wave_value(elapsed, config.period, phase));
        });
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplacementWaveConfig {
    pub origin_ratio: Vec2,
    pub wavelength: f32,
    pub period: f64,
    /// Peak anchor offset in pixels.
    pub amplitude: Vec2,
}

impl Default for DisplacementWaveConfig {
    fn default() -> Self {
        Self {
            origin_ratio: Vec2::new(1.0, 1.0),
            wavelength: 2_000.0,
            period: 6_000.0,
            amplitude: Vec2::new(0.0, 6.0),
        }
    }
}

/// Persistent anchor wave. Runs after [`DisplacementResetJob`](super::DisplacementResetJob).
pub struct DisplacementWaveJob {
    config: DisplacementWaveConfig,
    state: JobState,
}

impl DisplacementWaveJob {
    pub fn new(config: DisplacementWaveConfig) -> Self {
        Self {
            config,
            state: JobState::new(0.0),
        }
    }
}

super::job_builders!(DisplacementWaveJob);

impl AnimationJob for DisplacementWaveJob {
    fn name(&self) -> &'static str {
        "DisplacementWaveJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let elapsed = self.state.elapsed(ctx.current_time);
        let origin = ctx.scene.viewport() * self.config.origin_ratio;
        let config = &self.config;
        ctx.scene.grid.for_each_active_tile(|tile| {
            let phase = wave_phase(tile.original_anchor.distance(origin), config.wavelength);
            tile.current_anchor += config.amplitude * wave_value(elapsed, config.period, phase);
        });
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}
