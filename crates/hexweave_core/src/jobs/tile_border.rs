//! Fading outline around one tile.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::Hsl;
use crate::easing::Easing;
use crate::topology::TileId;
use crate::visual::Polyline;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileBorderConfig {
    pub duration: f64,
    pub color: Hsl,
    pub opacity: f32,
    pub width: f32,
    pub easing: Easing,
}

impl Default for TileBorderConfig {
    fn default() -> Self {
        Self {
            duration: 900.0,
            color: Hsl::new(190.0, 80.0, 70.0),
            opacity: 0.8,
            width: 3.0,
            easing: Easing::EaseInQuad,
        }
    }
}

pub struct TileBorderJob {
    config: TileBorderConfig,
    state: JobState,
    tile: TileId,
    opacity: f32,
}

impl TileBorderJob {
    pub fn new(config: TileBorderConfig, tile: TileId) -> Self {
        Self {
            state: JobState::new(config.duration),
            opacity: config.opacity,
            config,
            tile,
        }
    }
}

super::job_builders!(TileBorderJob);

impl AnimationJob for TileBorderJob {
    fn name(&self) -> &'static str {
        "TileBorderJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.state.progress(ctx.current_time);
        self.opacity = self.config.opacity * (1.0 - self.config.easing.apply(progress));
        if self.state.is_elapsed(ctx.current_time) {
            self.state.complete(ctx);
        }
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        let scene = &mut *ctx.scene;
        if let Some(tile) = scene.grid.tile(self.tile) {
            scene.display.push_line(Polyline {
                points: tile.vertices().to_vec(),
                color: self.config.color,
                opacity: self.opacity,
                width: self.config.width,
                closed: true,
            });
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.tile.index() < first
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::test_support;

    #[test]
    fn outline_is_drawn_while_running() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let tile = scene.grid.all_tiles()[3];
        test_support::start(&mut animator, &mut scene, TileBorderJob::new(TileBorderConfig::default(), tile));

        animator.tick(&mut scene, 100.0);
        assert_eq!(scene.display.lines.len(), 1);
        assert!(scene.display.lines[0].closed);
        assert_eq!(scene.display.lines[0].points.len(), 6);
    }
}
