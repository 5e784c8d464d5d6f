//! Fading colour flash on the tile under the pointer.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::HslDelta;
use crate::easing::Easing;
use crate::topology::TileId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightHoverConfig {
    pub duration: f64,
    pub delta: HslDelta,
    pub easing: Easing,
}

impl Default for HighlightHoverConfig {
    fn default() -> Self {
        Self {
            duration: 600.0,
            delta: HslDelta::new(10.0, 20.0, 16.0),
            easing: Easing::EaseOutQuad,
        }
    }
}

pub struct HighlightHoverJob {
    config: HighlightHoverConfig,
    state: JobState,
    tile: TileId,
}

impl HighlightHoverJob {
    pub fn new(config: HighlightHoverConfig, tile: TileId) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            tile,
        }
    }
}

super::job_builders!(HighlightHoverJob);

impl AnimationJob for HighlightHoverJob {
    fn name(&self) -> &'static str {
        "HighlightHoverJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.state.progress(ctx.current_time);
        let strength = 1.0 - self.config.easing.apply(progress);
        if let Some(tile) = ctx.scene.grid.tile_mut(self.tile) {
            tile.add_color(self.config.delta * strength);
        }
        if self.state.is_elapsed(ctx.current_time) {
            self.state.complete(ctx);
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
