//! Outward push of the tiles around a focus tile.
//!
//! Each tile within `max_distance` is displaced along its static offset from
//! the focus, eased out to the peak at half time and eased back in.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::easing::Easing;
use crate::math::Vec2;
use crate::topology::TileId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpreadConfig {
    pub duration: f64,
    /// Tiles farther than this from the focus are untouched.
    pub max_distance: f32,
    /// Peak displacement as a fraction of the tile's offset from the focus.
    pub displacement_ratio: f32,
    pub easing_out: Easing,
    pub easing_in: Easing,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            duration: 700.0,
            max_distance: 600.0,
            displacement_ratio: 0.2,
            easing_out: Easing::EaseOutQuad,
            easing_in: Easing::EaseInQuad,
        }
    }
}

/// Weight in `[0, 1]` of the spread after linear `progress`.
fn spread_weight(progress: f32, easing_out: Easing, easing_in: Easing) -> f32 {
    if progress < 0.5 {
        easing_out.apply(progress * 2.0)
    } else {
        1.0 - easing_in.apply(progress * 2.0 - 1.0)
    }
}

pub struct SpreadJob {
    config: SpreadConfig,
    state: JobState,
    tile: TileId,
    displacements: Vec<(TileId, Vec2)>,
}

impl SpreadJob {
    pub fn new(config: SpreadConfig, tile: TileId) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            tile,
            displacements: Vec::new(),
        }
    }
}

super::job_builders!(SpreadJob);

impl AnimationJob for SpreadJob {
    fn name(&self) -> &'static str {
        "SpreadJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let grid = &ctx.scene.grid;
        let Some(focus) = grid.tile(self.tile).map(|tile| tile.original_anchor) else {
            return;
        };
        let max_distance = self.config.max_distance;
        let ratio = self.config.displacement_ratio;
        self.displacements = grid
            .active_tiles()
            .filter_map(|tile| {
                let offset = tile.original_anchor - focus;
                let distance = offset.length();
                (distance > 0.0 && distance < max_distance)
                    .then(|| (tile.id, offset * ratio * (1.0 - distance / max_distance)))
            })
            .collect();
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.state.progress(ctx.current_time);
        let weight = spread_weight(progress, self.config.easing_out, self.config.easing_in);
        for &(id, displacement) in &self.displacements {
            if let Some(tile) = ctx.scene.grid.tile_mut(id) {
                tile.current_anchor += displacement * weight;
            }
        }
        if self.state.is_elapsed(ctx.current_time) {
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.displacements.retain(|(id, _)| id.index() < first);
        true
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}
