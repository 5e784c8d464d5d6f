//! Pan the grid so a tile ends up at the viewport center.
//!
//! The final center is committed to the grid's `pan_center` at start; the
//! animation only shrinks the offset away from it. Cancelling drops the
//! remaining offset, so the grid rests at the committed center.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::easing::Easing;
use crate::math::Vec2;
use crate::topology::TileId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanConfig {
    pub duration: f64,
    pub easing: Easing,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            duration: 800.0,
            easing: Easing::EaseOutCubic,
        }
    }
}

pub struct PanJob {
    config: PanConfig,
    state: JobState,
    /// `None` pans back to the grid's original center.
    tile: Option<TileId>,
    offset: Vec2,
}

impl PanJob {
    pub fn new(config: PanConfig, tile: Option<TileId>) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            tile,
            offset: Vec2::ZERO,
        }
    }
}

super::job_builders!(PanJob);

impl AnimationJob for PanJob {
    fn name(&self) -> &'static str {
        "PanJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let grid = &mut ctx.scene.grid;
        let original_center = grid.original_center;
        let final_center = match self.tile.and_then(|id| grid.tile(id)) {
            Some(tile) => original_center * 2.0 - tile.original_anchor,
            None => original_center,
        };
        self.offset = grid.current_center - final_center;
        grid.pan_center = final_center;
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.config.easing.apply(self.state.progress(ctx.current_time));
        let grid = &mut ctx.scene.grid;
        grid.current_center = grid.pan_center + self.offset * (1.0 - progress);
        if self.state.is_elapsed(ctx.current_time) {
            grid.current_center = grid.pan_center;
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        let grid = &mut ctx.scene.grid;
        grid.current_center = grid.pan_center;
        self.state.cancel(ctx);
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
    fn target_tile_lands_on_original_center() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let tile = scene.grid.all_tiles()[5];
        let anchor = scene.grid.tile(tile).unwrap().original_anchor;
        test_support::start(&mut animator, &mut scene, PanJob::new(PanConfig::default(), Some(tile)));

        test_support::run_until_idle(&mut animator, &mut scene, 0.0, 5_000.0);
        let grid = &scene.grid;
        let shifted = anchor + (grid.current_center - grid.original_center);
        assert!(shifted.distance(grid.original_center) < 1e-3);
        assert_eq!(grid.pan_center, grid.current_center);
    }

    #[test]
    fn cancelled_pan_rests_at_committed_center() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        scene.grid.current_center += Vec2::new(120.0, -40.0);
        let id = test_support::start(&mut animator, &mut scene, PanJob::new(PanConfig::default(), None));
        assert_eq!(scene.grid.pan_center, scene.grid.original_center);

        animator.tick(&mut scene, 100.0);
        assert_ne!(scene.grid.current_center, scene.grid.original_center);
        assert!(animator.cancel_job(&mut scene, id, 100.0));
        assert_eq!(scene.grid.current_center, scene.grid.original_center);
    }
}
