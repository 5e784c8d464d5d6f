//! Per-frame resets
//!
//! Colour and displacement effects are additive. These two persistent jobs
//! run before every other effect and restore the baseline each frame.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};

/// Restores every active tile's colour to its original (plus hover highlight).
pub struct ColorResetJob {
    state: JobState,
}

impl ColorResetJob {
    pub fn new() -> Self {
        Self {
            state: JobState::new(0.0),
        }
    }
}

impl Default for ColorResetJob {
    fn default() -> Self {
        Self::new()
    }
}

super::job_builders!(ColorResetJob);

impl AnimationJob for ColorResetJob {
    fn name(&self) -> &'static str {
        "ColorResetJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let hover_highlight = ctx.scene.config.tile.hover_highlight;
        ctx.scene
            .grid
            .for_each_active_tile(|tile| tile.reset_color(hover_highlight));
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

/// Restores every active tile's anchor to its original anchor shifted by the
/// grid's current pan.
pub struct DisplacementResetJob {
    state: JobState,
}

impl DisplacementResetJob {
    pub fn new() -> Self {
        Self {
            state: JobState::new(0.0),
        }
    }
}

impl Default for DisplacementResetJob {
    fn default() -> Self {
        Self::new()
    }
}

super::job_builders!(DisplacementResetJob);

impl AnimationJob for DisplacementResetJob {
    fn name(&self) -> &'static str {
        "DisplacementResetJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let grid = &mut ctx.scene.grid;
        let pan = grid.current_center - grid.original_center;
        grid.for_each_active_tile(|tile| tile.current_anchor = tile.original_anchor + pan);
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
    use crate::color::HslDelta;
    use crate::jobs::test_support;
    use crate::math::Vec2;

    #[test]
    fn color_reset_keeps_hover_highlight() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let hovered = scene.grid.all_tiles()[10];
        let plain = scene.grid.all_tiles()[11];
        scene.grid.set_hovered_tile(Some(hovered));
        for id in [hovered, plain] {
            if let Some(tile) = scene.grid.tile_mut(id) {
                tile.add_color(HslDelta::new(40.0, 0.0, 0.0));
            }
        }

        test_support::start(&mut animator, &mut scene, ColorResetJob::new());
        animator.tick(&mut scene, 16.0);

        let highlight = scene.config.tile.hover_highlight;
        let hovered = scene.grid.tile(hovered).unwrap();
        assert_eq!(hovered.current_color, hovered.original_color + highlight);
        let plain = scene.grid.tile(plain).unwrap();
        assert_eq!(plain.current_color, plain.original_color);
    }

    #[test]
    fn displacement_reset_applies_pan() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        scene.grid.current_center = scene.grid.original_center + Vec2::new(30.0, -10.0);

        test_support::start(&mut animator, &mut scene, DisplacementResetJob::new());
        animator.tick(&mut scene, 16.0);

        for tile in scene.grid.active_tiles() {
            assert_eq!(tile.current_anchor, tile.original_anchor + Vec2::new(30.0, -10.0));
        }
    }
}
