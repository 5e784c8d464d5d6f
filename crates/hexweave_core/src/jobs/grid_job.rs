//! Drives the grid's physics and draws its tiles every frame.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};

/// Persistent. Registered first so every other job sees this frame's physics.
pub struct GridJob {
    state: JobState,
}

impl GridJob {
    pub fn new() -> Self {
        Self {
            state: JobState::new(0.0),
        }
    }
}

impl Default for GridJob {
    fn default() -> Self {
        Self::new()
    }
}

super::job_builders!(GridJob);

impl AnimationJob for GridJob {
    fn name(&self) -> &'static str {
        "GridJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, delta_time: f64) {
        let scene = &mut *ctx.scene;
        scene.grid.update(ctx.current_time, delta_time, &scene.config.tile);
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        let scene = &mut *ctx.scene;
        scene.grid.draw(&mut scene.display);
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}
