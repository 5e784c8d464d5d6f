//! Six lines leaving one tile, one from each corner.

use super::{JobState, LineConfig, LineJob};
use crate::animator::{AnimationJob, JobContext};
use crate::layout::DIRECTION_COUNT;
use crate::topology::TileId;

/// Owns its six [`LineJob`]s directly. Every frame their extra start point
/// is moved to the origin tile's live position so the lines stay attached
/// while the tile moves. Completes once every line has.
pub struct LinesRadiateJob {
    state: JobState,
    tile: TileId,
    lines: Vec<LineJob>,
}

impl LinesRadiateJob {
    pub fn new(config: LineConfig, tile: TileId) -> Self {
        let lines = (0..DIRECTION_COUNT)
            .map(|corner| LineJob::new(config.clone(), tile, corner).outward())
            .collect();
        Self {
            state: JobState::new(config.duration),
            tile,
            lines,
        }
    }

    fn track_origin(&mut self, ctx: &JobContext<'_>) {
        let origin = ctx.scene.grid.tile(self.tile).map(|tile| tile.particle.position);
        for line in &mut self.lines {
            line.set_extra_start_point(origin);
        }
    }
}

impl LinesRadiateJob {
    /// Override the travel duration of every line.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.state.duration = duration;
        self.lines = self.lines.into_iter().map(|line| line.with_duration(duration)).collect();
        self
    }

    pub fn on_complete(
        mut self,
        callback: impl FnOnce(&mut JobContext<'_>, crate::animator::JobOutcome) + 'static,
    ) -> Self {
        self.state.set_callback(Box::new(callback));
        self
    }
}

impl AnimationJob for LinesRadiateJob {
    fn name(&self) -> &'static str {
        "LinesRadiateJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        self.track_origin(ctx);
        for line in &mut self.lines {
            line.start(ctx);
        }
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, delta_time: f64) {
        self.track_origin(ctx);
        for line in self.lines.iter_mut().filter(|line| !line.is_complete()) {
            line.update(ctx, delta_time);
        }
        if self.lines.iter().all(|line| line.is_complete()) {
            self.state.complete(ctx);
        }
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        for line in self.lines.iter_mut().filter(|line| !line.is_complete()) {
            line.draw(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        for line in &mut self.lines {
            line.cancel(ctx);
        }
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.tile.index() < first && self.lines.iter_mut().all(|line| line.release_tiles(first))
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
    fn six_lines_start_at_the_tile() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let tile = scene.grid.nearest_tile(scene.viewport() * 0.5).unwrap();
        let center = scene.grid.tile(tile).unwrap().particle.position;
        let id = test_support::start(&mut animator, &mut scene, LinesRadiateJob::new(LineConfig::radiating(), tile));

        animator.tick(&mut scene, 50.0);
        assert_eq!(scene.display.lines.len(), DIRECTION_COUNT);
        for line in &scene.display.lines {
            assert_eq!(line.points[0], center);
        }

        test_support::run_until_idle(&mut animator, &mut scene, 50.0, 10_000.0);
        assert!(!animator.is_running(id));
    }
}
