//! Slide the six sectors outward (expand) or back (collapse).
//!
//! Like [`PanJob`](super::PanJob), each sector's destination is committed to
//! its `target_anchor` at start and the job animates the remaining offset to
//! zero. Cancelling drops the offset and leaves every sector at its target.
//! The job is bound to the sector generation it started on and goes inert if
//! the sectors are rebuilt.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::easing::Easing;
use crate::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DilateConfig {
    pub duration: f64,
    pub easing: Easing,
}

impl Default for DilateConfig {
    fn default() -> Self {
        Self {
            duration: 600.0,
            easing: Easing::EaseInOutCubic,
        }
    }
}

pub struct DilateSectorsJob {
    config: DilateConfig,
    state: JobState,
    is_expanding: bool,
    generation: u64,
    /// Per-sector offset from the committed target at start.
    offsets: Vec<Vec2>,
}

impl DilateSectorsJob {
    pub fn new(config: DilateConfig, is_expanding: bool) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            is_expanding,
            generation: 0,
            offsets: Vec::new(),
        }
    }

    #[inline]
    pub fn is_expanding(&self) -> bool {
        self.is_expanding
    }

    fn apply(&self, ctx: &mut JobContext<'_>, remaining: f32) {
        let grid = &mut ctx.scene.grid;
        if grid.sector_generation() != self.generation {
            return;
        }
        for (index, offset) in self.offsets.iter().enumerate() {
            let target = grid.sectors().and_then(|sectors| sectors.get(index)).map(|sector| sector.target_anchor);
            if let Some(target) = target {
                grid.set_sector_position(index, target + *offset * remaining);
            }
        }
    }
}

super::job_builders!(DilateSectorsJob);

impl AnimationJob for DilateSectorsJob {
    fn name(&self) -> &'static str {
        "DilateSectorsJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let grid = &mut ctx.scene.grid;
        self.generation = grid.sector_generation();
        let is_expanding = self.is_expanding;
        let targets: Vec<(Vec2, Vec2)> = grid
            .sectors()
            .unwrap_or_default()
            .iter()
            .map(|sector| {
                let target = if is_expanding {
                    sector.expanded_anchor()
                } else {
                    sector.original_anchor
                };
                (target, sector.current_anchor - target)
            })
            .collect();
        self.offsets = targets.iter().map(|&(_, offset)| offset).collect();
        for (index, (target, _)) in targets.into_iter().enumerate() {
            grid.set_sector_target(index, target);
        }
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.config.easing.apply(self.state.progress(ctx.current_time));
        self.apply(ctx, 1.0 - progress);
        if self.state.is_elapsed(ctx.current_time) {
            self.apply(ctx, 0.0);
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.apply(ctx, 0.0);
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
    fn expand_then_collapse() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let base = scene.grid.nearest_tile(scene.viewport() * 0.5).unwrap();
        scene.grid.create_sectors(base);

        test_support::start(&mut animator, &mut scene, DilateSectorsJob::new(DilateConfig::default(), true));
        let time = test_support::run_until_idle(&mut animator, &mut scene, 0.0, 5_000.0);
        for sector in scene.grid.sectors().unwrap() {
            assert!(sector.current_anchor.distance(sector.expanded_anchor()) < 1e-3);
        }

        animator.start_job(
            &mut scene,
            Box::new(DilateSectorsJob::new(DilateConfig::default(), false)),
            time,
        );
        test_support::run_until_idle(&mut animator, &mut scene, time, 5_000.0);
        for sector in scene.grid.sectors().unwrap() {
            assert!(sector.current_anchor.distance(sector.original_anchor) < 1e-3);
        }
    }

    #[test]
    fn cancelled_dilation_rests_at_committed_targets() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let base = scene.grid.nearest_tile(scene.viewport() * 0.5).unwrap();
        scene.grid.create_sectors(base);

        let id = test_support::start(&mut animator, &mut scene, DilateSectorsJob::new(DilateConfig::default(), true));
        for sector in scene.grid.sectors().unwrap() {
            assert_eq!(sector.target_anchor, sector.expanded_anchor());
            assert_eq!(sector.current_anchor, sector.original_anchor);
        }

        animator.tick(&mut scene, 0.0);
        animator.tick(&mut scene, 200.0);
        let sector = &scene.grid.sectors().unwrap()[0];
        assert!(sector.current_anchor.distance(sector.original_anchor) > 1e-3);
        assert!(sector.current_anchor.distance(sector.expanded_anchor()) > 1e-3);

        assert!(animator.cancel_job(&mut scene, id, 200.0));
        for sector in scene.grid.sectors().unwrap() {
            assert!(sector.current_anchor.distance(sector.expanded_anchor()) < 1e-3);
        }
    }

    #[test]
    fn rebuilt_sectors_are_left_alone() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let base = scene.grid.nearest_tile(scene.viewport() * 0.5).unwrap();
        scene.grid.create_sectors(base);
        test_support::start(&mut animator, &mut scene, DilateSectorsJob::new(DilateConfig::default(), true));

        scene.grid.create_sectors(base);
        test_support::run_until_idle(&mut animator, &mut scene, 0.0, 5_000.0);
        for sector in scene.grid.sectors().unwrap() {
            assert_eq!(sector.current_anchor, sector.original_anchor);
        }
    }
}
