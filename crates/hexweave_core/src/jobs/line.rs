//! Lines that travel along the gaps between tiles
//!
//! A line walks from junction to junction, where a junction is the point in
//! the gap where three tiles meet. Junction `(tile, c)` sits past corner `c`
//! of `tile` and is shared with `(tile.neighbor(c + 1), c + 2)` and
//! `(tile.neighbor(c + 2), c + 4)`. Positions are recomputed every frame from
//! the live tile positions, so lines follow the springs.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::color::Hsl;
use crate::grid::Grid;
use crate::layout::DIRECTION_COUNT;
use crate::math::Vec2;
use crate::topology::TileId;
use crate::visual::Polyline;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineConfig {
    /// Time the line keeps travelling before it starts fading.
    pub duration: f64,
    /// Time to cross one gap edge.
    pub segment_duration: f64,
    /// Number of trailing segments kept visible.
    pub tail_segment_count: usize,
    pub fade_duration: f64,
    pub width: f32,
    pub color: Hsl,
    pub opacity: f32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            duration: 2_400.0,
            segment_duration: 140.0,
            tail_segment_count: 5,
            fade_duration: 500.0,
            width: 3.0,
            color: Hsl::new(190.0, 70.0, 65.0),
            opacity: 0.7,
        }
    }
}

impl LineConfig {
    /// Shorter, quicker lines for [`LinesRadiateJob`](super::LinesRadiateJob).
    pub fn radiating() -> Self {
        Self {
            duration: 900.0,
            segment_duration: 90.0,
            tail_segment_count: 4,
            fade_duration: 300.0,
            width: 2.0,
            color: Hsl::new(40.0, 80.0, 70.0),
            opacity: 0.8,
        }
    }
}

/// Gap junction past corner `corner` of `tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub tile: TileId,
    pub corner: usize,
}

impl Junction {
    pub fn new(tile: TileId, corner: usize) -> Self {
        Self {
            tile,
            corner: corner % DIRECTION_COUNT,
        }
    }

    /// The junctions one gap edge away: the two along `tile`'s own edges,
    /// then the one leading away from `tile` if either tile that shares it
    /// exists.
    pub fn adjacent(self, grid: &Grid) -> [Option<Junction>; 3] {
        let c = self.corner;
        let outward = grid.tile(self.tile).and_then(|tile| {
            tile.neighbor(c + 1)
                .map(|next| Junction::new(next, c + 1))
                .or_else(|| tile.neighbor(c + 2).map(|next| Junction::new(next, c + 5)))
        });
        [
            Some(Junction::new(self.tile, c + 5)),
            Some(Junction::new(self.tile, c + 1)),
            outward,
        ]
    }
}

/// Live position of `junction`, if its tile exists.
pub fn junction_position(grid: &Grid, junction: Junction) -> Option<Vec2> {
    let tile = grid.tile(junction.tile)?;
    let distance = grid.params().metrics.corner_junction_distance();
    let direction = tile.vertex_deltas()[junction.corner % DIRECTION_COUNT].normalize_or_zero();
    Some(tile.particle.position + direction * distance)
}

pub struct LineJob {
    config: LineConfig,
    state: JobState,
    start: Junction,
    is_first_move_outward: bool,
    extra_start_point: Option<Vec2>,
    path: VecDeque<Junction>,
    next: Option<Junction>,
    segment_start: f64,
    head_ratio: f32,
    fade_start: Option<f64>,
    is_trimmed: bool,
    opacity: f32,
}

impl LineJob {
    pub fn new(config: LineConfig, tile: TileId, corner: usize) -> Self {
        Self {
            state: JobState::new(config.duration),
            opacity: config.opacity,
            config,
            start: Junction::new(tile, corner),
            is_first_move_outward: false,
            extra_start_point: None,
            path: VecDeque::new(),
            next: None,
            segment_start: 0.0,
            head_ratio: 0.0,
            fade_start: None,
            is_trimmed: false,
        }
    }

    /// Make the first move leave the start tile.
    pub fn outward(mut self) -> Self {
        self.is_first_move_outward = true;
        self
    }

    pub fn with_extra_start_point(mut self, point: Vec2) -> Self {
        self.extra_start_point = Some(point);
        self
    }

    /// Point drawn before the first junction until the tail trims it away.
    pub fn set_extra_start_point(&mut self, point: Option<Vec2>) {
        self.extra_start_point = point;
    }

    pub fn path(&self) -> impl Iterator<Item = Junction> + '_ {
        self.path.iter().copied()
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fade_start.is_some()
    }

    /// Pick the next junction at random, never stepping back onto the
    /// previous one.
    fn choose_next<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Option<Junction> {
        let current = *self.path.back()?;
        let previous = self
            .path
            .len()
            .checked_sub(2)
            .and_then(|i| self.path.get(i))
            .and_then(|&junction| junction_position(grid, junction));
        let min_distance = grid.params().metrics.corner_junction_distance() * 0.5;

        let adjacent = current.adjacent(grid);
        let candidates: Vec<Junction> = if self.is_first_move_outward && self.path.len() == 1 {
            adjacent[2].into_iter().collect()
        } else {
            adjacent.into_iter().flatten().collect()
        };
        let candidates: Vec<Junction> = candidates
            .into_iter()
            .filter(|&candidate| match junction_position(grid, candidate) {
                Some(position) => previous.map_or(true, |previous| previous.distance(position) > min_distance),
                None => false,
            })
            .collect();
        candidates.choose(rng).copied()
    }

    /// True when any junction of the line sits on a tile at or beyond `first`.
    fn holds_tiles_from(&self, first: usize) -> bool {
        std::iter::once(self.start)
            .chain(self.path.iter().copied())
            .chain(self.next)
            .any(|junction| junction.tile.index() >= first)
    }

    fn trim(&mut self) {
        while self.path.len() > self.config.tail_segment_count + 1 {
            self.path.pop_front();
            self.is_trimmed = true;
        }
    }

    fn begin_fade(&mut self, current_time: f64) {
        if self.fade_start.is_none() {
            self.fade_start = Some(current_time);
        }
    }
}

super::job_builders!(LineJob);

impl AnimationJob for LineJob {
    fn name(&self) -> &'static str {
        "LineJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        self.segment_start = ctx.current_time;
        self.path.clear();
        self.path.push_back(self.start);
        let scene = &mut *ctx.scene;
        self.next = self.choose_next(&scene.grid, &mut scene.rng);
        if self.next.is_none() {
            self.begin_fade(ctx.current_time);
        }
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let now = ctx.current_time;
        if self.fade_start.is_none() && self.state.is_elapsed(now) {
            self.begin_fade(now);
        }

        if self.fade_start.is_none() {
            let scene = &mut *ctx.scene;
            while now - self.segment_start >= self.config.segment_duration {
                self.segment_start += self.config.segment_duration;
                if let Some(next) = self.next.take() {
                    self.path.push_back(next);
                    self.trim();
                }
                self.next = self.choose_next(&scene.grid, &mut scene.rng);
                if self.next.is_none() {
                    self.begin_fade(now);
                    break;
                }
            }
            self.head_ratio = ((now - self.segment_start) / self.config.segment_duration).clamp(0.0, 1.0) as f32;
        }

        match self.fade_start {
            Some(fade_start) => {
                let fade = crate::easing::progress(now, fade_start, self.config.fade_duration);
                self.opacity = self.config.opacity * (1.0 - fade);
                if fade >= 1.0 {
                    self.state.complete(ctx);
                }
            }
            None => self.opacity = self.config.opacity,
        }
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        let scene = &mut *ctx.scene;
        let grid = &scene.grid;
        let mut points = Vec::with_capacity(self.path.len() + 2);
        if !self.is_trimmed {
            points.extend(self.extra_start_point);
        }
        points.extend(self.path.iter().filter_map(|&junction| junction_position(grid, junction)));
        if let (Some(&last), Some(next)) = (points.last(), self.next) {
            if let Some(target) = junction_position(grid, next) {
                points.push(last.lerp(target, self.head_ratio));
            }
        }
        scene.display.push_line(Polyline {
            points,
            color: self.config.color,
            opacity: self.opacity,
            width: self.config.width,
            closed: false,
        });
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        !self.holds_tiles_from(first)
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

// ============================================================================
// Random line
// ============================================================================

/// A [`LineJob`] from a random corner of a random active tile.
pub struct RandomLineJob {
    config: LineConfig,
    state: JobState,
    line: Option<LineJob>,
}

impl RandomLineJob {
    pub fn new(config: LineConfig) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            line: None,
        }
    }
}

super::job_builders!(RandomLineJob);

impl AnimationJob for RandomLineJob {
    fn name(&self) -> &'static str {
        "RandomLineJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
        let scene = &mut *ctx.scene;
        let Some(&tile) = scene.grid.all_tiles().choose(&mut scene.rng) else {
            self.state.complete(ctx);
            return;
        };
        let corner = scene.rng.gen_range(0..DIRECTION_COUNT);
        let mut line = LineJob::new(self.config.clone(), tile, corner).with_duration(self.state.duration);
        line.start(ctx);
        self.line = Some(line);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, delta_time: f64) {
        let Some(line) = self.line.as_mut() else { return };
        line.update(ctx, delta_time);
        if line.is_complete() {
            self.state.complete(ctx);
        }
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(line) = self.line.as_mut() {
            line.draw(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(line) = self.line.as_mut() {
            line.cancel(ctx);
        }
        self.state.cancel(ctx);
    }

    fn release_tiles(&mut self, first: usize) -> bool {
        self.line.as_mut().map_or(true, |line| line.release_tiles(first))
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::test_support;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn interior_tile(grid: &Grid) -> TileId {
        grid.nearest_tile(grid.params().viewport * 0.5).unwrap()
    }

    #[test]
    fn shared_junctions_coincide() {
        let scene = test_support::scene();
        let grid = &scene.grid;
        let tile = interior_tile(grid);
        for corner in 0..DIRECTION_COUNT {
            let here = junction_position(grid, Junction::new(tile, corner)).unwrap();
            let t = grid.tile(tile).unwrap();
            let first = t.neighbor(corner + 1).unwrap();
            let second = t.neighbor(corner + 2).unwrap();
            let a = junction_position(grid, Junction::new(first, corner + 2)).unwrap();
            let b = junction_position(grid, Junction::new(second, corner + 4)).unwrap();
            assert!(here.distance(a) < 1e-2, "corner {corner}: {here} vs {a}");
            assert!(here.distance(b) < 1e-2, "corner {corner}: {here} vs {b}");
        }
    }

    #[test]
    fn adjacent_junctions_are_one_edge_away() {
        let scene = test_support::scene();
        let grid = &scene.grid;
        let edge = grid.params().metrics.corner_junction_distance();
        let junction = Junction::new(interior_tile(grid), 0);
        let here = junction_position(grid, junction).unwrap();
        for next in junction.adjacent(grid).into_iter().flatten() {
            let there = junction_position(grid, next).unwrap();
            assert!((here.distance(there) - edge).abs() < 1e-2);
        }
    }

    #[test]
    fn never_backtracks() {
        let scene = test_support::scene();
        let grid = &scene.grid;
        let mut rng = StdRng::seed_from_u64(3);
        let mut line = LineJob::new(LineConfig::default(), interior_tile(grid), 2);
        line.path.push_back(line.start);
        for _ in 0..200 {
            let Some(next) = line.choose_next(grid, &mut rng) else { break };
            if line.path.len() >= 2 {
                let previous = line.path[line.path.len() - 2];
                let a = junction_position(grid, previous).unwrap();
                let b = junction_position(grid, next).unwrap();
                assert!(a.distance(b) > 1.0);
            }
            line.path.push_back(next);
        }
    }

    #[test]
    fn outward_first_move_leaves_the_tile() {
        let scene = test_support::scene();
        let grid = &scene.grid;
        let tile = interior_tile(grid);
        let center = grid.tile(tile).unwrap().particle.position;
        let mut rng = StdRng::seed_from_u64(5);
        for corner in 0..DIRECTION_COUNT {
            let mut line = LineJob::new(LineConfig::default(), tile, corner).outward();
            line.path.push_back(line.start);
            let next = line.choose_next(grid, &mut rng).unwrap();
            let start = junction_position(grid, line.start).unwrap();
            let there = junction_position(grid, next).unwrap();
            assert!(there.distance(center) > start.distance(center) + 1.0);
        }
    }

    #[test]
    fn line_draws_then_fades_out() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let tile = interior_tile(&scene.grid);
        let config = LineConfig::default();
        let id = test_support::start(&mut animator, &mut scene, LineJob::new(config.clone(), tile, 0));

        animator.tick(&mut scene, config.segment_duration * 2.5);
        assert_eq!(scene.display.lines.len(), 1);
        assert!(scene.display.lines[0].points.len() >= 3);

        test_support::run_until_idle(&mut animator, &mut scene, config.segment_duration * 2.5, 10_000.0);
        assert!(!animator.is_running(id));
    }
}
