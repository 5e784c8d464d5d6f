//! Debug overlay
//!
//! A persistent job that tints tiles by classification and draws the
//! physics state on top of the grid. Every layer is off by default.

use crate::animator::{AnimationJob, JobContext};
use crate::color::Hsl;
use crate::jobs::JobState;
use crate::visual::{Marker, Polyline};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotationsConfig {
    pub content_tiles: bool,
    pub border_tiles: bool,
    pub sector_colors: bool,
    pub neighbor_lines: bool,
    pub anchor_lines: bool,
    pub force_vectors: bool,
    pub particle_centers: bool,
    /// Pixels drawn per unit of force.
    pub force_vector_scale: f32,
    pub line_width: f32,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            content_tiles: false,
            border_tiles: false,
            sector_colors: false,
            neighbor_lines: false,
            anchor_lines: false,
            force_vectors: false,
            particle_centers: false,
            force_vector_scale: 4_000.0,
            line_width: 1.0,
        }
    }
}

impl AnnotationsConfig {
    pub fn any_enabled(&self) -> bool {
        self.content_tiles
            || self.border_tiles
            || self.sector_colors
            || self.neighbor_lines
            || self.anchor_lines
            || self.force_vectors
            || self.particle_centers
    }
}

const CONTENT_COLOR: Hsl = Hsl::new(120.0, 60.0, 35.0);
const BORDER_COLOR: Hsl = Hsl::new(0.0, 70.0, 40.0);
const NEIGHBOR_COLOR: Hsl = Hsl::new(200.0, 80.0, 60.0);
const ANCHOR_COLOR: Hsl = Hsl::new(50.0, 90.0, 60.0);
const FORCE_COLOR: Hsl = Hsl::new(320.0, 90.0, 60.0);
const CENTER_COLOR: Hsl = Hsl::new(0.0, 0.0, 90.0);

/// Distinct hue per sector.
fn sector_color(index: usize) -> Hsl {
    Hsl::new(index as f32 * 60.0, 55.0, 38.0)
}

pub struct AnnotationsJob {
    config: AnnotationsConfig,
    state: JobState,
}

impl AnnotationsJob {
    pub fn new(config: AnnotationsConfig) -> Self {
        Self {
            config,
            state: JobState::new(0.0),
        }
    }

    pub fn config(&self) -> &AnnotationsConfig {
        &self.config
    }
}

impl AnimationJob for AnnotationsJob {
    fn name(&self) -> &'static str {
        "AnnotationsJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let config = &self.config;
        ctx.scene.grid.for_each_active_tile(|tile| {
            if config.sector_colors {
                if let Some(sector) = tile.expanded.as_ref().and_then(|state| state.sector) {
                    tile.current_color = sector_color(sector);
                }
            }
            if config.content_tiles && tile.holds_content() {
                tile.current_color = CONTENT_COLOR;
            }
            if config.border_tiles && tile.is_border() {
                tile.current_color = BORDER_COLOR;
            }
        });
    }

    fn draw(&mut self, ctx: &mut JobContext<'_>) {
        let config = &self.config;
        if !(config.neighbor_lines || config.anchor_lines || config.force_vectors || config.particle_centers) {
            return;
        }
        let scene = &mut *ctx.scene;
        let grid = &scene.grid;
        let display = &mut scene.display;
        let radius = grid.params().metrics.outer_radius;
        let line = |points: Vec<_>, color: Hsl| Polyline {
            points,
            color,
            opacity: 1.0,
            width: config.line_width,
            closed: false,
        };

        for tile in grid.active_tiles() {
            let position = tile.particle.position;
            if config.neighbor_lines {
                for link in tile.active_neighbors().iter().flatten() {
                    if link.tile <= tile.id {
                        continue;
                    }
                    if let Some(other) = grid.tile(link.tile) {
                        // Stop at the midpoint so each side shows its own slot.
                        display.push_line(line(
                            vec![position, position.lerp(other.particle.position, 0.5)],
                            NEIGHBOR_COLOR,
                        ));
                    }
                }
            }
            if config.anchor_lines {
                display.push_line(line(vec![tile.current_anchor, position], ANCHOR_COLOR));
            }
            if config.force_vectors {
                let tip = position + tile.particle.force * config.force_vector_scale;
                display.push_line(line(vec![position, tip], FORCE_COLOR));
            }
            if config.particle_centers {
                display.push_marker(Marker {
                    center: position,
                    radius: radius * 0.05,
                    color: CENTER_COLOR,
                    opacity: 1.0,
                });
            }
        }
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
    use crate::jobs::{test_support, ColorResetJob};

    #[test]
    fn disabled_overlay_draws_nothing() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        test_support::start(&mut animator, &mut scene, AnnotationsJob::new(AnnotationsConfig::default()));
        animator.tick(&mut scene, 16.0);
        assert!(scene.display.lines.is_empty());
        assert!(scene.display.markers.is_empty());
        assert!(!AnnotationsConfig::default().any_enabled());
    }

    #[test]
    fn layers_draw_per_tile() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let config = AnnotationsConfig {
            neighbor_lines: true,
            particle_centers: true,
            anchor_lines: true,
            ..Default::default()
        };
        test_support::start(&mut animator, &mut scene, AnnotationsJob::new(config));
        animator.tick(&mut scene, 16.0);

        let tiles = scene.grid.all_tiles().len();
        assert_eq!(scene.display.markers.len(), tiles);
        // Anchor lines of resting tiles are zero length but still two points.
        assert!(scene.display.lines.len() > tiles);
    }

    #[test]
    fn sector_and_border_tints() {
        let mut scene = test_support::scene();
        let mut animator = test_support::animator();
        let base = scene.grid.nearest_tile(scene.viewport() * 0.5).unwrap();
        scene.grid.create_sectors(base);
        let config = AnnotationsConfig {
            sector_colors: true,
            border_tiles: true,
            ..Default::default()
        };
        test_support::start(&mut animator, &mut scene, ColorResetJob::new());
        test_support::start(&mut animator, &mut scene, AnnotationsJob::new(config));
        animator.tick(&mut scene, 16.0);

        for tile in scene.grid.active_tiles() {
            if tile.is_border() {
                assert_eq!(tile.current_color, BORDER_COLOR);
            } else if let Some(sector) = tile.expanded.as_ref().and_then(|state| state.sector) {
                assert_eq!(tile.current_color, sector_color(sector));
            }
        }
    }
}
