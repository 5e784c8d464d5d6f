//! Component configuration
//!
//! Every component has a serde struct with defaults. After mutating any field,
//! call [`HexConfig::compute_dependent_values`] followed by
//! [`HexConfig::validate`]; changes take effect on the next resize/restart.

use crate::annotations::AnnotationsConfig;
use crate::color::{Hsl, HslDelta};
use crate::controller::ControllerConfig;
use crate::jobs::JobsConfig;
use crate::layout::{Orientation, TileMetrics};
use crate::time::DEFAULT_DELTA_TIME_UPPER_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`HexConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        requirement: &'static str,
    },
}

/// Fail with [`ConfigError::OutOfRange`] unless `ok` holds.
pub(crate) fn ensure(
    ok: bool,
    field: &'static str,
    value: f64,
    requirement: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            requirement,
        })
    }
}

// ============================================================================
// Grid
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub orientation: Orientation,
    pub tile_outer_radius: f32,
    pub tile_gap: f32,
    /// Fraction of content-column tiles that carry a post.
    pub content_density: f32,
    /// Width in pixels of the centered column that may hold content.
    pub target_content_area_width: f32,
    /// Rows above this index are always margin.
    pub content_starting_row_index: usize,
    /// Y of the first row, as a multiple of the outer radius.
    pub first_row_y_offset_ratio: f32,
    /// How many tile steps each sector moves outward when a post opens.
    pub expanded_displacement_tile_count: usize,
    pub background_color: Hsl,
    pub tile_color: Hsl,
    pub content_tile_color: Hsl,
    /// Tile opacity while a post is open, for tiles outside the post.
    pub tile_opacity: f32,

    /// Derived from the radius and gap by `compute_dependent_values`.
    #[serde(skip)]
    pub metrics: TileMetrics,
}

impl Default for GridConfig {
    fn default() -> Self {
        let tile_outer_radius = 80.0;
        let tile_gap = 12.0;
        Self {
            orientation: Orientation::Vertical,
            tile_outer_radius,
            tile_gap,
            content_density: 0.6,
            target_content_area_width: 900.0,
            content_starting_row_index: 2,
            first_row_y_offset_ratio: -0.8,
            expanded_displacement_tile_count: 3,
            background_color: Hsl::new(230.0, 20.0, 6.0),
            tile_color: Hsl::new(230.0, 12.0, 16.0),
            content_tile_color: Hsl::new(205.0, 55.0, 38.0),
            tile_opacity: 0.6,
            metrics: TileMetrics::new(tile_outer_radius, tile_gap),
        }
    }
}

impl GridConfig {
    pub fn compute_dependent_values(&mut self) {
        self.metrics = TileMetrics::new(self.tile_outer_radius, self.tile_gap);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.tile_outer_radius > 0.0,
            "grid.tileOuterRadius",
            self.tile_outer_radius as f64,
            "positive",
        )?;
        ensure(self.tile_gap >= 0.0, "grid.tileGap", self.tile_gap as f64, "non-negative")?;
        ensure(
            self.content_density > 0.0 && self.content_density <= 1.0,
            "grid.contentDensity",
            self.content_density as f64,
            "in (0, 1]",
        )?;
        ensure(
            self.target_content_area_width >= 0.0,
            "grid.targetContentAreaWidth",
            self.target_content_area_width as f64,
            "non-negative",
        )?;
        ensure(
            self.expanded_displacement_tile_count >= 1,
            "grid.expandedDisplacementTileCount",
            self.expanded_displacement_tile_count as f64,
            "at least 1",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.tile_opacity),
            "grid.tileOpacity",
            self.tile_opacity as f64,
            "in [0, 1]",
        )
    }
}

// ============================================================================
// Tile physics
// ============================================================================

/// Mass-spring coefficients. Units are pixels and milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileConfig {
    pub mass: f32,
    pub drag_coefficient: f32,
    pub neighbor_spring_coefficient: f32,
    pub neighbor_damping_coefficient: f32,
    pub inner_anchor_spring_coefficient: f32,
    pub inner_anchor_damping_coefficient: f32,
    pub border_anchor_spring_coefficient: f32,
    pub border_anchor_damping_coefficient: f32,
    /// Force components at or below this magnitude snap to zero.
    pub force_suppression_threshold: f32,
    /// Velocity components at or below this magnitude snap to zero.
    pub velocity_suppression_threshold: f32,
    /// Longest single integration step; larger frame deltas are subdivided.
    pub max_step_duration: f64,
    /// Colour offset of the hovered tile.
    pub hover_highlight: HslDelta,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag_coefficient: 0.01,
            neighbor_spring_coefficient: 0.000_01,
            neighbor_damping_coefficient: 0.001,
            inner_anchor_spring_coefficient: 0.000_04,
            inner_anchor_damping_coefficient: 0.001,
            border_anchor_spring_coefficient: 0.000_4,
            border_anchor_damping_coefficient: 0.004,
            force_suppression_threshold: 0.000_005,
            velocity_suppression_threshold: 0.000_5,
            max_step_duration: 20.0,
            hover_highlight: HslDelta::new(0.0, 10.0, 18.0),
        }
    }
}

impl TileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(self.mass > 0.0, "tile.mass", self.mass as f64, "positive")?;
        ensure(
            self.max_step_duration > 0.0,
            "tile.maxStepDuration",
            self.max_step_duration,
            "positive",
        )?;
        for (field, value) in [
            ("tile.dragCoefficient", self.drag_coefficient),
            ("tile.neighborSpringCoefficient", self.neighbor_spring_coefficient),
            ("tile.neighborDampingCoefficient", self.neighbor_damping_coefficient),
            ("tile.innerAnchorSpringCoefficient", self.inner_anchor_spring_coefficient),
            ("tile.innerAnchorDampingCoefficient", self.inner_anchor_damping_coefficient),
            ("tile.borderAnchorSpringCoefficient", self.border_anchor_spring_coefficient),
            ("tile.borderAnchorDampingCoefficient", self.border_anchor_damping_coefficient),
            ("tile.forceSuppressionThreshold", self.force_suppression_threshold),
            ("tile.velocitySuppressionThreshold", self.velocity_suppression_threshold),
        ] {
            ensure(value >= 0.0 && value.is_finite(), field, value as f64, "finite and non-negative")?;
        }
        Ok(())
    }
}

// ============================================================================
// Animator
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimatorConfig {
    /// Largest delta handed to jobs in one frame, in milliseconds.
    pub delta_time_upper_threshold: f64,
    /// Frames kept in the frame-time window.
    pub frame_timer_window: usize,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            delta_time_upper_threshold: DEFAULT_DELTA_TIME_UPPER_THRESHOLD,
            frame_timer_window: 120,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(
            self.delta_time_upper_threshold > 0.0,
            "animator.deltaTimeUpperThreshold",
            self.delta_time_upper_threshold,
            "positive",
        )
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Every component's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HexConfig {
    pub grid: GridConfig,
    pub tile: TileConfig,
    pub animator: AnimatorConfig,
    pub jobs: JobsConfig,
    pub controller: ControllerConfig,
    pub annotations: AnnotationsConfig,
}

impl HexConfig {
    /// Recompute derived values after fields were mutated.
    pub fn compute_dependent_values(&mut self) {
        self.grid.compute_dependent_values();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.tile.validate()?;
        self.animator.validate()?;
        self.jobs.validate()?;
        self.controller.validate()
    }
}
