//! Tile: one hexagon with a mass-spring particle
//!
//! A tile does not know its neighbours' state. The grid sums the neighbour
//! spring forces (through the shared relationship records) and hands the
//! total to [`Tile::update`], which adds drag and the anchor spring and then
//! integrates.

use crate::color::{Hsl, HslDelta};
use crate::config::TileConfig;
use crate::layout::{vertex_deltas, Orientation, DIRECTION_COUNT};
use crate::math::{snap_vec_below, Vec2};
use crate::topology::{NeighborSlots, TileId};
use crate::visual::TilePolygon;

/// Particle state, in pixels and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force used by the most recent integration step.
    pub force: Vec2,
    pub mass: f32,
    /// External forces collected for the next step.
    pub force_accumulator: Vec2,
    pub is_fixed: bool,
}

impl Particle {
    pub fn at_rest(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            force_accumulator: Vec2::ZERO,
            is_fixed: false,
        }
    }
}

/// Where a tile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOrigin {
    /// Part of the base layout.
    Layout { row: usize, column: usize },
    /// Created by a sector to fill space revealed by expansion.
    Sector { sector: usize, major: usize, minor: usize },
}

/// Topology a tile follows while it belongs to an open post's sectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedState {
    pub neighbors: NeighborSlots,
    pub is_border: bool,
    /// Owning sector, `None` for the expanded tile itself.
    pub sector: Option<usize>,
    /// Offset from the owning sector's anchor.
    pub sector_offset: Vec2,
}

impl ExpandedState {
    pub fn new(sector: Option<usize>, sector_offset: Vec2) -> Self {
        Self {
            neighbors: [None; DIRECTION_COUNT],
            is_border: false,
            sector,
            sector_offset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    /// Position in the flat array this tile was created in.
    pub original_index: usize,
    pub origin: TileOrigin,
    pub outer_radius: f32,
    pub original_anchor: Vec2,
    pub current_anchor: Vec2,
    vertex_deltas: [Vec2; DIRECTION_COUNT],
    vertices: [Vec2; DIRECTION_COUNT],
    pub particle: Particle,

    pub is_margin_tile: bool,
    pub is_border_tile: bool,
    pub is_corner_tile: bool,

    post: Option<usize>,
    pub original_color: Hsl,
    pub current_color: Hsl,
    pub opacity: f32,
    is_highlighted: bool,

    pub neighbors: NeighborSlots,
    pub expanded: Option<ExpandedState>,
    /// Slot in the display list, assigned when the active set changes.
    pub display_index: Option<usize>,
}

impl Tile {
    pub fn new(
        id: TileId,
        original_index: usize,
        origin: TileOrigin,
        anchor: Vec2,
        outer_radius: f32,
        orientation: Orientation,
        color: Hsl,
        mass: f32,
    ) -> Self {
        let vertex_deltas = vertex_deltas(outer_radius, orientation);
        Self {
            id,
            original_index,
            origin,
            outer_radius,
            original_anchor: anchor,
            current_anchor: anchor,
            vertex_deltas,
            vertices: vertex_deltas.map(|delta| anchor + delta),
            particle: Particle::at_rest(anchor, mass),
            is_margin_tile: true,
            is_border_tile: false,
            is_corner_tile: false,
            post: None,
            original_color: color,
            current_color: color,
            opacity: 1.0,
            is_highlighted: false,
            neighbors: [None; DIRECTION_COUNT],
            expanded: None,
            display_index: None,
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Bind or unbind a post, recolouring the tile accordingly.
    pub fn set_content(&mut self, post: Option<usize>, color: Hsl) {
        self.post = post;
        self.original_color = color;
        self.current_color = color;
    }

    #[inline]
    pub fn post(&self) -> Option<usize> {
        self.post
    }

    #[inline]
    pub fn holds_content(&self) -> bool {
        self.post.is_some()
    }

    // ========================================================================
    // Topology
    // ========================================================================

    /// Border flag of whichever topology is active.
    #[inline]
    pub fn is_border(&self) -> bool {
        match &self.expanded {
            Some(expanded) => expanded.is_border,
            None => self.is_border_tile,
        }
    }

    /// Neighbour slots of whichever topology is active.
    #[inline]
    pub fn active_neighbors(&self) -> &NeighborSlots {
        match &self.expanded {
            Some(expanded) => &expanded.neighbors,
            None => &self.neighbors,
        }
    }

    #[inline]
    pub fn neighbor(&self, direction: usize) -> Option<TileId> {
        self.active_neighbors()[direction % DIRECTION_COUNT].map(|link| link.tile)
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expanded.is_some()
    }

    // ========================================================================
    // Colour
    // ========================================================================

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.is_highlighted = highlighted;
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    /// Restore the frame's starting colour; jobs add their deltas afterwards.
    pub fn reset_color(&mut self, hover_highlight: HslDelta) {
        self.current_color = self.original_color;
        if self.is_highlighted {
            self.current_color += hover_highlight;
        }
    }

    #[inline]
    pub fn add_color(&mut self, delta: HslDelta) {
        self.current_color += delta;
    }

    // ========================================================================
    // Physics
    // ========================================================================

    /// Queue an external force for the next update.
    #[inline]
    pub fn apply_external_force(&mut self, force: Vec2) {
        self.particle.force_accumulator += force;
    }

    /// Pin the tile at `position` and stop integrating it.
    pub fn fix_position(&mut self, position: Vec2) {
        self.particle.is_fixed = true;
        self.particle.position = position;
        self.particle.velocity = Vec2::ZERO;
        self.particle.force = Vec2::ZERO;
        self.particle.force_accumulator = Vec2::ZERO;
        self.update_vertices();
    }

    pub fn unfix_position(&mut self) {
        self.particle.is_fixed = false;
    }

    /// Advance one integration step of `delta_time` milliseconds.
    ///
    /// `neighbor_force` is the summed spring force from every neighbour
    /// relationship.
    pub fn update(&mut self, _current_time: f64, delta_time: f64, neighbor_force: Vec2, config: &TileConfig) {
        if !self.particle.is_fixed {
            let dt = delta_time as f32;
            let (anchor_spring, anchor_damping) = if self.is_border() {
                (
                    config.border_anchor_spring_coefficient,
                    config.border_anchor_damping_coefficient,
                )
            } else {
                (
                    config.inner_anchor_spring_coefficient,
                    config.inner_anchor_damping_coefficient,
                )
            };

            let p = &mut self.particle;
            let mut force = p.force_accumulator;
            force -= p.velocity * config.drag_coefficient;
            force += neighbor_force;
            force -= (p.position - self.current_anchor) * anchor_spring;
            force -= p.velocity * anchor_damping;
            let force = snap_vec_below(force, config.force_suppression_threshold);

            p.position += p.velocity * dt;
            p.velocity += force / p.mass * dt;
            p.velocity = snap_vec_below(p.velocity, config.velocity_suppression_threshold);
            if !p.position.is_finite() {
                p.position = self.current_anchor;
                p.velocity = Vec2::ZERO;
            }

            p.force = force;
        }

        self.particle.force_accumulator = Vec2::ZERO;
        self.update_vertices();
    }

    fn update_vertices(&mut self) {
        let position = self.particle.position;
        self.vertices = self.vertex_deltas.map(|delta| position + delta);
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2; DIRECTION_COUNT] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_deltas(&self) -> &[Vec2; DIRECTION_COUNT] {
        &self.vertex_deltas
    }

    /// Flush the tile's current state into its display slot, scaling its
    /// opacity by `opacity_scale`.
    pub fn draw(&self, polygon: &mut TilePolygon, opacity_scale: f32) {
        polygon.vertices = self.vertices;
        polygon.color = self.current_color;
        polygon.opacity = self.opacity * opacity_scale;
        polygon.holds_content = self.holds_content();
        polygon.is_highlighted = self.is_highlighted;
    }
}
