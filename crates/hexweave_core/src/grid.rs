//! Grid: the tile arena, its topology and the global expansion state
//!
//! Layout tiles occupy the front of the arena in row-major order. While a
//! post is open, sectors append their new tiles behind them; tearing the
//! sectors down truncates the arena back to the layout.

use crate::config::{GridConfig, TileConfig};
use crate::layout::{content_mask, neighbor_indices, GridParameters, DIRECTION_COUNT};
use crate::math::Vec2;
use crate::sector::{self, Sector};
use crate::tile::{Tile, TileOrigin};
use crate::topology::{link_slots, spring_force, EdgeArena, EdgeId, Relationship, TileId};
use crate::visual::{DisplayList, PostOverlay};
use rand::Rng;
use tracing::{debug, info};

/// Overlay state of the open post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePost {
    pub tile: TileId,
    pub post: usize,
    pub radius: f32,
    pub opacity: f32,
}

pub struct Grid {
    config: GridConfig,
    tile_mass: f32,
    params: GridParameters,
    post_count: usize,

    tiles: Vec<Tile>,
    layout_tile_count: usize,
    base_edges: EdgeArena,
    expanded_edges: EdgeArena,

    original_tiles: Vec<TileId>,
    all_tiles: Vec<TileId>,
    content_tiles: Vec<TileId>,
    non_content_tiles: Vec<TileId>,

    pub is_post_open: bool,
    pub is_transitioning: bool,
    pub expanded_tile: Option<TileId>,
    sectors: Option<Vec<Sector>>,
    sector_generation: u64,
    /// First arena index dropped by the last sector teardown, until the
    /// animator has released jobs still holding those tiles.
    released_from: Option<usize>,

    pub original_center: Vec2,
    pub current_center: Vec2,
    pub pan_center: Vec2,

    hovered_tile: Option<TileId>,
    page_post: Option<PagePost>,
    step: u64,
}

impl Grid {
    /// Build a grid for `viewport` holding `post_count` posts.
    pub fn new<R: Rng + ?Sized>(
        viewport: Vec2,
        config: &GridConfig,
        tile_config: &TileConfig,
        post_count: usize,
        rng: &mut R,
    ) -> Self {
        let params = GridParameters::compute(viewport, config, post_count);
        let mut grid = Self {
            config: config.clone(),
            tile_mass: tile_config.mass,
            params,
            post_count,
            tiles: Vec::new(),
            layout_tile_count: 0,
            base_edges: EdgeArena::new(),
            expanded_edges: EdgeArena::new(),
            original_tiles: Vec::new(),
            all_tiles: Vec::new(),
            content_tiles: Vec::new(),
            non_content_tiles: Vec::new(),
            is_post_open: false,
            is_transitioning: false,
            expanded_tile: None,
            sectors: None,
            sector_generation: 0,
            released_from: None,
            original_center: Vec2::ZERO,
            current_center: Vec2::ZERO,
            pan_center: Vec2::ZERO,
            hovered_tile: None,
            page_post: None,
            step: 0,
        };
        grid.resize(viewport, config, tile_config, rng);
        grid
    }

    /// Destroy every tile and any open post, then rebuild the layout for
    /// `viewport`. Topology and classification depend only on the viewport
    /// and config; content placement is re-randomised.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        viewport: Vec2,
        config: &GridConfig,
        tile_config: &TileConfig,
        rng: &mut R,
    ) {
        self.destroy_sectors();
        self.destroy_page_post();
        self.is_post_open = false;
        self.is_transitioning = false;
        self.expanded_tile = None;
        self.hovered_tile = None;

        self.config = config.clone();
        self.tile_mass = tile_config.mass;
        self.params = GridParameters::compute(viewport, config, self.post_count);
        self.tiles.clear();
        self.base_edges.clear();
        self.expanded_edges.clear();

        let params = &self.params;
        for index in 0..params.tile_count() {
            let (row, column) = params.row_and_column(index);
            let mut tile = Tile::new(
                TileId::new(index),
                index,
                TileOrigin::Layout { row, column },
                params.anchor(row, column),
                config.tile_outer_radius,
                params.orientation,
                config.tile_color,
                tile_config.mass,
            );
            tile.is_margin_tile = params.is_margin(row, column);
            tile.is_border_tile = params.is_border(row, column);
            tile.is_corner_tile = params.is_corner(row, column);
            self.tiles.push(tile);
        }
        self.layout_tile_count = self.tiles.len();

        for index in 0..self.layout_tile_count {
            let (row, column) = self.params.row_and_column(index);
            let neighbors = neighbor_indices(row, column, &self.params).map(|n| n.map(TileId::new));
            self.set_neighbor_tiles(TileId::new(index), neighbors);
        }

        let mask = content_mask(self.post_count, config.content_density, rng);
        let slots: Vec<usize> = self
            .tiles
            .iter()
            .filter(|tile| !tile.is_margin_tile)
            .map(|tile| tile.id.index())
            .collect();
        let mut next_post = 0;
        for (slot, holds_content) in slots.into_iter().zip(mask) {
            if holds_content {
                self.tiles[slot].set_content(Some(next_post), config.content_tile_color);
                next_post += 1;
            }
        }

        self.original_center = self.params.center;
        self.current_center = self.params.center;
        self.pan_center = self.params.center;
        self.released_from = None;
        self.original_tiles = (0..self.layout_tile_count).map(TileId::new).collect();
        self.update_all_tiles_collection(self.original_tiles.clone());

        info!(
            rows = self.params.row_count,
            odd_row_tiles = self.params.odd_row_tile_count,
            even_row_tiles = self.params.even_row_tile_count,
            tiles = self.layout_tile_count,
            content = next_post,
            "grid resized to {}x{}",
            viewport.x,
            viewport.y
        );
    }

    /// Wire the base-layout neighbours of `id`. Slots already linked are left
    /// alone; each new pair gets one shared relationship whose rest length is
    /// the distance between the two original anchors.
    pub fn set_neighbor_tiles(&mut self, id: TileId, neighbors: [Option<TileId>; DIRECTION_COUNT]) {
        for (direction, neighbor) in neighbors.into_iter().enumerate() {
            let Some(neighbor) = neighbor else { continue };
            if neighbor == id || neighbor.index() >= self.tiles.len() {
                continue;
            }
            let rest_length = self.tiles[id.index()]
                .original_anchor
                .distance(self.tiles[neighbor.index()].original_anchor);
            let mut a_slots = self.tiles[id.index()].neighbors;
            let mut b_slots = self.tiles[neighbor.index()].neighbors;
            if link_slots(
                &mut self.base_edges,
                id,
                &mut a_slots,
                neighbor,
                &mut b_slots,
                direction,
                rest_length,
            )
            .is_some()
            {
                self.tiles[id.index()].neighbors = a_slots;
                self.tiles[neighbor.index()].neighbors = b_slots;
            }
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advance physics for every active tile, subdividing long frames.
    pub fn update(&mut self, current_time: f64, delta_time: f64, config: &TileConfig) {
        let steps = (delta_time / config.max_step_duration).ceil().max(1.0) as usize;
        let step_duration = delta_time / steps as f64;
        for _ in 0..steps {
            self.step += 1;
            for i in 0..self.all_tiles.len() {
                let id = self.all_tiles[i];
                self.update_tile(id, current_time, step_duration, config);
            }
        }
    }

    fn update_tile(&mut self, id: TileId, current_time: f64, delta_time: f64, config: &TileConfig) {
        let Some(tile) = self.tiles.get(id.index()) else { return };

        let mut neighbor_force = Vec2::ZERO;
        if !tile.particle.is_fixed {
            let slots = *tile.active_neighbors();
            let edges = if tile.is_expanded() {
                &mut self.expanded_edges
            } else {
                &mut self.base_edges
            };
            let position = tile.particle.position;
            let velocity = tile.particle.velocity;

            for link in slots.iter().flatten() {
                let Some(other) = self.tiles.get(link.tile.index()).map(|t| t.particle) else {
                    continue;
                };
                let Some(edge) = edges.get_mut(link.edge) else { continue };
                let rest_length = edge.rest_length;
                neighbor_force += edge.force_on(id, self.step, || {
                    spring_force(
                        position,
                        velocity,
                        other.position,
                        other.velocity,
                        rest_length,
                        config.neighbor_spring_coefficient,
                        config.neighbor_damping_coefficient,
                    )
                });
            }
        }

        self.tiles[id.index()].update(current_time, delta_time, neighbor_force, config);
    }

    /// Flush every active tile, plus the post overlay while a post is open.
    /// While a post is open every tile but the expanded one is dimmed to
    /// `tile_opacity`.
    pub fn draw(&self, display: &mut DisplayList) {
        display.resize_tiles(self.all_tiles.len());
        for id in &self.all_tiles {
            let tile = &self.tiles[id.index()];
            let opacity_scale = if self.is_post_open && self.expanded_tile != Some(*id) {
                self.config.tile_opacity
            } else {
                1.0
            };
            if let Some(polygon) = tile.display_index.and_then(|i| display.tiles.get_mut(i)) {
                tile.draw(polygon, opacity_scale);
            }
        }

        if let Some(page_post) = &self.page_post {
            if let Some(tile) = self.tile(page_post.tile) {
                display.post_overlay = Some(PostOverlay {
                    post: page_post.post,
                    center: tile.particle.position,
                    radius: page_post.radius,
                    opacity: page_post.opacity,
                });
            }
        }
    }

    // ========================================================================
    // Active set, hover, page post
    // ========================================================================

    /// Swap the active tile set and rebuild the derived subsets and display slots.
    pub fn update_all_tiles_collection(&mut self, tiles: Vec<TileId>) {
        for tile in &mut self.tiles {
            tile.display_index = None;
        }
        self.content_tiles.clear();
        self.non_content_tiles.clear();
        for (display_index, id) in tiles.iter().enumerate() {
            let tile = &mut self.tiles[id.index()];
            tile.display_index = Some(display_index);
            if tile.holds_content() {
                self.content_tiles.push(*id);
            } else {
                self.non_content_tiles.push(*id);
            }
        }
        self.all_tiles = tiles;
    }

    /// Move the hover highlight. `None` to `None` is a no-op.
    pub fn set_hovered_tile(&mut self, tile: Option<TileId>) {
        if self.hovered_tile == tile {
            return;
        }
        if let Some(previous) = self.hovered_tile.and_then(|id| self.tiles.get_mut(id.index())) {
            previous.set_highlighted(false);
        }
        if let Some(next) = tile.and_then(|id| self.tiles.get_mut(id.index())) {
            next.set_highlighted(true);
        }
        self.hovered_tile = tile;
    }

    /// Open the overlay for the post held by `tile`. Returns false when the
    /// tile holds no content.
    pub fn create_page_post(&mut self, tile: TileId) -> bool {
        let Some(post) = self.tile(tile).and_then(Tile::post) else {
            return false;
        };
        let radius = self.config.expanded_displacement_tile_count as f32
            * self.params.metrics.short_length_with_gap;
        self.page_post = Some(PagePost {
            tile,
            post,
            radius,
            opacity: 0.0,
        });
        debug!(post, "page post created");
        true
    }

    pub fn destroy_page_post(&mut self) {
        if let Some(page_post) = self.page_post.take() {
            debug!(post = page_post.post, "page post destroyed");
        }
    }

    // ========================================================================
    // Sectors
    // ========================================================================

    /// Split the grid into six sectors around `base` and switch the active
    /// set to the expanded topology. Replaces any existing sectors.
    pub fn create_sectors(&mut self, base: TileId) {
        self.destroy_sectors();
        if self.tile(base).is_none() {
            return;
        }
        let displacement_tile_count = self.config.expanded_displacement_tile_count;
        let sectors = sector::build_sectors(self, base, displacement_tile_count);

        let mut all_tiles = self.original_tiles.clone();
        for sector in &sectors {
            all_tiles.extend_from_slice(&sector.new_tiles);
        }
        debug!(
            base = base.index(),
            new_tiles = all_tiles.len() - self.original_tiles.len(),
            "sectors created"
        );
        self.sectors = Some(sectors);
        self.sector_generation += 1;
        self.update_all_tiles_collection(all_tiles);
    }

    /// Release the expanded topology, restore layout anchors and drop the
    /// tiles the sectors created.
    pub fn destroy_sectors(&mut self) {
        let Some(sectors) = self.sectors.take() else { return };
        for sector in &sectors {
            sector.destroy(&mut self.tiles);
        }
        for tile in &mut self.tiles {
            tile.expanded = None;
            tile.unfix_position();
        }
        if self.tiles.len() > self.layout_tile_count {
            self.released_from = Some(self.layout_tile_count);
        }
        self.tiles.truncate(self.layout_tile_count);
        self.expanded_edges.clear();
        if self.hovered_tile.is_some_and(|id| id.index() >= self.layout_tile_count) {
            self.hovered_tile = None;
        }
        self.update_all_tiles_collection(self.original_tiles.clone());
        debug!("sectors destroyed");
    }

    /// Translate sector `index` rigidly to `position`. No-op without sectors.
    pub fn set_sector_position(&mut self, index: usize, position: Vec2) {
        if let Some(sector) = self.sectors.as_mut().and_then(|sectors| sectors.get_mut(index)) {
            sector.set_position(position, &mut self.tiles);
        }
    }

    /// Commit the anchor sector `index` comes to rest at.
    pub fn set_sector_target(&mut self, index: usize, target: Vec2) {
        if let Some(sector) = self.sectors.as_mut().and_then(|sectors| sectors.get_mut(index)) {
            sector.target_anchor = target;
        }
    }

    pub fn sectors(&self) -> Option<&[Sector]> {
        self.sectors.as_deref()
    }

    /// Bumped every time a new set of sectors is built.
    #[inline]
    pub fn sector_generation(&self) -> u64 {
        self.sector_generation
    }

    /// Take the first arena index dropped since the last call. Ids at or
    /// beyond it may be handed out again by the next `create_sectors`.
    pub(crate) fn take_released_tiles(&mut self) -> Option<usize> {
        self.released_from.take()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Active tile whose live position is nearest `point`, if within its
    /// outer radius.
    pub fn tile_at(&self, point: Vec2) -> Option<TileId> {
        self.all_tiles
            .iter()
            .map(|&id| (id, self.tiles[id.index()].particle.position.distance_squared(point)))
            .filter(|&(id, distance)| {
                let radius = self.tiles[id.index()].outer_radius;
                distance <= radius * radius
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Active tile whose original anchor is nearest `point`.
    pub fn nearest_tile(&self, point: Vec2) -> Option<TileId> {
        self.all_tiles
            .iter()
            .map(|&id| (id, self.tiles[id.index()].original_anchor.distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    #[inline]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    #[inline]
    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.index())
    }

    /// Active tiles in display order.
    pub fn active_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.all_tiles.iter().map(|id| &self.tiles[id.index()])
    }

    /// Run `f` on every active tile.
    pub fn for_each_active_tile(&mut self, mut f: impl FnMut(&mut Tile)) {
        for id in &self.all_tiles {
            f(&mut self.tiles[id.index()]);
        }
    }

    /// Every tile in the arena, active or not.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut Vec<Tile> {
        &mut self.tiles
    }

    /// Append a tile created by a sector.
    pub(crate) fn push_tile(&mut self, tile: Tile) -> TileId {
        let id = TileId::new(self.tiles.len());
        let mut tile = tile;
        tile.id = id;
        tile.original_index = id.index();
        self.tiles.push(tile);
        id
    }

    pub(crate) fn expanded_edges_mut(&mut self) -> &mut EdgeArena {
        &mut self.expanded_edges
    }

    /// Relationship record of a base-layout link.
    pub fn relationship(&self, edge: EdgeId) -> Option<&Relationship> {
        self.base_edges.get(edge)
    }

    pub fn relationship_mut(&mut self, edge: EdgeId) -> Option<&mut Relationship> {
        self.base_edges.get_mut(edge)
    }

    /// Relationship record of an expanded-topology link.
    pub fn expanded_relationship(&self, edge: EdgeId) -> Option<&Relationship> {
        self.expanded_edges.get(edge)
    }

    /// Relationship behind `tile`'s active link in `direction`.
    pub fn active_relationship(&self, tile: TileId, direction: usize) -> Option<&Relationship> {
        let tile = self.tile(tile)?;
        let link = tile.active_neighbors()[direction % DIRECTION_COUNT]?;
        if tile.is_expanded() {
            self.expanded_edges.get(link.edge)
        } else {
            self.base_edges.get(link.edge)
        }
    }

    #[inline]
    pub fn params(&self) -> &GridParameters {
        &self.params
    }

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn tile_mass(&self) -> f32 {
        self.tile_mass
    }

    pub fn original_tiles(&self) -> &[TileId] {
        &self.original_tiles
    }

    /// Ids of the active tiles: the layout plus any sector tiles.
    pub fn all_tiles(&self) -> &[TileId] {
        &self.all_tiles
    }

    pub fn content_tiles(&self) -> &[TileId] {
        &self.content_tiles
    }

    pub fn non_content_tiles(&self) -> &[TileId] {
        &self.non_content_tiles
    }

    pub fn hovered_tile(&self) -> Option<TileId> {
        self.hovered_tile
    }

    pub fn page_post(&self) -> Option<&PagePost> {
        self.page_post.as_ref()
    }

    pub fn page_post_mut(&mut self) -> Option<&mut PagePost> {
        self.page_post.as_mut()
    }

    pub fn post_count(&self) -> usize {
        self.post_count
    }

    /// Number of tiles belonging to the base layout.
    pub fn layout_tile_count(&self) -> usize {
        self.layout_tile_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{reverse_direction, Orientation};
    use crate::math::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn grid(orientation: Orientation, posts: usize, seed: u64) -> Grid {
        let config = GridConfig {
            orientation,
            ..GridConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        Grid::new(Vec2::new(1280.0, 800.0), &config, &TileConfig::default(), posts, &mut rng)
    }

    #[test]
    fn neighbors_are_symmetric_and_share_records() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let mut grid = grid(orientation, 12, 1);
            for index in 0..grid.tiles().len() {
                let tile = &grid.tiles()[index];
                for (direction, link) in tile.neighbors.iter().enumerate() {
                    let Some(link) = link else { continue };
                    let back = grid.tiles()[link.tile.index()].neighbors[reverse_direction(direction)];
                    assert_eq!(back.map(|l| l.tile), Some(tile.id));
                    assert_eq!(back.map(|l| l.edge), Some(link.edge));
                }
            }

            // Mutating through one side is visible from the other.
            let a = TileId::new(grid.params().even_row_tile_count + 2);
            let link = grid.tile(a).and_then(|t| t.neighbors[1]).unwrap();
            grid.relationship_mut(link.edge).unwrap().force_on(a, 99, || Vec2::new(1.0, 2.0));
            let back = grid.tile(link.tile).unwrap().neighbors[4].unwrap();
            let cached = grid.relationship(back.edge).unwrap().cached_force().unwrap();
            assert_eq!(cached.recipient, link.tile);
            assert_eq!(cached.force, Vec2::new(-1.0, -2.0));
        }
    }

    #[test]
    fn border_classification_is_deterministic() {
        let border_set = |grid: &Grid| -> BTreeSet<usize> {
            grid.tiles()
                .iter()
                .filter(|t| t.is_border_tile)
                .map(|t| t.original_index)
                .collect()
        };
        let a = grid(Orientation::Vertical, 8, 1);
        let b = grid(Orientation::Vertical, 8, 2);
        assert_eq!(border_set(&a), border_set(&b));

        let params = a.params();
        for tile in a.tiles() {
            let TileOrigin::Layout { row, column } = tile.origin else { unreachable!() };
            let last_column = params.row_tile_count(row) - 1;
            let expected = row == 0
                || row == params.row_count - 1
                || (params.is_larger_row(row) && (column == 0 || column == last_column));
            assert_eq!(tile.is_border_tile, expected);
        }
    }

    #[test]
    fn content_tile_count_matches_posts() {
        for seed in 0..8 {
            for posts in [0, 1, 9, 30] {
                let grid = grid(Orientation::Vertical, posts, seed);
                assert_eq!(grid.content_tiles().len(), posts);
                let mut bound: Vec<usize> = grid.tiles().iter().filter_map(Tile::post).collect();
                bound.sort_unstable();
                assert_eq!(bound, (0..posts).collect::<Vec<_>>());
                assert!(grid.tiles().iter().filter(|t| t.holds_content()).all(|t| !t.is_margin_tile));
            }
        }
    }

    #[test]
    fn resize_twice_keeps_topology() {
        let config = GridConfig::default();
        let tile_config = TileConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let viewport = Vec2::new(1000.0, 700.0);
        let mut grid = Grid::new(viewport, &config, &tile_config, 5, &mut rng);
        let before: Vec<_> = grid.tiles().iter().map(|t| t.neighbors.map(|l| l.map(|l| l.tile))).collect();
        grid.resize(viewport, &config, &tile_config, &mut rng);
        let after: Vec<_> = grid.tiles().iter().map(|t| t.neighbors.map(|l| l.map(|l| l.tile))).collect();
        assert_eq!(before, after);
        assert_eq!(grid.content_tiles().len(), 5);
    }

    #[test]
    fn hover_moves_highlight() {
        let mut grid = grid(Orientation::Vertical, 0, 1);
        let a = TileId::new(10);
        let b = TileId::new(11);
        grid.set_hovered_tile(None);
        assert_eq!(grid.hovered_tile(), None);
        grid.set_hovered_tile(Some(a));
        assert!(grid.tile(a).unwrap().is_highlighted());
        grid.set_hovered_tile(Some(b));
        assert!(!grid.tile(a).unwrap().is_highlighted());
        assert!(grid.tile(b).unwrap().is_highlighted());
        grid.set_hovered_tile(None);
        assert!(!grid.tile(b).unwrap().is_highlighted());
    }

    #[test]
    fn resting_grid_stays_at_rest() {
        let mut grid = grid(Orientation::Horizontal, 4, 1);
        let config = TileConfig::default();
        for frame in 0..20 {
            grid.update(frame as f64 * 16.0, 16.0, &config);
        }
        for tile in grid.tiles() {
            assert_eq!(tile.particle.position, tile.original_anchor);
            assert_eq!(tile.particle.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn impulse_spreads_to_neighbors_and_settles() {
        let mut grid = grid(Orientation::Vertical, 0, 1);
        let config = TileConfig::default();
        let center = grid.nearest_tile(grid.params().center).unwrap();
        grid.tile_mut(center).unwrap().apply_external_force(Vec2::new(0.05, 0.0));
        grid.update(0.0, 16.0, &config);
        for frame in 1..40 {
            grid.update(frame as f64 * 16.0, 16.0, &config);
        }
        let moved = grid
            .tiles()
            .iter()
            .filter(|t| t.id != center && t.particle.position != t.original_anchor)
            .count();
        assert!(moved > 0);

        for frame in 40..4000 {
            grid.update(frame as f64 * 16.0, 16.0, &config);
        }
        assert!(grid.tiles().iter().all(|t| t.particle.velocity == Vec2::ZERO));
    }

    #[test]
    fn tile_at_hits_the_tile_under_the_point() {
        let grid = grid(Orientation::Vertical, 0, 1);
        let target = TileId::new(grid.params().even_row_tile_count + 3);
        let anchor = grid.tile(target).unwrap().original_anchor;
        assert_eq!(grid.tile_at(anchor + Vec2::new(5.0, -3.0)), Some(target));
        assert_eq!(grid.tile_at(Vec2::new(-10_000.0, 0.0)), None);
    }

    #[test]
    fn draw_fills_one_polygon_per_active_tile() {
        let grid = grid(Orientation::Vertical, 3, 1);
        let mut display = DisplayList::default();
        grid.draw(&mut display);
        assert_eq!(display.tiles.len(), grid.all_tiles().len());
        assert_eq!(display.tiles.iter().filter(|p| p.holds_content).count(), 3);
        assert!(display.post_overlay.is_none());
        assert!(display.tiles.iter().all(|p| p.opacity == 1.0));
    }

    #[test]
    fn open_post_dims_every_tile_but_the_expanded_one() {
        let mut grid = grid(Orientation::Vertical, 3, 1);
        let expanded = grid.content_tiles()[0];
        grid.is_post_open = true;
        grid.expanded_tile = Some(expanded);
        grid.create_sectors(expanded);
        assert!(grid.create_page_post(expanded));

        let mut display = DisplayList::default();
        grid.draw(&mut display);
        let tile_opacity = grid.config().tile_opacity;
        for id in grid.all_tiles() {
            let slot = grid.tile(*id).and_then(|tile| tile.display_index).unwrap();
            let expected = if *id == expanded { 1.0 } else { tile_opacity };
            assert_eq!(display.tiles[slot].opacity, expected);
        }
        assert!(display.post_overlay.is_some());
    }
}
