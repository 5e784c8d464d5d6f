//! Sectors: the six wedges a grid splits into while a post is open
//!
//! Sector `k` covers the lattice cells `(m + 1)·d[k] + b·d[k + 1]` around the
//! expanded tile, for `m, b >= 0`, where `d` are the neighbour anchor deltas.
//! Opening a post moves each sector outward by `N·d[k - 1]`, which opens a
//! hole around the expanded tile and leaves the wedges meeting edge to edge.
//!
//! Existing tiles are found with two line walks over the base links
//! (major-first, then minor-first). The union of the two walks can miss
//! cells for extreme aspect ratios; callers tolerate sparse sectors.

use crate::grid::Grid;
use crate::layout::{neighbor_anchor_deltas, wrap_direction, DIRECTION_COUNT};
use crate::math::Vec2;
use crate::tile::{ExpandedState, Tile, TileOrigin};
use crate::topology::{link_slots, TileId};
use tracing::{debug, trace};

/// Hard cap on line-walk length, far beyond any viewport.
const MAX_WALK_STEPS: usize = 4096;

#[derive(Debug, Clone)]
pub struct Sector {
    pub index: usize,
    pub base_tile: TileId,
    pub major_direction: usize,
    pub minor_direction: usize,
    pub major_delta: Vec2,
    pub minor_delta: Vec2,
    /// `tiles_by_index[major][minor]`.
    tiles_by_index: Vec<Vec<Option<TileId>>>,
    /// Every tile of the sector, in `(major, minor)` order.
    pub tiles: Vec<TileId>,
    /// Tiles this sector created.
    pub new_tiles: Vec<TileId>,
    pub expanded_displacement: Vec2,
    pub original_anchor: Vec2,
    pub current_anchor: Vec2,
    /// Where the sector comes to rest once its dilation finishes.
    pub target_anchor: Vec2,
}

impl Sector {
    pub fn new(
        index: usize,
        base_tile: TileId,
        base_anchor: Vec2,
        anchor_deltas: &[Vec2; DIRECTION_COUNT],
        displacement_tile_count: usize,
    ) -> Self {
        let major_direction = index % DIRECTION_COUNT;
        let minor_direction = (index + 1) % DIRECTION_COUNT;
        Self {
            index,
            base_tile,
            major_direction,
            minor_direction,
            major_delta: anchor_deltas[major_direction],
            minor_delta: anchor_deltas[minor_direction],
            tiles_by_index: Vec::new(),
            tiles: Vec::new(),
            new_tiles: Vec::new(),
            expanded_displacement: anchor_deltas[(index + 5) % DIRECTION_COUNT]
                * displacement_tile_count as f32,
            original_anchor: base_anchor,
            current_anchor: base_anchor,
            target_anchor: base_anchor,
        }
    }

    /// Offset of cell `(major, minor)` from the expanded tile's anchor.
    #[inline]
    pub fn cell_offset(&self, major: usize, minor: usize) -> Vec2 {
        self.major_delta * (major + 1) as f32 + self.minor_delta * minor as f32
    }

    /// Tile at cell `(major, minor)`, if the sector has one there.
    pub fn get(&self, major: usize, minor: usize) -> Option<TileId> {
        self.tiles_by_index.get(major)?.get(minor).copied().flatten()
    }

    /// Number of major lines with at least one cell slot.
    pub fn major_len(&self) -> usize {
        self.tiles_by_index.len()
    }

    /// Anchor the sector rests at once fully dilated.
    #[inline]
    pub fn expanded_anchor(&self) -> Vec2 {
        self.original_anchor + self.expanded_displacement
    }

    /// Iterate `(major, minor, tile)` over the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        self.tiles_by_index.iter().enumerate().flat_map(|(major, line)| {
            line.iter()
                .enumerate()
                .filter_map(move |(minor, tile)| tile.map(|tile| (major, minor, tile)))
        })
    }

    fn set(&mut self, major: usize, minor: usize, tile: TileId) -> bool {
        if self.tiles_by_index.len() <= major {
            self.tiles_by_index.resize_with(major + 1, Vec::new);
        }
        let line = &mut self.tiles_by_index[major];
        if line.len() <= minor {
            line.resize(minor + 1, None);
        }
        if line[minor].is_some() {
            return false;
        }
        line[minor] = Some(tile);
        true
    }

    /// Dual-pass walk over the base links collecting the existing tiles.
    fn collect_existing_tiles(&mut self, grid: &Grid) {
        let base_neighbor = |tile: TileId, direction: usize| -> Option<TileId> {
            grid.tile(tile)?.neighbors[direction].map(|link| link.tile)
        };
        let origin = base_neighbor(self.base_tile, self.major_direction);

        // Major-first.
        let mut major_tile = origin;
        let mut major = 0;
        while let Some(line_start) = major_tile {
            let mut minor_tile = Some(line_start);
            let mut minor = 0;
            while let Some(tile) = minor_tile {
                self.set(major, minor, tile);
                minor_tile = base_neighbor(tile, self.minor_direction);
                minor += 1;
                if minor >= MAX_WALK_STEPS {
                    break;
                }
            }
            major_tile = base_neighbor(line_start, self.major_direction);
            major += 1;
            if major >= MAX_WALK_STEPS {
                break;
            }
        }

        // Minor-first.
        let mut minor_tile = origin;
        let mut minor = 0;
        while let Some(line_start) = minor_tile {
            let mut major_tile = Some(line_start);
            let mut major = 0;
            while let Some(tile) = major_tile {
                self.set(major, minor, tile);
                major_tile = base_neighbor(tile, self.major_direction);
                major += 1;
                if major >= MAX_WALK_STEPS {
                    break;
                }
            }
            minor_tile = base_neighbor(line_start, self.minor_direction);
            minor += 1;
            if minor >= MAX_WALK_STEPS {
                break;
            }
        }
    }

    /// Dual-pass geometric walk filling empty cells that will be on screen
    /// once the sector is dilated.
    fn create_missing_tiles(&mut self, grid: &mut Grid) {
        let half = grid.params().viewport * 0.5;
        let span = grid.params().metrics.long_length_with_gap;
        let in_bounds = |sector: &Sector, major: usize, minor: usize| {
            let p = sector.cell_offset(major, minor) + sector.expanded_displacement;
            p.x.abs() <= half.x + span && p.y.abs() <= half.y + span
        };

        for major in 0..MAX_WALK_STEPS {
            if !in_bounds(self, major, 0) {
                break;
            }
            for minor in 0..MAX_WALK_STEPS {
                if !in_bounds(self, major, minor) {
                    break;
                }
                self.ensure_tile(grid, major, minor);
            }
        }

        for minor in 0..MAX_WALK_STEPS {
            if !in_bounds(self, 0, minor) {
                break;
            }
            for major in 0..MAX_WALK_STEPS {
                if !in_bounds(self, major, minor) {
                    break;
                }
                self.ensure_tile(grid, major, minor);
            }
        }
    }

    fn ensure_tile(&mut self, grid: &mut Grid, major: usize, minor: usize) {
        if self.get(major, minor).is_some() {
            return;
        }
        let config = grid.config();
        let tile = Tile::new(
            TileId::new(0),
            0,
            TileOrigin::Sector {
                sector: self.index,
                major,
                minor,
            },
            self.original_anchor + self.cell_offset(major, minor),
            config.tile_outer_radius,
            config.orientation,
            config.tile_color,
            grid.tile_mass(),
        );
        let id = grid.push_tile(tile);
        self.set(major, minor, id);
        self.new_tiles.push(id);
    }

    /// Give every tile its expanded state and link the lattice inside the sector.
    fn initialize_expanded_state(&mut self, grid: &mut Grid) {
        self.tiles = self.cells().map(|(_, _, tile)| tile).collect();
        for &id in &self.tiles {
            if let Some(tile) = grid.tile_mut(id) {
                let offset = tile.original_anchor - self.original_anchor;
                tile.expanded = Some(ExpandedState::new(Some(self.index), offset));
            }
        }

        let behind = wrap_direction(self.index as isize - 1);
        let cells: Vec<_> = self.cells().collect();
        for (major, minor, tile) in cells {
            if let Some(next) = self.get(major + 1, minor) {
                link_expanded(grid, tile, next, self.major_direction, self.expanded_displacement, self.expanded_displacement);
            }
            if let Some(next) = self.get(major, minor + 1) {
                link_expanded(grid, tile, next, self.minor_direction, self.expanded_displacement, self.expanded_displacement);
            }
            if minor > 0 {
                if let Some(next) = self.get(major + 1, minor - 1) {
                    link_expanded(grid, tile, next, behind, self.expanded_displacement, self.expanded_displacement);
                }
            }
        }
    }

    /// Move the sector anchor and rewrite every owned tile's original anchor
    /// as `anchor + sector_offset`.
    pub fn set_position(&mut self, position: Vec2, tiles: &mut [Tile]) {
        self.current_anchor = position;
        for id in &self.tiles {
            if let Some(tile) = tiles.get_mut(id.index()) {
                if let Some(expanded) = &tile.expanded {
                    tile.original_anchor = position + expanded.sector_offset;
                }
            }
        }
    }

    /// Restore layout anchors and release the expanded state of this sector's tiles.
    pub fn destroy(&self, tiles: &mut [Tile]) {
        for id in &self.tiles {
            if let Some(tile) = tiles.get_mut(id.index()) {
                if let Some(expanded) = tile.expanded.take() {
                    tile.original_anchor = self.original_anchor + expanded.sector_offset;
                }
            }
        }
    }
}

/// Link two tiles in the expanded topology. The rest length is measured
/// between their fully dilated positions.
fn link_expanded(
    grid: &mut Grid,
    a: TileId,
    b: TileId,
    direction: usize,
    a_displacement: Vec2,
    b_displacement: Vec2,
) {
    let (Some(a_tile), Some(b_tile)) = (grid.tile(a), grid.tile(b)) else { return };
    let (Some(a_state), Some(b_state)) = (&a_tile.expanded, &b_tile.expanded) else { return };
    let rest_length = (a_tile.original_anchor + a_displacement)
        .distance(b_tile.original_anchor + b_displacement);
    let mut a_slots = a_state.neighbors;
    let mut b_slots = b_state.neighbors;

    if link_slots(grid.expanded_edges_mut(), a, &mut a_slots, b, &mut b_slots, direction, rest_length).is_none() {
        trace!(a = a.index(), b = b.index(), direction, "expanded slot already linked");
        return;
    }
    let tiles = grid.tiles_mut();
    if let Some(state) = tiles[a.index()].expanded.as_mut() {
        state.neighbors = a_slots;
    }
    if let Some(state) = tiles[b.index()].expanded.as_mut() {
        state.neighbors = b_slots;
    }
}

/// Stitch each sector's first major line to the previous sector's first
/// minor line: tile `(m, 0)` of sector `k` meets tiles `(0, m + N)` and
/// `(0, m + N + 1)` of sector `k - 1` in directions `k + 4` and `k + 5`.
pub fn initialize_expanded_state_external_tile_neighbors(
    sectors: &[Sector],
    grid: &mut Grid,
    displacement_tile_count: usize,
) {
    let n = displacement_tile_count;
    for sector in sectors {
        let previous = &sectors[wrap_direction(sector.index as isize - 1) % sectors.len()];
        let first_direction = (sector.index + 4) % DIRECTION_COUNT;
        let second_direction = (sector.index + 5) % DIRECTION_COUNT;
        for major in 0..sector.major_len() {
            let Some(tile) = sector.get(major, 0) else { continue };
            if let Some(other) = previous.get(0, major + n) {
                link_expanded(grid, tile, other, first_direction, sector.expanded_displacement, previous.expanded_displacement);
            }
            if let Some(other) = previous.get(0, major + n + 1) {
                link_expanded(grid, tile, other, second_direction, sector.expanded_displacement, previous.expanded_displacement);
            }
        }
    }
}

/// Build the six sectors around `base`, creating and wiring their tiles.
pub(crate) fn build_sectors(grid: &mut Grid, base: TileId, displacement_tile_count: usize) -> Vec<Sector> {
    let Some(base_anchor) = grid.tile(base).map(|tile| tile.original_anchor) else {
        return Vec::new();
    };
    let deltas = neighbor_anchor_deltas(grid.params().orientation, &grid.params().metrics);
    let mut sectors: Vec<Sector> = (0..DIRECTION_COUNT)
        .map(|index| Sector::new(index, base, base_anchor, &deltas, displacement_tile_count))
        .collect();

    for sector in &mut sectors {
        sector.collect_existing_tiles(grid);
    }
    for sector in &mut sectors {
        sector.create_missing_tiles(grid);
    }
    for sector in &mut sectors {
        sector.initialize_expanded_state(grid);
    }
    initialize_expanded_state_external_tile_neighbors(&sectors, grid, displacement_tile_count);

    // Inner ring borders the open post; the outer ring has missing links.
    for sector in &sectors {
        for (major, minor, id) in sector.cells() {
            if let Some(state) = grid.tile_mut(id).and_then(|tile| tile.expanded.as_mut()) {
                let inner_ring = major == 0 && minor <= displacement_tile_count;
                let outer_ring = state.neighbors.iter().any(Option::is_none);
                state.is_border = inner_ring || outer_ring;
            }
        }
    }

    if let Some(tile) = grid.tile_mut(base) {
        let mut state = ExpandedState::new(None, Vec2::ZERO);
        state.is_border = true;
        tile.expanded = Some(state);
    }

    for sector in &sectors {
        debug!(
            sector = sector.index,
            tiles = sector.tiles.len(),
            new_tiles = sector.new_tiles.len(),
            "sector built"
        );
    }
    sectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, TileConfig};
    use crate::layout::{reverse_direction, Orientation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn open_grid(orientation: Orientation) -> (Grid, TileId) {
        let config = GridConfig {
            orientation,
            ..GridConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = Grid::new(Vec2::new(1280.0, 900.0), &config, &TileConfig::default(), 6, &mut rng);
        let base = grid.nearest_tile(grid.params().center).unwrap();
        grid.create_sectors(base);
        (grid, base)
    }

    #[test]
    fn sectors_do_not_overlap_and_cover_the_base_layout() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let (grid, base) = open_grid(orientation);
            let sectors = grid.sectors().unwrap();
            assert_eq!(sectors.len(), 6);

            let mut seen = HashSet::new();
            for sector in sectors {
                for id in &sector.tiles {
                    assert!(seen.insert(*id), "tile {id:?} in two sectors");
                }
            }
            assert!(!seen.contains(&base));

            // A centered base tile in a regular grid is fully covered.
            for id in grid.original_tiles() {
                if *id != base {
                    assert!(seen.contains(id), "{orientation:?} tile {id:?} in no sector");
                }
            }
        }
    }

    #[test]
    fn cells_sit_on_the_sector_lattice() {
        let (grid, _) = open_grid(Orientation::Vertical);
        for sector in grid.sectors().unwrap() {
            for (major, minor, id) in sector.cells() {
                let tile = grid.tile(id).unwrap();
                let expected = sector.original_anchor + sector.cell_offset(major, minor);
                assert!(tile.original_anchor.distance(expected) < 1e-2);
            }
        }
    }

    #[test]
    fn expanded_links_are_symmetric_and_measured_when_dilated() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let (grid, _) = open_grid(orientation);
            let short = grid.params().metrics.short_length_with_gap;
            for tile in grid.tiles() {
                let Some(state) = &tile.expanded else { continue };
                for (direction, link) in state.neighbors.iter().enumerate() {
                    let Some(link) = link else { continue };
                    let other = grid.tile(link.tile).unwrap();
                    let back = other.expanded.as_ref().unwrap().neighbors[reverse_direction(direction)];
                    assert_eq!(back.map(|l| l.tile), Some(tile.id));
                    let rest = grid.expanded_relationship(link.edge).unwrap().rest_length;
                    assert!((rest - short).abs() < 1e-2, "{orientation:?} rest {rest} vs {short}");
                }
            }
        }
    }

    #[test]
    fn external_links_stitch_neighboring_sectors() {
        let (grid, _) = open_grid(Orientation::Vertical);
        let n = grid.config().expanded_displacement_tile_count;
        let sectors = grid.sectors().unwrap();
        let mut stitched = 0;
        for sector in sectors {
            let previous = &sectors[(sector.index + 5) % 6];
            let Some(tile) = sector.get(0, 0) else { continue };
            let Some(expected) = previous.get(0, n) else { continue };
            let link = grid.tile(tile).unwrap().expanded.as_ref().unwrap().neighbors[(sector.index + 4) % 6];
            assert_eq!(link.map(|l| l.tile), Some(expected));
            stitched += 1;
        }
        assert!(stitched > 0);
    }

    #[test]
    fn inner_ring_is_border() {
        let (grid, base) = open_grid(Orientation::Vertical);
        let n = grid.config().expanded_displacement_tile_count;
        for sector in grid.sectors().unwrap() {
            for minor in 0..=n {
                if let Some(id) = sector.get(0, minor) {
                    assert!(grid.tile(id).unwrap().is_border());
                }
            }
        }
        assert!(grid.tile(base).unwrap().is_border());
    }

    #[test]
    fn set_position_translates_rigidly_and_destroy_restores() {
        let (mut grid, _) = open_grid(Orientation::Vertical);
        let layout_count = grid.layout_tile_count();
        let before: Vec<Vec2> = grid.tiles()[..layout_count].iter().map(|t| t.original_anchor).collect();

        let sector = grid.sectors().unwrap()[2].clone();
        let target = sector.expanded_anchor();
        grid.set_sector_position(2, target);
        for id in &sector.tiles {
            let tile = grid.tile(*id).unwrap();
            let offset = tile.expanded.as_ref().unwrap().sector_offset;
            assert!((tile.original_anchor - (target + offset)).length() < 1e-3);
        }

        grid.destroy_sectors();
        assert!(grid.sectors().is_none());
        assert_eq!(grid.tiles().len(), layout_count);
        assert_eq!(grid.all_tiles().len(), layout_count);
        let after: Vec<Vec2> = grid.tiles().iter().map(|t| t.original_anchor).collect();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!(a.distance(*b) < 1e-3);
        }
        assert!(grid.tiles().iter().all(|t| t.expanded.is_none()));
    }

    #[test]
    fn new_tiles_join_the_active_set() {
        let (grid, _) = open_grid(Orientation::Horizontal);
        let new_count: usize = grid.sectors().unwrap().iter().map(|s| s.new_tiles.len()).sum();
        assert!(new_count > 0);
        assert_eq!(grid.all_tiles().len(), grid.layout_tile_count() + new_count);
        assert_eq!(grid.tiles().len(), grid.all_tiles().len());
    }
}
