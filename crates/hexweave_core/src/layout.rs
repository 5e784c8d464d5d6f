//! Hexagon geometry and grid layout
//!
//! Pure functions: vertex offsets, row/column counts, anchor positions,
//! content column placement and the closed-form neighbour index math for a
//! flat, row-major tile array.
//!
//! Direction slots run clockwise. Vertical (pointy-top) tiles start at the
//! top-right neighbour, horizontal (flat-top) tiles start at the top
//! neighbour. The reverse of direction `d` is always `(d + 3) % 6`.
//! Even rows (row 0 included) are the larger parity and hold one more tile
//! than odd rows.

use crate::config::GridConfig;
use crate::math::{Vec2, HALF_SQRT_3, SQRT_3};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of neighbour directions around a hexagon.
pub const DIRECTION_COUNT: usize = 6;

/// Which way the hexagons point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Pointy-top hexagons laid out in offset rows.
    #[default]
    Vertical,
    /// Flat-top hexagons laid out in interleaved half-height rows.
    Horizontal,
}

impl Orientation {
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// Direction pointing back at the tile that sits in direction `direction`.
#[inline]
pub fn reverse_direction(direction: usize) -> usize {
    (direction + 3) % DIRECTION_COUNT
}

/// Direction index wrapped into `0..6`, accepting negative offsets.
#[inline]
pub fn wrap_direction(direction: isize) -> usize {
    direction.rem_euclid(DIRECTION_COUNT as isize) as usize
}

// ============================================================================
// Tile metrics
// ============================================================================

/// Derived lengths of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileMetrics {
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub gap: f32,
    /// Distance between the centers of two side-by-side tiles.
    pub short_length_with_gap: f32,
    /// Corner-to-corner span including the gap share on both ends.
    pub long_length_with_gap: f32,
}

impl TileMetrics {
    pub fn new(outer_radius: f32, gap: f32) -> Self {
        let inner_radius = outer_radius * HALF_SQRT_3;
        Self {
            outer_radius,
            inner_radius,
            gap,
            short_length_with_gap: inner_radius * 2.0 + gap,
            long_length_with_gap: outer_radius * 2.0 + gap * 2.0 / SQRT_3,
        }
    }

    /// Distance from a tile center to the middle of the gap junction at a corner.
    #[inline]
    pub fn corner_junction_distance(&self) -> f32 {
        self.long_length_with_gap * 0.5
    }
}

impl Default for TileMetrics {
    fn default() -> Self {
        Self::new(80.0, 12.0)
    }
}

/// Offsets of the six hexagon corners from its center.
///
/// Vertical tiles put the first corner at 30°, horizontal tiles at 0°, then
/// step 60° clockwise in screen space (y grows downward). Corner `c` sits
/// between neighbour directions `c + 1` and `c + 2`.
pub fn vertex_deltas(radius: f32, orientation: Orientation) -> [Vec2; DIRECTION_COUNT] {
    let start_degrees = match orientation {
        Orientation::Vertical => 30.0_f32,
        Orientation::Horizontal => 0.0_f32,
    };
    std::array::from_fn(|i| {
        let angle = (start_degrees + 60.0 * i as f32).to_radians();
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    })
}

/// Pixel offset from a tile's anchor to its neighbour's anchor in each direction.
///
/// For every `k`, `deltas[k - 1] + deltas[k + 1] == deltas[k]`.
pub fn neighbor_anchor_deltas(orientation: Orientation, metrics: &TileMetrics) -> [Vec2; DIRECTION_COUNT] {
    let s = metrics.short_length_with_gap;
    match orientation {
        Orientation::Vertical => {
            let h = s * HALF_SQRT_3;
            [
                Vec2::new(s * 0.5, -h),
                Vec2::new(s, 0.0),
                Vec2::new(s * 0.5, h),
                Vec2::new(-s * 0.5, h),
                Vec2::new(-s, 0.0),
                Vec2::new(-s * 0.5, -h),
            ]
        }
        Orientation::Horizontal => {
            let cx = s * HALF_SQRT_3;
            [
                Vec2::new(0.0, -s),
                Vec2::new(cx, -s * 0.5),
                Vec2::new(cx, s * 0.5),
                Vec2::new(0.0, s),
                Vec2::new(-cx, s * 0.5),
                Vec2::new(-cx, -s * 0.5),
            ]
        }
    }
}

/// Closed-form flat-index offsets to the neighbour in each direction, given
/// the tile count `larger` of the larger row parity.
pub fn neighbor_index_deltas(orientation: Orientation, larger: usize) -> [isize; DIRECTION_COUNT] {
    let l = larger as isize;
    match orientation {
        Orientation::Vertical => [-(l - 1), 1, l, l - 1, -1, -l],
        Orientation::Horizontal => [-(2 * l - 1), -(l - 1), l, 2 * l - 1, l - 1, -l],
    }
}

// ============================================================================
// Grid parameters
// ============================================================================

/// Inclusive range of content columns within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub first: usize,
    pub last: usize,
}

impl ColumnRange {
    #[inline]
    pub fn contains(&self, column: usize) -> bool {
        column >= self.first && column <= self.last
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.last + 1 - self.first
    }
}

/// Every derived layout scalar for one viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParameters {
    pub orientation: Orientation,
    pub metrics: TileMetrics,
    pub viewport: Vec2,
    pub center: Vec2,
    pub row_count: usize,
    pub odd_row_tile_count: usize,
    pub even_row_tile_count: usize,
    pub row_delta_y: f32,
    pub tile_delta_x: f32,
    pub even_row_start_x: f32,
    pub odd_row_start_x: f32,
    pub first_row_y: f32,
    /// Content columns per row; `None` for margin rows.
    pub content_columns: Vec<Option<ColumnRange>>,
    /// Length of the content mask the rows were sized for.
    pub content_mask_len: usize,
}

impl GridParameters {
    /// Derive the layout for `viewport`, growing the row count until the
    /// content rows can hold the whole content mask for `post_count` posts.
    pub fn compute(viewport: Vec2, config: &GridConfig, post_count: usize) -> Self {
        let orientation = config.orientation;
        let metrics = config.metrics;
        let width = viewport.x.max(0.0);
        let height = viewport.y.max(0.0);
        let short = metrics.short_length_with_gap;

        let (row_delta_y, tile_delta_x, edge_inset) = match orientation {
            Orientation::Vertical => (
                short * HALF_SQRT_3,
                short,
                metrics.inner_radius + metrics.gap,
            ),
            Orientation::Horizontal => (
                short * 0.5,
                short * SQRT_3,
                metrics.outer_radius + metrics.gap,
            ),
        };

        let half_row_count = ((width * 0.5 - edge_inset) / tile_delta_x).ceil().max(0.0) as usize;
        let odd_row_tile_count = half_row_count * 2 + 1;
        let even_row_tile_count = odd_row_tile_count + 1;

        let center = Vec2::new(width * 0.5, height * 0.5);
        let first_row_y = config.first_row_y_offset_ratio * metrics.outer_radius;
        let row_count = ((height - first_row_y) / row_delta_y).ceil().max(0.0) as usize + 2;

        let mut params = Self {
            orientation,
            metrics,
            viewport: Vec2::new(width, height),
            center,
            row_count,
            odd_row_tile_count,
            even_row_tile_count,
            row_delta_y,
            tile_delta_x,
            even_row_start_x: center.x - (even_row_tile_count - 1) as f32 * 0.5 * tile_delta_x,
            odd_row_start_x: center.x - (odd_row_tile_count - 1) as f32 * 0.5 * tile_delta_x,
            first_row_y,
            content_columns: Vec::new(),
            content_mask_len: content_mask_len(post_count, config.content_density),
        };

        loop {
            params.content_columns = (0..params.row_count)
                .map(|row| params.compute_content_columns(row, config))
                .collect();
            if params.content_slot_count() >= params.content_mask_len {
                break;
            }
            // The former last row becomes a content row, so capacity always grows.
            params.row_count += 1;
        }

        params
    }

    fn compute_content_columns(&self, row: usize, config: &GridConfig) -> Option<ColumnRange> {
        let starting_row = config.content_starting_row_index.max(1);
        if row < starting_row || row + 1 >= self.row_count {
            return None;
        }

        let count = self.row_tile_count(row);
        let start_x = self.row_start_x(row);
        let half_width = config.target_content_area_width.clamp(0.0, self.viewport.x) * 0.5;
        let left = self.center.x - half_width;
        let right = self.center.x + half_width;

        let (lowest, highest) = if self.is_larger_row(row) && count >= 3 {
            (1, count - 2)
        } else {
            (0, count - 1)
        };

        let mut first = None;
        let mut last = None;
        for column in 0..count {
            let x = start_x + column as f32 * self.tile_delta_x;
            if x >= left && x <= right {
                first.get_or_insert(column);
                last = Some(column);
            }
        }

        match (first, last) {
            (Some(first), Some(last)) if first.max(lowest) <= last.min(highest) => Some(ColumnRange {
                first: first.max(lowest),
                last: last.min(highest),
            }),
            _ => {
                let nearest = ((self.center.x - start_x) / self.tile_delta_x).round().max(0.0) as usize;
                let nearest = nearest.clamp(lowest, highest);
                Some(ColumnRange {
                    first: nearest,
                    last: nearest,
                })
            }
        }
    }

    /// Tile count of the larger (even) rows.
    #[inline]
    pub fn larger_row_tile_count(&self) -> usize {
        self.even_row_tile_count
    }

    #[inline]
    pub fn is_larger_row(&self, row: usize) -> bool {
        row % 2 == 0
    }

    #[inline]
    pub fn row_tile_count(&self, row: usize) -> usize {
        if self.is_larger_row(row) {
            self.even_row_tile_count
        } else {
            self.odd_row_tile_count
        }
    }

    #[inline]
    pub fn row_start_x(&self, row: usize) -> f32 {
        if self.is_larger_row(row) {
            self.even_row_start_x
        } else {
            self.odd_row_start_x
        }
    }

    /// Flat index of the first tile in `row`.
    #[inline]
    pub fn row_start_index(&self, row: usize) -> usize {
        (row / 2) * (self.even_row_tile_count + self.odd_row_tile_count)
            + (row % 2) * self.even_row_tile_count
    }

    pub fn tile_count(&self) -> usize {
        self.row_start_index(self.row_count)
    }

    /// Inverse of `row_start_index(row) + column`.
    pub fn row_and_column(&self, index: usize) -> (usize, usize) {
        let pair = self.even_row_tile_count + self.odd_row_tile_count;
        let row = (index / pair) * 2;
        let rest = index % pair;
        if rest < self.even_row_tile_count {
            (row, rest)
        } else {
            (row + 1, rest - self.even_row_tile_count)
        }
    }

    /// Rest position of the tile at `(row, column)`.
    #[inline]
    pub fn anchor(&self, row: usize, column: usize) -> Vec2 {
        Vec2::new(
            self.row_start_x(row) + column as f32 * self.tile_delta_x,
            self.first_row_y + row as f32 * self.row_delta_y,
        )
    }

    /// First/last row, or first/last column of a larger row.
    pub fn is_border(&self, row: usize, column: usize) -> bool {
        let last_row = self.row_count.saturating_sub(1);
        let last_column = self.row_tile_count(row).saturating_sub(1);
        row == 0
            || row == last_row
            || (self.is_larger_row(row) && (column == 0 || column == last_column))
    }

    pub fn is_corner(&self, row: usize, column: usize) -> bool {
        let last_row = self.row_count.saturating_sub(1);
        let last_column = self.row_tile_count(row).saturating_sub(1);
        (row == 0 || row == last_row) && (column == 0 || column == last_column)
    }

    pub fn is_margin(&self, row: usize, column: usize) -> bool {
        self.content_columns
            .get(row)
            .copied()
            .flatten()
            .map_or(true, |range| !range.contains(column))
    }

    /// Number of non-margin tiles.
    pub fn content_slot_count(&self) -> usize {
        self.content_columns.iter().flatten().map(ColumnRange::column_count).sum()
    }
}

/// Flat indices of the six neighbours of `(row, column)`; `None` where the
/// tile sits on an edge that has no neighbour in that direction.
pub fn neighbor_indices(row: usize, column: usize, params: &GridParameters) -> [Option<usize>; DIRECTION_COUNT] {
    let deltas = neighbor_index_deltas(params.orientation, params.larger_row_tile_count());
    let last_row = params.row_count.saturating_sub(1);
    let last_column = params.row_tile_count(row).saturating_sub(1);
    let is_larger = params.is_larger_row(row);

    let mut removed = [false; DIRECTION_COUNT];
    let mut remove = |directions: &[usize]| {
        for &d in directions {
            removed[d] = true;
        }
    };

    match params.orientation {
        Orientation::Vertical => {
            if row == 0 {
                remove(&[0, 5]);
            }
            if row == last_row {
                remove(&[2, 3]);
            }
            if is_larger {
                if column == 0 {
                    remove(&[3, 4, 5]);
                }
                if column == last_column {
                    remove(&[0, 1, 2]);
                }
            } else {
                if column == 0 {
                    remove(&[4]);
                }
                if column == last_column {
                    remove(&[1]);
                }
            }
        }
        Orientation::Horizontal => {
            if row == 0 {
                remove(&[0, 1, 5]);
            }
            if row == 1 {
                remove(&[0]);
            }
            if row == last_row {
                remove(&[2, 3, 4]);
            }
            if row + 1 == last_row {
                remove(&[3]);
            }
            if is_larger {
                if column == 0 {
                    remove(&[4, 5]);
                }
                if column == last_column {
                    remove(&[1, 2]);
                }
            }
        }
    }

    let index = (params.row_start_index(row) + column) as isize;
    let total = params.tile_count() as isize;
    std::array::from_fn(|d| {
        if removed[d] {
            return None;
        }
        let neighbor = index + deltas[d];
        (neighbor >= 0 && neighbor < total).then_some(neighbor as usize)
    })
}

// ============================================================================
// Content placement
// ============================================================================

/// Length of the content mask for `post_count` posts at `density`.
pub fn content_mask_len(post_count: usize, density: f32) -> usize {
    if post_count == 0 {
        return 0;
    }
    let density = density.clamp(f32::EPSILON, 1.0);
    (post_count as f32 / density).ceil() as usize
}

/// Boolean mask of length `ceil(post_count / density)` with exactly
/// `post_count` trues, uniformly shuffled.
pub fn content_mask<R: Rng + ?Sized>(post_count: usize, density: f32, rng: &mut R) -> Vec<bool> {
    let len = content_mask_len(post_count, density).max(post_count);
    let mut mask: Vec<bool> = (0..len).map(|i| i < post_count).collect();
    mask.shuffle(rng);
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(orientation: Orientation) -> GridConfig {
        GridConfig {
            orientation,
            tile_outer_radius: 80.0,
            tile_gap: 12.0,
            ..GridConfig::default()
        }
    }

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn vertical_800_by_600_row_counts() {
        let params = GridParameters::compute(Vec2::new(800.0, 600.0), &config(Orientation::Vertical), 0);
        let inner = 80.0 * HALF_SQRT_3;
        let expected = ((400.0 - (inner + 12.0)) / (2.0 * inner + 12.0)).ceil() as usize * 2 + 1;
        assert_eq!(expected, 7);
        assert_eq!(params.odd_row_tile_count, 7);
        assert_eq!(params.even_row_tile_count, 8);
    }

    #[test]
    fn horizontal_row_counts_follow_formula() {
        let params = GridParameters::compute(Vec2::new(800.0, 600.0), &config(Orientation::Horizontal), 0);
        let metrics = TileMetrics::new(80.0, 12.0);
        let delta_x = metrics.short_length_with_gap * SQRT_3;
        let expected = ((400.0 - 92.0) / delta_x).ceil() as usize * 2 + 1;
        assert_eq!(params.odd_row_tile_count, expected);
        assert_eq!(params.even_row_tile_count, expected + 1);
    }

    #[test]
    fn grid_overflows_viewport() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let params = GridParameters::compute(Vec2::new(1024.0, 768.0), &config(orientation), 0);
            let first = params.anchor(0, 0);
            let last_row = params.row_count - 1;
            let last = params.anchor(last_row, params.row_tile_count(last_row) - 1);
            assert!(first.y < 0.0);
            assert!(last.y > 768.0);
            assert!(params.even_row_start_x < 0.0);
            assert!(params.even_row_start_x + (params.even_row_tile_count - 1) as f32 * params.tile_delta_x > 1024.0);
        }
    }

    #[test]
    fn vertex_deltas_start_at_expected_angles() {
        let vertical = vertex_deltas(10.0, Orientation::Vertical);
        assert_vec_eq(vertical[0], Vec2::new(10.0 * HALF_SQRT_3, 5.0));
        assert_vec_eq(vertical[1], Vec2::new(0.0, 10.0));

        let horizontal = vertex_deltas(10.0, Orientation::Horizontal);
        assert_vec_eq(horizontal[0], Vec2::new(10.0, 0.0));
        assert_vec_eq(horizontal[3], Vec2::new(-10.0, 0.0));
        for v in vertical.iter().chain(horizontal.iter()) {
            assert!((v.length() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn anchor_deltas_satisfy_adjacent_sum_identity() {
        let metrics = TileMetrics::new(50.0, 6.0);
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let d = neighbor_anchor_deltas(orientation, &metrics);
            for k in 0..DIRECTION_COUNT {
                let before = d[(k + 5) % 6];
                let after = d[(k + 1) % 6];
                assert_vec_eq(before + after, d[k]);
                assert_vec_eq(d[reverse_direction(k)], -d[k]);
            }
        }
    }

    #[test]
    fn neighbor_indices_match_anchor_geometry() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let params = GridParameters::compute(Vec2::new(900.0, 700.0), &config(orientation), 10);
            let deltas = neighbor_anchor_deltas(orientation, &params.metrics);
            for index in 0..params.tile_count() {
                let (row, column) = params.row_and_column(index);
                let anchor = params.anchor(row, column);
                for (d, neighbor) in neighbor_indices(row, column, &params).iter().enumerate() {
                    let Some(neighbor) = *neighbor else { continue };
                    let (n_row, n_column) = params.row_and_column(neighbor);
                    assert_vec_eq(params.anchor(n_row, n_column) - anchor, deltas[d]);

                    let back = neighbor_indices(n_row, n_column, &params)[reverse_direction(d)];
                    assert_eq!(back, Some(index), "{orientation:?} {row},{column} dir {d}");
                }
            }
        }
    }

    #[test]
    fn interior_tiles_have_six_neighbors_and_border_tiles_fewer() {
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            let params = GridParameters::compute(Vec2::new(1200.0, 900.0), &config(orientation), 0);
            for index in 0..params.tile_count() {
                let (row, column) = params.row_and_column(index);
                let count = neighbor_indices(row, column, &params).iter().flatten().count();
                let is_row_end = column == 0 || column + 1 == params.row_tile_count(row);
                if params.is_border(row, column) {
                    assert!((2..=5).contains(&count), "{orientation:?} border {row},{column}: {count}");
                } else if is_row_end {
                    // Smaller rows end half a step in from the grid edge.
                    assert!(!params.is_larger_row(row));
                    assert_eq!(count, 5, "{orientation:?} row end {row},{column}");
                } else {
                    assert_eq!(count, 6, "{orientation:?} interior {row},{column}");
                }
            }
        }
    }

    #[test]
    fn layout_follows_recomputed_metrics() {
        let mut config = config(Orientation::Vertical);
        config.tile_outer_radius = 40.0;
        config.compute_dependent_values();
        let params = GridParameters::compute(Vec2::new(800.0, 600.0), &config, 0);
        assert_eq!(params.metrics, TileMetrics::new(40.0, 12.0));
        assert!(params.odd_row_tile_count > 7);
    }

    #[test]
    fn content_rows_fit_the_mask() {
        let mut config = config(Orientation::Vertical);
        config.target_content_area_width = 200.0;
        let params = GridParameters::compute(Vec2::new(800.0, 600.0), &config, 40);
        assert!(params.content_slot_count() >= params.content_mask_len);
        assert!(params.content_columns[0].is_none());
        assert!(params.content_columns[params.row_count - 1].is_none());
    }

    #[test]
    fn larger_rows_skip_their_border_columns() {
        let mut config = config(Orientation::Vertical);
        config.target_content_area_width = 10_000.0;
        let params = GridParameters::compute(Vec2::new(800.0, 600.0), &config, 0);
        for (row, range) in params.content_columns.iter().enumerate() {
            let Some(range) = range else { continue };
            if params.is_larger_row(row) {
                assert!(range.first >= 1);
                assert!(range.last <= params.row_tile_count(row) - 2);
            }
        }
    }

    #[test]
    fn content_mask_has_exact_true_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for posts in [0, 1, 5, 13] {
            let mask = content_mask(posts, 0.3, &mut rng);
            assert_eq!(mask.len(), content_mask_len(posts, 0.3));
            assert_eq!(mask.iter().filter(|&&b| b).count(), posts);
        }
    }

    #[test]
    fn row_and_column_round_trips() {
        let params = GridParameters::compute(Vec2::new(640.0, 480.0), &config(Orientation::Horizontal), 0);
        for index in 0..params.tile_count() {
            let (row, column) = params.row_and_column(index);
            assert_eq!(params.row_start_index(row) + column, index);
        }
    }
}
