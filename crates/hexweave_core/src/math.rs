//! Math utilities
//!
//! Re-exports glam with the hexagon constants and numeric helpers the grid needs

pub use glam::*;

/// √3, the ratio between a hexagon's short diagonal and its outer radius.
pub const SQRT_3: f32 = 1.732_050_8;

/// √3 / 2, the ratio between a hexagon's inner and outer radius.
pub const HALF_SQRT_3: f32 = 0.866_025_4;

/// Snap a component to exactly zero when its magnitude is not above
/// `threshold`. Non-finite values are snapped as well.
#[inline]
pub fn snap_below(value: f32, threshold: f32) -> f32 {
    if value.abs() > threshold && value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Component-wise [`snap_below`].
#[inline]
pub fn snap_vec_below(value: Vec2, threshold: f32) -> Vec2 {
    Vec2::new(snap_below(value.x, threshold), snap_below(value.y, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_clears_small_and_non_finite_values() {
        assert_eq!(snap_below(0.0004, 0.0005), 0.0);
        assert_eq!(snap_below(-0.0004, 0.0005), 0.0);
        assert_eq!(snap_below(0.002, 0.0005), 0.002);
        assert_eq!(snap_below(f32::NAN, 0.0005), 0.0);
        assert_eq!(snap_below(f32::INFINITY, 0.0005), 0.0);
        assert_eq!(
            snap_vec_below(Vec2::new(1.0, 1e-6), 0.001),
            Vec2::new(1.0, 0.0)
        );
    }
}
