//! HSL colours
//!
//! Jobs compose colour effects additively in HSL space; conversion to RGB only
//! happens when the display list is rendered.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul};

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Wrap the hue into `[0, 360)` and clamp saturation/lightness to `[0, 100]`.
    pub fn normalized(self) -> Self {
        Self {
            h: self.h.rem_euclid(360.0),
            s: self.s.clamp(0.0, 100.0),
            l: self.l.clamp(0.0, 100.0),
        }
    }

    /// Convert to linear-ish RGB components in `[0, 1]`.
    pub fn to_rgb(self) -> [f32; 3] {
        let Hsl { h, s, l } = self.normalized();
        let s = s / 100.0;
        let l = l / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h_prime as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        [r + m, g + m, b + m]
    }
}

impl Default for Hsl {
    fn default() -> Self {
        Self::new(230.0, 50.0, 30.0)
    }
}

/// Additive colour offset applied by animation jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HslDelta {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl HslDelta {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

impl Mul<f32> for HslDelta {
    type Output = HslDelta;

    fn mul(self, rhs: f32) -> Self::Output {
        HslDelta::new(self.h * rhs, self.s * rhs, self.l * rhs)
    }
}

impl Add<HslDelta> for Hsl {
    type Output = Hsl;

    fn add(self, rhs: HslDelta) -> Self::Output {
        Hsl::new(self.h + rhs.h, self.s + rhs.s, self.l + rhs.l)
    }
}

impl AddAssign<HslDelta> for Hsl {
    fn add_assign(&mut self, rhs: HslDelta) {
        *self = *self + rhs;
    }
}
