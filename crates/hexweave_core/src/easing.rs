//! Easing function bank
//!
//! Jobs map a linear `0..1` progress through one of these curves. The set is
//! deliberately small; any `fn(f32) -> f32` can be plugged in through
//! [`Easing::Custom`].

use serde::{Deserialize, Serialize};

/// Signature shared by every easing curve.
pub type EasingFn = fn(f32) -> f32;

/// Named easing curves, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
    EaseOutExpo,
    #[serde(skip)]
    Custom(EasingFn),
}

impl Easing {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Easing::Custom(f) => f(t),
        }
    }

    /// The mirrored curve: ease-in becomes ease-out and vice versa.
    pub fn reversed(self) -> Self {
        match self {
            Easing::EaseInQuad => Easing::EaseOutQuad,
            Easing::EaseOutQuad => Easing::EaseInQuad,
            Easing::EaseInCubic => Easing::EaseOutCubic,
            Easing::EaseOutCubic => Easing::EaseInCubic,
            other => other,
        }
    }
}

/// Linear progress of a timed job, clamped to `[0, 1]`.
#[inline]
pub fn progress(current_time: f64, start_time: f64, duration: f64) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((current_time - start_time) / duration).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseOutExpo,
    ];

    #[test]
    fn curves_hit_their_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::EaseOutCubic.apply(7.0), 1.0);
    }

    #[test]
    fn custom_curves_are_pluggable() {
        fn step(t: f32) -> f32 {
            if t < 0.5 {
                0.0
            } else {
                1.0
            }
        }
        assert_eq!(Easing::Custom(step).apply(0.4), 0.0);
        assert_eq!(Easing::Custom(step).apply(0.6), 1.0);
    }

    #[test]
    fn progress_handles_zero_duration() {
        assert_eq!(progress(10.0, 0.0, 0.0), 1.0);
        assert_eq!(progress(50.0, 0.0, 100.0), 0.5);
        assert_eq!(progress(500.0, 0.0, 100.0), 1.0);
    }
}
