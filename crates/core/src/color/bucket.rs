use flame_tint_protocol::{ColorChannels, Lch};
use serde::{Deserialize, Serialize};

use super::lch::{HueRange, lch_to_color};

/// A continuous palette `t ∈ [0, 1] → color`.
///
/// Holds only its parametrization; evaluation is a pure function of `t`, so
/// equal buckets always produce equal colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBucket {
    pub lch: Lch,
    pub hue: HueRange,
}

impl ColorBucket {
    pub fn new(lch: Lch, hue: HueRange) -> Self {
        Self { lch, hue }
    }

    /// Color at `t`. Out-of-range `t` is clamped and non-finite `t`
    /// evaluates as `0`.
    pub fn color_at(&self, t: f64) -> ColorChannels {
        lch_to_color(clamp_unit(t), &self.lch, self.hue)
    }
}

/// Build a bucket over `[hue_min, hue_max]` degrees.
pub fn make_color_bucket(lch: Lch, hue_min: f64, hue_max: f64) -> ColorBucket {
    ColorBucket::new(lch, HueRange::new(hue_min, hue_max))
}

/// Bucket over the full hue wheel.
pub fn make_full_color_bucket(lch: Lch) -> ColorBucket {
    ColorBucket::new(lch, HueRange::FULL)
}

#[inline]
fn clamp_unit(t: f64) -> f64 {
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: Lch = Lch::new(0.8, 0.15, 0.25, 0.2);
    const SPANS: Lch = Lch::new(0.8, 0.15, 0.3, 0.25);

    #[test]
    fn same_t_same_color() {
        let bucket = make_full_color_bucket(LIGHT);
        assert_eq!(bucket.color_at(0.37), bucket.color_at(0.37));
        assert_eq!(bucket, make_color_bucket(LIGHT, 0.0, 360.0));
    }

    #[test]
    fn non_finite_t_evaluates_as_zero() {
        let bucket = make_full_color_bucket(LIGHT);
        assert_eq!(bucket.color_at(f64::NAN), bucket.color_at(0.0));
        assert_eq!(bucket.color_at(f64::INFINITY), bucket.color_at(0.0));
        assert_eq!(bucket.color_at(-3.0), bucket.color_at(0.0));
        assert_eq!(bucket.color_at(7.0), bucket.color_at(1.0));
    }

    #[test]
    fn restricted_hue_range_differs_from_full_wheel() {
        let full = make_full_color_bucket(SPANS);
        let narrow = make_color_bucket(SPANS, 140.0, 220.0);
        assert_ne!(full.color_at(0.0), narrow.color_at(0.0));
        assert_eq!(narrow.hue, HueRange::new(140.0, 220.0));
    }

    #[test]
    fn narrow_range_stays_in_green_blue_family() {
        // 140°–220° never reaches the red sector, so red never dominates.
        let narrow = make_color_bucket(SPANS, 140.0, 220.0);
        for i in 0..=20 {
            let c = narrow.color_at(f64::from(i) / 20.0);
            assert!(c.r <= c.g || c.r <= c.b, "red dominated at step {i}: {c:?}");
        }
    }
}
