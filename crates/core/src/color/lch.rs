use flame_tint_protocol::{ColorChannels, Lch};

// Luma weights used to pull every hue to the requested lightness.
const LUMA_R: f64 = 0.30;
const LUMA_G: f64 = 0.59;
const LUMA_B: f64 = 0.11;

/// Oscillation frequency of lightness/chroma across `t`.
const WAVE_FREQUENCY: f64 = 30.0;

/// Share of the hue range actually used, so `t = 0` and `t = 1` stay apart on
/// a full 360° wheel.
const HUE_SPREAD: f64 = 0.9;

/// A hue interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HueRange {
    pub min: f64,
    pub max: f64,
}

impl HueRange {
    pub const FULL: HueRange = HueRange {
        min: 0.0,
        max: 360.0,
    };

    /// Bounds are reordered if given backwards.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Hue at fraction `f` of the range.
    pub fn at(&self, f: f64) -> f64 {
        self.min + self.span() * f
    }
}

impl Default for HueRange {
    fn default() -> Self {
        Self::FULL
    }
}

#[inline]
fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Triangle wave in `[-1, 0]`, continuous everywhere.
#[inline]
fn triangle(x: f64) -> f64 {
    2.0 * (fract(x) - 0.5).abs() - 1.0
}

/// Convert a lightness/chroma/hue triple into clamped, opaque RGB.
///
/// `h` is in degrees and wraps. Chroma below zero is treated as zero.
pub fn from_luma_chroma_hue(l: f64, c: f64, h: f64) -> ColorChannels {
    let c = c.max(0.0);
    let h_prime = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());

    let (r1, g1, b1) = if h_prime < 1.0 {
        (c, x, 0.0)
    } else if h_prime < 2.0 {
        (x, c, 0.0)
    } else if h_prime < 3.0 {
        (0.0, c, x)
    } else if h_prime < 4.0 {
        (0.0, x, c)
    } else if h_prime < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let m = l - (LUMA_R * r1 + LUMA_G * g1 + LUMA_B * b1);
    ColorChannels::from_f64(r1 + m, g1 + m, b1 + m, 1.0)
}

/// Evaluate an LCH palette at `t ∈ [0, 1]`.
///
/// Lightness and chroma oscillate with `t` so neighbouring values differ
/// visibly; hue walks monotonically through `hue`.
pub fn lch_to_color(t: f64, lch: &Lch, hue: HueRange) -> ColorChannels {
    let x = triangle(WAVE_FREQUENCY * t);
    let l = lch.l0 - lch.ld * x;
    let c = lch.c0 + lch.cd * x;
    let h = hue.at(HUE_SPREAD * t);
    from_luma_chroma_hue(l, c, h)
}
