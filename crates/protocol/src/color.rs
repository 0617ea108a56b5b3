use serde::{Deserialize, Serialize};

/// Lightness/chroma parametrization of one palette.
///
/// Lightness is evaluated as `l0 - ld * x` and chroma as `c0 + cd * x` for an
/// oscillating `x`, so `ld` and `cd` bound how far a palette drifts from its
/// base tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    /// Base lightness.
    pub l0: f64,
    /// Lightness delta range.
    pub ld: f64,
    /// Base chroma.
    pub c0: f64,
    /// Chroma delta range.
    pub cd: f64,
}

impl Lch {
    pub const fn new(l0: f64, ld: f64, c0: f64, cd: f64) -> Self {
        Self { l0, ld, c0, cd }
    }

    /// Components in `(l0, ld, c0, cd)` order, with their field names.
    pub fn components(&self) -> [(&'static str, f64); 4] {
        [
            ("l0", self.l0),
            ("ld", self.ld),
            ("c0", self.c0),
            ("cd", self.cd),
        ]
    }
}

/// An RGBA color with every channel in `[0, 1]`.
///
/// All constructors clamp, so a `ColorChannels` can be handed to a renderer
/// without further validation. NaN channels become `0`. Serialized as
/// `[r, g, b, a]`; an `[r, g, b]` triple is read as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f32; 4]", from = "ChannelArray")]
pub struct ColorChannels {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorChannels {
    /// Opaque color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Build from `f64` components, as produced by the color model math.
    pub fn from_f64(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::rgba(r as f32, g as f32, b as f32, a as f32)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f32; 4]> for ColorChannels {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl From<[f32; 3]> for ColorChannels {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelArray {
    Rgba([f32; 4]),
    Rgb([f32; 3]),
}

impl From<ChannelArray> for ColorChannels {
    fn from(array: ChannelArray) -> Self {
        match array {
            ChannelArray::Rgba(rgba) => rgba.into(),
            ChannelArray::Rgb(rgb) => rgb.into(),
        }
    }
}

impl From<ColorChannels> for [f32; 4] {
    fn from(color: ColorChannels) -> Self {
        color.to_array()
    }
}

#[inline]
fn clamp_channel(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
