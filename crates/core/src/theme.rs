//! Flamegraph color themes.
//!
//! A theme carries the two palettes (call-stack frames and spans) plus the
//! fixed colors a renderer needs around them. Themes are plain values built
//! by the caller; nothing here is global.

use flame_tint_protocol::{ColorChannels, ColorCoding, Lch, StackFrame};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorBucket, HueRange, StackColors, color_map_for, stack_to_color};

pub const LCH_LIGHT: Lch = Lch::new(0.8, 0.15, 0.25, 0.2);
pub const LCH_DARK: Lch = Lch::new(0.2, 0.1, 0.2, 0.1);
pub const SPAN_LCH_LIGHT: Lch = Lch::new(0.8, 0.15, 0.3, 0.25);
pub const SPAN_LCH_DARK: Lch = Lch::new(0.2, 0.1, 0.3, 0.15);

/// Spans are biased toward the green/cyan family to stay apart from frames.
pub const SPAN_HUE: HueRange = HueRange {
    min: 140.0,
    max: 220.0,
};

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{palette} LCH component {component} = {value} is outside [0, 1]")]
    LchOutOfRange {
        palette: &'static str,
        component: &'static str,
        value: f64,
    },
    #[error("hue bound {value} is outside [0, 360]")]
    HueOutOfRange { value: f64 },
    #[error("unknown theme mode: {0:?}")]
    UnknownMode(String),
    #[error("unknown palette: {0:?}")]
    UnknownPalette(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError::UnknownMode(other.to_string())),
        }
    }
}

/// Which of a theme's two palettes to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Frames,
    Spans,
}

impl std::str::FromStr for Palette {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frames" => Ok(Self::Frames),
            "spans" => Ok(Self::Spans),
            other => Err(ThemeError::UnknownPalette(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlamegraphTheme {
    pub mode: ThemeMode,
    pub frame_lch: Lch,
    pub span_lch: Lch,
    pub span_hue: HueRange,
    /// Written to the stack color buffer for frames without a color.
    pub frame_fallback: ColorChannels,
    pub span_fallback: ColorChannels,
    pub differential_increase: ColorChannels,
    pub differential_decrease: ColorChannels,
    pub search_result_frame: ColorChannels,
}

impl FlamegraphTheme {
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            frame_lch: LCH_LIGHT,
            span_lch: SPAN_LCH_LIGHT,
            span_hue: SPAN_HUE,
            frame_fallback: ColorChannels::rgba(0.0, 0.0, 0.0, 0.035),
            span_fallback: ColorChannels::rgba(0.0, 0.0, 0.0, 0.1),
            differential_increase: ColorChannels::rgb(0.98, 0.2058, 0.4381),
            differential_decrease: ColorChannels::rgb(0.309, 0.2058, 0.98),
            search_result_frame: ColorChannels::rgba(0.99, 0.70, 0.35, 1.0),
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            frame_lch: LCH_DARK,
            span_lch: SPAN_LCH_DARK,
            span_hue: SPAN_HUE,
            frame_fallback: ColorChannels::rgba(1.0, 1.0, 1.0, 0.1),
            span_fallback: ColorChannels::rgba(1.0, 1.0, 1.0, 0.3),
            differential_increase: ColorChannels::rgb(0.98, 0.2058, 0.4381),
            differential_decrease: ColorChannels::rgb(0.309, 0.2058, 0.98),
            search_result_frame: ColorChannels::rgba(0.99, 0.70, 0.35, 0.7),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Built-in theme for `mode` with a partial JSON override applied.
    ///
    /// A `"mode"` key in the override selects the base theme instead.
    pub fn from_json(mode: ThemeMode, json: &str) -> Result<Self, ThemeError> {
        let overrides: ThemeOverrides = serde_json::from_str(json)?;
        let base = Self::for_mode(overrides.mode.unwrap_or(mode));
        let theme = overrides.apply(base);
        theme.validate()?;
        Ok(theme)
    }

    /// Check every palette parameter is finite and in range.
    pub fn validate(&self) -> Result<(), ThemeError> {
        for (palette, lch) in [("frame", &self.frame_lch), ("span", &self.span_lch)] {
            for (component, value) in lch.components() {
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(ThemeError::LchOutOfRange {
                        palette,
                        component,
                        value,
                    });
                }
            }
        }
        for value in [self.span_hue.min, self.span_hue.max] {
            if !value.is_finite() || !(0.0..=360.0).contains(&value) {
                return Err(ThemeError::HueOutOfRange { value });
            }
        }
        Ok(())
    }

    pub fn frame_bucket(&self) -> ColorBucket {
        ColorBucket::new(self.frame_lch, HueRange::FULL)
    }

    pub fn span_bucket(&self) -> ColorBucket {
        ColorBucket::new(self.span_lch, self.span_hue)
    }

    pub fn bucket(&self, palette: Palette) -> ColorBucket {
        match palette {
            Palette::Frames => self.frame_bucket(),
            Palette::Spans => self.span_bucket(),
        }
    }

    pub fn fallback(&self, palette: Palette) -> ColorChannels {
        match palette {
            Palette::Frames => self.frame_fallback,
            Palette::Spans => self.span_fallback,
        }
    }

    /// Color `frames` from `palette`, grouped by `coding`.
    pub fn colorize(
        &self,
        frames: &[StackFrame],
        coding: ColorCoding,
        palette: Palette,
    ) -> StackColors {
        let bucket = self.bucket(palette);
        stack_to_color(
            frames,
            |frames, color_bucket| color_map_for(frames, color_bucket, coding),
            &|t: f64| bucket.color_at(t),
            self.fallback(palette),
        )
    }

    pub fn stack_to_color(&self, frames: &[StackFrame], coding: ColorCoding) -> StackColors {
        self.colorize(frames, coding, Palette::Frames)
    }

    pub fn span_to_color(&self, spans: &[StackFrame], coding: ColorCoding) -> StackColors {
        self.colorize(spans, coding, Palette::Spans)
    }
}

impl Default for FlamegraphTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Partial theme read from configuration; absent fields keep the base value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverrides {
    pub mode: Option<ThemeMode>,
    pub frame_lch: Option<Lch>,
    pub span_lch: Option<Lch>,
    pub span_hue: Option<HueRange>,
    pub frame_fallback: Option<ColorChannels>,
    pub span_fallback: Option<ColorChannels>,
    pub differential_increase: Option<ColorChannels>,
    pub differential_decrease: Option<ColorChannels>,
    pub search_result_frame: Option<ColorChannels>,
}

impl ThemeOverrides {
    pub fn apply(self, base: FlamegraphTheme) -> FlamegraphTheme {
        FlamegraphTheme {
            mode: base.mode,
            frame_lch: self.frame_lch.unwrap_or(base.frame_lch),
            span_lch: self.span_lch.unwrap_or(base.span_lch),
            span_hue: self
                .span_hue
                .map_or(base.span_hue, |h| HueRange::new(h.min, h.max)),
            frame_fallback: self.frame_fallback.unwrap_or(base.frame_fallback),
            span_fallback: self.span_fallback.unwrap_or(base.span_fallback),
            differential_increase: self
                .differential_increase
                .unwrap_or(base.differential_increase),
            differential_decrease: self
                .differential_decrease
                .unwrap_or(base.differential_decrease),
            search_result_frame: self.search_result_frame.unwrap_or(base.search_result_frame),
        }
    }
}
