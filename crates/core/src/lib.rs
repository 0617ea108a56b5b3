//! Color assignment and rendering preferences for flamegraphs.
//!
//! ```text
//!   StackFrame[] ──▶ color map (identity → color) ──▶ color buffer (per occurrence)
//!                        ▲                                  │
//!        ColorBucket (LCH palette)                          ▼
//!                        ▲                              renderer
//!   Preferences ─────────┘ (color coding selects the identity order)
//! ```

pub mod color;
pub mod preferences;
pub mod theme;

pub use color::{ColorBucket, ColorMap, HueRange, StackColors};
pub use preferences::{ApplyAction, flamegraph_preferences_reducer};
pub use theme::{FlamegraphTheme, Palette, ThemeError, ThemeMode};
