//! Flamegraph rendering preferences and the actions that change them.
//!
//! Every option is serialized with the label the dashboard uses (`"by symbol
//! name"`, `"left heavy"`, …) so preference records and actions can cross the
//! WASM boundary as plain JSON.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} label: {label:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub label: String,
}

/// Generates a closed option enum with its display label, `Display` and
/// `FromStr` over that label, and an `ALL` table in declaration order.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == s)
                    .ok_or_else(|| ParseLabelError {
                        kind: $kind,
                        label: s.to_string(),
                    })
            }
        }
    };
}

labeled_enum! {
    /// How frames are grouped when colors are assigned.
    ColorCoding("color coding") {
        BySymbolName => "by symbol name",
        BySystemFrame => "by system frame",
        ByApplicationFrame => "by application frame",
        ByLibrary => "by library",
        ByRecursion => "by recursion",
        ByFrequency => "by frequency",
    }
}

labeled_enum! {
    Sorting("sorting") {
        /// Merge identical stacks, heaviest first.
        LeftHeavy => "left heavy",
        /// Keep samples in the order they were taken.
        CallOrder => "call order",
    }
}

labeled_enum! {
    View("view") {
        TopDown => "top down",
        BottomUp => "bottom up",
    }
}

labeled_enum! {
    /// Where the call tree table sits relative to the flamegraph.
    Layout("layout") {
        TableRight => "table right",
        TableBottom => "table bottom",
        TableLeft => "table left",
    }
}

labeled_enum! {
    XAxis("x axis") {
        Profile => "profile",
        Transaction => "transaction",
    }
}

labeled_enum! {
    /// Optional timeline strips drawn above the flamegraph.
    Timeline("timeline") {
        Minimap => "minimap",
        TransactionSpans => "transaction_spans",
        UiFrames => "ui_frames",
    }
}

/// Visibility of each timeline strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timelines {
    pub minimap: bool,
    pub transaction_spans: bool,
    pub ui_frames: bool,
}

impl Timelines {
    pub fn get(&self, timeline: Timeline) -> bool {
        match timeline {
            Timeline::Minimap => self.minimap,
            Timeline::TransactionSpans => self.transaction_spans,
            Timeline::UiFrames => self.ui_frames,
        }
    }

    /// Copy with exactly one flag replaced.
    pub fn with(mut self, timeline: Timeline, value: bool) -> Self {
        match timeline {
            Timeline::Minimap => self.minimap = value,
            Timeline::TransactionSpans => self.transaction_spans = value,
            Timeline::UiFrames => self.ui_frames = value,
        }
        self
    }
}

impl Default for Timelines {
    fn default() -> Self {
        Self {
            minimap: true,
            transaction_spans: true,
            ui_frames: true,
        }
    }
}

/// Rendering preferences of one flamegraph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub color_coding: ColorCoding,
    pub sorting: Sorting,
    pub view: View,
    pub layout: Layout,
    pub x_axis: XAxis,
    pub timelines: Timelines,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            color_coding: ColorCoding::BySymbolName,
            sorting: Sorting::CallOrder,
            view: View::TopDown,
            layout: Layout::TableBottom,
            x_axis: XAxis::Profile,
            timelines: Timelines::default(),
        }
    }
}

/// A transition of the preferences state machine.
///
/// Serialized as `{"type": "set sorting", "payload": "call order"}`. Any
/// unrecognized `type` decodes as [`PreferencesAction::Unknown`] whatever its
/// payload; a recognized `type` with a malformed payload is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum PreferencesAction {
    #[serde(rename = "set layout")]
    SetLayout(Layout),
    #[serde(rename = "set color coding")]
    SetColorCoding(ColorCoding),
    #[serde(rename = "set sorting")]
    SetSorting(Sorting),
    #[serde(rename = "set view")]
    SetView(View),
    #[serde(rename = "set xAxis")]
    SetXAxis(XAxis),
    #[serde(rename = "toggle timeline")]
    ToggleTimeline { timeline: Timeline, value: bool },
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct TimelineToggle {
    timeline: Timeline,
    value: bool,
}

fn payload<T, E>(payload: Option<serde_json::Value>) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    serde_json::from_value(payload.unwrap_or_default()).map_err(E::custom)
}

impl<'de> Deserialize<'de> for PreferencesAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawAction { kind, payload: raw } = RawAction::deserialize(deserializer)?;
        Ok(match kind.as_str() {
            "set layout" => Self::SetLayout(payload(raw)?),
            "set color coding" => Self::SetColorCoding(payload(raw)?),
            "set sorting" => Self::SetSorting(payload(raw)?),
            "set view" => Self::SetView(payload(raw)?),
            "set xAxis" => Self::SetXAxis(payload(raw)?),
            "toggle timeline" => {
                let TimelineToggle { timeline, value } = payload(raw)?;
                Self::ToggleTimeline { timeline, value }
            }
            _ => Self::Unknown,
        })
    }
}
