pub mod color;
pub mod frame;
pub mod frame_key;
pub mod preferences;

pub use color::{ColorChannels, Lch};
pub use frame::StackFrame;
pub use frame_key::FrameKey;
pub use preferences::{
    ColorCoding, Layout, ParseLabelError, Preferences, PreferencesAction, Sorting, Timeline,
    Timelines, View, XAxis,
};
