//! Frame color assignment: palette math, identity color maps and the
//! per-occurrence color buffer handed to the renderer.

pub mod bucket;
pub mod color_map;
pub mod lch;
pub mod stack_to_color;

pub use bucket::{ColorBucket, make_color_bucket, make_full_color_bucket};
pub use color_map::{
    ColorMap, FrameIdentity, IdentityOrder, collect_identities, color_map_for, identity_order,
    make_color_map,
};
pub use lch::{HueRange, from_luma_chroma_hue, lch_to_color};
pub use stack_to_color::{COMPONENTS_PER_FRAME, StackColors, stack_to_color};
