use flame_tint_protocol::{ColorChannels, StackFrame};
use tracing::debug;

use super::color_map::ColorMap;

/// Components per frame occurrence in the color buffer (r, g, b, a).
pub const COMPONENTS_PER_FRAME: usize = 4;

/// Render-ready colors for one frame list.
#[derive(Debug, Clone, PartialEq)]
pub struct StackColors {
    /// `COMPONENTS_PER_FRAME` floats per input occurrence, in input order.
    pub color_buffer: Vec<f32>,
    /// Identity lookup the buffer was built from.
    pub color_map: ColorMap,
}

impl StackColors {
    /// Color of the occurrence at `index`, read back from the buffer.
    pub fn occurrence_color(&self, index: usize) -> Option<ColorChannels> {
        let start = index.checked_mul(COMPONENTS_PER_FRAME)?;
        let end = start.checked_add(COMPONENTS_PER_FRAME)?;
        let chunk = self.color_buffer.get(start..end)?;
        Some(ColorChannels::rgba(chunk[0], chunk[1], chunk[2], chunk[3]))
    }
}

/// Build the identity color map and flatten it into a per-occurrence buffer.
///
/// `color_map_fn` receives `frames` and `color_bucket` and decides identity
/// colors; every occurrence is then written in order, duplicates included.
/// Occurrences whose identity is missing from the map get `fallback`.
pub fn stack_to_color<B, M>(
    frames: &[StackFrame],
    color_map_fn: M,
    color_bucket: &B,
    fallback: ColorChannels,
) -> StackColors
where
    B: Fn(f64) -> ColorChannels + ?Sized,
    M: FnOnce(&[StackFrame], &B) -> ColorMap,
{
    let color_map = color_map_fn(frames, color_bucket);

    let mut color_buffer = Vec::with_capacity(frames.len() * COMPONENTS_PER_FRAME);
    let mut fallbacks = 0usize;
    for frame in frames {
        let color = match color_map.get(&frame.key) {
            Some(color) => *color,
            None => {
                fallbacks += 1;
                fallback
            }
        };
        color_buffer.extend_from_slice(&color.to_array());
    }

    debug!(
        occurrences = frames.len(),
        identities = color_map.len(),
        fallbacks,
        "built stack color buffer"
    );

    StackColors {
        color_buffer,
        color_map,
    }
}
