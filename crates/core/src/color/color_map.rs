use std::cmp::Ordering;
use std::collections::HashMap;

use flame_tint_protocol::{ColorChannels, ColorCoding, FrameKey, StackFrame};
use tracing::debug;

/// Identity → color lookup shared by tooltips, search and the draw call.
pub type ColorMap = HashMap<FrameKey, ColorChannels>;

/// Ordering applied to distinct identities before colors are spread.
pub type IdentityOrder = fn(&FrameIdentity<'_>, &FrameIdentity<'_>) -> Ordering;

/// All occurrences of one logical frame, folded together.
#[derive(Debug, Clone)]
pub struct FrameIdentity<'a> {
    /// First occurrence in the input list.
    pub frame: &'a StackFrame,
    pub occurrences: usize,
    /// Sum of sample counts over every occurrence; NaN counts contribute 0.
    pub total_samples: f64,
    /// Largest number of ancestors sharing this key over all occurrences.
    pub recursion: u32,
}

/// Fold `frames` into distinct identities, in first-seen order.
pub fn collect_identities(frames: &[StackFrame]) -> Vec<FrameIdentity<'_>> {
    let depths = recursion_depths(frames);
    let mut slots: HashMap<&FrameKey, usize> = HashMap::with_capacity(frames.len());
    let mut identities: Vec<FrameIdentity<'_>> = Vec::new();

    for (frame, &recursion) in frames.iter().zip(&depths) {
        let samples = weight(frame.sample_count);

        if let Some(&slot) = slots.get(&frame.key) {
            let identity = &mut identities[slot];
            identity.occurrences += 1;
            identity.total_samples += samples;
            identity.recursion = identity.recursion.max(recursion);
        } else {
            slots.insert(&frame.key, identities.len());
            identities.push(FrameIdentity {
                frame,
                occurrences: 1,
                total_samples: samples,
                recursion,
            });
        }
    }

    identities
}

/// For every occurrence, the number of its ancestors that share its key.
///
/// One iterative depth-first pass over the parent links, counting the keys on
/// the current root path. Frames whose parent index is out of range are roots.
/// Frames on a parent cycle, or below one, are unreachable from any root and
/// report 0.
fn recursion_depths(frames: &[StackFrame]) -> Vec<u32> {
    let mut depths = vec![0; frames.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); frames.len()];
    let mut roots = Vec::new();
    for (index, frame) in frames.iter().enumerate() {
        match frame.parent {
            Some(parent) if parent < frames.len() && parent != index => {
                children[parent].push(index);
            }
            _ => roots.push(index),
        }
    }

    let mut on_path: HashMap<&FrameKey, u32> = HashMap::new();
    let mut pending: Vec<(usize, bool)> = roots.iter().rev().map(|&root| (root, true)).collect();
    while let Some((index, entering)) = pending.pop() {
        let key = &frames[index].key;
        if entering {
            let count = on_path.entry(key).or_insert(0);
            depths[index] = *count;
            *count += 1;
            pending.push((index, false));
            pending.extend(children[index].iter().rev().map(|&child| (child, true)));
        } else if let Some(count) = on_path.get_mut(key) {
            *count = count.saturating_sub(1);
        }
    }
    depths
}

#[inline]
fn weight(samples: f64) -> f64 {
    if samples.is_nan() { 0.0 } else { samples }
}

/// Assign each distinct identity in `frames` one color from `color_bucket`.
///
/// Identities are deduplicated in first-seen order, optionally sorted by
/// `order` (stable), and the one at position `i` of `n` receives
/// `color_bucket(i / max(n - 1, 1))`. Colors therefore span the whole bucket
/// and shift when the identity set changes.
pub fn make_color_map<B>(
    frames: &[StackFrame],
    color_bucket: &B,
    order: Option<IdentityOrder>,
) -> ColorMap
where
    B: Fn(f64) -> ColorChannels + ?Sized,
{
    let mut identities = collect_identities(frames);
    if let Some(order) = order {
        identities.sort_by(order);
    }

    let denominator = identities.len().saturating_sub(1).max(1) as f64;
    let map: ColorMap = identities
        .iter()
        .enumerate()
        .map(|(position, identity)| {
            (
                identity.frame.key.clone(),
                color_bucket(position as f64 / denominator),
            )
        })
        .collect();

    debug!(
        occurrences = frames.len(),
        identities = map.len(),
        sorted = order.is_some(),
        "built frame color map"
    );
    map
}

/// [`make_color_map`] with the ordering selected by `coding`.
pub fn color_map_for<B>(frames: &[StackFrame], color_bucket: &B, coding: ColorCoding) -> ColorMap
where
    B: Fn(f64) -> ColorChannels + ?Sized,
{
    make_color_map(frames, color_bucket, Some(identity_order(coding)))
}

/// Comparator for each color coding.
pub fn identity_order(coding: ColorCoding) -> IdentityOrder {
    match coding {
        ColorCoding::BySymbolName => by_symbol_name,
        ColorCoding::BySystemFrame => by_system_frame,
        ColorCoding::ByApplicationFrame => by_application_frame,
        ColorCoding::ByLibrary => by_library,
        ColorCoding::ByRecursion => by_recursion,
        ColorCoding::ByFrequency => by_frequency,
    }
}

fn by_symbol_name(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    a.frame
        .name
        .cmp(&b.frame.name)
        .then_with(|| a.frame.key.cmp(&b.frame.key))
}

// `false < true`: system frames sort before application frames.
fn by_system_frame(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    a.frame
        .is_application
        .cmp(&b.frame.is_application)
        .then_with(|| by_symbol_name(a, b))
}

fn by_application_frame(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    b.frame
        .is_application
        .cmp(&a.frame.is_application)
        .then_with(|| by_symbol_name(a, b))
}

// Frames without a library go last.
fn by_library(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    let libraries = match (&a.frame.library, &b.frame.library) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    libraries.then_with(|| by_symbol_name(a, b))
}

fn by_recursion(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    b.recursion
        .cmp(&a.recursion)
        .then_with(|| by_symbol_name(a, b))
}

// Heaviest first; equal weights keep first-seen order.
fn by_frequency(a: &FrameIdentity<'_>, b: &FrameIdentity<'_>) -> Ordering {
    weight(b.total_samples)
        .partial_cmp(&weight(a.total_samples))
        .unwrap_or(Ordering::Equal)
}
