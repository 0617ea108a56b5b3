//! Integration test: color a small call tree end to end and check the buffer,
//! the lookup map and the preferences that drive them stay consistent.

use flame_tint_core::color::{identity_order, make_color_map, stack_to_color};
use flame_tint_core::{ApplyAction, FlamegraphTheme, Palette, flamegraph_preferences_reducer};
use flame_tint_protocol::{
    ColorChannels, ColorCoding, Preferences, PreferencesAction, Sorting, StackFrame,
};

/// main → parse → alloc, main → render → alloc, main → render → render
fn call_tree() -> Vec<StackFrame> {
    vec![
        StackFrame::symbol("main", "app.rs").application().with_samples(10.0),
        StackFrame::symbol("parse", "parser.rs")
            .application()
            .with_library("app")
            .with_samples(3.0)
            .child_of(0, 1),
        StackFrame::new("alloc")
            .with_library("libc")
            .with_samples(2.0)
            .child_of(1, 2),
        StackFrame::symbol("render", "view.rs")
            .application()
            .with_library("app")
            .with_samples(7.0)
            .child_of(0, 1),
        StackFrame::new("alloc")
            .with_library("libc")
            .with_samples(1.0)
            .child_of(3, 2),
        StackFrame::symbol("render", "view.rs")
            .application()
            .with_library("app")
            .with_samples(4.0)
            .child_of(3, 2),
    ]
}

fn grey(t: f64) -> ColorChannels {
    ColorChannels::from_f64(t, t, t, 1.0)
}

#[test]
fn duplicate_frames_share_alphabetical_colors() {
    let frames: Vec<_> = ["A", "B", "A", "C"].into_iter().map(StackFrame::new).collect();
    let theme = FlamegraphTheme::light();
    let colors = stack_to_color(
        &frames,
        |frames, bucket| {
            make_color_map(frames, bucket, Some(identity_order(ColorCoding::BySymbolName)))
        },
        &grey,
        theme.frame_fallback,
    );

    assert_eq!(colors.color_map.len(), 3);
    assert_eq!(colors.color_map.get("A"), Some(&ColorChannels::rgb(0.0, 0.0, 0.0)));
    assert_eq!(colors.color_map.get("B"), Some(&ColorChannels::rgb(0.5, 0.5, 0.5)));
    assert_eq!(colors.color_map.get("C"), Some(&ColorChannels::rgb(1.0, 1.0, 1.0)));
    assert_eq!(
        colors.color_buffer,
        vec![0.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.5, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn every_coding_colors_every_occurrence() {
    let frames = call_tree();
    for theme in [FlamegraphTheme::light(), FlamegraphTheme::dark()] {
        for coding in ColorCoding::ALL {
            let colors = theme.stack_to_color(&frames, *coding);
            assert_eq!(colors.color_buffer.len(), 4 * frames.len());
            assert_eq!(colors.color_map.len(), 4, "{coding}");
            for (i, frame) in frames.iter().enumerate() {
                assert_eq!(
                    colors.occurrence_color(i).as_ref(),
                    colors.color_map.get(&frame.key),
                    "{coding}: occurrence {i}"
                );
            }
        }
    }
}

#[test]
fn layout_order_does_not_change_identity_colors() {
    // A "left heavy" rendering visits the same frames in a different order.
    let call_order = call_tree();
    let mut left_heavy = call_order.clone();
    left_heavy.reverse();

    let theme = FlamegraphTheme::dark();
    for coding in [
        ColorCoding::BySymbolName,
        ColorCoding::ByLibrary,
        ColorCoding::BySystemFrame,
        ColorCoding::ByApplicationFrame,
    ] {
        let a = theme.stack_to_color(&call_order, coding);
        let b = theme.stack_to_color(&left_heavy, coding);
        assert_eq!(a.color_map, b.color_map, "{coding}");
    }
}

#[test]
fn recomputation_is_bit_identical() {
    let frames = call_tree();
    let theme = FlamegraphTheme::light();
    for coding in ColorCoding::ALL {
        let first = theme.stack_to_color(&frames, *coding);
        let second = theme.stack_to_color(&frames, *coding);
        assert_eq!(first, second);
        let first_bits: Vec<u32> = first.color_buffer.iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u32> = second.color_buffer.iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }
}

#[test]
fn span_palette_differs_from_frame_palette() {
    let frames = call_tree();
    let theme = FlamegraphTheme::light();
    let stack = theme.colorize(&frames, ColorCoding::BySymbolName, Palette::Frames);
    let spans = theme.colorize(&frames, ColorCoding::BySymbolName, Palette::Spans);
    assert_ne!(stack.color_buffer, spans.color_buffer);
}

#[test]
fn preference_changes_select_the_next_coloring() {
    let frames = call_tree();
    let theme = FlamegraphTheme::light();
    let prefs = Preferences::default()
        .apply(PreferencesAction::SetColorCoding(ColorCoding::ByFrequency));
    let prefs =
        flamegraph_preferences_reducer(prefs, PreferencesAction::SetSorting(Sorting::LeftHeavy));
    assert_eq!(prefs.color_coding, ColorCoding::ByFrequency);
    assert_eq!(prefs.sorting, Sorting::LeftHeavy);

    let colors = theme.stack_to_color(&frames, prefs.color_coding);
    let bucket = theme.frame_bucket();
    // render: 7 + 4 = 11 samples, the heaviest identity.
    let render = frames[3].key.clone();
    assert_eq!(colors.color_map.get(&render), Some(&bucket.color_at(0.0)));
}
