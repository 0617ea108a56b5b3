use flame_tint_protocol::{Preferences, PreferencesAction};
use tracing::{debug, trace};

/// Apply one action to the flamegraph preferences.
///
/// Each `set …` action replaces exactly one field and `toggle timeline`
/// replaces exactly one timeline flag. Unknown actions leave the state as is.
pub fn flamegraph_preferences_reducer(
    state: Preferences,
    action: PreferencesAction,
) -> Preferences {
    let next = match action {
        PreferencesAction::SetLayout(layout) => Preferences { layout, ..state },
        PreferencesAction::SetColorCoding(color_coding) => Preferences {
            color_coding,
            ..state
        },
        PreferencesAction::SetSorting(sorting) => Preferences { sorting, ..state },
        PreferencesAction::SetView(view) => Preferences { view, ..state },
        PreferencesAction::SetXAxis(x_axis) => Preferences { x_axis, ..state },
        PreferencesAction::ToggleTimeline { timeline, value } => Preferences {
            timelines: state.timelines.with(timeline, value),
            ..state
        },
        PreferencesAction::Unknown => {
            debug!("ignoring unknown preferences action");
            state
        }
    };
    trace!(?action, ?next, "preferences transition");
    next
}

/// Method form of [`flamegraph_preferences_reducer`].
pub trait ApplyAction {
    fn apply(self, action: PreferencesAction) -> Self;
}

impl ApplyAction for Preferences {
    fn apply(self, action: PreferencesAction) -> Self {
        flamegraph_preferences_reducer(self, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flame_tint_protocol::{ColorCoding, Layout, Sorting, Timeline, Timelines, View, XAxis};

    fn initial() -> Preferences {
        Preferences {
            color_coding: ColorCoding::BySymbolName,
            sorting: Sorting::LeftHeavy,
            view: View::TopDown,
            layout: Layout::TableBottom,
            x_axis: XAxis::Profile,
            timelines: Timelines::default(),
        }
    }

    #[test]
    fn set_sorting_changes_only_sorting() {
        let next = flamegraph_preferences_reducer(
            initial(),
            PreferencesAction::SetSorting(Sorting::CallOrder),
        );
        assert_eq!(
            next,
            Preferences {
                sorting: Sorting::CallOrder,
                ..initial()
            }
        );
    }

    #[test]
    fn each_setter_replaces_one_field() {
        let s = initial();
        assert_eq!(
            s.apply(PreferencesAction::SetLayout(Layout::TableLeft)),
            Preferences {
                layout: Layout::TableLeft,
                ..s
            }
        );
        assert_eq!(
            s.apply(PreferencesAction::SetColorCoding(ColorCoding::ByLibrary)),
            Preferences {
                color_coding: ColorCoding::ByLibrary,
                ..s
            }
        );
        assert_eq!(
            s.apply(PreferencesAction::SetView(View::BottomUp)),
            Preferences {
                view: View::BottomUp,
                ..s
            }
        );
        assert_eq!(
            s.apply(PreferencesAction::SetXAxis(XAxis::Transaction)),
            Preferences {
                x_axis: XAxis::Transaction,
                ..s
            }
        );
    }

    #[test]
    fn toggle_timeline_leaves_siblings_alone() {
        for timeline in Timeline::ALL {
            let next = initial().apply(PreferencesAction::ToggleTimeline {
                timeline: *timeline,
                value: false,
            });
            for other in Timeline::ALL {
                assert_eq!(next.timelines.get(*other), other != timeline);
            }
            assert_eq!(next.sorting, Sorting::LeftHeavy);
        }
    }

    #[test]
    fn unknown_action_is_a_no_op() {
        assert_eq!(initial().apply(PreferencesAction::Unknown), initial());
    }

    #[test]
    fn reducer_is_memoryless() {
        // Same state + same action gives the same result regardless of path.
        let via_detour = initial()
            .apply(PreferencesAction::SetView(View::BottomUp))
            .apply(PreferencesAction::SetView(View::TopDown))
            .apply(PreferencesAction::SetSorting(Sorting::CallOrder));
        let direct = initial().apply(PreferencesAction::SetSorting(Sorting::CallOrder));
        assert_eq!(via_detour, direct);
    }
}
