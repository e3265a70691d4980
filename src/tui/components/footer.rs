//! Keyboard shortcuts bar component
//!
//! Displays available keyboard shortcuts at the bottom of the screen.

use iocraft::prelude::*;

use crate::tui::focus::Pane;
use crate::tui::theme::theme;

/// A single keyboard shortcut entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// The key or key combination (e.g., "q", "Tab", "←/→")
    pub key: String,
    /// Description of the action (e.g., "quit", "page")
    pub action: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Props for the Footer component
#[derive(Default, Props)]
pub struct FooterProps {
    /// List of keyboard shortcuts to display
    pub shortcuts: Vec<Shortcut>,
}

/// Keyboard shortcuts bar at the bottom of the screen
#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            min_height: 1,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            flex_shrink: 0.0,
            padding_left: 1,
            padding_right: 1,
            column_gap: 2,
            background_color: theme.border,
        ) {
            #(props.shortcuts.iter().map(|shortcut| {
                let key = shortcut.key.clone();
                let action = shortcut.action.clone();
                element! {
                    View(flex_direction: FlexDirection::Row) {
                        Text(
                            content: format!("[{}]", key),
                            color: theme.highlight,
                            weight: Weight::Bold,
                        )
                        Text(
                            content: format!(" {}", action),
                            color: theme.text,
                        )
                    }
                }
            }))
        }
    }
}

/// Shortcuts relevant to the focused pane
pub fn shortcuts_for(focused: Pane, pull_enabled: bool) -> Vec<Shortcut> {
    if focused == Pane::Search {
        return vec![
            Shortcut::new("Enter", "apply"),
            Shortcut::new("Tab", "next pane"),
            Shortcut::new("Esc", "clear"),
            Shortcut::new("C-q", "quit"),
        ];
    }

    let mut shortcuts = vec![
        Shortcut::new("q", "quit"),
        Shortcut::new("h", "help"),
        Shortcut::new("Tab", "next pane"),
        Shortcut::new("/", "search"),
        Shortcut::new("r", "refresh"),
    ];
    if matches!(focused, Pane::Repositories | Pane::Tags) {
        shortcuts.push(Shortcut::new("↑/↓", "row"));
        shortcuts.push(Shortcut::new("←/→", "page"));
        shortcuts.push(Shortcut::new("Enter", "select"));
    }
    if pull_enabled {
        shortcuts.push(Shortcut::new("p", "pull"));
    }
    shortcuts.push(Shortcut::new("Esc", "back"));
    shortcuts
}
