//! Help overlay listing the key bindings

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the HelpModal component
#[derive(Default, Props)]
pub struct HelpModalProps {
    /// Whether the pull binding is available
    pub pull_enabled: bool,
}

/// Centered help overlay
#[component]
pub fn HelpModal(props: &HelpModalProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let help_text = build_help_text(props.pull_enabled);

    element! {
        View(
            width: 100pct,
            height: 100pct,
            position: Position::Absolute,
            top: 0,
            left: 0,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
        ) {
            View(
                width: Size::Percent(60.0),
                flex_direction: FlexDirection::Column,
                border_style: BorderStyle::Round,
                border_color: theme.border_focused,
                background_color: Color::Black,
                padding_left: 2,
                padding_right: 2,
                padding_top: 1,
                padding_bottom: 1,
            ) {
                Text(content: "Keyboard Shortcuts", color: theme.title, weight: Weight::Bold)
                Text(content: help_text, color: theme.text)
                Text(content: "[h] or [Esc] to close", color: theme.text_dimmed)
            }
        }
    }
}

/// Build the help text content as a single string
pub fn build_help_text(pull_enabled: bool) -> String {
    let mut general = vec![
        ("h", "Toggle this help"),
        ("Tab", "Focus next pane"),
        ("Esc", "Back to repositories / clear search"),
        ("/", "Search repositories"),
        ("r", "Refresh repositories"),
    ];
    if pull_enabled {
        general.push(("p", "Pull the selected tag with docker"));
    }
    general.push(("q", "Quit"));

    let shortcuts = [
        ("General", general),
        (
            "Lists",
            vec![
                ("k / ↑", "Previous row"),
                ("j / ↓", "Next row"),
                ("← / →", "Previous / next page"),
                ("f / l", "First / last page"),
                ("Enter", "Select"),
            ],
        ),
        (
            "Search",
            vec![
                ("Enter", "Apply and go to repositories"),
                ("Backspace", "Delete a character"),
                ("Esc", "Clear search and selections"),
            ],
        ),
    ];

    let mut lines = Vec::new();
    for (category, items) in shortcuts {
        lines.push(String::new());
        lines.push(format!("{category}:"));
        for (key, description) in items {
            lines.push(format!("  {key:<12} {description}"));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}
