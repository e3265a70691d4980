//! Search bar component
//!
//! Draws the current query; editing happens in the browser model, which
//! receives the keys while the bar has focus.

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the SearchBar component
#[derive(Default, Props)]
pub struct SearchBarProps {
    /// Current query
    pub query: String,
    /// Whether the search bar has focus
    pub has_focus: bool,
    /// Number of repositories matching, when a filter is active
    pub match_count: Option<usize>,
}

/// Single-line search bar with a "/" prompt
#[component]
pub fn SearchBar(props: &SearchBarProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let has_focus = props.has_focus;

    let (content, color) = if props.query.is_empty() && !has_focus {
        ("press / to filter repositories".to_string(), theme.text_dimmed)
    } else if has_focus {
        (format!("{}█", props.query), theme.text)
    } else {
        (props.query.clone(), theme.search_match)
    };

    element! {
        View(
            width: 100pct,
            height: 3,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            border_style: BorderStyle::Round,
            border_color: theme.border_for(has_focus),
            padding_left: 1,
            padding_right: 1,
        ) {
            View(margin_right: 1) {
                Text(
                    content: "/",
                    color: if has_focus { theme.border_focused } else { theme.text_dimmed },
                )
            }
            View(flex_grow: 1.0) {
                Text(content: content, color: color)
            }
            #(props.match_count.map(|n| element! {
                Text(content: format!("{n} match{}", if n == 1 { "" } else { "es" }), color: theme.text_dimmed)
            }))
        }
    }
}
