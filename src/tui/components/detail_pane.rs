//! Properties pane component
//!
//! Displays the metadata of the selected tag.

use iocraft::prelude::*;

use crate::tui::detail::DetailView;
use crate::tui::theme::theme;

/// Props for the DetailPane component
#[derive(Default, Props)]
pub struct DetailPaneProps {
    /// What to show
    pub view: DetailView,
    /// Whether the pane has focus
    pub has_focus: bool,
}

/// Width of the label column
const LABEL_WIDTH: usize = 12;

/// Properties pane showing the selected tag
#[component]
pub fn DetailPane(props: &DetailPaneProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let body = match &props.view {
        DetailView::Empty => element! {
            View(
                flex_grow: 1.0,
                width: 100pct,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
            ) {
                Text(content: "Select a tag to see its properties", color: theme.text_dimmed)
            }
        }
        .into_any(),
        DetailView::Tag { title, rows } => {
            let rows = rows.clone();
            element! {
                View(
                    flex_grow: 1.0,
                    width: 100pct,
                    flex_direction: FlexDirection::Column,
                    padding_left: 1,
                    padding_right: 1,
                    overflow: Overflow::Hidden,
                ) {
                    View(
                        border_edges: Edges::Bottom,
                        border_style: BorderStyle::Single,
                        border_color: theme.border,
                        margin_bottom: 1,
                    ) {
                        Text(content: title.clone(), color: theme.title, weight: Weight::Bold)
                    }
                    #(rows.into_iter().map(|(label, value)| {
                        let value_color = if label == "digest" { theme.digest } else { theme.text };
                        element! {
                            View(flex_direction: FlexDirection::Row) {
                                Text(
                                    content: format!("{label:<LABEL_WIDTH$}"),
                                    color: theme.text_dimmed,
                                )
                                Text(content: value, color: value_color)
                            }
                        }
                    }))
                }
            }
            .into_any()
        }
    };

    element! {
        View(
            flex_grow: 1.0,
            height: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border_for(props.has_focus),
        ) {
            View(padding_left: 1, flex_shrink: 0.0) {
                Text(
                    content: "Properties",
                    color: if props.has_focus { theme.border_focused } else { theme.text },
                    weight: Weight::Bold,
                )
            }
            #(Some(body))
        }
    }
}
