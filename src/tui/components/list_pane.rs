//! Paginated list pane component
//!
//! Draws one [`ListWindow`]: a loading line, an error, an empty message, or
//! the rows of the current page with a page indicator underneath.

use iocraft::prelude::*;

use crate::tui::list::ListWindow;
use crate::tui::search::match_span;
use crate::tui::theme::theme;

/// One rendered row: a label and an optional dimmed detail column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub label: String,
    pub detail: Option<String>,
}

impl ListRow {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Props for the ListPane component
#[derive(Default, Props)]
pub struct ListPaneProps {
    /// Pane title
    pub title: String,
    /// Page window to draw
    pub window: Option<ListWindow<ListRow>>,
    /// Whether the pane has focus
    pub has_focus: bool,
    /// Query to highlight in labels
    pub highlight: Option<String>,
    /// Width as a percentage of the content row
    pub width_pct: Option<u16>,
}

/// Bordered list pane
#[component]
pub fn ListPane(props: &ListPaneProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let width = props.width_pct.unwrap_or(30);

    element! {
        View(
            width: Size::Percent(width as f32),
            height: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border_for(props.has_focus),
        ) {
            View(padding_left: 1, flex_shrink: 0.0) {
                Text(
                    content: props.title.clone(),
                    color: if props.has_focus { theme.border_focused } else { theme.text },
                    weight: Weight::Bold,
                )
            }
            #(Some(render_window(
                props.window.clone().unwrap_or(ListWindow::Loading),
                props.highlight.clone(),
            )))
        }
    }
}

fn centered(message: String, color: Color) -> AnyElement<'static> {
    element! {
        View(
            flex_grow: 1.0,
            width: 100pct,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: message, color: color)
        }
    }
    .into_any()
}

fn render_window(window: ListWindow<ListRow>, highlight: Option<String>) -> AnyElement<'static> {
    let theme = theme();

    match window {
        ListWindow::Loading => centered("Loading...".to_string(), theme.text_dimmed),
        ListWindow::Failed(e) => centered(
            format!("Error ({}): {}", e.kind(), e),
            theme.error_color(&e),
        ),
        ListWindow::Empty(message) => centered(message, theme.text_dimmed),
        ListWindow::Rows {
            rows,
            highlighted,
            page,
            page_count,
            total,
        } => element! {
            View(
                flex_grow: 1.0,
                width: 100pct,
                flex_direction: FlexDirection::Column,
            ) {
                View(
                    flex_grow: 1.0,
                    width: 100pct,
                    flex_direction: FlexDirection::Column,
                    overflow: Overflow::Hidden,
                ) {
                    #(rows.into_iter().enumerate().map(|(i, row)| {
                        render_row(row, i == highlighted, highlight.as_deref())
                    }))
                }
                View(padding_left: 1, flex_shrink: 0.0) {
                    Text(
                        content: format!("page {page}/{page_count} · {total} total"),
                        color: theme.text_dimmed,
                    )
                }
            }
        }
        .into_any(),
    }
}

fn render_row(row: ListRow, selected: bool, highlight: Option<&str>) -> AnyElement<'static> {
    let theme = theme();
    let background = if selected { Some(theme.highlight) } else { None };
    let text_color = if selected { theme.highlight_text } else { theme.text };

    // Split the label around the first match so it can be colored
    let (before, matched, after) = match highlight.and_then(|q| match_span(&row.label, q)) {
        Some((start, end)) => (
            row.label[..start].to_string(),
            row.label[start..end].to_string(),
            row.label[end..].to_string(),
        ),
        None => (row.label.clone(), String::new(), String::new()),
    };

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            background_color: background,
        ) {
            Text(content: if selected { "> " } else { "  " }, color: text_color)
            Text(content: before, color: text_color)
            Text(content: matched, color: theme.search_match, weight: Weight::Bold)
            Text(content: after, color: text_color)
            View(flex_grow: 1.0)
            #(row.detail.map(|detail| element! {
                Text(content: detail, color: if selected { text_color } else { theme.text_dimmed })
            }))
        }
    }
    .into_any()
}
