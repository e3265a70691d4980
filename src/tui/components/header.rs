//! Header row: application name, registry and counts

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Props for the Header component
#[derive(Default, Props)]
pub struct HeaderProps {
    /// Registry login server, e.g. `contoso.azurecr.io`
    pub registry: String,
    /// Repository count once loaded
    pub repository_count: Option<usize>,
    /// Tag count of the selected repository once loaded
    pub tag_count: Option<usize>,
}

fn count_label(count: Option<usize>, noun: &str) -> String {
    match count {
        Some(1) => format!("1 {noun}"),
        Some(n) => format!("{n} {noun}s"),
        None => format!("- {noun}s"),
    }
}

/// Header showing "acr-browser vX [registry]" and list counts
#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            flex_shrink: 0.0,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(
                content: format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                color: theme.title,
                weight: Weight::Bold,
            )
            Text(
                content: format!(" [{}]", props.registry),
                color: theme.text_dimmed,
            )
            View(flex_grow: 1.0)
            Text(
                content: format!(
                    "{} · {}",
                    count_label(props.repository_count, "repository"),
                    count_label(props.tag_count, "tag"),
                ),
                color: theme.text_dimmed,
            )
            Text(content: "  [h] help", color: theme.text_dimmed)
        }
    }
}
