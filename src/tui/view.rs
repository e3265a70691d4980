//! Main browser view component
//!
//! Owns the [`Browser`] model in component state, turns terminal events into
//! [`Command`]s and runs queued [`Action`]s on an async handler.

// State handles are Copy; they are re-bound inside closures for clarity
#![allow(clippy::clone_on_copy)]

use std::sync::Arc;
use std::time::Instant;

use iocraft::prelude::*;

use crate::catalog::{AcrClient, format_timestamp};
use crate::tui::components::toast::TOAST_TTL;
use crate::tui::theme::theme;

use super::action_queue::Action;
use super::browser::Browser;
use super::components::{
    DetailPane, Footer, Header, HelpModal, ListPane, ListRow, SearchBar, render_toast,
    shortcuts_for,
};
use super::focus::Pane;
use super::handlers::command_for_key;

/// Rows taken by the header, search bar and footer
const FIXED_ROWS: u16 = 5;
/// Rows taken by the flash bar when one is showing
const FLASH_ROWS: u16 = 3;

/// Props for the BrowserTui component
#[derive(Default, Props)]
pub struct BrowserTuiProps {
    /// Registry name, without the login server suffix
    pub registry: String,
    /// Client used for catalog requests
    pub client: Option<Arc<AcrClient>>,
    /// Whether docker pulls are offered
    pub pull_enabled: bool,
}

/// Height available to the three panes
pub fn pane_height(terminal_height: u16, flash_visible: bool) -> u16 {
    let flash = if flash_visible { FLASH_ROWS } else { 0 };
    terminal_height.saturating_sub(FIXED_ROWS + flash)
}

/// Registry browser
///
/// Layout:
/// ```text
/// +------------------------------------------------+
/// | registry                     N repos · M tags  |
/// +------------------------------------------------+
/// | / search...                                    |
/// +---------------+---------------+----------------+
/// | Repositories  | Tags          | Properties     |
/// |               |               |                |
/// +---------------+---------------+----------------+
/// | Footer with shortcuts                          |
/// +------------------------------------------------+
/// ```
#[component]
pub fn BrowserTui<'a>(props: &BrowserTuiProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let theme = theme();

    let registry = props.registry.clone();
    let pull_enabled = props.pull_enabled;
    let mut browser: State<Browser> = hooks.use_state(move || Browser::new(registry, pull_enabled));

    // Runs one queued action and feeds the outcome back into the model
    let action_handler: Handler<Action> = hooks.use_async_handler({
        let client = props.client.clone();
        let browser_setter = browser;

        move |action: Action| {
            let client = client.clone();
            let mut browser_setter = browser_setter;

            async move {
                let Some(client) = client else {
                    tracing::error!(?action, "no catalog client configured");
                    return;
                };
                let completion = action.perform(client.as_ref()).await;
                browser_setter.write().complete(completion);
            }
        }
    });

    // Clears the flash once it has been on screen long enough
    let flash_handler: Handler<()> = hooks.use_async_handler({
        let browser_setter = browser;

        move |()| {
            let mut browser_setter = browser_setter;

            async move {
                tokio::time::sleep(TOAST_TTL).await;
                let expired = browser_setter
                    .read()
                    .flash()
                    .is_some_and(|toast| toast.is_expired(Instant::now()));
                if expired {
                    browser_setter.write().expire_flash(Instant::now());
                }
            }
        }
    });

    // Dispatch whatever the model queued, including the initial load
    let queued = browser.read().take_actions();
    for action in queued {
        action_handler.clone()(action);
    }

    let mut flash_scheduled: State<Option<Instant>> = hooks.use_state(|| None);
    let flash_stamp = browser.read().flash().map(|toast| toast.timestamp);
    if flash_stamp.is_some() && flash_stamp != flash_scheduled.get() {
        flash_scheduled.set(flash_stamp);
        flash_handler.clone()(());
    }

    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let focused = browser.read().focused();
                if let Some(command) = command_for_key(focused, code, modifiers) {
                    browser.write().handle(command);
                }
            }
            _ => {}
        }
    });

    let model = browser.read();

    if model.should_exit() {
        system.exit();
    }

    let focused = model.focused();
    let flash = model.flash().cloned();
    let viewport = pane_height(height, flash.is_some()) as usize;

    let query = model.query();
    let filter = model.graph().search_results.get();
    let match_count = filter
        .is_filtered()
        .then(|| model.graph().visible_repositories().len());
    let highlight = (!query.trim().is_empty()).then(|| query.trim().to_string());

    let repositories = model.repositories_window(viewport).map(ListRow::new);
    let tags = model.tags_window(viewport).map(|tag| {
        ListRow::new(tag.name).with_detail(format_timestamp(tag.created_at))
    });
    let tags_title = match model.graph().selected_repository.get() {
        Some(repository) => format!("Tags · {repository}"),
        None => "Tags".to_string(),
    };

    let show_help = model.show_help();
    let login_server = format!("{}.azurecr.io", model.registry());
    let repository_count = model.repository_count();
    let tag_count = model.tag_count();
    let detail = model.detail_view();
    drop(model);

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                registry: login_server,
                repository_count: repository_count,
                tag_count: tag_count,
            )
            SearchBar(
                query: query,
                has_focus: focused == Pane::Search,
                match_count: match_count,
            )
            View(
                flex_grow: 1.0,
                width: 100pct,
                flex_direction: FlexDirection::Row,
            ) {
                ListPane(
                    title: "Repositories".to_string(),
                    window: Some(repositories),
                    has_focus: focused == Pane::Repositories,
                    highlight: highlight,
                    width_pct: Some(30),
                )
                ListPane(
                    title: tags_title,
                    window: Some(tags),
                    has_focus: focused == Pane::Tags,
                    width_pct: Some(30),
                )
                DetailPane(
                    view: detail,
                    has_focus: focused == Pane::Properties,
                )
            }
            #(render_toast(&flash))
            Footer(shortcuts: shortcuts_for(focused, pull_enabled))
            #(show_help.then(|| element! {
                HelpModal(pull_enabled: pull_enabled)
            }))
        }
    }
}
