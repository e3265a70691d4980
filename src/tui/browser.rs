//! Browser model
//!
//! Owns the state graph, the three pane controllers and the focus ring, and
//! applies [`Command`]s to them. It has no dependency on the rendering layer:
//! the view feeds it commands and completed fetches, reads back what to draw,
//! and executes the [`Action`]s it queues.

use crate::catalog::TagRecord;
use crate::error::{BrowserError, FetchError, InvariantViolation};
use crate::pull::PullRequest;

use super::action_queue::{Action, ActionQueue, Completion};
use super::cell;
use super::components::toast::Toast;
use super::detail::{DetailController, DetailView};
use super::fetch::{FetchTicket, FetchTracker};
use super::focus::{FocusRing, Pane};
use super::handlers::Command;
use super::list::{ListController, ListKey, ListSnapshot, ListWindow};
use super::state::{SelectionState, StateGraph};

/// Controller state outside the cells, saved before each command
struct Checkpoint {
    repositories: ListSnapshot<String>,
    tags: ListSnapshot<TagRecord>,
    detail: DetailView,
    repository_generation: u64,
    tag_generation: u64,
    queued: usize,
}

/// Interactive registry browser state
pub struct Browser {
    registry: String,
    graph: StateGraph,
    repositories: ListController<String>,
    tags: ListController<TagRecord>,
    detail: DetailController,
    repository_fetches: FetchTracker,
    tag_fetches: FetchTracker,
    actions: ActionQueue,
    focus: FocusRing,
    show_help: bool,
    flash: Option<Toast>,
    pull_enabled: bool,
    should_exit: bool,
}

impl Browser {
    /// Build the browser and queue the initial repository fetch
    pub fn new(registry: impl Into<String>, pull_enabled: bool) -> Self {
        let graph = StateGraph::new();
        let actions = ActionQueue::new();
        let tag_fetches = FetchTracker::new();

        let repositories = ListController::repositories(&graph);
        let tags = ListController::tags(&graph, &tag_fetches, &actions);
        let detail = DetailController::new(&graph);

        let mut browser = Self {
            registry: registry.into(),
            graph,
            repositories,
            tags,
            detail,
            repository_fetches: FetchTracker::new(),
            tag_fetches,
            actions,
            focus: FocusRing::new(),
            show_help: false,
            flash: None,
            pull_enabled,
            should_exit: false,
        };
        browser.refresh();
        browser
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub fn focused(&self) -> Pane {
        self.focus.focused()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn flash(&self) -> Option<&Toast> {
        self.flash.as_ref()
    }

    pub fn pull_enabled(&self) -> bool {
        self.pull_enabled
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn selection_state(&self) -> SelectionState {
        self.graph.selection_state()
    }

    pub fn query(&self) -> String {
        self.graph.search_query.get()
    }

    /// Total repositories in the registry, once fetched
    pub fn repository_count(&self) -> Option<usize> {
        if self.repositories.is_ready() {
            Some(self.graph.repository_names.with(Vec::len))
        } else {
            None
        }
    }

    pub fn tag_count(&self) -> Option<usize> {
        self.tags.item_count()
    }

    pub fn repositories_window(&self, viewport_height: usize) -> ListWindow<String> {
        self.repositories.render(viewport_height)
    }

    pub fn tags_window(&self, viewport_height: usize) -> ListWindow<TagRecord> {
        self.tags.render(viewport_height)
    }

    pub fn detail_view(&self) -> DetailView {
        self.detail.render()
    }

    /// Hand over every queued side effect
    pub fn take_actions(&self) -> Vec<Action> {
        self.actions.drain()
    }

    /// Drop the flash once it has been on screen long enough
    pub fn expire_flash(&mut self, now: std::time::Instant) -> bool {
        if self.flash.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.flash = None;
            return true;
        }
        false
    }

    pub fn set_flash(&mut self, toast: Toast) {
        self.flash = Some(toast);
    }

    /// Apply a command. An invariant violation is logged and flashed, and
    /// the browser is put back the way it was before the command.
    pub fn handle(&mut self, command: Command) {
        let checkpoint = self.checkpoint();
        if let Err(e) = cell::atomic(|| self.apply(command)) {
            tracing::error!("{command:?} failed: {e}");
            self.restore(checkpoint);
            self.flash = Some(Toast::error(e.to_string()));
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            repositories: self.repositories.snapshot(),
            tags: self.tags.snapshot(),
            detail: self.detail.render(),
            repository_generation: self.repository_fetches.generation(),
            tag_generation: self.tag_fetches.generation(),
            queued: self.actions.len(),
        }
    }

    // Cells roll themselves back; this covers what their observers touched
    fn restore(&mut self, checkpoint: Checkpoint) {
        self.actions.truncate(checkpoint.queued);
        self.repository_fetches.rewind(checkpoint.repository_generation);
        self.tag_fetches.rewind(checkpoint.tag_generation);
        self.repositories.restore(checkpoint.repositories);
        self.tags.restore(checkpoint.tags);
        self.detail.restore(checkpoint.detail);
    }

    fn apply(&mut self, command: Command) -> Result<(), InvariantViolation> {
        match command {
            Command::Quit => self.should_exit = true,
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::CycleFocus => {
                self.focus.advance();
            }
            Command::FocusSearch => self.focus.focus(Pane::Search),
            Command::Cancel => self.cancel()?,
            Command::Refresh => self.refresh(),
            Command::Pull => self.request_pull(),
            Command::List(key) => self.list_key(key)?,
            Command::SearchInput(c) => {
                let mut query = self.graph.search_query.get();
                query.push(c);
                self.graph.search_query.set(query)?;
            }
            Command::SearchBackspace => {
                let mut query = self.graph.search_query.get();
                if query.pop().is_some() {
                    if query.trim().is_empty() {
                        // Emptying the query cancels the search like Esc does
                        self.graph.reset()?;
                    } else {
                        self.graph.search_query.set(query)?;
                    }
                }
            }
            Command::SearchSubmit => self.focus.focus(Pane::Repositories),
        }
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), InvariantViolation> {
        if self.focus.is_focused(Pane::Search) {
            self.graph.reset()?;
        } else {
            self.graph.clear_tag()?;
            // The tags list empties too; committing the repository again refetches
            self.tag_fetches.invalidate();
            self.tags.set_idle();
            self.show_help = false;
        }
        self.focus.return_to_anchor();
        Ok(())
    }

    fn list_key(&mut self, key: ListKey) -> Result<(), InvariantViolation> {
        match self.focus.focused() {
            Pane::Repositories => {
                if let Some(name) = self.repositories.handle_key(key) {
                    self.graph.select_repository(name)?;
                    self.focus.focus(Pane::Tags);
                }
            }
            Pane::Tags => {
                if let Some(tag) = self.tags.handle_key(key) {
                    self.graph.select_tag(tag)?;
                    self.focus.focus(Pane::Properties);
                }
            }
            Pane::Search | Pane::Properties => {}
        }
        Ok(())
    }

    /// Re-fetch the repository list
    pub fn refresh(&mut self) {
        let ticket = self.repository_fetches.begin();
        self.repositories.set_loading();
        self.actions.push(Action::LoadRepositories(ticket));
    }

    fn request_pull(&mut self) {
        if !self.pull_enabled {
            return;
        }
        let repository = self.graph.selected_repository.get();
        let tag = self.graph.selected_tag.get();
        match (repository, tag) {
            (Some(repository), Some(tag)) => {
                self.actions.push(Action::Pull(PullRequest::new(
                    self.registry.clone(),
                    repository,
                    tag.name,
                )));
                self.flash = Some(Toast::info("Image pull started..."));
            }
            _ => {
                tracing::info!("pull requested without a selected tag");
                self.flash = Some(Toast::warning("No tag selected"));
            }
        }
    }

    /// Feed back the result of a performed action
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Repositories { ticket, result } => {
                self.complete_repositories(ticket, result);
            }
            Completion::Tags {
                ticket,
                repository,
                result,
            } => {
                self.complete_tags(ticket, &repository, result);
            }
            Completion::Pull(result) => self.complete_pull(result),
        }
    }

    /// Deliver a repository listing. Returns `false` when the result was
    /// superseded by a later refresh and dropped.
    pub fn complete_repositories(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<String>, FetchError>,
    ) -> bool {
        if !self.repository_fetches.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "discarding stale repository listing"
            );
            return false;
        }

        match result {
            Ok(names) => {
                let count = names.len();
                if let Err(e) = self.graph.repository_names.set(names) {
                    tracing::error!("failed to store repository names: {e}");
                    self.flash = Some(Toast::error(e.to_string()));
                }
                self.repositories.populate_repositories(&self.graph);
                tracing::debug!("loaded {count} repositories");
            }
            Err(e) => {
                tracing::warn!("failed to list repositories: {e}");
                self.flash = Some(Toast::error(format!("Failed to load repositories: {e}")));
                self.repositories.set_failed(e);
            }
        }
        true
    }

    /// Deliver a tag listing. Returns `false` when the selection moved on
    /// since the fetch started and the result was dropped.
    pub fn complete_tags(
        &mut self,
        ticket: FetchTicket,
        repository: &str,
        result: Result<Vec<TagRecord>, FetchError>,
    ) -> bool {
        if !self.tag_fetches.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                repository,
                "discarding stale tag listing"
            );
            return false;
        }

        match result {
            Ok(tags) => self.tags.set_items(tags),
            Err(e) => {
                tracing::warn!("failed to list tags for {repository}: {e}");
                self.flash = Some(Toast::error(format!(
                    "Failed to load tags for {repository}: {e}"
                )));
                self.tags.set_failed(e);
            }
        }
        true
    }

    /// Report the outcome of a pull action
    pub fn complete_pull(&mut self, result: Result<String, BrowserError>) {
        self.flash = Some(match result {
            Ok(image) => Toast::info(format!("Pulled {image}")),
            Err(e) => {
                tracing::warn!("{e}");
                Toast::error(e.to_string())
            }
        });
    }
}
