//! Browser state graph
//!
//! Five cells and the fixed edges between them:
//!
//! - `search_query` -> recompute `search_results`
//! - `repository_names` -> recompute `search_results` for the current query
//! - `selected_repository` -> clear `selected_tag`
//!
//! Controllers attach their own observers when they are constructed; the
//! edges above are wired here, before any controller sees the graph, so they
//! always run first.

use crate::catalog::TagRecord;
use crate::error::InvariantViolation;

use super::cell::{self, Cell};
use super::search::{FilterOutcome, filter};

/// Selection phase, derived from the two selection cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    RepositorySelected,
    TagSelected,
}

#[derive(Debug, Clone)]
pub struct StateGraph {
    pub search_query: Cell<String>,
    pub search_results: Cell<FilterOutcome>,
    pub selected_repository: Cell<Option<String>>,
    pub selected_tag: Cell<Option<TagRecord>>,
    pub repository_names: Cell<Vec<String>>,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    pub fn new() -> Self {
        let graph = Self {
            search_query: Cell::new("search_query", String::new()),
            search_results: Cell::new("search_results", FilterOutcome::Unfiltered),
            selected_repository: Cell::new("selected_repository", None),
            selected_tag: Cell::new("selected_tag", None),
            repository_names: Cell::new("repository_names", Vec::new()),
        };

        let results = graph.search_results.clone();
        let names = graph.repository_names.clone();
        graph.search_query.subscribe(move |query: &String| {
            let outcome = names.with(|names| filter(names, query));
            results.set(outcome).map(|_| ())
        });

        let results = graph.search_results.clone();
        let query = graph.search_query.clone();
        graph.repository_names.subscribe(move |names: &Vec<String>| {
            let outcome = filter(names, &query.get());
            results.set(outcome).map(|_| ())
        });

        let tag = graph.selected_tag.clone();
        graph
            .selected_repository
            .subscribe(move |_: &Option<String>| tag.set(None).map(|_| ()));

        graph
    }

    pub fn selection_state(&self) -> SelectionState {
        let has_repository = self.selected_repository.with(Option::is_some);
        let has_tag = self.selected_tag.with(Option::is_some);
        match (has_repository, has_tag) {
            (true, true) => SelectionState::TagSelected,
            (true, false) => SelectionState::RepositorySelected,
            _ => SelectionState::Idle,
        }
    }

    /// Commit a repository. Clears the tag selection before anything else
    /// observes the new repository.
    ///
    /// Committing the repository that is already selected runs the cascade
    /// again, which is how a failed tags fetch gets retried. Returns whether
    /// the selection changed.
    pub fn select_repository(&self, name: String) -> Result<bool, InvariantViolation> {
        let unchanged = self
            .selected_repository
            .with(|current| current.as_deref() == Some(name.as_str()));
        if unchanged {
            self.selected_repository.renotify()?;
            return Ok(false);
        }
        self.selected_repository.set(Some(name))
    }

    pub fn select_tag(&self, tag: TagRecord) -> Result<bool, InvariantViolation> {
        self.selected_tag.set(Some(tag))
    }

    /// Cancel outside the search bar: drop the tag selection only
    pub fn clear_tag(&self) -> Result<bool, InvariantViolation> {
        self.selected_tag.set(None)
    }

    /// Cancel from the search bar: back to `Idle` with no filter. Either
    /// all three cells change or none do.
    pub fn reset(&self) -> Result<(), InvariantViolation> {
        cell::atomic(|| {
            self.search_query.set(String::new())?;
            self.selected_repository.set(None)?;
            self.selected_tag.set(None)?;
            Ok(())
        })
    }

    /// Repositories the list should show for the current query
    pub fn visible_repositories(&self) -> Vec<String> {
        let names = self.repository_names.get();
        self.search_results.with(|outcome| outcome.resolve(&names).to_vec())
    }
}
