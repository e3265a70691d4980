//! Paginated list controller
//!
//! A [`ListController`] pairs a [`Cursor`] with a data source and turns them
//! into a [`ListWindow`] on every render. The page size follows the viewport
//! height, so resizing the terminal re-paginates without any extra event.
//!
//! Two instances exist: the repositories list, fed by the filter results, and
//! the tags list, fed by fetches triggered from the repository selection.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::TagRecord;
use crate::error::FetchError;

use super::action_queue::{Action, ActionQueue};
use super::cursor::Cursor;
use super::fetch::FetchTracker;
use super::search::FilterOutcome;
use super::state::StateGraph;

/// Rows taken by borders, title and pagination line around a list
pub const CHROME_ROWS: usize = 5;

/// Framework-neutral navigation keys for a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Up,
    Down,
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    Commit,
}

/// Where a list's items come from right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSource<T> {
    /// Nothing requested yet
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(FetchError),
}

/// What a list pane should draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListWindow<T> {
    Loading,
    Failed(FetchError),
    Empty(String),
    Rows {
        rows: Vec<T>,
        highlighted: usize,
        page: usize,
        page_count: usize,
        total: usize,
    },
}

impl<T> ListWindow<T> {
    /// Convert row items, keeping the pagination data
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListWindow<U> {
        match self {
            ListWindow::Loading => ListWindow::Loading,
            ListWindow::Failed(e) => ListWindow::Failed(e),
            ListWindow::Empty(msg) => ListWindow::Empty(msg),
            ListWindow::Rows {
                rows,
                highlighted,
                page,
                page_count,
                total,
            } => ListWindow::Rows {
                rows: rows.into_iter().map(f).collect(),
                highlighted,
                page,
                page_count,
                total,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct ListModel<T> {
    cursor: Cursor,
    source: ListSource<T>,
    idle_message: String,
    empty_message: String,
}

/// Saved list state, see [`ListController::snapshot`]
#[derive(Debug, Clone)]
pub struct ListSnapshot<T>(ListModel<T>);

/// Cursor plus data source for one list pane
#[derive(Debug)]
pub struct ListController<T> {
    model: Arc<Mutex<ListModel<T>>>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
        }
    }
}

impl<T: Clone + PartialEq> ListController<T> {
    pub fn new(idle_message: impl Into<String>, empty_message: impl Into<String>) -> Self {
        Self {
            model: Arc::new(Mutex::new(ListModel {
                cursor: Cursor::default(),
                source: ListSource::Idle,
                idle_message: idle_message.into(),
                empty_message: empty_message.into(),
            })),
        }
    }

    pub fn source(&self) -> ListSource<T> {
        self.model.lock().source.clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.model.lock().cursor
    }

    /// Copy of the cursor and source, for putting back after a failed command
    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot(self.model.lock().clone())
    }

    pub fn restore(&self, snapshot: ListSnapshot<T>) {
        *self.model.lock() = snapshot.0;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.model.lock().source, ListSource::Ready(_))
    }

    /// Number of loaded items, if loaded
    pub fn item_count(&self) -> Option<usize> {
        match &self.model.lock().source {
            ListSource::Ready(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn set_idle(&self) {
        let mut model = self.model.lock();
        model.source = ListSource::Idle;
        model.cursor.reset(0);
    }

    pub fn set_loading(&self) {
        let mut model = self.model.lock();
        model.source = ListSource::Loading;
        model.cursor.reset(0);
    }

    pub fn set_failed(&self, error: FetchError) {
        let mut model = self.model.lock();
        model.source = ListSource::Failed(error);
        model.cursor.reset(0);
    }

    /// Replace the backing items. Different content moves the cursor back
    /// to the top; identical content keeps the position.
    pub fn set_items(&self, items: Vec<T>) {
        let mut model = self.model.lock();
        let unchanged = matches!(&model.source, ListSource::Ready(old) if *old == items);
        if !unchanged {
            model.cursor.first_page();
        }
        model.cursor.reset(items.len());
        model.source = ListSource::Ready(items);
    }

    pub fn set_empty_message(&self, message: impl Into<String>) {
        self.model.lock().empty_message = message.into();
    }

    /// Compute the page window for a list drawn `viewport_height` rows tall
    pub fn render(&self, viewport_height: usize) -> ListWindow<T> {
        let mut model = self.model.lock();
        model
            .cursor
            .set_page_size(viewport_height.saturating_sub(CHROME_ROWS));

        let count = match &model.source {
            ListSource::Ready(items) => items.len(),
            _ => 0,
        };
        if model.cursor.total_count() != count {
            model.cursor.reset(count);
        }

        match &model.source {
            ListSource::Idle => ListWindow::Empty(model.idle_message.clone()),
            ListSource::Loading => ListWindow::Loading,
            ListSource::Failed(e) => ListWindow::Failed(e.clone()),
            ListSource::Ready(items) if items.is_empty() => {
                ListWindow::Empty(model.empty_message.clone())
            }
            ListSource::Ready(items) => {
                let (start, end) = model.cursor.visible_range();
                ListWindow::Rows {
                    rows: items[start..end].to_vec(),
                    highlighted: model.cursor.row(),
                    page: model.cursor.page(),
                    page_count: model.cursor.max_page(),
                    total: items.len(),
                }
            }
        }
    }

    /// Item under the cursor
    pub fn highlighted(&self) -> Option<T> {
        let model = self.model.lock();
        match &model.source {
            ListSource::Ready(items) => model.cursor.index().and_then(|i| items.get(i).cloned()),
            _ => None,
        }
    }

    /// Apply a navigation key. `Commit` returns the highlighted item for the
    /// caller to push into the graph; the list lock is released by then.
    pub fn handle_key(&self, key: ListKey) -> Option<T> {
        {
            let mut model = self.model.lock();
            let cursor = &mut model.cursor;
            match key {
                ListKey::Up => cursor.previous_row(),
                ListKey::Down => cursor.next_row(),
                ListKey::PreviousPage => cursor.previous_page(),
                ListKey::NextPage => cursor.next_page(),
                ListKey::FirstPage => cursor.first_page(),
                ListKey::LastPage => cursor.last_page(),
                ListKey::Commit => {}
            }
        }
        if key == ListKey::Commit {
            self.highlighted()
        } else {
            None
        }
    }
}

impl ListController<String> {
    /// Repositories list bound to the filter results.
    ///
    /// Once the first fetch has landed, every change to the filter results or
    /// the fetched names re-populates the list. While loading or failed, the
    /// list keeps showing that state.
    pub fn repositories(graph: &StateGraph) -> Self {
        let list = Self::new("Loading repositories", "Registry has no repositories");

        let target = list.clone();
        let g = graph.clone();
        graph.search_results.subscribe(move |_: &FilterOutcome| {
            if target.is_ready() {
                target.populate_repositories(&g);
            }
            Ok(())
        });

        let target = list.clone();
        let g = graph.clone();
        graph.repository_names.subscribe(move |_: &Vec<String>| {
            if target.is_ready() {
                target.populate_repositories(&g);
            }
            Ok(())
        });

        list
    }

    /// Fill from the graph's current names and filter results
    pub fn populate_repositories(&self, graph: &StateGraph) {
        let message = match graph.search_results.get() {
            FilterOutcome::NoMatches => {
                format!("No repositories match '{}'", graph.search_query.get().trim())
            }
            _ => "Registry has no repositories".to_string(),
        };
        self.set_empty_message(message);
        self.set_items(graph.visible_repositories());
    }
}

impl ListController<TagRecord> {
    /// Tags list bound to the repository selection.
    ///
    /// Selecting a repository starts a tags fetch under a fresh ticket;
    /// clearing the selection invalidates any fetch still in flight.
    pub fn tags(graph: &StateGraph, tracker: &FetchTracker, actions: &ActionQueue) -> Self {
        let list = Self::new("Select a repository to list its tags", "Repository has no tags");

        let target = list.clone();
        let tracker = tracker.clone();
        let actions = actions.clone();
        graph
            .selected_repository
            .subscribe(move |selected: &Option<String>| {
                match selected {
                    Some(repository) => {
                        let ticket = tracker.begin();
                        target.set_loading();
                        actions.push(Action::LoadTags {
                            ticket,
                            repository: repository.clone(),
                        });
                    }
                    None => {
                        tracker.invalidate();
                        target.set_idle();
                    }
                }
                Ok(())
            });

        list
    }
}
