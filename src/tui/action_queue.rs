//! Queue of side effects requested by the browser model
//!
//! The model never performs I/O itself. Commits, refreshes and pulls push an
//! [`Action`] here; the view drains the queue after each event and hands
//! every action to an async handler.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{CatalogClient, TagRecord};
use crate::error::{BrowserError, FetchError};
use crate::pull::{PullRequest, pull_image};

use super::fetch::FetchTicket;

/// Work to be done outside the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadRepositories(FetchTicket),
    LoadTags {
        ticket: FetchTicket,
        repository: String,
    },
    Pull(PullRequest),
}

/// Result of running an [`Action`], handed back to the browser
#[derive(Debug)]
pub enum Completion {
    Repositories {
        ticket: FetchTicket,
        result: Result<Vec<String>, FetchError>,
    },
    Tags {
        ticket: FetchTicket,
        repository: String,
        result: Result<Vec<TagRecord>, FetchError>,
    },
    Pull(Result<String, BrowserError>),
}

impl Action {
    /// Run the action against `client`
    pub async fn perform<C: CatalogClient>(self, client: &C) -> Completion {
        match self {
            Action::LoadRepositories(ticket) => Completion::Repositories {
                ticket,
                result: client.list_repositories().await,
            },
            Action::LoadTags { ticket, repository } => {
                let result = client.list_tags(&repository).await;
                Completion::Tags {
                    ticket,
                    repository,
                    result,
                }
            }
            Action::Pull(request) => Completion::Pull(pull_image(&request).await),
        }
    }
}

/// Shared FIFO of pending actions
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: Arc<Mutex<Vec<Action>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: Action) {
        self.pending.lock().push(action);
    }

    /// Take every pending action, oldest first
    pub fn drain(&self) -> Vec<Action> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Drop everything queued after the first `len` actions
    pub fn truncate(&self, len: usize) {
        self.pending.lock().truncate(len);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::fetch::FetchTracker;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let tracker = FetchTracker::new();
        let queue = ActionQueue::new();
        let first = tracker.begin();
        queue.push(Action::LoadRepositories(first));
        queue.push(Action::Pull(PullRequest::new("contoso", "web", "v1")));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained[0], Action::LoadRepositories(first));
        assert!(matches!(drained[1], Action::Pull(_)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_truncate_drops_newest() {
        let tracker = FetchTracker::new();
        let queue = ActionQueue::new();
        let first = tracker.begin();
        queue.push(Action::LoadRepositories(first));
        queue.push(Action::LoadRepositories(tracker.begin()));

        queue.truncate(1);
        assert_eq!(queue.drain(), vec![Action::LoadRepositories(first)]);
    }
}
