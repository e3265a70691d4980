//! In-memory catalog client

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use acr_browser::{CatalogClient, FetchError, TagRecord};

/// Catalog backed by fixed data, counting the requests it serves
#[derive(Default)]
pub struct FakeCatalog {
    repositories: Option<Result<Vec<String>, FetchError>>,
    tags: HashMap<String, Result<Vec<TagRecord>, FetchError>>,
    repository_calls: AtomicUsize,
    tag_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repositories(mut self, names: &[&str]) -> Self {
        self.repositories = Some(Ok(names.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn failing_repositories(mut self, error: FetchError) -> Self {
        self.repositories = Some(Err(error));
        self
    }

    pub fn with_tags(mut self, repository: &str, tags: Vec<TagRecord>) -> Self {
        self.tags.insert(repository.to_string(), Ok(tags));
        self
    }

    pub fn failing_tags(mut self, repository: &str, error: FetchError) -> Self {
        self.tags.insert(repository.to_string(), Err(error));
        self
    }

    pub fn repository_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
    }

    pub fn tag_calls(&self) -> usize {
        self.tag_calls.load(Ordering::SeqCst)
    }
}

impl CatalogClient for FakeCatalog {
    async fn list_repositories(&self) -> Result<Vec<String>, FetchError> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        self.repositories.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<TagRecord>, FetchError> {
        self.tag_calls.fetch_add(1, Ordering::SeqCst);
        self.tags
            .get(repository)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::NotFound(repository.to_string())))
    }
}
