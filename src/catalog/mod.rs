//! Registry catalog access
//!
//! The browser talks to the registry through [`CatalogClient`], which lists
//! repository names and the tags of one repository. [`acr::AcrClient`] is the
//! REST implementation used by the binary.

pub mod acr;

use jiff::Timestamp;

use crate::error::FetchError;

pub use acr::AcrClient;

/// Display format for tag timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata of one tag in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub name: String,
    pub digest: String,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl TagRecord {
    pub fn new(name: impl Into<String>, digest: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            name: name.into(),
            digest: digest.into(),
            created_at,
            updated_at: None,
        }
    }

    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

/// Format a timestamp in UTC for the properties pane
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.strftime(TIMESTAMP_FORMAT).to_string()
}

/// Read access to a registry's repositories and tags
pub trait CatalogClient: Send + Sync {
    /// List every repository name in the registry
    fn list_repositories(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FetchError>> + Send;

    /// List the tags of one repository
    fn list_tags(
        &self,
        repository: &str,
    ) -> impl std::future::Future<Output = Result<Vec<TagRecord>, FetchError>> + Send;
}
