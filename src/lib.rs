pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod pull;
pub mod tui;

#[cfg(test)]
pub mod test_guards;

pub use catalog::{AcrClient, CatalogClient, TagRecord};
pub use config::{Config, Credentials};
pub use error::{BrowserError, FetchError, InvariantViolation, Result};
pub use pull::PullRequest;
