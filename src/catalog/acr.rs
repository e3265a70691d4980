//! Azure Container Registry REST client.
//!
//! Uses the registry's `acr/v1` listing endpoints. Both listings are paged by
//! the server; the client follows `Link: <...>; rel="next"` headers until the
//! last page.
//!
//! # Security Note
//!
//! Credentials go through reqwest's `bearer_auth`/`basic_auth`, which mark the
//! `Authorization` header sensitive so it is never printed, even with
//! `RUST_LOG=reqwest=debug`.

use std::time::Duration;

use jiff::Timestamp;
use reqwest::header;
use reqwest::{Client, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::{CatalogClient, TagRecord};
use crate::config::{Config, Credentials};
use crate::error::{BrowserError, FetchError, Result};

/// Items requested per page
const PAGE_SIZE: usize = 100;

/// Upper bound on followed `next` links, guards against a server that loops
const MAX_PAGES: usize = 1000;

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagsPage {
    #[serde(default)]
    tags: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagEntry {
    name: String,
    #[serde(default)]
    digest: String,
    created_time: String,
    #[serde(default)]
    last_update_time: Option<String>,
}

impl TagEntry {
    fn into_record(self) -> std::result::Result<TagRecord, FetchError> {
        let created_at = self.created_time.parse::<Timestamp>().map_err(|e| {
            FetchError::Network(format!(
                "tag '{}' has an invalid creation time '{}': {e}",
                self.name, self.created_time
            ))
        })?;

        // An unparseable update time only hides the "updated on" row
        let updated_at = self.last_update_time.as_deref().and_then(|raw| {
            raw.parse::<Timestamp>()
                .inspect_err(|e| tracing::warn!("tag '{}': bad update time '{raw}': {e}", self.name))
                .ok()
        });

        Ok(TagRecord {
            name: self.name,
            digest: self.digest,
            created_at,
            updated_at,
        })
    }
}

/// Catalog client for one registry
pub struct AcrClient {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl AcrClient {
    /// Create a client from configuration
    ///
    /// Configures HTTP client with 30s connect timeout and 60s total timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.endpoint())
            .map_err(|e| BrowserError::Config(format!("invalid registry endpoint: {e}")))?;
        Self::new(base_url, config.credentials())
    }

    pub fn new(base_url: Url, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET every page starting at `path`, decoding each with `T`
    async fn get_all_pages<T, I>(
        &self,
        path: &str,
        mut extract: impl FnMut(T) -> Vec<I>,
    ) -> std::result::Result<Vec<I>, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| FetchError::Network(format!("invalid request path '{path}': {e}")))?;
        url.query_pairs_mut().append_pair("n", &PAGE_SIZE.to_string());

        let mut items = Vec::new();
        for _ in 0..MAX_PAGES {
            let request = match &self.credentials {
                Credentials::Bearer(token) => {
                    self.client.get(url.clone()).bearer_auth(token.expose_secret())
                }
                Credentials::Basic { username, password } => self
                    .client
                    .get(url.clone())
                    .basic_auth(username, Some(password.expose_secret())),
                Credentials::Anonymous => self.client.get(url.clone()),
            };

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(status_error(status, url.path()));
            }

            let next = response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_next_link);

            let page: T = response.json().await?;
            items.extend(extract(page));

            match next {
                Some(link) => {
                    url = self.base_url.join(&link).map_err(|e| {
                        FetchError::Network(format!("invalid next link '{link}': {e}"))
                    })?;
                }
                None => return Ok(items),
            }
        }

        tracing::warn!("stopped following {path} after {MAX_PAGES} pages");
        Ok(items)
    }
}

impl CatalogClient for AcrClient {
    async fn list_repositories(&self) -> std::result::Result<Vec<String>, FetchError> {
        let names = self
            .get_all_pages("/acr/v1/_catalog", |page: CatalogPage| page.repositories)
            .await?;
        tracing::debug!("fetched {} repositories", names.len());
        Ok(names)
    }

    async fn list_tags(&self, repository: &str) -> std::result::Result<Vec<TagRecord>, FetchError> {
        let path = format!("/acr/v1/{repository}/_tags");
        let entries = self
            .get_all_pages(&path, |page: TagsPage| page.tags)
            .await?;
        let tags = entries
            .into_iter()
            .map(TagEntry::into_record)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        tracing::debug!("fetched {} tags for {repository}", tags.len());
        Ok(tags)
    }
}

/// Map a non-success status onto the fetch error taxonomy
fn status_error(status: StatusCode, path: &str) -> FetchError {
    let message = format!("HTTP {status} for {path}");
    match status.as_u16() {
        401 | 403 => FetchError::Auth(message),
        404 => FetchError::NotFound(message),
        _ => FetchError::Network(message),
    }
}

/// Extract the target of the `rel="next"` entry from a `Link` header
fn parse_next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
