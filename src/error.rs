use thiserror::Error;

/// Failure reported by the catalog client.
///
/// These are user-facing: the list that issued the fetch renders them as an
/// explicit error state instead of an empty list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl FetchError {
    /// Short label used in list error states and flash messages
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Auth(_) => "auth",
            FetchError::NotFound(_) => "not found",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => FetchError::Auth(err.to_string()),
            Some(404) => FetchError::NotFound(err.to_string()),
            _ => FetchError::Network(err.to_string()),
        }
    }
}

/// Programming error detected by the state engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("cycle detected: cell '{cell}' was set while its observers were running")]
    Cycle { cell: &'static str },
}

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid registry name '{0}': expected 3-24 letters, digits or dashes")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("pull failed: {0}")]
    Pull(String),

    #[error("TUI error: {0}")]
    Tui(String),
}

pub type Result<T> = std::result::Result<T, BrowserError>;
