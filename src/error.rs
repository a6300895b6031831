use thiserror::Error;

#[derive(Error, Debug)]
pub enum LyricSwitchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Not signed in (set LYRICSWITCH_USER or [auth] user in the config)")]
    Unauthenticated,
}

pub type Result<T> = std::result::Result<T, LyricSwitchError>;

/// Outcome of a single failed fetch against an external source.
///
/// Kept separate from [`LyricSwitchError`] because these never escape a
/// search: the coordinator folds them into session state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The source answered but has nothing for this query.
    #[error("not found")]
    NotFound,

    /// Non-2xx status or a body that could not be understood.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// No HTTP response at all (DNS, connect, TLS, reset).
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Upstream(format!("malformed response: {}", e))
        } else if let Some(status) = e.status() {
            FetchError::Upstream(format!("HTTP {}", status))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}
