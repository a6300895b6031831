use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LyricsConfig;
use crate::error::{FetchError, LyricSwitchError, Result};
use super::{LyricsSource, normalize_line_endings};

/// Body returned by `GET /v1/{artist}/{title}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsOvhResponse {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Client for the lyrics.ovh API
pub struct LyricsOvhClient {
    client: Client,
    base_url: Url,
}

impl LyricsOvhClient {
    pub fn new(config: LyricsConfig) -> Result<Self> {
        let base_url = Url::parse(config.endpoint.trim_end_matches('/'))
            .map_err(|e| LyricSwitchError::Config(format!("Invalid lyrics endpoint: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(LyricSwitchError::Config(format!(
                "Lyrics endpoint cannot be used as a base URL: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("lyricswitch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `{base}/{artist}/{title}` with both segments percent-encoded.
    ///
    /// `None` when a segment is `.` or `..`: URL parsing collapses those
    /// (even as `%2E`), so the request would hit a different path.
    pub fn lyrics_url(&self, artist: &str, title: &str) -> Option<Url> {
        if is_dot_segment(artist) || is_dot_segment(title) {
            return None;
        }

        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(artist).push(title);
        }
        Some(url)
    }
}

#[async_trait]
impl LyricsSource for LyricsOvhClient {
    async fn fetch_lyrics(&self, artist: &str, title: &str) -> std::result::Result<String, FetchError> {
        let Some(url) = self.lyrics_url(artist, title) else {
            debug!("No lyrics path for {:?} / {:?}", artist, title);
            return Err(FetchError::NotFound);
        };
        debug!("Fetching lyrics from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Upstream(format!("lyrics API returned {}", status)));
        }

        let body = response.text().await?;
        parse_lyrics_response(&body)
    }
}

/// Extract lyrics from a response body; blank lyrics count as not found
pub fn parse_lyrics_response(body: &str) -> std::result::Result<String, FetchError> {
    let parsed: LyricsOvhResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Upstream(format!("malformed lyrics response: {}", e)))?;

    match parsed.lyrics {
        Some(lyrics) if !lyrics.trim().is_empty() => Ok(normalize_line_endings(&lyrics)),
        _ => {
            if let Some(error) = parsed.error {
                debug!("Lyrics API reported: {}", error);
            }
            Err(FetchError::NotFound)
        }
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}
