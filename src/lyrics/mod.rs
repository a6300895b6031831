// Lyrics sources
//
// A source answers "lyrics for artist + title" and nothing else. Absence is a
// normal outcome (FetchError::NotFound), not a failure.

pub mod lyrics_ovh;

use async_trait::async_trait;

use crate::config::LyricsConfig;
use crate::error::{FetchError, Result};

/// Lookup of plain-text lyrics by artist and title
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Fetch lyrics; the returned text uses `\n` line endings
    async fn fetch_lyrics(&self, artist: &str, title: &str) -> std::result::Result<String, FetchError>;
}

/// Factory for creating lyrics sources
pub struct LyricsSourceFactory;

impl LyricsSourceFactory {
    pub fn create_source(config: LyricsConfig) -> Result<Box<dyn LyricsSource>> {
        Ok(Box::new(lyrics_ovh::LyricsOvhClient::new(config)?))
    }
}

/// Convert CRLF and lone CR line endings to LF
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
