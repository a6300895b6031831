//! Search session and its state machine.
//!
//! A session walks `Idle -> Loading -> {Ready, Errored} -> Idle`. All request
//! data lives inside the [`SearchState`] variant it belongs to, so leaving a
//! state drops its data with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LyricSwitchError, Result};
use crate::language::Language;

pub const NO_LYRICS_MESSAGE: &str = "No lyrics found for this song.";
pub const NO_TRANSLATION_MESSAGE: &str = "No translation found as no lyrics were found.";
pub const NOTHING_TO_TRANSLATE_MESSAGE: &str = "No lyrics to translate.";
pub const TIMED_OUT_MESSAGE: &str = "Lyrics unavailable please try a different song/artist.";
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred during the search. Please try again.";

/// A submitted search. Immutable once dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    artist: String,
    title: String,
    language: Language,
}

impl Query {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, language: Language) -> Result<Self> {
        let artist = artist.into().trim().to_string();
        let title = title.into().trim().to_string();

        if artist.is_empty() {
            return Err(LyricSwitchError::InvalidQuery("artist must not be empty".to_string()));
        }
        if title.is_empty() {
            return Err(LyricSwitchError::InvalidQuery("title must not be empty".to_string()));
        }

        Ok(Self { artist, title, language })
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Free-text query handed to the video search
    pub fn video_search_terms(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResult {
    pub text: Option<String>,
    pub found: bool,
}

impl LyricsResult {
    pub fn found(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), found: true }
    }

    /// Not found; carries the placeholder shown in place of lyrics
    pub fn not_found() -> Self {
        Self { text: Some(NO_LYRICS_MESSAGE.to_string()), found: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub video_id: Option<String>,
    pub found: bool,
}

impl VideoResult {
    pub fn found(video_id: impl Into<String>) -> Self {
        Self { video_id: Some(video_id.into()), found: true }
    }

    pub fn not_found() -> Self {
        Self { video_id: None, found: false }
    }

    pub fn embed_url(&self) -> Option<String> {
        self.video_id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/embed/{}", id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: Option<String>,
    pub succeeded: bool,
}

impl TranslationResult {
    pub fn succeeded(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), succeeded: true }
    }

    /// Failure with the fallback string shown instead of a translation
    pub fn failed(reason: impl Into<String>) -> Self {
        Self { text: Some(reason.into()), succeeded: false }
    }
}

/// Everything a successful (possibly partial) search produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: Query,
    pub lyrics: LyricsResult,
    pub translation: TranslationResult,
    pub video: VideoResult,
    pub completed_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SearchOutcome {
    /// True when some of lyrics, translation or video are missing
    pub fn is_partial(&self) -> bool {
        !(self.lyrics.found && self.translation.succeeded && self.video.found)
    }
}

/// Why a session ended in `Errored`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The shared fetch budget ran out before both sources answered
    TimedOut,
    /// The lyrics source could not be reached at all
    LyricsUnreachable(String),
}

impl FailureReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureReason::TimedOut => TIMED_OUT_MESSAGE,
            FailureReason::LyricsUnreachable(_) => SEARCH_FAILED_MESSAGE,
        }
    }
}

/// What the coordinator reports when a search finishes
pub type SearchCompletion = std::result::Result<SearchOutcome, FailureReason>;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading(Query),
    Ready(Box<SearchOutcome>),
    Errored(FailureReason),
}

impl SearchState {
    pub fn name(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading(_) => "loading",
            SearchState::Ready(_) => "ready",
            SearchState::Errored(_) => "errored",
        }
    }
}

/// One search-to-reset cycle: the draft form plus the request state.
#[derive(Debug)]
pub struct SearchSession {
    id: Uuid,
    artist: String,
    title: String,
    language: Language,
    state: SearchState,
}

impl SearchSession {
    pub fn new(language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            artist: String::new(),
            title: String::new(),
            language,
            state: SearchState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.artist = artist.into();
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.title = title.into();
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.ensure_editable()?;
        self.language = language;
        Ok(())
    }

    /// Whether the submit control would be enabled
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SearchState::Idle)
            && !self.artist.trim().is_empty()
            && !self.title.trim().is_empty()
    }

    /// Idle -> Loading. Returns the query to dispatch.
    pub fn submit(&mut self) -> Result<Query> {
        if !matches!(self.state, SearchState::Idle) {
            return Err(self.invalid("submit"));
        }

        let query = Query::new(self.artist.as_str(), self.title.as_str(), self.language)?;
        info!(session = %self.id, artist = query.artist(), title = query.title(), language = %query.language(), "Search submitted");
        self.state = SearchState::Loading(query.clone());
        Ok(query)
    }

    /// Loading -> Ready | Errored
    pub fn complete(&mut self, completion: SearchCompletion) -> Result<()> {
        if !matches!(self.state, SearchState::Loading(_)) {
            return Err(self.invalid("complete"));
        }

        self.state = match completion {
            Ok(outcome) => {
                info!(session = %self.id, partial = outcome.is_partial(), "Search ready");
                SearchState::Ready(Box::new(outcome))
            }
            Err(reason) => {
                info!(session = %self.id, ?reason, "Search failed");
                SearchState::Errored(reason)
            }
        };
        Ok(())
    }

    /// (Ready | Errored) -> Idle, clearing the form and all results.
    /// A no-op while already idle.
    pub fn reset(&mut self) -> Result<()> {
        match self.state {
            SearchState::Idle => Ok(()),
            SearchState::Loading(_) => Err(self.invalid("reset")),
            SearchState::Ready(_) | SearchState::Errored(_) => {
                debug!(session = %self.id, "Session reset");
                self.artist.clear();
                self.title.clear();
                self.state = SearchState::Idle;
                self.id = Uuid::new_v4();
                Ok(())
            }
        }
    }

    pub fn query(&self) -> Option<&Query> {
        match &self.state {
            SearchState::Loading(query) => Some(query),
            SearchState::Ready(outcome) => Some(&outcome.query),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match &self.state {
            SearchState::Ready(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn lyrics(&self) -> Option<&LyricsResult> {
        self.outcome().map(|o| &o.lyrics)
    }

    pub fn translation(&self) -> Option<&TranslationResult> {
        self.outcome().map(|o| &o.translation)
    }

    pub fn video(&self) -> Option<&VideoResult> {
        self.outcome().map(|o| &o.video)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            SearchState::Errored(reason) => Some(reason.user_message()),
            _ => None,
        }
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.state {
            SearchState::Idle => Ok(()),
            _ => Err(self.invalid("edit")),
        }
    }

    fn invalid(&self, action: &str) -> LyricSwitchError {
        LyricSwitchError::InvalidTransition(format!("cannot {} while {}", action, self.state.name()))
    }
}
