//! Aggregation of one search: lyrics (then translation) and the video lookup
//! run as two independent branches that only meet when the outcome is built.

use chrono::Utc;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{FetchError, LyricSwitchError, Result};
use crate::lyrics::{LyricsSource, LyricsSourceFactory};
use crate::session::{
    FailureReason, LyricsResult, NO_TRANSLATION_MESSAGE, Query, SearchCompletion, SearchOutcome,
    SearchSession, TranslationResult, VideoResult,
};
use crate::translate::TranslationInvoker;
use crate::video::{VideoLookup, VideoLookupFactory};

/// Who a search runs for. Built once by the caller and handed in
/// explicitly; nothing below the coordinator looks the user up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user: Option<String>,
}

impl AuthContext {
    pub fn signed_in(user: impl Into<String>) -> Self {
        let user = user.into();
        let user = Some(user.trim().to_string()).filter(|u| !u.is_empty());
        Self { user }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

pub struct RequestCoordinator {
    lyrics: Box<dyn LyricsSource>,
    video: Box<dyn VideoLookup>,
    translator: TranslationInvoker,
    fetch_timeout: Duration,
}

impl RequestCoordinator {
    pub fn new(
        lyrics: Box<dyn LyricsSource>,
        video: Box<dyn VideoLookup>,
        translator: TranslationInvoker,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            lyrics,
            video,
            translator,
            fetch_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LyricsSourceFactory::create_source(config.lyrics.clone())?,
            VideoLookupFactory::create_lookup(config.video.clone())?,
            TranslationInvoker::from_config(config.translate.clone())?,
            Duration::from_millis(config.search.fetch_timeout_ms),
        ))
    }

    /// Submit the session's form and drive it to `Ready` or `Errored`
    pub async fn start_search(&self, auth: &AuthContext, session: &mut SearchSession) -> Result<()> {
        let Some(user) = auth.user() else {
            return Err(LyricSwitchError::Unauthenticated);
        };

        let query = session.submit()?;
        info!(
            "User {} searching \"{}\" by {} -> {}",
            user,
            query.title(),
            query.artist(),
            query.language()
        );

        let completion = self.resolve(&query).await;
        session.complete(completion)
    }

    /// Run both branches under one shared fetch deadline and join them.
    ///
    /// The lyrics branch translates as soon as lyrics arrive; it never waits
    /// for the video branch. If either fetch misses the deadline the other
    /// branch is dropped and the search fails as a whole.
    pub async fn resolve(&self, query: &Query) -> SearchCompletion {
        let started = Instant::now();
        let deadline = started + self.fetch_timeout;

        let lyrics_branch = async {
            let fetched = match timeout_at(deadline, self.lyrics.fetch_lyrics(query.artist(), query.title())).await {
                Ok(fetched) => fetched,
                Err(_) => {
                    warn!("Lyrics fetch exceeded {:?}", self.fetch_timeout);
                    return Err(FailureReason::TimedOut);
                }
            };

            match fetched {
                Ok(text) => {
                    let translation = self.translator.translate(&text, query.language()).await;
                    Ok((LyricsResult::found(text), translation))
                }
                Err(FetchError::NotFound) => {
                    info!("No lyrics found for {} - {}", query.artist(), query.title());
                    Ok(lyrics_missing())
                }
                Err(FetchError::Upstream(reason)) => {
                    warn!("Lyrics source failed: {}", reason);
                    Ok(lyrics_missing())
                }
                Err(FetchError::Transport(reason)) => {
                    warn!("Lyrics source unreachable: {}", reason);
                    Err(FailureReason::LyricsUnreachable(reason))
                }
            }
        };

        let video_branch = async {
            let terms = query.video_search_terms();
            match timeout_at(deadline, self.video.find_video(&terms)).await {
                Err(_) => {
                    warn!("Video lookup exceeded {:?}", self.fetch_timeout);
                    Err(FailureReason::TimedOut)
                }
                Ok(Ok(video_id)) => Ok(VideoResult::found(video_id)),
                Ok(Err(FetchError::NotFound)) => {
                    debug!("No video found for: {}", terms);
                    Ok(VideoResult::not_found())
                }
                Ok(Err(e)) => {
                    warn!("Video lookup failed: {}", e);
                    Ok(VideoResult::not_found())
                }
            }
        };

        let ((lyrics, translation), video) = tokio::try_join!(lyrics_branch, video_branch)?;

        Ok(SearchOutcome {
            query: query.clone(),
            lyrics,
            translation,
            video,
            completed_at: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

fn lyrics_missing() -> (LyricsResult, TranslationResult) {
    (LyricsResult::not_found(), TranslationResult::failed(NO_TRANSLATION_MESSAGE))
}
