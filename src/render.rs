use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::session::{SearchOutcome, SearchSession, SearchState};

pub const LOADING_TITLE: &str = "Building your track...";
pub const LOADING_DETAIL: &str = "Fetching lyrics, video, and translating...";

/// Machine-readable view of a session
#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub session_id: Uuid,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'a SearchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Render the session as terminal text
pub fn render_session(session: &SearchSession) -> String {
    match session.state() {
        SearchState::Idle => "Enter an artist and a song to translate.\n".to_string(),
        SearchState::Loading(_) => format!("{}\n{}\n", LOADING_TITLE, LOADING_DETAIL),
        SearchState::Ready(outcome) => render_outcome(outcome),
        SearchState::Errored(reason) => format!("Error: {}\n", reason.user_message()),
    }
}

fn render_outcome(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let query = &outcome.query;

    out.push_str(&format!("{} - {}\n", query.title(), query.artist()));
    if let Some(url) = outcome.video.embed_url() {
        out.push_str(&format!("Video: {}\n", url));
    }

    push_section(&mut out, "Original Lyrics", outcome.lyrics.text.as_deref(), "No original lyrics loaded.");
    push_section(
        &mut out,
        &format!("Translated ({})", query.language()),
        outcome.translation.text.as_deref(),
        "No translation loaded.",
    );

    out
}

fn push_section(out: &mut String, heading: &str, body: Option<&str>, fallback: &str) {
    out.push('\n');
    out.push_str(&format!("== {} ==\n", heading));
    let body = body.map(str::trim_end).filter(|b| !b.is_empty()).unwrap_or(fallback);
    out.push_str(body);
    out.push('\n');
}

/// Render the session as pretty JSON
pub fn render_json(session: &SearchSession) -> Result<String> {
    let report = SessionReport {
        session_id: session.id(),
        state: session.state().name(),
        outcome: session.outcome(),
        error: session.error_message(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::language::Language;
    use crate::session::{
        FailureReason, LyricsResult, NO_TRANSLATION_MESSAGE, TranslationResult, VideoResult,
        SEARCH_FAILED_MESSAGE,
    };

    fn ready_session(outcome_video: VideoResult, lyrics: LyricsResult, translation: TranslationResult) -> SearchSession {
        let mut session = SearchSession::new(Language::Spanish);
        session.set_artist("Coldplay").unwrap();
        session.set_title("Yellow").unwrap();
        let query = session.submit().unwrap();
        session
            .complete(Ok(SearchOutcome {
                query,
                lyrics,
                translation,
                video: outcome_video,
                completed_at: Utc::now(),
                elapsed_ms: 10,
            }))
            .unwrap();
        session
    }

    #[test]
    fn test_render_ready_with_video() {
        let session = ready_session(
            VideoResult::found("yKNxeF4KMsY"),
            LyricsResult::found("Look at the stars\n"),
            TranslationResult::succeeded("Mira las estrellas"),
        );
        let text = render_session(&session);

        assert!(text.starts_with("Yellow - Coldplay\nVideo: https://www.youtube.com/embed/yKNxeF4KMsY\n"));
        assert!(text.contains("== Original Lyrics ==\nLook at the stars\n"));
        assert!(text.contains("== Translated (es) ==\nMira las estrellas\n"));
    }

    #[test]
    fn test_render_partial_without_video() {
        let session = ready_session(
            VideoResult::not_found(),
            LyricsResult::not_found(),
            TranslationResult::failed(NO_TRANSLATION_MESSAGE),
        );
        let text = render_session(&session);

        assert!(!text.contains("Video:"));
        assert!(text.contains("No lyrics found for this song."));
        assert!(text.contains(NO_TRANSLATION_MESSAGE));
    }

    #[test]
    fn test_render_blank_text_uses_fallback() {
        let session = ready_session(
            VideoResult::not_found(),
            LyricsResult { text: None, found: false },
            TranslationResult { text: Some("  ".to_string()), succeeded: false },
        );
        let text = render_session(&session);
        assert!(text.contains("No original lyrics loaded."));
        assert!(text.contains("No translation loaded."));
    }

    #[test]
    fn test_render_other_states() {
        let mut session = SearchSession::new(Language::Japanese);
        assert!(render_session(&session).starts_with("Enter an artist"));

        session.set_artist("a").unwrap();
        session.set_title("b").unwrap();
        session.submit().unwrap();
        assert!(render_session(&session).starts_with(LOADING_TITLE));

        session.complete(Err(FailureReason::LyricsUnreachable("dns".to_string()))).unwrap();
        assert_eq!(render_session(&session), format!("Error: {}\n", SEARCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_render_json() {
        let session = ready_session(
            VideoResult::found("abc"),
            LyricsResult::found("hello"),
            TranslationResult::succeeded("hola"),
        );
        let json: serde_json::Value = serde_json::from_str(&render_json(&session).unwrap()).unwrap();
        assert_eq!(json["state"], "ready");
        assert_eq!(json["outcome"]["video"]["video_id"], "abc");
        assert_eq!(json["outcome"]["query"]["language"], "es");
        assert!(json.get("error").is_none());
    }
}
