use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::config::{Config, TranslationBackend};
use crate::coordinator::{AuthContext, RequestCoordinator};
use crate::error::{LyricSwitchError, Result};
use crate::language::Language;
use crate::render::{LOADING_DETAIL, LOADING_TITLE, render_json, render_session};
use crate::session::SearchSession;
use crate::translate::ollama::check_ollama_availability;

/// How a finished session is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct Workflow {
    config: Config,
    coordinator: RequestCoordinator,
    auth: AuthContext,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let coordinator = RequestCoordinator::from_config(&config)?;
        let auth = match config.auth.user.as_deref() {
            Some(user) => AuthContext::signed_in(user),
            None => AuthContext::anonymous(),
        };

        Ok(Self::with_parts(config, coordinator, auth))
    }

    pub fn with_parts(config: Config, coordinator: RequestCoordinator, auth: AuthContext) -> Self {
        Self {
            config,
            coordinator,
            auth,
        }
    }

    /// Run a single search and return its rendered result
    pub async fn search_once(
        &self,
        artist: &str,
        title: &str,
        language: Option<Language>,
        format: OutputFormat,
    ) -> Result<String> {
        let mut session = SearchSession::new(language.unwrap_or(self.config.search.default_language));
        session.set_artist(artist)?;
        session.set_title(title)?;

        if !session.can_submit() {
            return Err(LyricSwitchError::InvalidQuery("artist and title are required".to_string()));
        }

        let spinner = loading_spinner();
        let result = self.coordinator.start_search(&self.auth, &mut session).await;
        spinner.finish_and_clear();
        result?;

        match format {
            OutputFormat::Text => Ok(render_session(&session)),
            OutputFormat::Json => render_json(&session),
        }
    }

    /// Prompt-driven loop: fill the form, search, show results, reset.
    /// Ends on EOF or when `q` is entered at a prompt.
    pub async fn run_interactive<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if !self.auth.is_authenticated() {
            return Err(LyricSwitchError::Unauthenticated);
        }

        let mut lines = input.lines();
        let mut session = SearchSession::new(self.config.search.default_language);

        output.write_all(b"LyricSwitch - enter q at any prompt to quit\n").await?;

        loop {
            let Some(artist) = prompt(&mut lines, &mut output, "Artist name: ").await? else {
                break;
            };
            let Some(title) = prompt(&mut lines, &mut output, "Song name: ").await? else {
                break;
            };
            let language_prompt = format!("Translate to [{}]: ", session.language());
            let Some(language) = prompt(&mut lines, &mut output, &language_prompt).await? else {
                break;
            };

            if !language.is_empty() {
                match language.parse::<Language>() {
                    Ok(lang) => session.set_language(lang)?,
                    Err(e) => {
                        output.write_all(format!("{}\n", e).as_bytes()).await?;
                        continue;
                    }
                }
            }

            session.set_artist(artist)?;
            session.set_title(title)?;
            if !session.can_submit() {
                output.write_all(b"Artist and song name are required.\n").await?;
                continue;
            }

            output.write_all(format!("{}\n", LOADING_TITLE).as_bytes()).await?;
            let spinner = loading_spinner();
            let result = self.coordinator.start_search(&self.auth, &mut session).await;
            spinner.finish_and_clear();
            result?;

            output.write_all(render_session(&session).as_bytes()).await?;

            let next = prompt(&mut lines, &mut output, "\nPress Enter for a new search: ").await?;
            session.reset()?;
            if next.is_none() {
                break;
            }
        }

        output.flush().await?;
        info!("Interactive session finished");
        Ok(())
    }

    /// Check configuration and reachable backends; returns human-readable findings
    pub async fn check(&self) -> Vec<String> {
        let mut findings = Vec::new();

        if !self.auth.is_authenticated() {
            findings.push("No signed-in user: set LYRICSWITCH_USER or [auth] user".to_string());
        }
        if self.config.video.api_key.is_none() {
            findings.push("No YouTube API key: videos will not be looked up".to_string());
        }

        match self.config.translate.backend {
            TranslationBackend::Chat => {
                if self.config.translate.api_key.is_none() {
                    findings.push("No translation API key: set GITHUB_TOKEN or OPENAI_API_KEY".to_string());
                }
            }
            TranslationBackend::Ollama => {
                if let Err(e) =
                    check_ollama_availability(&self.config.translate.endpoint, &self.config.translate.model).await
                {
                    warn!("{}", e);
                    findings.push(e.to_string());
                }
            }
        }

        findings
    }
}

/// Write `label`, read one line. `None` on EOF or a quit command.
async fn prompt<R, W>(lines: &mut tokio::io::Lines<R>, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(label.as_bytes()).await?;
    output.flush().await?;

    match lines.next_line().await? {
        Some(line) => {
            let line = line.trim().to_string();
            if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                Ok(None)
            } else {
                Ok(Some(line))
            }
        }
        None => Ok(None),
    }
}

fn loading_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(LOADING_DETAIL);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
