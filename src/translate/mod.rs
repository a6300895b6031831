// Translation backends
//
// Backends are picked by the configured dialect through a factory:
// - Chat: OpenAI-compatible chat completions (GitHub Models by default)
// - Ollama: local `/api/generate`
//
// TranslationInvoker wraps a backend and never fails: every problem becomes a
// TranslationResult carrying a fallback string.

pub mod common;
pub mod chat;
pub mod ollama;

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

pub use common::*;
use crate::config::{TranslateConfig, TranslationBackend};
use crate::error::{FetchError, Result};
use crate::language::Language;
use crate::session::{NOTHING_TO_TRANSLATE_MESSAGE, TranslationResult};

pub const CONNECTION_FAILED_MESSAGE: &str = "An error occurred while connecting to the translation service.";
pub const BACKEND_FAILED_MESSAGE: &str = "Failed to translate lyrics.";
pub const EMPTY_TRANSLATION_MESSAGE: &str = "No translation available or an error occurred.";

/// One call to a hosted translation capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_text(&self, text: &str, language: Language) -> std::result::Result<String, FetchError>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        match config.backend {
            TranslationBackend::Chat => Ok(Box::new(chat::ChatTranslator::new(config)?)),
            TranslationBackend::Ollama => Ok(Box::new(ollama::OllamaTranslator::new(config)?)),
        }
    }
}

/// Translates fetched lyrics, turning every failure into a fallback string
pub struct TranslationInvoker {
    translator: Box<dyn Translator>,
    max_retries: u32,
    retry_delay: Duration,
}

impl TranslationInvoker {
    pub fn new(translator: Box<dyn Translator>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            translator,
            max_retries,
            retry_delay,
        }
    }

    pub fn from_config(config: TranslateConfig) -> Result<Self> {
        let max_retries = config.max_retries;
        let retry_delay = Duration::from_millis(config.retry_delay_ms);
        let translator = TranslatorFactory::create_translator(config)?;
        Ok(Self::new(translator, max_retries, retry_delay))
    }

    /// Translate `text`; blank text short-circuits without calling the backend
    pub async fn translate(&self, text: &str, language: Language) -> TranslationResult {
        if text.trim().is_empty() {
            return TranslationResult::failed(NOTHING_TO_TRANSLATE_MESSAGE);
        }

        let attempts = self.max_retries + 1;
        let mut last_error = FetchError::NotFound;

        for attempt in 1..=attempts {
            match self.translator.translate_text(text, language).await {
                Ok(translation) => {
                    info!("Translated {} chars to {} (attempt {}/{})", text.len(), language, attempt, attempts);
                    return TranslationResult::succeeded(translation);
                }
                Err(e) => {
                    warn!("Translation attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = e;
                }
            }

            if attempt < attempts && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        TranslationResult::failed(fallback_message(&last_error))
    }
}

/// User-facing text for a failed translation
pub fn fallback_message(error: &FetchError) -> &'static str {
    match error {
        FetchError::Transport(_) => CONNECTION_FAILED_MESSAGE,
        FetchError::Upstream(_) => BACKEND_FAILED_MESSAGE,
        FetchError::NotFound => EMPTY_TRANSLATION_MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn invoker(mock: MockTranslator, max_retries: u32) -> TranslationInvoker {
        TranslationInvoker::new(Box::new(mock), max_retries, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_translate_success() {
        let mut mock = MockTranslator::new();
        mock.expect_translate_text()
            .with(eq("Look at the stars"), eq(Language::Spanish))
            .times(1)
            .returning(|_, _| Ok("Mira las estrellas".to_string()));

        let result = invoker(mock, 0).translate("Look at the stars", Language::Spanish).await;
        assert!(result.succeeded);
        assert_eq!(result.text.as_deref(), Some("Mira las estrellas"));
    }

    #[tokio::test]
    async fn test_blank_text_never_calls_backend() {
        let mut mock = MockTranslator::new();
        mock.expect_translate_text().never();

        let result = invoker(mock, 3).translate(" \n\t", Language::Spanish).await;
        assert!(!result.succeeded);
        assert_eq!(result.text.as_deref(), Some(NOTHING_TO_TRANSLATE_MESSAGE));
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let mut mock = MockTranslator::new();
        mock.expect_translate_text()
            .times(1)
            .returning(|_, _| Err(FetchError::Transport("connection refused".to_string())));

        let result = invoker(mock, 0).translate("hello", Language::Japanese).await;
        assert!(!result.succeeded);
        assert_eq!(result.text.as_deref(), Some(CONNECTION_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_bounded_retry_then_success() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockTranslator::new();
        mock.expect_translate_text()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(FetchError::Upstream("HTTP 503".to_string())));
        mock.expect_translate_text()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("olá".to_string()));

        let result = invoker(mock, 2).translate("hello", Language::Portuguese).await;
        assert!(result.succeeded);
        assert_eq!(result.text.as_deref(), Some("olá"));
    }

    #[tokio::test]
    async fn test_retries_exhausted_reports_last_error() {
        let mut mock = MockTranslator::new();
        mock.expect_translate_text()
            .times(3)
            .returning(|_, _| Err(FetchError::Upstream("HTTP 500".to_string())));

        let result = invoker(mock, 2).translate("hello", Language::English).await;
        assert!(!result.succeeded);
        assert_eq!(result.text.as_deref(), Some(BACKEND_FAILED_MESSAGE));
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(fallback_message(&FetchError::NotFound), EMPTY_TRANSLATION_MESSAGE);
        assert_eq!(fallback_message(&FetchError::Upstream(String::new())), BACKEND_FAILED_MESSAGE);
        assert_eq!(fallback_message(&FetchError::Transport(String::new())), CONNECTION_FAILED_MESSAGE);
    }

    #[test]
    fn test_factory_picks_backend() {
        let mut config = crate::config::Config::default().translate;
        assert!(TranslatorFactory::create_translator(config.clone()).is_ok());
        config.backend = TranslationBackend::Ollama;
        assert!(TranslatorFactory::create_translator(config).is_ok());
    }
}
