use std::time::Duration;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{FetchError, Result};
use crate::language::Language;

/// Shared HTTP plumbing and prompt handling for translation backends
pub struct BaseTranslator {
    pub client: Client,
    pub config: TranslateConfig,
}

impl BaseTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lyricswitch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// `{endpoint}/{path}` without doubled slashes
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Plain instruction used by the chat backend
    pub fn build_translation_prompt(&self, text: &str, language: Language) -> String {
        format!(
            "Translate the following text to {} ({}), dont return anything else: \n\n{}",
            language.name(),
            language.code(),
            text
        )
    }

    /// Instruction asking for a JSON object, used where the backend can
    /// enforce JSON output
    pub fn build_json_translation_prompt(&self, text: &str, language: Language) -> String {
        format!(
            "You are a professional translator of song lyrics.\n\
             \n\
             CRITICAL: You must translate the text to {name} ONLY. Do not translate to any other language.\n\
             The target language is: {name} (language code: {code})\n\
             Keep the line breaks of the original.\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {name} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             [Text to translate]\n\
             {text}\n",
            name = language.name(),
            code = language.code(),
            text = text
        )
    }

    /// Turn a non-2xx response into an upstream error, keeping a short
    /// excerpt of the body for the logs
    pub async fn reject_unsuccessful(&self, response: Response) -> std::result::Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(200).collect();
        debug!("Translation backend error body: {}", excerpt);
        Err(FetchError::Upstream(format!("translation backend returned {}: {}", status, excerpt)))
    }
}

/// Strip wrappers models like to add around an otherwise clean answer
pub fn clean_translation_response(response: &str) -> String {
    let text = remove_markdown_code_blocks(response);

    let text = text
        .strip_prefix("Translation:")
        .or_else(|| text.strip_prefix("**Translation:**"))
        .unwrap_or(text.as_str());

    text.trim().to_string()
}

/// Remove a surrounding markdown code fence, with or without a language tag
fn remove_markdown_code_blocks(text: &str) -> String {
    let text = text.trim();

    if text.len() >= 6 && text.starts_with("```") && text.ends_with("```") {
        let inner = &text[3..text.len() - 3];
        // Drop an info string such as `json` or `text` on the opening line
        let inner = match inner.split_once('\n') {
            Some((first, rest)) if !first.trim().contains(' ') => rest,
            _ => inner,
        };
        return inner.trim().to_string();
    }

    text.to_string()
}
