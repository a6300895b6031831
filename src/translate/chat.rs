use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TranslateConfig;
use crate::error::{FetchError, Result};
use crate::language::Language;
use super::{Translator, common::{BaseTranslator, clean_translation_response}};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Translator speaking the OpenAI-compatible chat completions API
pub struct ChatTranslator {
    base: BaseTranslator,
}

impl ChatTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        if config.api_key.is_none() {
            warn!("No API key configured for the chat translation backend");
        }
        Ok(Self {
            base: BaseTranslator::new(config)?,
        })
    }

    pub fn build_request(&self, text: &str, language: Language) -> ChatCompletionRequest {
        let config = &self.base.config;
        ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: String::new() },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.base.build_translation_prompt(text, language),
                },
            ],
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate_text(&self, text: &str, language: Language) -> std::result::Result<String, FetchError> {
        let url = self.base.endpoint_url("chat/completions");
        debug!("Sending chat translation request to: {}", url);

        let mut request = self.base.client.post(&url).json(&self.build_request(text, language));
        if let Some(api_key) = &self.base.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let response = self.base.reject_unsuccessful(response).await?;
        let body = response.text().await?;

        parse_chat_response(&body)
    }
}

/// Content of the first choice, cleaned; empty content counts as not found
pub fn parse_chat_response(body: &str) -> std::result::Result<String, FetchError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Upstream(format!("malformed chat response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| clean_translation_response(&content))
        .filter(|content| !content.is_empty())
        .ok_or(FetchError::NotFound)
}
