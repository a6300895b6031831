use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{FetchError, LyricSwitchError, Result};
use crate::language::Language;
use super::{Translator, common::{BaseTranslator, clean_translation_response}};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Shape the model is asked to answer in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTranslation {
    pub text: String,
}

/// Translator backed by a local Ollama server
pub struct OllamaTranslator {
    base: BaseTranslator,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        Ok(Self {
            base: BaseTranslator::new(config)?,
        })
    }

    pub fn build_request(&self, text: &str, language: Language) -> GenerateRequest {
        let config = &self.base.config;
        GenerateRequest {
            model: config.model.clone(),
            prompt: self.base.build_json_translation_prompt(text, language),
            stream: false,
            format: "json".to_string(),
            options: GenerateOptions {
                temperature: config.temperature,
                top_p: config.top_p,
                num_predict: config.max_tokens,
            },
        }
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate_text(&self, text: &str, language: Language) -> std::result::Result<String, FetchError> {
        let url = self.base.endpoint_url("api/generate");
        debug!("Sending translation request to: {}", url);

        let response = self
            .base
            .client
            .post(&url)
            .json(&self.build_request(text, language))
            .send()
            .await?;
        let response = self.base.reject_unsuccessful(response).await?;
        let body = response.text().await?;

        parse_generate_response(&body)
    }
}

/// Pull the translation out of a non-streaming `/api/generate` body.
/// Falls back to the raw text when the model ignored the JSON format.
pub fn parse_generate_response(body: &str) -> std::result::Result<String, FetchError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Upstream(format!("malformed Ollama response: {}", e)))?;

    let raw = parsed.response.trim();
    debug!("Raw Ollama response: {}", raw);

    let text = match serde_json::from_str::<JsonTranslation>(raw) {
        Ok(result) => result.text.trim().to_string(),
        Err(_) => clean_translation_response(raw),
    };

    if text.is_empty() {
        Err(FetchError::NotFound)
    } else {
        Ok(text)
    }
}

/// Check that Ollama answers and has `model` pulled
pub async fn check_ollama_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint.trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&json!({ "name": model }))
        .send()
        .await
        .map_err(|e| LyricSwitchError::Translation(format!("Failed to connect to Ollama: {}", e)))?;

    if response.status().is_success() {
        info!("Ollama model '{}' is available", model);
        Ok(())
    } else {
        Err(LyricSwitchError::Translation(format!(
            "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
            model, model
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, TranslationBackend};

    fn translator() -> OllamaTranslator {
        let mut config = Config::default().translate;
        config.backend = TranslationBackend::Ollama;
        config.endpoint = "http://localhost:11434".to_string();
        config.model = "llama3.2:3b".to_string();
        OllamaTranslator::new(config).unwrap()
    }

    #[test]
    fn test_build_request() {
        let request = translator().build_request("hello", Language::Japanese);
        assert_eq!(request.model, "llama3.2:3b");
        assert!(!request.stream);
        assert_eq!(request.format, "json");
        assert_eq!(request.options.num_predict, 4096);
        assert!(request.prompt.contains("Japanese"));
    }

    #[test]
    fn test_parse_json_answer() {
        let body = r#"{"model":"llama3.2:3b","response":"{\"text\": \"Mira las estrellas\\nMira cómo brillan \"}","done":true}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "Mira las estrellas\nMira cómo brillan");
    }

    #[test]
    fn test_parse_plain_answer_falls_back() {
        let body = r#"{"response":"Translation: Mira las estrellas","done":true}"#;
        assert_eq!(parse_generate_response(body).unwrap(), "Mira las estrellas");
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        assert_eq!(parse_generate_response(r#"{"response":"  ","done":true}"#), Err(FetchError::NotFound));
        assert_eq!(parse_generate_response(r#"{"response":"{\"text\":\"\"}"}"#), Err(FetchError::NotFound));
        assert!(matches!(parse_generate_response("oops"), Err(FetchError::Upstream(_))));
    }
}
