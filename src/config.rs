use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::error::{Result, LyricSwitchError};
use crate::language::Language;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lyricswitch.toml";

// Environment variables that carry credentials
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_USER: &str = "LYRICSWITCH_USER";

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub lyrics: LyricsConfig,
    pub video: VideoConfig,
    pub translate: TranslateConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Shared budget for the lyrics fetch and the video lookup (milliseconds)
    pub fetch_timeout_ms: u64,
    /// Language used when none is given on the command line
    pub default_language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Base URL of the lyrics.ovh compatible API
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Base URL of the YouTube Data API
    pub endpoint: String,
    /// API key; the lookup is skipped when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Extra words appended to every search, e.g. "official"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Which API dialect the endpoint speaks
    pub backend: TranslationBackend,
    /// Base URL of the translation backend
    pub endpoint: String,
    /// Model identifier passed to the backend
    pub model: String,
    /// Bearer token for the chat backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Extra attempts after the first failure (0 = single attempt)
    pub max_retries: u32,
    /// Pause between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBackend {
    /// OpenAI-compatible `/chat/completions` (GitHub Models, OpenAI, ...)
    Chat,
    /// Local Ollama `/api/generate`
    Ollama,
}

impl FromStr for TranslationBackend {
    type Err = LyricSwitchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(TranslationBackend::Chat),
            "ollama" => Ok(TranslationBackend::Ollama),
            _ => Err(LyricSwitchError::Config(format!(
                "Invalid translation backend '{}'. Valid backends: chat, ollama",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Signed-in user the searches run on behalf of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                fetch_timeout_ms: 5000,
                default_language: Language::Spanish,
            },
            lyrics: LyricsConfig {
                endpoint: "https://api.lyrics.ovh/v1".to_string(),
            },
            video: VideoConfig {
                endpoint: "https://www.googleapis.com/youtube/v3".to_string(),
                api_key: None,
                query_suffix: None,
            },
            translate: TranslateConfig {
                backend: TranslationBackend::Chat,
                endpoint: "https://models.github.ai/inference".to_string(),
                model: "openai/gpt-4o-mini".to_string(),
                api_key: None,
                max_retries: 0,
                retry_delay_ms: default_retry_delay_ms(),
                timeout_secs: default_request_timeout_secs(),
                temperature: 1.0,
                top_p: 1.0,
                max_tokens: 4096,
            },
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LyricSwitchError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LyricSwitchError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LyricSwitchError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Fill credentials from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Fill credentials from `lookup`; blank values are ignored and
    /// `GITHUB_TOKEN` wins over `OPENAI_API_KEY`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = get(ENV_GITHUB_TOKEN).or_else(|| get(ENV_OPENAI_API_KEY)) {
            self.translate.api_key = Some(token);
        }
        if let Some(key) = get(ENV_YOUTUBE_API_KEY) {
            self.video.api_key = Some(key);
        }
        if let Some(user) = get(ENV_USER) {
            self.auth.user = Some(user);
        }
    }

    /// Copy safe to print: secrets replaced with a marker
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if copy.translate.api_key.is_some() {
            copy.translate.api_key = Some("***".to_string());
        }
        if copy.video.api_key.is_some() {
            copy.video.api_key = Some("***".to_string());
        }
        copy
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.fetch_timeout_ms == 0 {
            return Err(LyricSwitchError::Config("search.fetch_timeout_ms must be greater than 0".to_string()));
        }
        for (name, endpoint) in [
            ("lyrics.endpoint", &self.lyrics.endpoint),
            ("video.endpoint", &self.video.endpoint),
            ("translate.endpoint", &self.translate.endpoint),
        ] {
            reqwest::Url::parse(endpoint)
                .map_err(|e| LyricSwitchError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_save_and_load_roundtrip() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.translate.backend = TranslationBackend::Ollama;
        config.translate.max_retries = 2;
        config.search.default_language = Language::Japanese;
        config.save_to_file(file.path()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.translate.backend, TranslationBackend::Ollama);
        assert_eq!(loaded.translate.max_retries, 2);
        assert_eq!(loaded.search.default_language, Language::Japanese);
        assert!(loaded.translate.api_key.is_none());
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("lyricswitch.toml");
        file.write_str(
            r#"
[search]
fetch_timeout_ms = 2500
default_language = "pt"

[lyrics]
endpoint = "http://localhost:9000/v1"

[video]
endpoint = "http://localhost:9001"

[translate]
backend = "chat"
endpoint = "http://localhost:9002"
model = "test-model"
max_retries = 1
temperature = 0.2
top_p = 1.0
max_tokens = 512
"#,
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.fetch_timeout_ms, 2500);
        assert_eq!(config.translate.retry_delay_ms, 500);
        assert_eq!(config.translate.timeout_secs, 60);
        assert!(config.auth.user.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = Config::from_file(dir.child("nope.toml").path()).unwrap_err();
        assert!(matches!(err, LyricSwitchError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_toml_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("lyricswitch.toml");
        file.write_str("[search\nfetch_timeout_ms = \"soon\"\n").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, LyricSwitchError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parsing error"));
    }

    #[test]
    fn test_apply_env_from() {
        let env: HashMap<&str, &str> = [
            (ENV_OPENAI_API_KEY, "sk-openai"),
            (ENV_GITHUB_TOKEN, "  "),
            (ENV_YOUTUBE_API_KEY, "yt-key"),
            (ENV_USER, "dana"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.translate.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.video.api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.auth.user.as_deref(), Some("dana"));

        let masked = config.masked();
        assert_eq!(masked.translate.api_key.as_deref(), Some("***"));
        assert_eq!(masked.video.api_key.as_deref(), Some("***"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.search.fetch_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.lyrics.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Ollama".parse::<TranslationBackend>().unwrap(), TranslationBackend::Ollama);
        assert!("gpt".parse::<TranslationBackend>().is_err());
    }
}
