use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LyricSwitchError;

/// Target languages offered by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::Portuguese,
        Language::Japanese,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
            Language::Japanese => "ja",
        }
    }

    /// English name, used in prompts so the model gets an unambiguous target
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::Portuguese => "Portuguese",
            Language::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LyricSwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == wanted || lang.name().to_lowercase() == wanted)
            .ok_or_else(|| {
                LyricSwitchError::UnsupportedLanguage(format!(
                    "'{}'. Valid languages: {}",
                    s,
                    Language::ALL.map(|l| l.code()).join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_and_name() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!(" JA ".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!("Portuguese".parse::<Language>().unwrap(), Language::Portuguese);
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(matches!(err, LyricSwitchError::UnsupportedLanguage(_)));
        assert!(err.to_string().contains("en, es, pt, ja"));
    }

    #[test]
    fn test_default_and_serde_code() {
        assert_eq!(Language::default(), Language::Spanish);
        assert_eq!(serde_json::to_string(&Language::Japanese).unwrap(), "\"ja\"");
        let parsed: Language = serde_json::from_str("\"pt\"").unwrap();
        assert_eq!(parsed, Language::Portuguese);
    }
}
