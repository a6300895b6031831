use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::VideoConfig;
use crate::error::{FetchError, LyricSwitchError, Result};
use super::VideoLookup;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

/// YouTube Data API v3 `search.list` client
pub struct YouTubeSearchClient {
    client: Client,
    search_url: Url,
    api_key: Option<String>,
    query_suffix: Option<String>,
}

impl YouTubeSearchClient {
    pub fn new(config: VideoConfig) -> Result<Self> {
        let search_url = Url::parse(&format!("{}/search", config.endpoint.trim_end_matches('/')))
            .map_err(|e| LyricSwitchError::Config(format!("Invalid video endpoint: {}", e)))?;

        let client = Client::builder()
            .user_agent(concat!("lyricswitch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            search_url,
            api_key: config.api_key,
            query_suffix: config.query_suffix,
        })
    }

    fn search_terms(&self, query: &str) -> String {
        match self.query_suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => format!("{} {}", query, suffix),
            _ => query.to_string(),
        }
    }
}

#[async_trait]
impl VideoLookup for YouTubeSearchClient {
    async fn find_video(&self, query: &str) -> std::result::Result<String, FetchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No YouTube API key configured, skipping video lookup");
            return Err(FetchError::NotFound);
        };

        let terms = self.search_terms(query);
        debug!("Searching videos for: {}", terms);

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", terms.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Failed to fetch YouTube video.".to_string());
            return Err(FetchError::Upstream(format!("YouTube API {}: {}", status, message)));
        }

        parse_search_response(&body)
    }
}

/// First video id in a `search.list` body
pub fn parse_search_response(body: &str) -> std::result::Result<String, FetchError> {
    let parsed: SearchListResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Upstream(format!("malformed YouTube response: {}", e)))?;

    parsed
        .items
        .into_iter()
        .find_map(|item| item.id.video_id)
        .filter(|id| !id.is_empty())
        .ok_or(FetchError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, suffix: Option<&str>) -> VideoConfig {
        VideoConfig {
            endpoint: "https://www.googleapis.com/youtube/v3/".to_string(),
            api_key: api_key.map(str::to_string),
            query_suffix: suffix.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_first_video_id() {
        let body = r#"{
            "kind": "youtube#searchListResponse",
            "items": [
                {"id": {"kind": "youtube#channel", "channelId": "UC1"}},
                {"id": {"kind": "youtube#video", "videoId": "yKNxeF4KMsY"}, "snippet": {"title": "Yellow"}}
            ]
        }"#;
        assert_eq!(parse_search_response(body).unwrap(), "yKNxeF4KMsY");
    }

    #[test]
    fn test_parse_empty_items_is_not_found() {
        assert_eq!(parse_search_response(r#"{"items": []}"#), Err(FetchError::NotFound));
        assert_eq!(parse_search_response("{}"), Err(FetchError::NotFound));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_search_response("nope"), Err(FetchError::Upstream(_))));
    }

    #[test]
    fn test_error_payload_shape() {
        let body = r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.code, Some(403));
        assert_eq!(parsed.error.message, "quotaExceeded");
    }

    #[test]
    fn test_search_terms_suffix() {
        let client = YouTubeSearchClient::new(config(Some("k"), Some(" official "))).unwrap();
        assert_eq!(client.search_terms("Yellow Coldplay"), "Yellow Coldplay official");
        assert_eq!(client.search_url.as_str(), "https://www.googleapis.com/youtube/v3/search");

        let client = YouTubeSearchClient::new(config(Some("k"), None)).unwrap();
        assert_eq!(client.search_terms("Yellow Coldplay"), "Yellow Coldplay");
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_lookup() {
        let client = YouTubeSearchClient::new(config(None, None)).unwrap();
        assert_eq!(client.find_video("Yellow Coldplay").await, Err(FetchError::NotFound));
    }
}
