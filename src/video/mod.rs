// Video lookup
//
// Finds the single best-matching music video for a free-text query.

pub mod youtube;

use async_trait::async_trait;

use crate::config::VideoConfig;
use crate::error::{FetchError, Result};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Best match for `query`, or `FetchError::NotFound`
    async fn find_video(&self, query: &str) -> std::result::Result<String, FetchError>;
}

pub struct VideoLookupFactory;

impl VideoLookupFactory {
    pub fn create_lookup(config: VideoConfig) -> Result<Box<dyn VideoLookup>> {
        Ok(Box::new(youtube::YouTubeSearchClient::new(config)?))
    }
}
