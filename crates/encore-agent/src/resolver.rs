// ABOUTME: TrackResolver implementation backed by the upstream search API.
// ABOUTME: One search per candidate, limit 1, first well-formed track hit wins.

use async_trait::async_trait;

use encore_core::model::Track;
use encore_upstream::{UpstreamClient, UpstreamError};

use crate::playlist::TrackResolver;

#[async_trait]
impl TrackResolver for UpstreamClient {
    async fn resolve(&self, title: &str, artist: &str) -> Result<Option<Track>, UpstreamError> {
        let query = format!("{} {}", title, artist);
        let results = self.search(&query, Some("track"), Some(1)).await?;
        Ok(results.tracks.items.into_iter().next())
    }
}
