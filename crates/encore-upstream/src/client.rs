// ABOUTME: Per-request upstream API client bound to one caller's access token.
// ABOUTME: Thin passthroughs: one call, no retry; non-success responses map to UpstreamError with the operation name.

use serde_json::{Value, json};

use encore_core::credential::Claims;
use encore_core::model::{PlaylistSummary, SearchResults, Track, UserProfile};

use crate::error::UpstreamError;
use crate::login::extract_error_message;
use crate::reshape;

/// Bounded per-call timeout. Configure this on the shared `reqwest::Client`
/// at startup; a timeout surfaces as an ordinary transport failure.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;

const SEARCH_TYPES: [&str; 4] = ["track", "artist", "album", "playlist"];
const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// An ephemeral binding of one caller's upstream access token to an HTTP
/// client. Reconstructed fresh from the verified credential on every request;
/// never stored across requests. The inner `reqwest::Client` is a cheap
/// handle to the process-wide connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl UpstreamClient {
    /// Create a client for one request from an already-verified access token.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Create a client from verified credential claims.
    pub fn from_claims(http: reqwest::Client, base_url: impl Into<String>, claims: &Claims) -> Self {
        Self::new(http, base_url, claims.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request with the caller's bearer token and map failures.
    /// Exactly one attempt; rate limits and 5xx are reported, not retried.
    async fn send(
        &self,
        operation: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = builder
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: operation.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(operation, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(response)
    }

    /// Send and parse the response body as JSON. Empty (204-style) responses
    /// come back as `Value::Null`.
    async fn send_json(
        &self,
        operation: &'static str,
        builder: reqwest::RequestBuilder,
    ) -> Result<Value, UpstreamError> {
        let response = self.send(operation, builder).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: operation.to_string(),
                message: e.to_string(),
            })?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Transport {
            operation: operation.to_string(),
            message: format!("unparseable response body: {}", e),
        })
    }

    /// GET the caller's account profile.
    pub async fn profile(&self) -> Result<UserProfile, UpstreamError> {
        let body = self
            .send_json("profile", self.http.get(self.url("/me")))
            .await?;
        reshape::profile(&body).ok_or_else(|| UpstreamError::Transport {
            operation: "profile".to_string(),
            message: "response missing account id".to_string(),
        })
    }

    /// List the caller's playlists.
    pub async fn playlists(&self) -> Result<Vec<PlaylistSummary>, UpstreamError> {
        let body = self
            .send_json(
                "playlists",
                self.http
                    .get(self.url("/me/playlists"))
                    .query(&[("limit", "50")]),
            )
            .await?;
        Ok(reshape::playlists(&body))
    }

    /// List the tracks of one playlist, in playlist order.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, UpstreamError> {
        let body = self
            .send_json(
                "playlist tracks",
                self.http
                    .get(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                    .query(&[("limit", "100")]),
            )
            .await?;
        Ok(reshape::track_page(&body))
    }

    /// Create a playlist for the caller. Visibility defaults to private.
    /// Repeated calls create duplicates; that is upstream behavior.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        public: bool,
    ) -> Result<PlaylistSummary, UpstreamError> {
        let body = self
            .send_json(
                "create playlist",
                self.http
                    .post(self.url(&format!("/users/{}/playlists", user_id)))
                    .json(&json!({
                        "name": name,
                        "description": description.unwrap_or(""),
                        "public": public,
                    })),
            )
            .await?;
        reshape::playlist(&body).ok_or_else(|| UpstreamError::Transport {
            operation: "create playlist".to_string(),
            message: "response missing playlist id".to_string(),
        })
    }

    /// Rename a playlist.
    pub async fn rename_playlist(&self, playlist_id: &str, name: &str) -> Result<(), UpstreamError> {
        self.send(
            "rename playlist",
            self.http
                .put(self.url(&format!("/playlists/{}", playlist_id)))
                .json(&json!({ "name": name })),
        )
        .await
        .map(|_| ())
    }

    /// Stop following (the upstream notion of deleting) a playlist.
    pub async fn unfollow_playlist(&self, playlist_id: &str) -> Result<(), UpstreamError> {
        self.send(
            "unfollow playlist",
            self.http
                .delete(self.url(&format!("/playlists/{}/followers", playlist_id))),
        )
        .await
        .map(|_| ())
    }

    /// Add tracks to a playlist by URI.
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), UpstreamError> {
        self.send(
            "add tracks",
            self.http
                .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .json(&json!({ "uris": uris })),
        )
        .await
        .map(|_| ())
    }

    /// Remove tracks from a playlist by URI.
    pub async fn remove_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), UpstreamError> {
        let tracks: Vec<Value> = uris.iter().map(|uri| json!({ "uri": uri })).collect();
        self.send(
            "remove tracks",
            self.http
                .delete(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .json(&json!({ "tracks": tracks })),
        )
        .await
        .map(|_| ())
    }

    /// List the caller's liked songs.
    pub async fn liked_tracks(&self) -> Result<Vec<Track>, UpstreamError> {
        let body = self
            .send_json(
                "liked tracks",
                self.http
                    .get(self.url("/me/tracks"))
                    .query(&[("limit", "50")]),
            )
            .await?;
        Ok(reshape::track_page(&body))
    }

    /// Add tracks to the caller's liked songs.
    pub async fn save_tracks(&self, track_ids: &[String]) -> Result<(), UpstreamError> {
        self.send(
            "save tracks",
            self.http
                .put(self.url("/me/tracks"))
                .json(&json!({ "ids": track_ids })),
        )
        .await
        .map(|_| ())
    }

    /// Remove tracks from the caller's liked songs.
    pub async fn remove_saved_tracks(&self, track_ids: &[String]) -> Result<(), UpstreamError> {
        self.send(
            "remove saved tracks",
            self.http
                .delete(self.url("/me/tracks"))
                .json(&json!({ "ids": track_ids })),
        )
        .await
        .map(|_| ())
    }

    /// Search the upstream catalog.
    ///
    /// A blank query returns the well-formed empty shape without touching
    /// upstream; callers get a stable contract and no wasted call. `types` is
    /// an optional comma-separated filter; unknown entries are dropped and an
    /// empty filter falls back to all four categories.
    pub async fn search(
        &self,
        query: &str,
        types: Option<&str>,
        limit: Option<u32>,
    ) -> Result<SearchResults, UpstreamError> {
        if query.trim().is_empty() {
            return Ok(SearchResults::empty());
        }

        let type_filter = parse_type_filter(types);
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, 50);

        let body = self
            .send_json(
                "search",
                self.http.get(self.url("/search")).query(&[
                    ("q", query),
                    ("type", type_filter.as_str()),
                    ("limit", limit.to_string().as_str()),
                ]),
            )
            .await?;
        Ok(reshape::search_results(&body))
    }

    /// Current playback state, passed through as-is. No active device yields
    /// an empty upstream response, reported as `Value::Null`.
    pub async fn playback_state(&self) -> Result<Value, UpstreamError> {
        self.send_json("playback state", self.http.get(self.url("/me/player")))
            .await
    }

    /// Start or resume playback. The optional body carries a context URI or
    /// track URIs in the upstream's own shape.
    pub async fn play(&self, body: Option<Value>) -> Result<(), UpstreamError> {
        let builder = self.http.put(self.url("/me/player/play"));
        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };
        self.send("play", builder).await.map(|_| ())
    }

    /// Pause playback.
    pub async fn pause(&self) -> Result<(), UpstreamError> {
        self.send("pause", self.http.put(self.url("/me/player/pause")))
            .await
            .map(|_| ())
    }

    /// Skip to the next track.
    pub async fn next_track(&self) -> Result<(), UpstreamError> {
        self.send("next track", self.http.post(self.url("/me/player/next")))
            .await
            .map(|_| ())
    }

    /// Skip to the previous track.
    pub async fn previous_track(&self) -> Result<(), UpstreamError> {
        self.send(
            "previous track",
            self.http.post(self.url("/me/player/previous")),
        )
        .await
        .map(|_| ())
    }
}

/// Normalize a comma-separated type filter to the categories upstream
/// accepts. Unknown entries are dropped; nothing valid falls back to all four.
fn parse_type_filter(types: Option<&str>) -> String {
    let selected: Vec<&str> = types
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|t| SEARCH_TYPES.contains(t))
        .collect();

    if selected.is_empty() {
        SEARCH_TYPES.join(",")
    } else {
        selected.join(",")
    }
}
