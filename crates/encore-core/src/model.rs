// ABOUTME: Reshaped JSON contracts the application exposes to its front end.
// ABOUTME: Upstream responses are normalized into these types; the AI flow builds on Candidate and ResolvedTrack.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The caller's profile, reshaped from the upstream account object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// One playlist as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    pub public: bool,
    pub track_count: u32,
    pub image_url: Option<String>,
}

/// One track, reshaped from the upstream track object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
    pub image_url: Option<String>,
}

/// One artist hit in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistHit {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
}

/// One album hit in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumHit {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub image_url: Option<String>,
}

/// A single category of search hits. The `items` wrapper mirrors the shape
/// the front end consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCategory<T> {
    pub items: Vec<T>,
}

impl<T> SearchCategory<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

/// Reshaped search results. All four categories are always present, so an
/// empty query yields a stable, fully-formed shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub tracks: SearchCategory<Track>,
    pub artists: SearchCategory<ArtistHit>,
    pub albums: SearchCategory<AlbumHit>,
    pub playlists: SearchCategory<PlaylistSummary>,
}

impl SearchResults {
    /// The well-formed empty result, returned without an upstream call for
    /// blank queries.
    pub fn empty() -> Self {
        Self {
            tracks: SearchCategory::empty(),
            artists: SearchCategory::empty(),
            albums: SearchCategory::empty(),
            playlists: SearchCategory::empty(),
        }
    }
}

/// One song proposed by the generative step, before resolution against the
/// upstream catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub reason: String,
}

/// A candidate that matched a real upstream track, annotated with the
/// generative step's genre and rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub genre: String,
    pub reason: String,
}

/// The finished AI-generated playlist returned to the caller. Discarded after
/// the response; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylist {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub tracks: Vec<ResolvedTrack>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_results_have_all_four_categories() {
        let results = SearchResults::empty();
        let json = serde_json::to_value(&results).unwrap();

        for category in ["tracks", "artists", "albums", "playlists"] {
            assert!(
                json[category]["items"].as_array().unwrap().is_empty(),
                "{} should be an empty items list",
                category
            );
        }
    }

    #[test]
    fn candidate_parses_from_generative_output() {
        let raw = r#"[{"title":"Holocene","artist":"Bon Iver","genre":"indie folk","reason":"quiet and wintry"}]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(raw).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Holocene");
        assert_eq!(candidates[0].artist, "Bon Iver");
        assert_eq!(candidates[0].genre, "indie folk");
        assert_eq!(candidates[0].reason, "quiet and wintry");
    }

    #[test]
    fn candidate_tolerates_missing_optional_fields() {
        let raw = r#"[{"title":"A","artist":"B"}]"#;
        let candidates: Vec<Candidate> = serde_json::from_str(raw).unwrap();

        assert_eq!(candidates[0].genre, "");
        assert_eq!(candidates[0].reason, "");
    }

    #[test]
    fn resolved_track_flattens_track_fields() {
        let resolved = ResolvedTrack {
            track: Track {
                id: "t1".to_string(),
                uri: "upstream:track:t1".to_string(),
                name: "Holocene".to_string(),
                artists: vec!["Bon Iver".to_string()],
                album: Some("Bon Iver, Bon Iver".to_string()),
                duration_ms: Some(337_000),
                image_url: None,
            },
            genre: "indie folk".to_string(),
            reason: "quiet and wintry".to_string(),
        };

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["name"], "Holocene");
        assert_eq!(json["genre"], "indie folk");
        assert_eq!(json["reason"], "quiet and wintry");
    }

    #[test]
    fn profile_serializes_camel_case() {
        let profile = UserProfile {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
            email: None,
            avatar_url: None,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("displayName").is_some());
        assert!(json.get("display_name").is_none());
    }
}
