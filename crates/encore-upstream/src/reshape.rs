// ABOUTME: Pure functions that reshape raw upstream JSON into the application's contracts.
// ABOUTME: Malformed items (null, or missing an id) are dropped; order is otherwise preserved.

use serde_json::Value;

use encore_core::model::{
    AlbumHit, ArtistHit, PlaylistSummary, SearchCategory, SearchResults, Track, UserProfile,
};

/// Pull the first image URL out of an upstream `images` array.
fn first_image_url(value: &Value) -> Option<String> {
    value
        .get("images")
        .and_then(|i| i.as_array())
        .and_then(|arr| arr.first())
        .and_then(|img| img.get("url"))
        .and_then(|u| u.as_str())
        .map(String::from)
}

/// Collect artist names from an upstream `artists` array.
fn artist_names(value: &Value) -> Vec<String> {
    value
        .get("artists")
        .and_then(|a| a.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|artist| artist.get("name").and_then(|n| n.as_str()))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Reshape the upstream account object. Returns None if the object lacks an id.
pub fn profile(value: &Value) -> Option<UserProfile> {
    let id = value.get("id")?.as_str()?.to_string();
    let display_name = value
        .get("display_name")
        .and_then(|n| n.as_str())
        .unwrap_or(&id)
        .to_string();

    Some(UserProfile {
        display_name,
        email: value.get("email").and_then(|e| e.as_str()).map(String::from),
        avatar_url: first_image_url(value),
        id,
    })
}

/// Reshape one playlist object. Returns None for null entries or entries
/// without an id.
pub fn playlist(value: &Value) -> Option<PlaylistSummary> {
    let id = value.get("id")?.as_str()?.to_string();
    let name = value
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("")
        .to_string();

    Some(PlaylistSummary {
        id,
        name,
        description: value
            .get("description")
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
            .map(String::from),
        owner: value
            .get("owner")
            .and_then(|o| o.get("display_name").or_else(|| o.get("id")))
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string(),
        public: value.get("public").and_then(|p| p.as_bool()).unwrap_or(false),
        track_count: value
            .get("tracks")
            .and_then(|t| t.get("total"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0) as u32,
        image_url: first_image_url(value),
    })
}

/// Reshape a page of playlists, dropping malformed entries.
pub fn playlists(value: &Value) -> Vec<PlaylistSummary> {
    value
        .get("items")
        .and_then(|i| i.as_array())
        .map(|arr| arr.iter().filter_map(playlist).collect())
        .unwrap_or_default()
}

/// Reshape one track object. Returns None for null entries or entries
/// without an id.
pub fn track(value: &Value) -> Option<Track> {
    let id = value.get("id")?.as_str()?.to_string();
    let name = value
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("")
        .to_string();
    let uri = value
        .get("uri")
        .and_then(|u| u.as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("upstream:track:{}", id));

    Some(Track {
        artists: artist_names(value),
        album: value
            .get("album")
            .and_then(|a| a.get("name"))
            .and_then(|n| n.as_str())
            .map(String::from),
        duration_ms: value.get("duration_ms").and_then(|d| d.as_u64()),
        image_url: value.get("album").and_then(first_image_url),
        id,
        uri,
        name,
    })
}

/// Reshape a page of saved/playlist tracks. Upstream wraps each entry as
/// `{added_at, track: {...}}`; entries whose track is null or missing an id
/// are dropped, order preserved.
pub fn track_page(value: &Value) -> Vec<Track> {
    value
        .get("items")
        .and_then(|i| i.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|entry| entry.get("track"))
                .filter_map(track)
                .collect()
        })
        .unwrap_or_default()
}

/// Reshape one artist search hit.
pub fn artist_hit(value: &Value) -> Option<ArtistHit> {
    let id = value.get("id")?.as_str()?.to_string();

    Some(ArtistHit {
        name: value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string(),
        image_url: first_image_url(value),
        id,
    })
}

/// Reshape one album search hit.
pub fn album_hit(value: &Value) -> Option<AlbumHit> {
    let id = value.get("id")?.as_str()?.to_string();

    Some(AlbumHit {
        name: value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string(),
        artists: artist_names(value),
        image_url: first_image_url(value),
        id,
    })
}

/// Reshape a full search response. Categories absent from the upstream
/// response come back as empty lists, so callers always see all four.
pub fn search_results(value: &Value) -> SearchResults {
    fn category<T>(value: &Value, key: &str, f: impl Fn(&Value) -> Option<T>) -> SearchCategory<T> {
        SearchCategory {
            items: value
                .get(key)
                .and_then(|c| c.get("items"))
                .and_then(|i| i.as_array())
                .map(|arr| arr.iter().filter_map(|item| f(item)).collect())
                .unwrap_or_default(),
        }
    }

    SearchResults {
        tracks: category(value, "tracks", track),
        artists: category(value, "artists", artist_hit),
        albums: category(value, "albums", album_hit),
        playlists: category(value, "playlists", playlist),
    }
}
