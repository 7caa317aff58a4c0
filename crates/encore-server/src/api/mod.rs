// ABOUTME: API module containing all HTTP handler functions for the encore REST API.
// ABOUTME: Organized into sub-modules for auth, profile, playlists, library, search, player, and generation.

pub mod auth;
pub mod generate;
pub mod library;
pub mod player;
pub mod playlists;
pub mod profile;
pub mod search;

use serde_json::Value;

use crate::error::ApiError;

/// Pull a required list of id/uri strings out of a request body. Rejects an
/// absent field, a non-list, an empty list, and non-string members before
/// anything reaches upstream.
pub(crate) fn require_id_list(body: &Value, field: &str) -> Result<Vec<String>, ApiError> {
    let items = body
        .get(field)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ApiError::Validation(format!("{} must be a list", field)))?;

    if items.is_empty() {
        return Err(ApiError::Validation(format!(
            "{} must be a non-empty list",
            field
        )));
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(String::from)
                .ok_or_else(|| ApiError::Validation(format!("{} must contain only strings", field)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_a_list_of_strings() {
        let body = json!({ "trackIds": ["t1", "t2"] });
        let ids = require_id_list(&body, "trackIds").unwrap();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn rejects_absent_field() {
        let body = json!({});
        let err = require_id_list(&body, "trackIds").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_non_list() {
        let body = json!({ "trackIds": "t1" });
        let err = require_id_list(&body, "trackIds").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_empty_list_and_non_string_members() {
        let err = require_id_list(&json!({ "trackIds": [] }), "trackIds").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = require_id_list(&json!({ "trackIds": [1, 2] }), "trackIds").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
