// ABOUTME: The AI playlist pipeline: one generative call, JSON parsing with recovery,
// ABOUTME: sequential per-candidate catalog resolution, and the sufficiency gate.

use async_trait::async_trait;
use chrono::Utc;

use encore_core::model::{Candidate, GeneratedPlaylist, ResolvedTrack, Track};
use encore_upstream::UpstreamError;

use crate::generate::{GenerateError, TextGenerator};

/// Songs requested when the caller does not say how many.
pub const DEFAULT_SONG_COUNT: usize = 20;

/// Upper bound on the diagnostic excerpt carried by a parse failure.
const EXCERPT_LIMIT: usize = 500;

/// Errors the playlist pipeline can report.
#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    /// The generative response was not valid or recoverable JSON. Carries a
    /// bounded excerpt of the raw text for diagnostics, never the whole body.
    #[error("generative response was not a parseable candidate list")]
    Unparseable { excerpt: String },

    /// Too few candidates matched real upstream tracks. A playlist under
    /// half the requested size is not returned silently; callers can react,
    /// e.g. by retrying with a different prompt.
    #[error("only {found} of {requested} requested songs could be matched")]
    Insufficient { found: usize, requested: usize },

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Resolves one proposed song to a real upstream track. Implemented by the
/// upstream client; stubbed in tests.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Look up a candidate by title and artist. `Ok(None)` means the catalog
    /// had no usable match; `Err` means the lookup itself failed.
    async fn resolve(&self, title: &str, artist: &str) -> Result<Option<Track>, UpstreamError>;
}

/// Build the fixed instruction for the generative call: exactly `song_count`
/// candidates as a raw JSON array, no surrounding formatting.
pub fn build_instruction(prompt: &str, song_count: usize) -> String {
    format!(
        "You are a music curator. Suggest exactly {count} real, existing songs for this request: \
         \"{prompt}\".\n\
         Respond with ONLY a raw JSON array, no markdown fences and no commentary. \
         Each element must be an object with exactly these string fields: \
         \"title\", \"artist\", \"genre\", \"reason\" (one sentence on why it fits).",
        count = song_count,
        prompt = prompt
    )
}

/// Parse the generative response into candidates.
///
/// Tries the whole text as JSON first; models that wrap the array in prose or
/// markdown fences get a recovery pass that extracts the first top-level JSON
/// array substring. If both fail, the error carries a truncated excerpt of
/// the raw response.
pub fn parse_candidates(raw: &str) -> Result<Vec<Candidate>, PlaylistError> {
    if let Ok(candidates) = serde_json::from_str::<Vec<Candidate>>(raw.trim()) {
        return Ok(candidates);
    }

    if let Some(array) = extract_json_array(raw)
        && let Ok(candidates) = serde_json::from_str::<Vec<Candidate>>(array)
    {
        return Ok(candidates);
    }

    Err(PlaylistError::Unparseable {
        excerpt: excerpt(raw),
    })
}

/// Extract the first balanced top-level `[...]` substring, respecting string
/// literals and escapes so brackets inside titles don't break the scan.
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Truncate raw generative output to a bounded, char-safe diagnostic excerpt.
fn excerpt(raw: &str) -> String {
    raw.chars().take(EXCERPT_LIMIT).collect()
}

fn playlist_name(prompt: &str) -> String {
    let short: String = prompt.trim().chars().take(40).collect();
    format!("AI Mix: {}", short)
}

/// Run the full pipeline: generate candidates, resolve each against the
/// upstream catalog strictly in order, gate on sufficiency, truncate.
///
/// Resolution is sequential and settle-all: a failed lookup for one candidate
/// is logged and skipped, and can never abort or reorder the rest. Only the
/// aggregate sufficiency gate turns partial failure into an error.
pub async fn generate_playlist(
    generator: &dyn TextGenerator,
    resolver: &dyn TrackResolver,
    prompt: &str,
    song_count: usize,
) -> Result<GeneratedPlaylist, PlaylistError> {
    let instruction = build_instruction(prompt, song_count);

    tracing::debug!(
        provider = generator.provider_name(),
        model = generator.model_name(),
        song_count,
        "requesting playlist candidates"
    );
    let raw = generator.generate(&instruction).await?;
    let candidates = parse_candidates(&raw)?;
    tracing::debug!(parsed = candidates.len(), "parsed candidate list");

    let mut resolved: Vec<ResolvedTrack> = Vec::new();
    for candidate in &candidates {
        match resolver.resolve(&candidate.title, &candidate.artist).await {
            Ok(Some(track)) => resolved.push(ResolvedTrack {
                track,
                genre: candidate.genre.clone(),
                reason: candidate.reason.clone(),
            }),
            Ok(None) => {
                tracing::warn!(
                    title = %candidate.title,
                    artist = %candidate.artist,
                    "no upstream match for candidate, skipping"
                );
            }
            Err(e) => {
                tracing::warn!(
                    title = %candidate.title,
                    artist = %candidate.artist,
                    error = %e,
                    "candidate lookup failed, skipping"
                );
            }
        }
    }

    // Below half the requested size the playlist is judged not useful enough
    // to return.
    if resolved.len() * 2 < song_count {
        return Err(PlaylistError::Insufficient {
            found: resolved.len(),
            requested: song_count,
        });
    }

    resolved.truncate(song_count);

    Ok(GeneratedPlaylist {
        name: playlist_name(prompt),
        description: format!("Generated from the prompt \"{}\"", prompt.trim()),
        prompt: prompt.to_string(),
        tracks: resolved,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubGenerator, StubResolver};

    fn candidates_json(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|i| {
                format!(
                    r#"{{"title":"Song {i:02}","artist":"Artist {i:02}","genre":"indie","reason":"fits the mood"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn parses_raw_array_directly() {
        let candidates = parse_candidates(&candidates_json(3)).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].title, "Song 01");
    }

    #[test]
    fn recovers_array_from_fenced_markdown() {
        let raw = "Here you go:\n```json\n[{\"title\":\"A\",\"artist\":\"B\",\"genre\":\"C\",\"reason\":\"D\"}]\n```";

        let candidates = parse_candidates(raw).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "A");
        assert_eq!(candidates[0].artist, "B");
        assert_eq!(candidates[0].genre, "C");
        assert_eq!(candidates[0].reason, "D");
    }

    #[test]
    fn recovery_respects_brackets_inside_strings() {
        let raw = r#"Sure! [{"title":"Intro [Live]","artist":"A","genre":"g","reason":"r"}] enjoy"#;

        let candidates = parse_candidates(raw).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Intro [Live]");
    }

    #[test]
    fn unparseable_response_carries_bounded_excerpt() {
        let raw = "no json here ".repeat(100);
        let err = parse_candidates(&raw).unwrap_err();

        match err {
            PlaylistError::Unparseable { excerpt } => {
                assert_eq!(excerpt.chars().count(), 500);
                assert!(excerpt.starts_with("no json here"));
            }
            other => panic!("expected Unparseable, got {:?}", other),
        }
    }

    #[test]
    fn instruction_names_count_and_prompt() {
        let instruction = build_instruction("rainy sunday afternoon", 12);
        assert!(instruction.contains("exactly 12"));
        assert!(instruction.contains("rainy sunday afternoon"));
        assert!(instruction.contains("JSON array"));
    }

    #[tokio::test]
    async fn full_pipeline_resolves_in_order() {
        let generator = StubGenerator::new(&candidates_json(5));
        let resolver = StubResolver::default();

        let playlist = generate_playlist(&generator, &resolver, "test prompt", 5)
            .await
            .unwrap();

        assert_eq!(playlist.tracks.len(), 5);
        let names: Vec<&str> = playlist.tracks.iter().map(|t| t.track.name.as_str()).collect();
        assert_eq!(names, vec!["Song 01", "Song 02", "Song 03", "Song 04", "Song 05"]);
        assert_eq!(playlist.tracks[0].genre, "indie");
        assert_eq!(playlist.tracks[0].reason, "fits the mood");
        assert_eq!(playlist.prompt, "test prompt");
    }

    #[tokio::test]
    async fn one_failing_candidate_never_aborts_the_batch() {
        let generator = StubGenerator::new(&candidates_json(20));
        let resolver = StubResolver::default().failing_on("Song 07");

        let playlist = generate_playlist(&generator, &resolver, "test", 20)
            .await
            .unwrap();

        assert_eq!(playlist.tracks.len(), 19);
        let names: Vec<&str> = playlist.tracks.iter().map(|t| t.track.name.as_str()).collect();
        assert!(!names.contains(&"Song 07"));
        assert_eq!(names[5], "Song 06");
        assert_eq!(names[6], "Song 08");
        assert_eq!(names[18], "Song 20");
    }

    #[tokio::test]
    async fn gate_passes_at_exactly_half() {
        let generator = StubGenerator::new(&candidates_json(20));
        // Songs 11..20 miss: exactly 10 of 20 resolve.
        let mut resolver = StubResolver::default();
        for i in 11..=20 {
            resolver = resolver.missing_on(&format!("Song {:02}", i));
        }

        let playlist = generate_playlist(&generator, &resolver, "test", 20)
            .await
            .unwrap();
        assert_eq!(playlist.tracks.len(), 10);
    }

    #[tokio::test]
    async fn gate_fails_below_half_with_counts() {
        let generator = StubGenerator::new(&candidates_json(20));
        // Songs 10..20 miss: only 9 resolve.
        let mut resolver = StubResolver::default();
        for i in 10..=20 {
            resolver = resolver.missing_on(&format!("Song {:02}", i));
        }

        let err = generate_playlist(&generator, &resolver, "test", 20)
            .await
            .unwrap_err();
        match err {
            PlaylistError::Insufficient { found, requested } => {
                assert_eq!(found, 9);
                assert_eq!(requested, 20);
            }
            other => panic!("expected Insufficient, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn result_truncates_to_requested_count() {
        // Model over-delivers: 25 candidates for a 20-song request.
        let generator = StubGenerator::new(&candidates_json(25));
        let resolver = StubResolver::default();

        let playlist = generate_playlist(&generator, &resolver, "test", 20)
            .await
            .unwrap();

        assert_eq!(playlist.tracks.len(), 20);
        assert_eq!(playlist.tracks[19].track.name, "Song 20");
    }

    #[tokio::test]
    async fn generator_failure_propagates() {
        let generator = StubGenerator::failing("provider melted");
        let resolver = StubResolver::default();

        let err = generate_playlist(&generator, &resolver, "test", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistError::Generate(_)));
    }
}
