// ABOUTME: Core library for encore, containing domain types and the credential layer.
// ABOUTME: This crate defines the shared data model used across all encore components.

pub mod credential;
pub mod model;

pub use credential::{AuthError, Claims, CredentialAuthority};
pub use model::{
    Candidate, GeneratedPlaylist, PlaylistSummary, ResolvedTrack, SearchResults, Track,
    UserProfile,
};
