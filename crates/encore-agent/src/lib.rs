// ABOUTME: AI playlist generation for encore: generative-text adapters plus the candidate pipeline.
// ABOUTME: One generative call proposes songs; each is resolved against the upstream catalog in order.

pub mod generate;
pub mod playlist;
pub mod providers;
pub mod resolver;
pub mod testing;

pub use generate::{GenerateError, TextGenerator};
pub use playlist::{PlaylistError, TrackResolver, generate_playlist, parse_candidates};
pub use providers::create_generator;
