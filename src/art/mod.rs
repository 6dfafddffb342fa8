//! Album-art resolution pipeline.
//!
//! Turns a track's opaque Roon image key into a publicly linkable image URL,
//! via a persistent cache, a MusicBrainz/Cover Art Archive resolver, or one
//! of the upload backends. The orchestrator is the single failure boundary:
//! everything below it returns `Result`, everything above it sees either a
//! link or [`DEFAULT_ART`].

pub mod cache;
pub mod coverart;
pub mod hosting;
pub mod musicbrainz;
pub mod orchestrator;
pub mod resolver;
pub mod source;
pub mod traits;

pub use cache::ArtCache;
pub use orchestrator::{ArtOrchestrator, ArtRequest};
pub use resolver::MusicBrainzResolver;
pub use source::RoonImageClient;

/// Discord asset key shown when no real art link is available.
pub const DEFAULT_ART: &str = "main";

/// Cache key for resolved artwork.
///
/// Composite of artist and album so that identically named albums by
/// different artists don't collide. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AlbumKey {
    pub artist: String,
    pub album: String,
}

impl AlbumKey {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }
}

impl std::fmt::Display for AlbumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.artist, self.album)
    }
}

/// Errors that can occur in the art pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matches found")]
    NoMatches,

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("API request failed: {0}")]
    Api(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_key_equality_is_case_sensitive() {
        let a = AlbumKey::new("Queen", "A Night at the Opera");
        let b = AlbumKey::new("Queen", "a night at the opera");
        assert_ne!(a, b);
    }

    #[test]
    fn test_album_key_distinguishes_artists() {
        // Two "Greatest Hits" albums must not collide.
        let a = AlbumKey::new("Queen", "Greatest Hits");
        let b = AlbumKey::new("ABBA", "Greatest Hits");
        assert_ne!(a, b);
    }
}
