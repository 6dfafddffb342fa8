//! MusicBrainz art resolver - two sequential lookups, one link.
//!
//! 1. Search the MusicBrainz catalog by artist + album, take the first
//!    release's id.
//! 2. Ask the Cover Art Archive for that release, take the first image's
//!    large thumbnail.
//!
//! Any failure at either step short-circuits; the orchestrator converts the
//! error into the placeholder sentinel. The resolver is idempotent, so the
//! musicbrainz upload method deliberately skips the art cache.

use super::coverart::CoverArtClient;
use super::musicbrainz::MusicBrainzClient;
use super::ArtError;

/// Resolves (artist, album) to a Cover Art Archive link.
pub struct MusicBrainzResolver {
    musicbrainz: MusicBrainzClient,
    coverart: CoverArtClient,
}

impl MusicBrainzResolver {
    pub fn new() -> Self {
        Self {
            musicbrainz: MusicBrainzClient::new(),
            coverart: CoverArtClient::new(),
        }
    }

    /// Look up an artwork link for the given artist and album.
    pub async fn resolve(&self, artist: &str, album: &str) -> Result<String, ArtError> {
        let release_id = self.musicbrainz.search_release(artist, album).await?;
        tracing::debug!("MusicBrainz matched release {}", release_id);

        let link = self.coverart.large_thumbnail(&release_id).await?;
        tracing::debug!("Cover Art Archive returned {}", link);

        Ok(link)
    }
}

impl Default for MusicBrainzResolver {
    fn default() -> Self {
        Self::new()
    }
}
