//! Trait definitions for the art pipeline's external collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.

use async_trait::async_trait;

use super::ArtError;

/// Source of raw image bytes for an opaque art reference.
#[async_trait]
pub trait ArtSource: Send + Sync {
    /// Fetch raw image bytes for `image_key` at the given dimensions.
    async fn fetch(&self, image_key: &str, width: u32, height: u32)
        -> Result<Vec<u8>, ArtError>;
}

/// An image hosting backend.
#[async_trait]
pub trait ArtHost: Send + Sync {
    /// Upload image bytes and return the public link.
    ///
    /// `label` identifies the album in logs only.
    async fn upload(&self, image: &[u8], label: &str) -> Result<String, ArtError>;
}

/// Metadata-service lookup from (artist, album) to an artwork link.
#[async_trait]
pub trait ReleaseArtLookup: Send + Sync {
    async fn resolve(&self, artist: &str, album: &str) -> Result<String, ArtError>;
}

// Implement traits for real clients

#[async_trait]
impl ArtSource for super::source::RoonImageClient {
    async fn fetch(
        &self,
        image_key: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ArtError> {
        self.fetch(image_key, width, height).await
    }
}

#[async_trait]
impl ArtHost for super::hosting::ImgurHost {
    async fn upload(&self, image: &[u8], label: &str) -> Result<String, ArtError> {
        self.upload(image, label).await
    }
}

#[async_trait]
impl ArtHost for super::hosting::SelfHost {
    async fn upload(&self, image: &[u8], label: &str) -> Result<String, ArtError> {
        self.upload(image, label).await
    }
}

#[async_trait]
impl ReleaseArtLookup for super::resolver::MusicBrainzResolver {
    async fn resolve(&self, artist: &str, album: &str) -> Result<String, ArtError> {
        self.resolve(artist, album).await
    }
}
