//! Cover Art Archive HTTP client
//!
//! Fetches album artwork links from the Cover Art Archive.
//! No API key required, but please respect their rate limits.
//!
//! API: https://coverartarchive.org

use super::dto;
use crate::art::ArtError;

/// Cover Art Archive client
pub struct CoverArtClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CoverArtClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: "https://coverartarchive.org".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Get the first image's large-thumbnail link for a release.
    ///
    /// A release with no images, or whose first image has no large
    /// thumbnail, is [`ArtError::NoMatches`].
    pub async fn large_thumbnail(&self, release_id: &str) -> Result<String, ArtError> {
        let listing = self.list_cover_art(release_id).await?;

        listing
            .images
            .first()
            .and_then(|image| image.thumbnails.large.clone())
            .ok_or(ArtError::NoMatches)
    }

    /// List all cover art for a release
    async fn list_cover_art(&self, release_id: &str) -> Result<dto::CoverArtResponse, ArtError> {
        let url = format!("{}/release/{}/", self.base_url, release_id);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ArtError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArtError::NoMatches);
        }

        if !status.is_success() {
            return Err(ArtError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::CoverArtResponse>()
            .await
            .map_err(|e| ArtError::Parse(e.to_string()))
    }
}

impl Default for CoverArtClient {
    fn default() -> Self {
        Self::new()
    }
}
