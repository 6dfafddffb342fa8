//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.

use super::dto;
use crate::art::ArtError;

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "rooncord/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/rooncord)"
);

impl MusicBrainzClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://musicbrainz.org/ws/2".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Search releases by artist and album, returning the first match's id.
    ///
    /// Both terms are percent-encoded into a Lucene `artist:X+release:Y`
    /// query. An empty result set is [`ArtError::NoMatches`].
    pub async fn search_release(&self, artist: &str, album: &str) -> Result<String, ArtError> {
        let response = self.send_search_request(artist, album).await?;

        response
            .releases
            .first()
            .map(|release| release.id.clone())
            .ok_or(ArtError::NoMatches)
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<dto::ReleaseSearchResponse, ArtError> {
        let url = format!(
            "{}/release/?query=artist:{}+release:{}&fmt=json",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(album)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ArtError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArtError::NoMatches);
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(ArtError::Api(error.error));
            }
            return Err(ArtError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::ReleaseSearchResponse>()
            .await
            .map_err(|e| ArtError::Parse(e.to_string()))
    }
}

impl Default for MusicBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}
