//! Roon core image service client.
//!
//! The core serves raster image bytes for the opaque `image_key` carried in
//! each zone's now-playing block. We always request JPEG at the configured
//! target dimensions with `scale=fit`.

use crate::art::ArtError;

/// HTTP client for the core's image endpoint.
pub struct RoonImageClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RoonImageClient {
    /// Create a client against the core's image service URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch raw JPEG bytes for an image key at the given dimensions.
    pub async fn fetch(
        &self,
        image_key: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ArtError> {
        let url = format!(
            "{}/api/image/{}?scale=fit&width={}&height={}&format=image/jpeg",
            self.base_url, image_key, width, height
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ArtError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            return Err(ArtError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArtError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
