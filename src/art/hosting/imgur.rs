//! Imgur upload backend.
//!
//! Anonymous client-ID uploads: a multipart POST with the image bytes and a
//! `type` field, authorized with a `Client-ID` header. The public link comes
//! back in the nested `data.link` field.

use reqwest::multipart;

use super::{dto, random_file_id, UPLOAD_FILE_ID_LEN};
use crate::art::ArtError;
use crate::config::ImgurConfig;

/// Imgur-backed image host.
pub struct ImgurHost {
    http_client: reqwest::Client,
    upload_url: String,
    client_id: String,
    image_field: String,
    file_type: String,
}

impl ImgurHost {
    pub fn new(config: &ImgurConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            client_id: config.client_id.clone(),
            image_field: config.upload_field.clone(),
            file_type: config.file_type.clone(),
        }
    }

    /// Create a host for testing with a custom upload URL.
    #[cfg(test)]
    pub fn with_upload_url(upload_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            upload_url: upload_url.into(),
            client_id: client_id.into(),
            image_field: "image".to_string(),
            file_type: "file".to_string(),
        }
    }

    /// Upload image bytes, returning the public link.
    pub async fn upload(&self, image: &[u8], label: &str) -> Result<String, ArtError> {
        tracing::info!("Uploading art for {} to Imgur", label);

        let file_name = format!("{}.jpg", random_file_id(UPLOAD_FILE_ID_LEN));
        let part = multipart::Part::bytes(image.to_vec())
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| ArtError::Upload(e.to_string()))?;
        let form = multipart::Form::new()
            .part(self.image_field.clone(), part)
            .text("type", self.file_type.clone());

        let response = self
            .http_client
            .post(&self.upload_url)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ArtError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtError::Upload(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let envelope = response
            .json::<dto::ImgurEnvelope>()
            .await
            .map_err(|e| ArtError::Parse(e.to_string()))?;

        envelope
            .data
            .link
            .ok_or_else(|| ArtError::Upload("response carried no link".to_string()))
    }
}
