//! Self-hosted upload backend.
//!
//! Multipart POST to a configurable endpoint with the fixed field name
//! `file`, plus an optional `Authorization: <type> <token>` header. The
//! endpoint answers with a flat `{success, link}` envelope; both the
//! authenticated and unauthenticated paths go through the same code, so a
//! failure is always a definite `Err`.

use reqwest::multipart;

use super::{dto, random_file_id, UPLOAD_FILE_ID_LEN};
use crate::art::ArtError;
use crate::config::SelfHostConfig;

/// Authorization header pieces for the self-hosted endpoint.
#[derive(Debug, Clone)]
struct AuthHeader {
    token_type: String,
    token: String,
}

/// Self-hosted image endpoint.
pub struct SelfHost {
    http_client: reqwest::Client,
    endpoint_url: String,
    auth: Option<AuthHeader>,
}

impl SelfHost {
    pub fn new(config: &SelfHostConfig) -> Self {
        let auth = (!config.auth_token_type.is_empty() && !config.auth_token.is_empty()).then(
            || AuthHeader {
                token_type: config.auth_token_type.clone(),
                token: config.auth_token.clone(),
            },
        );

        Self {
            http_client: reqwest::Client::new(),
            endpoint_url: config.endpoint_url.clone(),
            auth,
        }
    }

    /// Create a host for testing with a custom endpoint and no auth.
    #[cfg(test)]
    pub fn with_endpoint(endpoint_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint_url: endpoint_url.into(),
            auth: None,
        }
    }

    /// Upload image bytes, returning the public link.
    pub async fn upload(&self, image: &[u8], label: &str) -> Result<String, ArtError> {
        tracing::info!("Uploading art for {} to self-hosted endpoint", label);

        let file_name = format!("{}.jpg", random_file_id(UPLOAD_FILE_ID_LEN));
        let part = multipart::Part::bytes(image.to_vec())
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| ArtError::Upload(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let mut request = self.http_client.post(&self.endpoint_url).multipart(form);
        if let Some(ref auth) = self.auth {
            request = request.header(
                "Authorization",
                format!("{} {}", auth.token_type, auth.token),
            );
        }

        let response = request
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
            .json::<dto::SelfHostEnvelope>()
            .await
            .map_err(|e| ArtError::Parse(e.to_string()))?;

        // Only a success envelope with a link counts as an upload.
        if !envelope.success {
            return Err(ArtError::Upload(
                envelope
                    .error
                    .unwrap_or_else(|| "endpoint reported failure".to_string()),
            ));
        }

        envelope
            .link
            .ok_or_else(|| ArtError::Upload("success envelope carried no link".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_requires_both_type_and_token() {
        let config = SelfHostConfig {
            endpoint_url: "https://img.example.net/upload".to_string(),
            auth_token_type: "Bearer".to_string(),
            auth_token: String::new(),
        };
        let host = SelfHost::new(&config);
        assert!(host.auth.is_none());

        let config = SelfHostConfig {
            auth_token: "secret".to_string(),
            ..config
        };
        let host = SelfHost::new(&config);
        assert!(host.auth.is_some());
    }

    #[test]
    fn test_host_keeps_configured_endpoint() {
        let host = SelfHost::with_endpoint("http://localhost:8000/upload");
        assert_eq!(host.endpoint_url, "http://localhost:8000/upload");
    }
}
