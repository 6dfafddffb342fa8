//! Upload response envelopes.
//!
//! These types match EXACTLY what the hosting services return.
//! DO NOT use them outside the hosting module.

use serde::{Deserialize, Serialize};

/// Imgur upload response (https://apidocs.imgur.com).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImgurEnvelope {
    pub data: ImgurData,
    #[serde(default)]
    pub success: bool,
    pub status: Option<u32>,
}

/// The nested `data` object of an Imgur upload response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImgurData {
    /// Public link to the uploaded image
    pub link: Option<String>,
}

/// Self-hosted endpoint response: a flat success flag plus link.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelfHostEnvelope {
    #[serde(default)]
    pub success: bool,
    pub link: Option<String>,
    /// Optional error description on failure
    pub error: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_imgur_success() {
        let json = r#"{
            "data": {
                "id": "abc123",
                "link": "https://i.imgur.com/abc123.jpg",
                "type": "image/jpeg"
            },
            "success": true,
            "status": 200
        }"#;

        let envelope: ImgurEnvelope =
            serde_json::from_str(json).expect("Should parse imgur success");

        assert!(envelope.success);
        assert_eq!(
            envelope.data.link.as_deref(),
            Some("https://i.imgur.com/abc123.jpg")
        );
    }

    #[test]
    fn test_parse_imgur_failure() {
        let json = r#"{
            "data": {"error": "Invalid client_id"},
            "success": false,
            "status": 403
        }"#;

        let envelope: ImgurEnvelope =
            serde_json::from_str(json).expect("Should parse imgur failure");

        assert!(!envelope.success);
        assert!(envelope.data.link.is_none());
    }

    #[test]
    fn test_parse_selfhost_success() {
        let json = r#"{"success": true, "link": "https://img.example.net/x.jpg"}"#;

        let envelope: SelfHostEnvelope =
            serde_json::from_str(json).expect("Should parse selfhost success");

        assert!(envelope.success);
        assert_eq!(
            envelope.link.as_deref(),
            Some("https://img.example.net/x.jpg")
        );
    }

    #[test]
    fn test_parse_selfhost_failure_without_link() {
        let json = r#"{"success": false, "error": "disk full"}"#;

        let envelope: SelfHostEnvelope =
            serde_json::from_str(json).expect("Should parse selfhost failure");

        assert!(!envelope.success);
        assert!(envelope.link.is_none());
        assert_eq!(envelope.error.as_deref(), Some("disk full"));
    }
}
