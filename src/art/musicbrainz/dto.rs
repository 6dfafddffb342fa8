//! MusicBrainz API Data Transfer Objects
//!
//! These types match EXACTLY what the MusicBrainz release search returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the musicbrainz module.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API/Search
//!
//! We only use the /release search endpoint
//! (`/ws/2/release/?query=artist:X+release:Y&fmt=json`).

use serde::{Deserialize, Serialize};

/// Release search response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseSearchResponse {
    /// Total number of matches
    pub count: Option<u32>,
    /// Matched releases, best match first
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// A matched release.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    /// Release title
    pub title: Option<String>,
    /// Search relevance score (0-100)
    pub score: Option<u32>,
    /// Release status (Official, Bootleg, etc.)
    pub status: Option<String>,
}

/// Error response from MusicBrainz API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
    pub help: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
