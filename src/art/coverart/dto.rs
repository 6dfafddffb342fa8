//! Cover Art Archive API Data Transfer Objects
//!
//! The Cover Art Archive (https://coverartarchive.org) provides album artwork
//! for MusicBrainz releases. It's a free service with no API key required.
//!
//! API Reference: https://wiki.musicbrainz.org/Cover_Art_Archive/API

use serde::{Deserialize, Serialize};

/// Cover art listing for a release
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoverArtResponse {
    /// Array of images for this release
    #[serde(default)]
    pub images: Vec<Image>,
    /// URL of the release on MusicBrainz
    pub release: Option<String>,
}

/// A single cover art image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    /// Whether this is the front cover
    #[serde(default)]
    pub front: bool,
    /// Whether this is the back cover
    #[serde(default)]
    pub back: bool,
    /// Image types (Front, Back, Booklet, etc.)
    #[serde(default)]
    pub types: Vec<String>,
    /// URL to full-size image
    pub image: String,
    /// Thumbnail URLs
    pub thumbnails: Thumbnails,
}

/// Available thumbnail sizes.
///
/// The archive serves both legacy named keys ("small"/"large") and
/// pixel-size keys; the named ones are what we read.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Thumbnails {
    /// 250px thumbnail (legacy name)
    pub small: Option<String>,
    /// 500px thumbnail (legacy name)
    pub large: Option<String>,
    /// 1200px thumbnail (if available)
    #[serde(rename = "1200")]
    pub xlarge: Option<String>,
}
