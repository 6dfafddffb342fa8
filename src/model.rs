//! Core data types for the presence session.
//!
//! `TrackInfo` is the bridge's snapshot of what a zone is playing; it is
//! overwritten wholesale on every zone event rather than patched field by
//! field. `PlaybackTimer` derives the Discord timestamp pair from the
//! playback status and track length.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Playback state of a zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Unknown,
}

impl PlaybackStatus {
    /// Map a zone state string to a status.
    ///
    /// Anything that is not `"playing"` or `"paused"` (including `"loading"`
    /// and `"stopped"`) maps to `Unknown`.
    pub fn from_zone_state(state: &str) -> Self {
        match state {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            _ => Self::Unknown,
        }
    }

    /// Small presence icon and hover text for this status.
    pub fn icon(&self) -> (&'static str, &'static str) {
        match self {
            Self::Playing => ("pause_dark", "Currently listening."),
            Self::Paused => ("play_dark", "Not listening right now."),
            Self::Unknown => ("play_dark", ""),
        }
    }
}

/// Snapshot of what a zone is currently playing.
#[derive(Debug, Clone, Default)]
pub struct TrackInfo {
    pub song: String,
    pub artist: String,
    pub album: String,
    pub status: PlaybackStatus,
    /// Opaque art reference from the core, when the track has art.
    pub image_key: Option<String>,
    pub zone_name: String,
    /// Track length in seconds.
    pub length: u64,
}

/// Start/end timestamp pair for the presence elapsed/remaining display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTimer {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Default for PlaybackTimer {
    fn default() -> Self {
        let now = Utc::now();
        Self { start: now, end: now }
    }
}

impl PlaybackTimer {
    /// Recompute the pair from the current wall clock.
    pub fn update(&mut self, status: PlaybackStatus, length_secs: u64) {
        self.update_at(Utc::now(), status, length_secs);
    }

    /// Recompute the pair from an explicit `now`.
    ///
    /// Playing: start = now, end = now + length, so elapsed time counts up
    /// from zero on every track change. Paused or unknown: both collapse to
    /// now, freezing the display.
    pub fn update_at(&mut self, now: DateTime<Utc>, status: PlaybackStatus, length_secs: u64) {
        match status {
            PlaybackStatus::Playing => {
                self.start = now;
                self.end = now + Duration::from_secs(length_secs);
            }
            PlaybackStatus::Paused | PlaybackStatus::Unknown => {
                self.start = now;
                self.end = now;
            }
        }
    }
}
