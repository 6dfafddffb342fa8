//! Discord presence layer.
//!
//! Builds the activity payload from the current track snapshot and pushes it
//! over the Discord IPC socket. Push failures are logged and dropped; the
//! next zone event simply tries again, so a Discord restart never takes the
//! bridge down.

mod discord;

pub use discord::DiscordPresence;

use crate::model::{PlaybackTimer, TrackInfo};

/// Everything one presence update carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityPayload {
    /// Song title (top line).
    pub details: String,
    /// "artist — album" (second line).
    pub state: String,
    /// Unix seconds for the elapsed/remaining display.
    pub start: i64,
    pub end: i64,
    /// Album art link or a named default asset.
    pub large_image: String,
    /// Hover text on the art.
    pub large_text: String,
    /// Play/pause indicator asset name.
    pub small_image: String,
    pub small_text: String,
}

impl ActivityPayload {
    /// Build a payload from a track snapshot, its timer, and the art link.
    pub fn from_track(track: &TrackInfo, timer: &PlaybackTimer, art_link: &str) -> Self {
        let (small_image, small_text) = track.status.icon();
        Self {
            details: track.song.clone(),
            state: format!("{} — {}", track.artist, track.album),
            start: timer.start.timestamp(),
            end: timer.end.timestamp(),
            large_image: art_link.to_string(),
            large_text: format!("Listening on {}", track.zone_name),
            small_image: small_image.to_string(),
            small_text: small_text.to_string(),
        }
    }
}

/// Presence transport errors
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Discord IPC error: {0}")]
    Client(String),

    #[error("Not connected to Discord")]
    NotConnected,
}

/// Connection to a presence display.
pub trait PresenceClient: Send {
    fn connect(&mut self) -> Result<(), PresenceError>;
    fn set_activity(&mut self, payload: &ActivityPayload) -> Result<(), PresenceError>;
    fn clear_activity(&mut self) -> Result<(), PresenceError>;
}

/// Pushes activity updates, absorbing transport failures.
pub struct PresenceUpdater {
    client: Box<dyn PresenceClient>,
    connected: bool,
}

impl PresenceUpdater {
    pub fn new(client: Box<dyn PresenceClient>) -> Self {
        Self {
            client,
            connected: false,
        }
    }

    /// Connect to Discord. A failure here is logged; `push` retries later.
    pub fn connect(&mut self) {
        match self.client.connect() {
            Ok(()) => {
                tracing::info!("Connected to Discord");
                self.connected = true;
            }
            Err(e) => {
                tracing::warn!("Could not connect to Discord (is it running?): {}", e);
            }
        }
    }

    /// Push one activity update. Never fails; a dropped update is only a
    /// stale presence until the next event.
    pub fn push(&mut self, payload: &ActivityPayload) {
        if !self.connected {
            self.connect();
            if !self.connected {
                return;
            }
        }

        if let Err(e) = self.client.set_activity(payload) {
            tracing::warn!("Failed to update presence: {}", e);
            self.connected = false;
        } else {
            tracing::debug!("Presence updated: {}", payload.details);
        }
    }

    /// Clear the activity, e.g. when the tracked zone disappears.
    pub fn clear(&mut self) {
        if !self.connected {
            return;
        }
        if let Err(e) = self.client.clear_activity() {
            tracing::warn!("Failed to clear presence: {}", e);
            self.connected = false;
        }
    }
}

#[cfg(test)]
pub mod mocks {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every payload it is handed; optionally fails each call.
    pub struct MockPresenceClient {
        pub pushed: Arc<Mutex<Vec<ActivityPayload>>>,
        pub fail: bool,
    }

    impl MockPresenceClient {
        pub fn new() -> (Self, Arc<Mutex<Vec<ActivityPayload>>>) {
            let pushed = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    pushed: Arc::clone(&pushed),
                    fail: false,
                },
                pushed,
            )
        }

        pub fn failing() -> Self {
            Self {
                pushed: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            }
        }
    }

    impl PresenceClient for MockPresenceClient {
        fn connect(&mut self) -> Result<(), PresenceError> {
            if self.fail {
                Err(PresenceError::Client("socket missing".to_string()))
            } else {
                Ok(())
            }
        }

        fn set_activity(&mut self, payload: &ActivityPayload) -> Result<(), PresenceError> {
            if self.fail {
                return Err(PresenceError::Client("pipe closed".to_string()));
            }
            self.pushed.lock().unwrap().push(payload.clone());
            Ok(())
        }

        fn clear_activity(&mut self) -> Result<(), PresenceError> {
            if self.fail {
                return Err(PresenceError::Client("pipe closed".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockPresenceClient;
    use super::*;
    use crate::model::{PlaybackStatus, PlaybackTimer, TrackInfo};

    fn sample_track() -> TrackInfo {
        TrackInfo {
            song: "Roads".to_string(),
            artist: "Portishead".to_string(),
            album: "Dummy".to_string(),
            status: PlaybackStatus::Playing,
            image_key: Some("k1".to_string()),
            zone_name: "Study".to_string(),
            length: 307,
        }
    }

    #[test]
    fn test_payload_fields_from_track() {
        let track = sample_track();
        let mut timer = PlaybackTimer::default();
        timer.update(track.status, track.length);

        let payload = ActivityPayload::from_track(&track, &timer, "https://img.example/a.jpg");

        assert_eq!(payload.details, "Roads");
        assert_eq!(payload.state, "Portishead — Dummy");
        assert_eq!(payload.large_image, "https://img.example/a.jpg");
        assert_eq!(payload.large_text, "Listening on Study");
        assert_eq!(payload.small_image, "pause_dark");
        assert_eq!(payload.small_text, "Currently listening.");
        assert_eq!(payload.end - payload.start, 307);
    }

    #[test]
    fn test_paused_payload_uses_play_icon() {
        let mut track = sample_track();
        track.status = PlaybackStatus::Paused;
        let mut timer = PlaybackTimer::default();
        timer.update(track.status, track.length);

        let payload = ActivityPayload::from_track(&track, &timer, "main");
        assert_eq!(payload.small_image, "play_dark");
        assert_eq!(payload.small_text, "Not listening right now.");
        assert_eq!(payload.start, payload.end);
    }

    #[test]
    fn test_push_delivers_payload() {
        let (client, pushed) = MockPresenceClient::new();
        let mut updater = PresenceUpdater::new(Box::new(client));

        let track = sample_track();
        let timer = PlaybackTimer::default();
        updater.push(&ActivityPayload::from_track(&track, &timer, "main"));

        let pushed = pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].details, "Roads");
    }

    #[test]
    fn test_push_absorbs_client_failure() {
        let mut updater = PresenceUpdater::new(Box::new(MockPresenceClient::failing()));

        let track = sample_track();
        let timer = PlaybackTimer::default();
        // Must not panic or propagate.
        updater.push(&ActivityPayload::from_track(&track, &timer, "main"));
        updater.clear();
    }
}
