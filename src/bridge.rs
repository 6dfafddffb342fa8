//! Presence session.
//!
//! Owns the mutable session state (current track, playback timer) and drives
//! the event loop: one zone event in, at most one presence update out.
//! Events are processed strictly in order off a channel, so a half-applied
//! update can never race a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::art::{ArtOrchestrator, ArtRequest};
use crate::feed::{Zone, ZoneEventBody};
use crate::model::{PlaybackStatus, PlaybackTimer, TrackInfo};
use crate::presence::{ActivityPayload, PresenceUpdater};

/// One Roon-to-Discord session.
pub struct Bridge {
    track: TrackInfo,
    timer: PlaybackTimer,
    art: Arc<ArtOrchestrator>,
    presence: PresenceUpdater,
}

impl Bridge {
    pub fn new(art: Arc<ArtOrchestrator>, presence: PresenceUpdater) -> Self {
        Self {
            track: TrackInfo::default(),
            timer: PlaybackTimer::default(),
            art,
            presence,
        }
    }

    /// Process zone events until the feed closes.
    pub async fn run(&mut self, mut events: mpsc::Receiver<ZoneEventBody>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::info!("Zone event feed closed, ending session");
    }

    /// Apply one zone event.
    ///
    /// The initial snapshot, added zones, and changed zones all carry full
    /// zone state and are treated identically; the last zone in the event
    /// wins. Removed zones are only logged.
    async fn handle_event(&mut self, event: ZoneEventBody) {
        for id in &event.zones_removed {
            tracing::info!("Zone removed: {}", id);
        }

        let zones = event
            .zones
            .iter()
            .chain(event.zones_added.iter())
            .chain(event.zones_changed.iter());
        for zone in zones {
            self.apply_zone(zone).await;
        }
    }

    async fn apply_zone(&mut self, zone: &Zone) {
        let Some(now_playing) = &zone.now_playing else {
            tracing::debug!("Zone {} has nothing playing, skipping", zone.display_name);
            return;
        };

        // Overwrite the snapshot wholesale; no field survives from the
        // previous track.
        self.track = TrackInfo {
            song: now_playing.three_line.line1.clone(),
            artist: now_playing.three_line.line2.clone(),
            album: now_playing.three_line.line3.clone(),
            status: PlaybackStatus::from_zone_state(&zone.state),
            image_key: now_playing.image_key.clone(),
            zone_name: zone.display_name.clone(),
            length: now_playing.length,
        };
        self.timer.update(self.track.status, self.track.length);

        tracing::info!(
            "Now playing on {}: {} by {}",
            self.track.zone_name,
            self.track.song,
            self.track.artist
        );

        let request = ArtRequest {
            image_key: self.track.image_key.clone(),
            artist: self.track.artist.clone(),
            album: self.track.album.clone(),
            reason: format!("track change on {}", self.track.zone_name),
        };
        let art_link = self.art.resolve(&request).await;

        let payload = ActivityPayload::from_track(&self.track, &self.timer, &art_link);
        self.presence.push(&payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::art::cache::ArtCache;
    use crate::art::traits::mocks::{MockHost, MockLookup, MockSource};
    use crate::art::DEFAULT_ART;
    use crate::config::ArtUploadMethod;
    use crate::feed::{NowPlaying, ThreeLine};
    use crate::presence::mocks::MockPresenceClient;

    fn playing_zone(song: &str, artist: &str, album: &str, image_key: Option<&str>) -> Zone {
        Zone {
            display_name: "Living Room".to_string(),
            state: "playing".to_string(),
            now_playing: Some(NowPlaying {
                three_line: ThreeLine {
                    line1: song.to_string(),
                    line2: artist.to_string(),
                    line3: album.to_string(),
                },
                image_key: image_key.map(str::to_string),
                length: 180,
            }),
        }
    }

    fn bridge_with_mocks(
        method: ArtUploadMethod,
        cache: ArtCache,
    ) -> (Bridge, std::sync::Arc<std::sync::Mutex<Vec<ActivityPayload>>>) {
        let orchestrator = ArtOrchestrator::new(
            method,
            cache,
            Arc::new(MockSource::with_bytes(b"jpeg")),
            Some(Arc::new(MockHost::with_link("https://img.example/x.jpg"))),
            Arc::new(MockLookup::with_link("https://caa.example/y.jpg")),
            512,
            512,
        );
        let (client, pushed) = MockPresenceClient::new();
        let bridge = Bridge::new(
            Arc::new(orchestrator),
            PresenceUpdater::new(Box::new(client)),
        );
        (bridge, pushed)
    }

    fn temp_cache() -> (tempfile::TempDir, ArtCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ArtCache::load(dir.path().join("cached_art.json"));
        (dir, cache)
    }

    #[tokio::test]
    async fn test_track_change_pushes_presence() {
        let (_dir, cache) = temp_cache();
        let (mut bridge, pushed) = bridge_with_mocks(ArtUploadMethod::Imgur, cache);

        bridge
            .handle_event(ZoneEventBody {
                zones_changed: vec![playing_zone("Go!", "Public Service Broadcasting", "The Race for Space", Some("k1"))],
                ..Default::default()
            })
            .await;

        let pushed = pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].details, "Go!");
        assert_eq!(
            pushed[0].state,
            "Public Service Broadcasting — The Race for Space"
        );
        assert_eq!(pushed[0].large_image, "https://img.example/x.jpg");
        assert_eq!(pushed[0].large_text, "Listening on Living Room");
    }

    #[tokio::test]
    async fn test_track_without_art_uses_default_image() {
        let (_dir, cache) = temp_cache();
        let (mut bridge, pushed) = bridge_with_mocks(ArtUploadMethod::Imgur, cache);

        bridge
            .handle_event(ZoneEventBody {
                zones_changed: vec![playing_zone("Hidden Track", "Nobody", "Untitled", None)],
                ..Default::default()
            })
            .await;

        assert_eq!(pushed.lock().unwrap()[0].large_image, DEFAULT_ART);
    }

    #[tokio::test]
    async fn test_stopped_zone_pushes_nothing() {
        let (_dir, cache) = temp_cache();
        let (mut bridge, pushed) = bridge_with_mocks(ArtUploadMethod::None, cache);

        bridge
            .handle_event(ZoneEventBody {
                zones_changed: vec![Zone {
                    display_name: "Office".to_string(),
                    state: "stopped".to_string(),
                    now_playing: None,
                }],
                ..Default::default()
            })
            .await;

        assert!(pushed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_event_overwrites_snapshot() {
        let (_dir, cache) = temp_cache();
        let (mut bridge, pushed) = bridge_with_mocks(ArtUploadMethod::None, cache);

        bridge
            .handle_event(ZoneEventBody {
                zones_changed: vec![playing_zone("One", "A", "X", Some("k1"))],
                ..Default::default()
            })
            .await;
        bridge
            .handle_event(ZoneEventBody {
                zones_changed: vec![playing_zone("Two", "B", "Y", None)],
                ..Default::default()
            })
            .await;

        let pushed = pushed.lock().unwrap();
        assert_eq!(pushed.len(), 2);
        assert_eq!(pushed[1].details, "Two");
        assert_eq!(pushed[1].state, "B — Y");
        // The old image key must not leak into the new snapshot.
        assert!(bridge.track.image_key.is_none());
    }

    #[tokio::test]
    async fn test_run_drains_feed_in_order() {
        let (_dir, cache) = temp_cache();
        let (mut bridge, pushed) = bridge_with_mocks(ArtUploadMethod::None, cache);

        let (tx, rx) = mpsc::channel(8);
        for song in ["First", "Second", "Third"] {
            tx.send(ZoneEventBody {
                zones_changed: vec![playing_zone(song, "A", "X", None)],
                ..Default::default()
            })
            .await
            .unwrap();
        }
        drop(tx);

        bridge.run(rx).await;

        let pushed = pushed.lock().unwrap();
        let songs: Vec<_> = pushed.iter().map(|p| p.details.as_str()).collect();
        assert_eq!(songs, ["First", "Second", "Third"]);
    }
}
