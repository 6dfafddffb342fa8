//! Art resolution orchestrator.
//!
//! Decides, per track-change event, how art is obtained and emits a final
//! link (or [`DEFAULT_ART`]) for the presence updater:
//!
//! - method `none`: placeholder, no external calls
//! - method `musicbrainz`: delegate to the metadata-service resolver,
//!   bypassing the cache (the resolver's lookup is idempotent)
//! - method `imgur`/`self`: cache lookup, then fetch bytes from the playback
//!   source and upload on a miss, appending the new link to the cache
//!
//! Every failure below this layer degrades to the placeholder here; nothing
//! propagates upward. A per-key in-flight map keeps overlapping resolutions
//! of the same album from uploading twice: later callers await the first
//! resolution's result instead of re-dispatching.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::cache::ArtCache;
use super::traits::{ArtHost, ArtSource, ReleaseArtLookup};
use super::{AlbumKey, DEFAULT_ART};
use crate::config::ArtUploadMethod;

/// One art resolution request, taken from a zone update.
#[derive(Debug, Clone)]
pub struct ArtRequest {
    /// Opaque image reference from the playback source
    pub image_key: Option<String>,
    pub artist: String,
    pub album: String,
    /// Free text for logging only
    pub reason: String,
}

/// Coordinates cache, playback-source image fetch, hosting backends and the
/// metadata-service resolver.
pub struct ArtOrchestrator {
    method: ArtUploadMethod,
    width: u32,
    height: u32,
    cache: Mutex<ArtCache>,
    in_flight: Mutex<HashMap<AlbumKey, watch::Receiver<Option<String>>>>,
    source: Arc<dyn ArtSource>,
    host: Option<Arc<dyn ArtHost>>,
    lookup: Arc<dyn ReleaseArtLookup>,
}

impl ArtOrchestrator {
    pub fn new(
        method: ArtUploadMethod,
        cache: ArtCache,
        source: Arc<dyn ArtSource>,
        host: Option<Arc<dyn ArtHost>>,
        lookup: Arc<dyn ReleaseArtLookup>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            method,
            width,
            height,
            cache: Mutex::new(cache),
            in_flight: Mutex::new(HashMap::new()),
            source,
            host,
            lookup,
        }
    }

    /// Resolve artwork for a track change. Always returns a usable link,
    /// falling back to [`DEFAULT_ART`].
    pub async fn resolve(&self, request: &ArtRequest) -> String {
        match self.method {
            ArtUploadMethod::None => {
                tracing::debug!("Art uploads disabled, using default image");
                DEFAULT_ART.to_string()
            }
            ArtUploadMethod::MusicBrainz | ArtUploadMethod::Unknown => {
                match self.lookup.resolve(&request.artist, &request.album).await {
                    Ok(link) => {
                        tracing::info!("Returning MusicBrainz match for {}", request.album);
                        link
                    }
                    Err(e) => {
                        tracing::warn!("MusicBrainz resolution failed for {}: {}", request.album, e);
                        DEFAULT_ART.to_string()
                    }
                }
            }
            ArtUploadMethod::Imgur | ArtUploadMethod::SelfHost => {
                self.resolve_via_host(request).await
            }
        }
    }

    async fn resolve_via_host(&self, request: &ArtRequest) -> String {
        let Some(ref host) = self.host else {
            tracing::error!("No upload backend configured, using default image");
            return DEFAULT_ART.to_string();
        };

        let key = AlbumKey::new(&request.artist, &request.album);

        if let Some(entry) = self.cache.lock().await.find(&key) {
            tracing::info!("Re-using cached art link for {}", key);
            return entry.link.clone();
        }

        // Join an in-flight resolution for this key, or claim the slot.
        let claimed = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(rx) = in_flight.get(&key) {
                Err(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                in_flight.insert(key.clone(), rx);
                Ok(tx)
            }
        };

        let tx = match claimed {
            Ok(tx) => tx,
            Err(mut rx) => {
                tracing::debug!("Awaiting in-flight resolution for {}", key);
                return match rx.wait_for(Option::is_some).await {
                    Ok(link) => link.clone().unwrap_or_else(|| DEFAULT_ART.to_string()),
                    Err(_) => DEFAULT_ART.to_string(),
                };
            }
        };

        // Recheck after winning the slot; a finished leader appends to the
        // cache before releasing its entry.
        if let Some(entry) = self.cache.lock().await.find(&key) {
            let link = entry.link.clone();
            let _ = tx.send(Some(link.clone()));
            self.in_flight.lock().await.remove(&key);
            return link;
        }

        tracing::info!("[{}] No cached art for {}", request.reason, key);
        let link = self
            .fetch_and_upload(host.as_ref(), &key, request)
            .await
            .unwrap_or_else(|| DEFAULT_ART.to_string());

        let _ = tx.send(Some(link.clone()));
        self.in_flight.lock().await.remove(&key);
        link
    }

    /// Fetch bytes from the playback source and upload them. `None` means
    /// the caller falls back to the placeholder; the cache is only written
    /// on a successful upload.
    async fn fetch_and_upload(
        &self,
        host: &dyn ArtHost,
        key: &AlbumKey,
        request: &ArtRequest,
    ) -> Option<String> {
        let Some(image_key) = request.image_key.as_deref() else {
            tracing::warn!("Zone update for {} carried no image key", key);
            return None;
        };

        let bytes = match self.source.fetch(image_key, self.width, self.height).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to fetch art bytes for {}: {}", key, e);
                return None;
            }
        };

        match host.upload(&bytes, &key.to_string()).await {
            Ok(link) => {
                self.cache.lock().await.append(key.clone(), &link);
                tracing::info!("Uploaded and cached art for {}", key);
                Some(link)
            }
            Err(e) => {
                tracing::warn!("Upload failed for {}, not caching: {}", key, e);
                None
            }
        }
    }

    /// Number of cached links (for startup logging).
    pub async fn cached_links(&self) -> usize {
        self.cache.lock().await.len()
    }
}
