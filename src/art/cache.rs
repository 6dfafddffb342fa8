//! Persistent album-art link cache.
//!
//! Maps an [`AlbumKey`] to a previously resolved artwork link so a known
//! album never triggers a second upload. The cache is a single JSON file,
//! loaded once at startup and rewritten wholesale on every append.
//! Entries are append-only; nothing is updated or deleted in place.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::AlbumKey;

/// One resolved artwork link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(flatten)]
    pub key: AlbumKey,
    pub link: String,
}

/// In-memory view of the on-disk art cache.
pub struct ArtCache {
    path: PathBuf,
    entries: Vec<CacheEntry>,
}

impl ArtCache {
    /// Load the cache from `path`.
    ///
    /// Fails soft: a missing file initializes an empty cache and persists it
    /// immediately; a read or parse failure degrades to an empty in-memory
    /// cache with an error log. Startup never aborts because of the cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.exists() {
            let cache = Self {
                path,
                entries: Vec::new(),
            };
            if let Err(e) = cache.persist() {
                tracing::error!("Failed to create art cache at {:?}: {}", cache.path, e);
            } else {
                tracing::info!("Created empty art cache at {:?}", cache.path);
            }
            return cache;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<CacheEntry>>(&contents) {
                Ok(entries) => {
                    tracing::info!("Loaded {} cached art links from {:?}", entries.len(), path);
                    entries
                }
                Err(e) => {
                    tracing::error!("Failed to parse art cache {:?}: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read art cache {:?}: {}", path, e);
                Vec::new()
            }
        };

        Self { path, entries }
    }

    /// Find the first entry for `key`, if any.
    ///
    /// Absence is an expected outcome, not a failure. Comparison is exact
    /// and case-sensitive; duplicate entries are tolerated, the first wins.
    pub fn find(&self, key: &AlbumKey) -> Option<&CacheEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Append an entry and rewrite the persisted file.
    ///
    /// A write failure is logged but does not roll back the in-memory
    /// append; memory stays authoritative for the rest of the process.
    pub fn append(&mut self, key: AlbumKey, link: impl Into<String>) {
        self.entries.push(CacheEntry {
            key,
            link: link.into(),
        });
        if let Err(e) = self.persist() {
            tracing::error!("Failed to write art cache to {:?}: {}", self.path, e);
        }
    }

    /// Number of cached links.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), std::io::Error> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string(&self.entries)?;
        fs::write(&self.path, contents)
    }
}
