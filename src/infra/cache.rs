//! Rune image cache with TTL, bounded size and an optional on-disk snapshot.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::util::persistence::{read_json, write_json, SnapshotError};

const CACHE_DIR: &str = "rune-break";
const CACHE_FILENAME: &str = "rune_images.json";

pub const DEFAULT_IMAGE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_IMAGE_CAPACITY: usize = 512;

/// Image lookup result. `image == None` records that the catalog has no
/// picture for the rune.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedImage {
    pub image: Option<String>,
    /// Unix timestamp (seconds).
    pub cached_at: u64,
}

impl CachedImage {
    fn is_expired(&self, ttl: Duration, now: u64) -> bool {
        now.saturating_sub(self.cached_at) > ttl.as_secs()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageCacheSnapshot {
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub entries: HashMap<String, CachedImage>,
}

/// Rune name → image URL memo shared by concurrent lookups.
#[derive(Debug)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, CachedImage>>,
    capacity: usize,
    ttl: Duration,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_CAPACITY, DEFAULT_IMAGE_TTL)
    }
}

impl ImageCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// `Some(lookup)` for a fresh entry, `None` on a miss or expiry.
    pub async fn get(&self, rune_name: &str) -> Option<Option<String>> {
        self.get_at(rune_name, now_secs()).await
    }

    async fn get_at(&self, rune_name: &str, now: u64) -> Option<Option<String>> {
        let mut entries = self.entries.lock().await;
        match entries.get(rune_name) {
            Some(entry) if entry.is_expired(self.ttl, now) => {
                debug!(rune = rune_name, "image cache entry expired");
                entries.remove(rune_name);
                None
            }
            Some(entry) => Some(entry.image.clone()),
            None => None,
        }
    }

    pub async fn insert(&self, rune_name: &str, image: Option<String>) {
        self.insert_at(rune_name, image, now_secs()).await;
    }

    async fn insert_at(&self, rune_name: &str, image: Option<String>, cached_at: u64) {
        let mut entries = self.entries.lock().await;
        entries.insert(rune_name.to_string(), CachedImage { image, cached_at });
        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by(|a, b| a.1.cached_at.cmp(&b.1.cached_at).then_with(|| a.0.cmp(b.0)))
                .map(|(name, _)| name.clone());
            match oldest {
                Some(name) => {
                    entries.remove(&name);
                }
                None => break,
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn snapshot(&self) -> ImageCacheSnapshot {
        let entries = self.entries.lock().await.clone();
        ImageCacheSnapshot {
            saved_at: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
            entries,
        }
    }

    /// Loads a snapshot, dropping entries that already expired.
    pub async fn restore(&self, snapshot: ImageCacheSnapshot) {
        let now = now_secs();
        let mut fresh: Vec<_> = snapshot
            .entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_expired(self.ttl, now))
            .collect();
        fresh.sort_by_key(|(_, entry)| entry.cached_at);
        for (name, entry) in fresh {
            self.insert_at(&name, entry.image, entry.cached_at).await;
        }
    }

    pub async fn load_from(&self, path: &Path) -> Result<usize, SnapshotError> {
        let snapshot: ImageCacheSnapshot = read_json(path)?;
        self.restore(snapshot).await;
        let count = self.len().await;
        info!(path = %path.display(), entries = count, "loaded image cache");
        Ok(count)
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), SnapshotError> {
        let snapshot = self.snapshot().await;
        write_json(path, &snapshot)?;
        info!(path = %path.display(), entries = snapshot.entries.len(), "saved image cache");
        Ok(())
    }
}

/// Default snapshot location in the platform's local data directory.
pub fn default_cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_DIR)
            .join(CACHE_FILENAME)
    })
    .clone()
}

/// Restores the cache from `path` if a snapshot is there. Problems are logged.
pub async fn load_if_present(cache: &ImageCache, path: &Path) {
    if !path.exists() {
        debug!(path = %path.display(), "no image cache snapshot");
        return;
    }
    if let Err(err) = cache.load_from(path).await {
        warn!(path = %path.display(), error = %err, "ignoring unreadable image cache");
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hit_miss_and_negative_entries() {
        let cache = ImageCache::default();
        assert_eq!(cache.get("Vi Rune").await, None);

        cache.insert("Vi Rune", Some("https://img/vi.png".into())).await;
        cache.insert("Pod Rune", None).await;

        assert_eq!(cache.get("Vi Rune").await, Some(Some("https://img/vi.png".into())));
        assert_eq!(cache.get("Pod Rune").await, Some(None));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = ImageCache::new(8, Duration::from_secs(60));
        cache.insert_at("Str Rune", Some("a".into()), 1_000).await;
        assert!(cache.get_at("Str Rune", 1_060).await.is_some());
        assert_eq!(cache.get_at("Str Rune", 1_061).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn oldest_entry_is_evicted_at_capacity() {
        let cache = ImageCache::new(2, DEFAULT_IMAGE_TTL);
        let now = now_secs();
        cache.insert_at("a", None, now - 30).await;
        cache.insert_at("b", None, now - 20).await;
        cache.insert_at("c", None, now - 10).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("a").await, None);
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn snapshot_survives_a_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CACHE_FILENAME);

        let cache = ImageCache::default();
        cache.insert("Ga Pa Rune", Some("https://img/ap.png".into())).await;
        cache.save_to(&path).await.unwrap();

        let restored = ImageCache::default();
        assert_eq!(restored.load_from(&path).await.unwrap(), 1);
        assert_eq!(
            restored.get("Ga Pa Rune").await,
            Some(Some("https://img/ap.png".into()))
        );
    }

    #[tokio::test]
    async fn expired_snapshot_entries_are_dropped() {
        let mut entries = HashMap::new();
        entries.insert(
            "old".to_string(),
            CachedImage {
                image: None,
                cached_at: 0,
            },
        );
        let cache = ImageCache::new(8, Duration::from_secs(60));
        cache
            .restore(ImageCacheSnapshot {
                saved_at: None,
                entries,
            })
            .await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn missing_snapshot_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ImageCache::default();
        load_if_present(&cache, &dir.path().join("absent.json")).await;
        assert!(cache.is_empty().await);
    }
}
