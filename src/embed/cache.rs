// Time-expiring thumbnail cache stores

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use super::config::CacheBackend;
use super::errors::EmbedError;
use super::models::ThumbnailSet;

/// Keyed store with per-entry expiry.
///
/// Writes are idempotent for a key, so concurrent renders racing on the
/// same video simply overwrite each other.
#[async_trait]
pub trait ThumbnailCache: Send + Sync {
    /// Fresh value for `key`, `None` on miss or expiry
    async fn get(&self, key: &str) -> Result<Option<ThumbnailSet>, EmbedError>;

    async fn set(&self, key: &str, value: &ThumbnailSet, ttl: time::Duration) -> Result<(), EmbedError>;

    /// External purge
    async fn delete(&self, key: &str) -> Result<(), EmbedError>;
}

/// Build the configured cache backend
pub fn from_backend(backend: &CacheBackend) -> Arc<dyn ThumbnailCache> {
    match backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::File(dir) => Arc::new(FileCache::new(dir.clone())),
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: ThumbnailSet,
    expires_at: OffsetDateTime,
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, MemoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ThumbnailCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<ThumbnailSet>, EmbedError> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > OffsetDateTime::now_utc() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => {}
            None => return Ok(None),
        }

        debug!("[Cache] Expired {}", key);
        entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &ThumbnailSet, ttl: time::Duration) -> Result<(), EmbedError> {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.lock();

        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.len() < before {
            debug!("[Cache] Swept {} expired entries", before - entries.len());
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), EmbedError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    /// Unix timestamp (seconds)
    expires_at: i64,
    value: ThumbnailSet,
}

/// One JSON file per key. Expired or unreadable files count as misses.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Percent-encoded key, so distinct keys never share a file and `/`
    /// cannot leave the cache directory
    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.dir.join(format!("{}.json", file))
    }
}

#[async_trait]
impl ThumbnailCache for FileCache {
    async fn get(&self, key: &str) -> Result<Option<ThumbnailSet>, EmbedError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: FileEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("[Cache] Discarding corrupt {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        if entry.expires_at <= OffsetDateTime::now_utc().unix_timestamp() {
            debug!("[Cache] Expired {}", key);
            let _ = tokio::fs::remove_file(&path).await;
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: &ThumbnailSet, ttl: time::Duration) -> Result<(), EmbedError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let entry = FileEntry {
            expires_at: (OffsetDateTime::now_utc() + ttl).unix_timestamp(),
            value: value.clone(),
        };
        let json = serde_json::to_vec(&entry)?;

        // write-then-rename so readers never see a partial file
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), EmbedError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
