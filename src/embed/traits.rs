// Provider trait and the shared context handed to provider instances

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::cache::ThumbnailCache;
use super::config::{Endpoints, FacadeConfig};
use super::credentials::Credentials;
use super::errors::EmbedError;
use super::hooks::Hooks;
use super::models::ThumbnailSet;

/// A video host bound to one parsed URL.
///
/// Instances are built per URL and never reused for another video.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Slug used for logging and per-provider extension points
    fn slug(&self) -> &str;

    /// Video id derived at construction, `""` when not resolvable
    fn video_id(&self) -> &str;

    /// Default ordered image-size identifiers
    fn image_sizes(&self) -> Vec<String>;

    /// Fetch thumbnails for the requested sizes.
    ///
    /// Every failure mode (no id, no credentials, upstream error, bad body)
    /// yields an empty set.
    async fn thumbnail_data(&self, image_sizes: &[String]) -> ThumbnailSet;
}

/// Everything a provider needs for I/O
pub struct ProviderContext {
    pub http: reqwest::Client,
    pub cache: Arc<dyn ThumbnailCache>,
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub hooks: Arc<Hooks>,
    pub cache_namespace: String,
    pub cache_ttl: time::Duration,
}

impl ProviderContext {
    pub fn new(
        config: &FacadeConfig,
        http: reqwest::Client,
        cache: Arc<dyn ThumbnailCache>,
        credentials: Credentials,
        hooks: Arc<Hooks>,
    ) -> Self {
        Self {
            http,
            cache,
            credentials,
            endpoints: config.endpoints.clone(),
            hooks,
            cache_namespace: config.cache_namespace.clone(),
            cache_ttl: config.cache_ttl(),
        }
    }

    pub fn cache_key(&self, video_id: &str) -> String {
        format!("{}_{}", self.cache_namespace, video_id)
    }

    /// Read-through cache: return the cached set or run `fetch` once and
    /// store a non-empty result. Errors degrade to an empty set.
    pub async fn remember<F, Fut>(&self, slug: &str, video_id: &str, fetch: F) -> ThumbnailSet
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ThumbnailSet, EmbedError>>,
    {
        let key = self.cache_key(video_id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!("[{}] Cache hit for {}", slug, key);
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!("[{}] Cache read failed for {}: {}", slug, key, e),
        }

        let data = match fetch().await {
            Ok(data) => data,
            Err(e) if e.is_upstream() => {
                // deleted or private videos land here routinely
                debug!("[{}] Thumbnail fetch for {} failed: {}", slug, video_id, e);
                return ThumbnailSet::new();
            }
            Err(e) => {
                warn!("[{}] Thumbnail fetch for {} failed: {}", slug, video_id, e);
                return ThumbnailSet::new();
            }
        };

        if data.is_empty() {
            debug!("[{}] No thumbnails for {}, not caching", slug, video_id);
            return data;
        }

        if let Err(e) = self.cache.set(&key, &data, self.cache_ttl).await {
            warn!("[{}] Cache write failed for {}: {}", slug, key, e);
        }

        data
    }

    /// Apply the per-provider raw thumbnail filter
    pub fn filter_thumbnail_data(&self, slug: &str, video_id: &str, data: ThumbnailSet) -> ThumbnailSet {
        self.hooks.filter_provider_thumbnail_data(slug, video_id, data)
    }
}
