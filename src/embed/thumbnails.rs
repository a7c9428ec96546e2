// Thumbnail resolution: provider + video id + non-empty thumbnail set

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use super::factory::ProviderFactory;
use super::hooks::{Hooks, ThumbnailQuery};
use super::models::{Block, ThumbnailSet};
use super::traits::Provider;
use super::url_parser::ParsedUrl;

/// Everything the facade builder needs
pub struct ResolvedThumb {
    pub provider: Arc<dyn Provider>,
    /// Read once, under the same panic guard as the id
    pub slug: String,
    pub video_id: String,
    pub thumb: ThumbnailSet,
}

impl std::fmt::Debug for ResolvedThumb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedThumb")
            .field("slug", &self.slug)
            .field("video_id", &self.video_id)
            .field("thumb", &self.thumb)
            .finish()
    }
}

/// Single seam between "a provider produced thumbnails" and "there is
/// enough data to render a facade". Never hands partial data downstream:
/// any failure, including panics in extension code, yields `None`.
pub struct ThumbnailService {
    factory: Arc<ProviderFactory>,
    hooks: Arc<Hooks>,
}

impl ThumbnailService {
    pub fn new(factory: Arc<ProviderFactory>, hooks: Arc<Hooks>) -> Self {
        Self { factory, hooks }
    }

    pub async fn resolve_thumb(&self, url: &ParsedUrl, block: &Block) -> Option<ResolvedThumb> {
        let provider = match catch_unwind(AssertUnwindSafe(|| self.factory.resolve(url, block))) {
            Ok(Some(provider)) => provider,
            Ok(None) => return None,
            Err(_) => {
                warn!("[Thumbnails] Provider resolution panicked for {}", url.original);
                return None;
            }
        };

        // provider methods may be extension code too
        let identity = catch_unwind(AssertUnwindSafe(|| {
            (provider.slug().to_string(), provider.video_id().to_string())
        }));
        let (slug, video_id) = match identity {
            Ok(identity) => identity,
            Err(_) => {
                warn!("[Thumbnails] Provider for {} panicked while identifying itself", url.original);
                return None;
            }
        };
        if video_id.is_empty() {
            debug!("[Thumbnails] {} could not extract an id from {}", slug, url.original);
            return None;
        }

        let image_sizes =
            match catch_unwind(AssertUnwindSafe(|| self.factory.image_sizes_for(provider.as_ref()))) {
                Ok(sizes) => sizes,
                Err(_) => {
                    warn!("[Thumbnails] Image size filter panicked for {}", slug);
                    return None;
                }
            };

        let thumb = self
            .safe_thumbnail_data(provider.clone(), &slug, &video_id, image_sizes)
            .await;
        if thumb.is_empty() {
            debug!("[Thumbnails] No thumbnails for {} {}", slug, video_id);
            return None;
        }

        Some(ResolvedThumb {
            provider,
            slug,
            video_id,
            thumb,
        })
    }

    /// Run the provider fetch isolated in its own task, then the
    /// thumbnail-data filter. Panics become an empty set.
    async fn safe_thumbnail_data(
        &self,
        provider: Arc<dyn Provider>,
        slug: &str,
        video_id: &str,
        image_sizes: Vec<String>,
    ) -> ThumbnailSet {
        let task_sizes = image_sizes.clone();
        let task = tokio::spawn(async move { provider.thumbnail_data(&task_sizes).await });
        let data = match task.await {
            Ok(data) => data,
            Err(e) => {
                warn!("[Thumbnails] {} thumbnail fetch aborted: {}", slug, e);
                ThumbnailSet::new()
            }
        };

        let query = ThumbnailQuery {
            provider_slug: slug.to_string(),
            video_id: video_id.to_string(),
            image_sizes,
        };

        catch_unwind(AssertUnwindSafe(|| self.hooks.thumbnail_data.apply(data, &query)))
            .unwrap_or_else(|_| {
                warn!("[Thumbnails] Thumbnail data filter panicked for {}", query.provider_slug);
                ThumbnailSet::new()
            })
    }
}
