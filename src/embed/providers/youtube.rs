use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::embed::errors::EmbedError;
use crate::embed::factory::ProviderRegistration;
use crate::embed::hosts::HostPattern;
use crate::embed::http;
use crate::embed::models::ThumbnailSet;
use crate::embed::traits::{Provider, ProviderContext};
use crate::embed::url_parser::ParsedUrl;

/// Static thumbnail slugs, lowest to highest resolution
pub const IMAGE_SIZES: [&str; 4] = ["mqdefault", "hqdefault", "sddefault", "maxresdefault"];

pub const ALLOWED_HOSTS: [&str; 3] = ["www.youtube.com", "youtube.com", "youtu.be"];

pub struct YouTube {
    video_id: String,
    ctx: Arc<ProviderContext>,
}

impl YouTube {
    pub const SLUG: &'static str = "youtube";

    pub fn new(url: &ParsedUrl, ctx: Arc<ProviderContext>) -> Self {
        Self {
            video_id: Self::extract_id(url),
            ctx,
        }
    }

    pub fn registration() -> ProviderRegistration {
        ProviderRegistration::new(
            Self::SLUG,
            ALLOWED_HOSTS.iter().map(|h| HostPattern::literal(h)).collect(),
            |url, ctx| Arc::new(Self::new(url, ctx)) as Arc<dyn Provider>,
        )
    }

    /// `/shorts/{id}`, else `?v=`, else the bare `youtu.be` path
    pub fn extract_id(url: &ParsedUrl) -> String {
        match url.host.as_str() {
            "www.youtube.com" | "youtube.com" => {
                if url.path.starts_with("/shorts/") {
                    let segments = url.segments();
                    return match segments.as_slice() {
                        ["shorts", id, ..] => id.to_string(),
                        _ => String::new(),
                    };
                }

                url.query_param("v").unwrap_or_default()
            }
            "youtu.be" => url.path.replace('/', ""),
            _ => String::new(),
        }
    }

    async fn fetch(&self, image_sizes: &[String]) -> Result<ThumbnailSet, EmbedError> {
        let mut data = ThumbnailSet::new();

        for slug in image_sizes {
            let location = format!(
                "{}/{}/{}.jpg",
                self.ctx.endpoints.youtube_images.trim_end_matches('/'),
                self.video_id,
                slug
            );

            // one GET is both the presence check and the dimension probe
            match http::fetch_image(&self.ctx.http, &location).await {
                Ok(image) => data.insert(slug.clone(), image),
                Err(e) => debug!("[YouTube] Skipping {} for {}: {}", slug, self.video_id, e),
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl Provider for YouTube {
    fn slug(&self) -> &str {
        Self::SLUG
    }

    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn image_sizes(&self) -> Vec<String> {
        IMAGE_SIZES.iter().map(|s| s.to_string()).collect()
    }

    async fn thumbnail_data(&self, image_sizes: &[String]) -> ThumbnailSet {
        if self.video_id.is_empty() {
            return ThumbnailSet::new();
        }

        let data = self
            .ctx
            .remember(Self::SLUG, &self.video_id, || self.fetch(image_sizes))
            .await;

        self.ctx.filter_thumbnail_data(Self::SLUG, &self.video_id, data)
    }
}
