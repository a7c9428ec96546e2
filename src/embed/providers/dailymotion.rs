use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::embed::errors::EmbedError;
use crate::embed::factory::ProviderRegistration;
use crate::embed::hosts::HostPattern;
use crate::embed::http;
use crate::embed::models::{ThumbnailImage, ThumbnailSet};
use crate::embed::traits::{Provider, ProviderContext};
use crate::embed::url_parser::ParsedUrl;

/// Video API fields, lowest to highest resolution. `thumbnail_url` is the
/// source max resolution.
pub const IMAGE_SIZES: [&str; 8] = [
    "thumbnail_60_url",
    "thumbnail_120_url",
    "thumbnail_180_url",
    "thumbnail_240_url",
    "thumbnail_480_url",
    "thumbnail_720_url",
    "thumbnail_1080_url",
    "thumbnail_url",
];

pub const ALLOWED_HOSTS: [&str; 3] = ["www.dailymotion.com", "dailymotion.com", "dai.ly"];

pub struct Dailymotion {
    video_id: String,
    ctx: Arc<ProviderContext>,
}

impl Dailymotion {
    pub const SLUG: &'static str = "dailymotion";

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

    /// `/video/{id}` on the full domain, `/{id}` on `dai.ly`
    pub fn extract_id(url: &ParsedUrl) -> String {
        match url.host.as_str() {
            "www.dailymotion.com" | "dailymotion.com" => url
                .path
                .strip_prefix("/video/")
                .map(|rest| rest.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            "dai.ly" => url.path.replace('/', ""),
            _ => String::new(),
        }
    }

    async fn fetch_field(&self, field: &str) -> Result<ThumbnailImage, EmbedError> {
        let api_url = format!(
            "{}/video/{}?fields={}",
            self.ctx.endpoints.dailymotion_api.trim_end_matches('/'),
            self.video_id,
            field
        );

        let body: HashMap<String, serde_json::Value> =
            http::fetch_json(&self.ctx.http, &api_url, &[]).await?;

        let image_url = body
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EmbedError::MissingField(field.to_string()))?;

        http::fetch_image(&self.ctx.http, image_url).await
    }

    async fn fetch(&self, image_sizes: &[String]) -> Result<ThumbnailSet, EmbedError> {
        let mut data = ThumbnailSet::new();

        for field in image_sizes {
            match self.fetch_field(field).await {
                Ok(image) => data.insert(field.clone(), image),
                Err(e) => debug!("[Dailymotion] Skipping {} for {}: {}", field, self.video_id, e),
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl Provider for Dailymotion {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::url_parser::parse;

    fn id_of(raw: &str) -> String {
        Dailymotion::extract_id(&parse(raw).unwrap())
    }

    #[test]
    fn test_full_domain() {
        assert_eq!(id_of("https://www.dailymotion.com/video/x8abc12"), "x8abc12");
        assert_eq!(id_of("dailymotion.com/video/x8abc12/"), "x8abc12");
    }

    #[test]
    fn test_short_domain() {
        assert_eq!(id_of("https://dai.ly/x8abc12"), "x8abc12");
    }

    #[test]
    fn test_unrecognized_path() {
        assert_eq!(id_of("https://www.dailymotion.com/playlist/x6hynp"), "");
        assert_eq!(id_of("https://dai.ly"), "");
    }
}
