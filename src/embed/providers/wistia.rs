use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::embed::errors::EmbedError;
use crate::embed::factory::ProviderRegistration;
use crate::embed::hosts::HostPattern;
use crate::embed::http;
use crate::embed::models::ThumbnailSet;
use crate::embed::traits::{Provider, ProviderContext};
use crate::embed::url_parser::ParsedUrl;

/// Two crops derived from the base thumbnail, then the original.
/// e.g. `https://embed-ssl.wistia.com/deliveries/<hash>.jpg?image_crop_resized=640x360`
pub const IMAGE_SIZES: [&str; 3] = ["thumbnail_320_url", "thumbnail_640_url", "thumbnail_url"];

/// Account subdomains are arbitrary, so hosts are patterns
pub const ALLOWED_HOSTS: [&str; 2] = [r"(^|\.)wistia\.com$", r"(^|\.)wi\.st$"];

const CROP_PARAM: &str = "image_crop_resized";

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(default)]
    thumbnail: Option<MediaThumbnail>,
}

#[derive(Debug, Deserialize)]
struct MediaThumbnail {
    #[serde(default)]
    url: String,
}

pub struct Wistia {
    video_id: String,
    ctx: Arc<ProviderContext>,
}

impl Wistia {
    pub const SLUG: &'static str = "wistia";

    pub fn new(url: &ParsedUrl, ctx: Arc<ProviderContext>) -> Self {
        Self {
            video_id: Self::extract_id(url),
            ctx,
        }
    }

    pub fn allowed_hosts() -> Vec<HostPattern> {
        ALLOWED_HOSTS
            .iter()
            .filter_map(|p| HostPattern::regex(p).ok())
            .collect()
    }

    pub fn registration() -> ProviderRegistration {
        ProviderRegistration::new(Self::SLUG, Self::allowed_hosts(), |url, ctx| {
            Arc::new(Self::new(url, ctx)) as Arc<dyn Provider>
        })
    }

    /// `/medias/{id}`
    pub fn extract_id(url: &ParsedUrl) -> String {
        url.path
            .strip_prefix("/medias/")
            .map(|rest| rest.trim_end_matches('/').to_string())
            .unwrap_or_default()
    }

    /// Crop dimensions for a label, `None` for the original
    fn crop_for(label: &str) -> Option<&'static str> {
        match label {
            "thumbnail_320_url" => Some("320x260"),
            "thumbnail_640_url" => Some("640x360"),
            _ => None,
        }
    }

    async fn fetch(&self, token: &str, image_sizes: &[String]) -> Result<ThumbnailSet, EmbedError> {
        let url = format!(
            "{}/medias/{}.json",
            self.ctx.endpoints.wistia_api.trim_end_matches('/'),
            self.video_id
        );
        let authorization = format!("Bearer {}", token);

        let media: Media = http::fetch_json(
            &self.ctx.http,
            &url,
            &[("Authorization", authorization.as_str()), ("Accept", "application/json")],
        )
        .await?;

        let base = media
            .thumbnail
            .map(|t| t.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| EmbedError::MissingField("thumbnail.url".to_string()))?;
        let base = http::strip_query(&base);

        let mut data = ThumbnailSet::new();
        for label in image_sizes {
            let image_url = match Self::crop_for(label) {
                Some(crop) => http::with_query(base, CROP_PARAM, crop),
                None if label == "thumbnail_url" => base.to_string(),
                None => {
                    debug!("[Wistia] Unknown image size {}", label);
                    continue;
                }
            };

            match http::fetch_image(&self.ctx.http, &image_url).await {
                Ok(image) => data.insert(label.clone(), image),
                Err(e) => debug!("[Wistia] Skipping {} for {}: {}", label, self.video_id, e),
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl Provider for Wistia {
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

        let token = match self.ctx.credentials.wistia() {
            Some(token) => token.to_string(),
            None => {
                debug!("[Wistia] {}", EmbedError::MissingCredentials(Self::SLUG));
                return ThumbnailSet::new();
            }
        };

        let data = self
            .ctx
            .remember(Self::SLUG, &self.video_id, || self.fetch(&token, image_sizes))
            .await;

        self.ctx.filter_thumbnail_data(Self::SLUG, &self.video_id, data)
    }
}
