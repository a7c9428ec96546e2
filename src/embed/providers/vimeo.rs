use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::embed::errors::EmbedError;
use crate::embed::factory::ProviderRegistration;
use crate::embed::hosts::HostPattern;
use crate::embed::http;
use crate::embed::models::{ThumbnailImage, ThumbnailSet};
use crate::embed::traits::{Provider, ProviderContext};
use crate::embed::url_parser::ParsedUrl;

/// Labels come from the API (`thumbnail_{w}x{h}`), so there is no fixed
/// list. A non-empty override keeps only the listed labels.
pub const IMAGE_SIZES: [&str; 0] = [];

pub const ALLOWED_HOSTS: [&str; 2] = ["www.vimeo.com", "vimeo.com"];

const ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";

#[derive(Debug, Deserialize)]
struct PicturesResponse {
    #[serde(default)]
    data: Vec<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    sizes: Vec<PictureSize>,
}

#[derive(Debug, Deserialize)]
struct PictureSize {
    width: u32,
    height: u32,
    link: String,
}

pub struct Vimeo {
    video_id: String,
    ctx: Arc<ProviderContext>,
}

impl Vimeo {
    pub const SLUG: &'static str = "vimeo";

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

    /// `/{id}`, `/{id}/{hash}` and `/channels/{name}/{id}` yield `{id}`.
    /// Any other path (showcases, groups, user pages) has no video id.
    pub fn extract_id(url: &ParsedUrl) -> String {
        if !ALLOWED_HOSTS.contains(&url.host.as_str()) {
            return String::new();
        }

        let id = match url.segments().as_slice() {
            [id] | [id, _] if is_numeric(id) => *id,
            ["channels", _, id] if is_numeric(id) => *id,
            _ => "",
        };
        id.to_string()
    }

    async fn fetch(&self, token: &str, image_sizes: &[String]) -> Result<ThumbnailSet, EmbedError> {
        let url = format!(
            "{}/videos/{}/pictures",
            self.ctx.endpoints.vimeo_api.trim_end_matches('/'),
            self.video_id
        );
        let authorization = format!("bearer {}", token);

        let response: PicturesResponse = http::fetch_json(
            &self.ctx.http,
            &url,
            &[("Authorization", authorization.as_str()), ("Accept", ACCEPT)],
        )
        .await?;

        Ok(Self::to_thumbnail_set(response, image_sizes))
    }

    fn to_thumbnail_set(response: PicturesResponse, image_sizes: &[String]) -> ThumbnailSet {
        let picture = match response.data.iter().position(|p| p.active) {
            Some(idx) => response.data.into_iter().nth(idx),
            None => response.data.into_iter().next(),
        };

        let mut sizes = match picture {
            Some(picture) => picture.sizes,
            None => return ThumbnailSet::new(),
        };
        sizes.sort_by_key(|s| (s.width, s.height));

        sizes
            .into_iter()
            .filter(|s| !s.link.is_empty())
            .map(|s| {
                let label = format!("thumbnail_{}x{}", s.width, s.height);
                (label, ThumbnailImage::new(s.link, s.width, s.height))
            })
            .filter(|(label, _)| image_sizes.is_empty() || image_sizes.contains(label))
            .collect()
    }
}

#[async_trait]
impl Provider for Vimeo {
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

        let token = match self.ctx.credentials.vimeo() {
            Some(token) => token.to_string(),
            None => {
                debug!("[Vimeo] {}", EmbedError::MissingCredentials(Self::SLUG));
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

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}
