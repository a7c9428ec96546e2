// Render-block hook: swaps supported video embeds for a facade

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use super::builder::FacadeBuilder;
use super::hooks::{FacadeContext, Hooks};
use super::models::Block;
use super::thumbnails::ThumbnailService;
use super::url_parser;

/// Entry point for the host rendering pipeline.
///
/// Worst case for any failure is the original markup, unchanged.
pub struct BlockFilter {
    thumbnails: Arc<ThumbnailService>,
    builder: FacadeBuilder,
    hooks: Arc<Hooks>,
}

impl BlockFilter {
    pub fn new(thumbnails: Arc<ThumbnailService>, builder: FacadeBuilder, hooks: Arc<Hooks>) -> Self {
        Self {
            thumbnails,
            builder,
            hooks,
        }
    }

    pub fn thumbnails(&self) -> &ThumbnailService {
        &self.thumbnails
    }

    pub async fn filter_render_block(&self, html: &str, block: &Block) -> String {
        if !block.is_embed() || block.attrs.url.trim().is_empty() {
            return html.to_string();
        }

        let url = match url_parser::parse(&block.attrs.url) {
            Some(url) => url,
            None => {
                debug!("[BlockFilter] Unparsable embed url {:?}", block.attrs.url);
                return html.to_string();
            }
        };

        let resolved = match self.thumbnails.resolve_thumb(&url, block).await {
            Some(resolved) => resolved,
            None => return html.to_string(),
        };

        let render = || {
            let facade = self.builder.build(&resolved.thumb, block, &resolved.video_id);
            let ctx = FacadeContext {
                provider_slug: resolved.slug.clone(),
                block: block.clone(),
                original_html: html.to_string(),
            };
            self.hooks.facade_html.apply(facade, &ctx)
        };

        match catch_unwind(AssertUnwindSafe(render)) {
            Ok(facade) => facade,
            Err(_) => {
                warn!(
                    "[BlockFilter] Facade rendering panicked for {} {}",
                    resolved.slug, resolved.video_id
                );
                html.to_string()
            }
        }
    }
}
