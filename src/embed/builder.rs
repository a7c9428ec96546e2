// Facade markup: figure wrapper, play button, responsive thumbnail, template

use std::sync::Arc;

use html_escape::encode_double_quoted_attribute as attr;

use super::hooks::{Hooks, MarkupContext};
use super::models::{Block, ThumbnailSet};
use super::sanitize::sanitize_embed_html;

const BASE_CLASSES: [&str; 2] = ["wp-block-image", "tribe-embed"];

/// Builds the facade that replaces an embed block.
///
/// Pure given its inputs and hooks. Entries of the thumbnail set must be
/// ordered low to high resolution; the last one becomes `src`.
#[derive(Debug, Clone)]
pub struct FacadeBuilder {
    hooks: Arc<Hooks>,
}

impl FacadeBuilder {
    pub fn new(hooks: Arc<Hooks>) -> Self {
        Self { hooks }
    }

    pub fn build(&self, thumb: &ThumbnailSet, block: &Block, video_id: &str) -> String {
        let mut ctx = MarkupContext {
            block: block.clone(),
            video_id: video_id.to_string(),
            thumb: thumb.clone(),
            wrapper_classes: Vec::new(),
        };
        ctx.wrapper_classes = self.wrapper_classes(&ctx);

        let open = self.hooks.open_markup.apply(Self::open_markup(&ctx), &ctx);
        let button = self.hooks.button_html.apply(Self::button_html(), &ctx);
        let image = self.hooks.thumb_markup.apply(Self::thumb_markup(thumb), &ctx);
        let close = self.hooks.close_markup.apply(Self::close_markup(), &ctx);
        let template = self
            .hooks
            .embed_template
            .apply(Self::embed_template(block, video_id), &ctx);

        format!("{}{}{}{}{}", open, button, image, close, template)
    }

    /// Base classes, then the block's own classes, then the alignment class
    pub fn wrapper_classes(&self, ctx: &MarkupContext) -> Vec<String> {
        let attrs = &ctx.block.attrs;
        let mut classes: Vec<String> = BASE_CLASSES.iter().map(|c| c.to_string()).collect();

        if !attrs.provider_name_slug.is_empty() {
            classes.push(format!("is--{}", attrs.provider_name_slug));
        }
        if let Some(class_name) = &attrs.class_name {
            classes.extend(class_name.split_whitespace().map(str::to_string));
        }
        if let Some(align) = attrs.align.as_deref().filter(|a| !a.is_empty()) {
            classes.push(format!("align{}", align));
        }

        self.hooks.wrapper_classes.apply(classes, ctx)
    }

    fn open_markup(ctx: &MarkupContext) -> String {
        format!(
            "<figure class=\"{}\" data-id=\"{}\"><div class=\"tribe-embed__inner\">",
            attr(&ctx.wrapper_classes.join(" ")),
            attr(&ctx.video_id)
        )
    }

    fn button_html() -> String {
        "<button class=\"play-button\" aria-label=\"Play Video\"></button>".to_string()
    }

    fn thumb_markup(thumb: &ThumbnailSet) -> String {
        let max = match thumb.max_resolution() {
            Some(max) => max,
            None => return String::new(),
        };

        let srcset = thumb
            .iter()
            .map(|e| format!("{} {}w", e.image.url, e.image.width))
            .collect::<Vec<_>>()
            .join(", ");
        let sizes = format!("(max-width: {w}px) 100vw, {w}px", w = max.width);

        format!(
            "<img loading=\"lazy\" width=\"{}\" height=\"{}\" class=\"tribe-embed__thumbnail\" alt=\"\" src=\"{}\" srcset=\"{}\" sizes=\"{}\" />",
            max.width,
            max.height,
            attr(&max.url),
            attr(&srcset),
            sizes
        )
    }

    fn close_markup() -> String {
        "</div></figure>".to_string()
    }

    fn embed_template(block: &Block, video_id: &str) -> String {
        format!(
            "<template id=\"tribe-embed-embed-html-{}\">{}</template>",
            attr(video_id),
            sanitize_embed_html(&block.inner_html)
        )
    }
}
