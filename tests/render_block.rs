//! End-to-end rendering through the composed block filter.

mod common;

use std::sync::Arc;

use common::{config, credentials, image_response};
use embed_facade::embed::hooks::ProviderQuery;
use embed_facade::embed::Provider;
use embed_facade::{block_filter_with_credentials, Block, Credentials, Hooks, ThumbnailImage, ThumbnailSet};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const YT_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const YT_INNER: &str = "<figure class=\"wp-block-embed is-type-video is-provider-youtube wp-block-embed-youtube\"><div class=\"wp-block-embed__wrapper\">\nhttps://www.youtube.com/watch?v=dQw4w9WgXcQ\n</div></figure>";

async fn mount_youtube_images(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vi/dQw4w9WgXcQ/maxresdefault.jpg"))
        .respond_with(image_response(1280, 720))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/vi/dQw4w9WgXcQ/(mq|hq|sd)default\.jpg$"))
        .respond_with(image_response(480, 360))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_youtube_block_renders_facade() {
    let server = MockServer::start().await;
    mount_youtube_images(&server).await;

    let filter = block_filter_with_credentials(config(&server), Hooks::new(), Credentials::default()).unwrap();
    let block = Block::embed(YT_URL, "youtube").with_inner_html(YT_INNER).with_align("wide");
    let html = filter.filter_render_block(YT_INNER, &block).await;

    assert!(html.contains("tribe-embed"));
    assert!(html.contains("is--youtube"));
    assert!(html.contains("alignwide"));
    assert!(html.contains("<button class=\"play-button\""));
    assert!(html.contains(&format!(
        "src=\"{}/vi/dQw4w9WgXcQ/maxresdefault.jpg\"",
        server.uri()
    )));
    assert!(html.contains(&format!(
        "<template id=\"tribe-embed-embed-html-dQw4w9WgXcQ\">{}</template>",
        YT_INNER
    )));
}

#[tokio::test]
async fn test_unsupported_host_returns_original() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let filter = block_filter_with_credentials(config(&server), Hooks::new(), Credentials::default()).unwrap();
    let original = "<figure class=\"wp-block-embed\">https://example.com/video/123</figure>";
    let block = Block::embed("https://example.com/video/123", "").with_inner_html(original);

    assert_eq!(filter.filter_render_block(original, &block).await, original);
}

#[tokio::test]
async fn test_non_embed_block_returns_original() {
    let server = MockServer::start().await;
    let filter = block_filter_with_credentials(config(&server), Hooks::new(), Credentials::default()).unwrap();

    let mut block = Block::embed(YT_URL, "youtube");
    block.block_name = "core/paragraph".to_string();

    assert_eq!(filter.filter_render_block("<p>hi</p>", &block).await, "<p>hi</p>");
}

#[tokio::test]
async fn test_no_thumbnails_returns_original() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let filter = block_filter_with_credentials(config(&server), Hooks::new(), Credentials::default()).unwrap();
    let block = Block::embed(YT_URL, "youtube").with_inner_html(YT_INNER);

    assert_eq!(filter.filter_render_block(YT_INNER, &block).await, YT_INNER);
}

#[tokio::test]
async fn test_vimeo_without_credentials_returns_original() {
    let server = MockServer::start().await;
    let filter = block_filter_with_credentials(config(&server), Hooks::new(), credentials("", "key")).unwrap();

    let original = "<figure>vimeo</figure>";
    let block = Block::embed("https://vimeo.com/1083696811", "vimeo");

    assert_eq!(filter.filter_render_block(original, &block).await, original);
}

struct StaticProvider {
    video_id: String,
}

#[async_trait::async_trait]
impl Provider for StaticProvider {
    fn slug(&self) -> &str {
        "static"
    }

    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn image_sizes(&self) -> Vec<String> {
        vec!["poster".to_string()]
    }

    async fn thumbnail_data(&self, image_sizes: &[String]) -> ThumbnailSet {
        image_sizes
            .iter()
            .map(|label| {
                let url = format!("https://static.example.com/{}/{}.jpg", self.video_id, label);
                (label.clone(), ThumbnailImage::new(url, 800, 450))
            })
            .collect()
    }
}

#[tokio::test]
async fn test_extension_supplied_provider_and_markup_filters() {
    let server = MockServer::start().await;

    let mut hooks = Hooks::new();
    hooks.video_provider.add(|current, query: &ProviderQuery| {
        if query.url.host != "static.example.com" {
            return current;
        }
        Some(Arc::new(StaticProvider {
            video_id: query.url.segments().last().map(|s| s.to_string()).unwrap_or_default(),
        }) as Arc<dyn Provider>)
    });
    hooks.wrapper_classes.add(|mut classes, _| {
        classes.push("is-static".to_string());
        classes
    });
    hooks
        .facade_html
        .add(|html, ctx| format!("<div data-provider=\"{}\">{}</div>", ctx.provider_slug, html));

    let filter = block_filter_with_credentials(config(&server), hooks, Credentials::default()).unwrap();
    let block = Block::embed("https://static.example.com/clips/intro", "");
    let html = filter.filter_render_block("<figure></figure>", &block).await;

    assert!(html.starts_with("<div data-provider=\"static\"><figure class=\"wp-block-image tribe-embed is-static\" data-id=\"intro\">"));
    assert!(html.contains("src=\"https://static.example.com/intro/poster.jpg\""));
    assert!(html.contains("srcset=\"https://static.example.com/intro/poster.jpg 800w\""));
}

struct FaultyProvider;

#[async_trait::async_trait]
impl Provider for FaultyProvider {
    fn slug(&self) -> &str {
        "faulty"
    }

    fn video_id(&self) -> &str {
        panic!("extension bug in video_id")
    }

    fn image_sizes(&self) -> Vec<String> {
        Vec::new()
    }

    async fn thumbnail_data(&self, _image_sizes: &[String]) -> ThumbnailSet {
        ThumbnailSet::new()
    }
}

#[tokio::test]
async fn test_panicking_custom_provider_returns_original() {
    let server = MockServer::start().await;

    let mut hooks = Hooks::new();
    hooks
        .video_provider
        .add(|_, _| Some(Arc::new(FaultyProvider) as Arc<dyn Provider>));

    let filter = block_filter_with_credentials(config(&server), hooks, Credentials::default()).unwrap();
    let block = Block::embed("https://videos.example.com/clip", "");

    assert_eq!(filter.filter_render_block("<p>orig</p>", &block).await, "<p>orig</p>");
}
