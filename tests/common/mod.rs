// Shared helpers for the HTTP-backed tests

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use embed_facade::embed::cache::{MemoryCache, ThumbnailCache};
use embed_facade::embed::ProviderContext;
use embed_facade::{Credentials, Endpoints, FacadeConfig, Hooks};
use wiremock::{MockServer, ResponseTemplate};

/// Encoded PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn image_response(width: u32, height: u32) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("Content-Type", "image/png")
        .set_body_bytes(png(width, height))
}

/// Config with every upstream pointed at the mock server
pub fn config(server: &MockServer) -> FacadeConfig {
    FacadeConfig::default()
        .with_timeout(5)
        .with_endpoints(Endpoints::all(&server.uri()))
}

pub fn context_with_cache(
    server: &MockServer,
    credentials: Credentials,
    cache: Arc<dyn ThumbnailCache>,
) -> Arc<ProviderContext> {
    context_with_hooks(server, credentials, cache, Hooks::new())
}

pub fn context_with_hooks(
    server: &MockServer,
    credentials: Credentials,
    cache: Arc<dyn ThumbnailCache>,
    hooks: Hooks,
) -> Arc<ProviderContext> {
    Arc::new(ProviderContext::new(
        &config(server),
        reqwest::Client::new(),
        cache,
        credentials,
        Arc::new(hooks),
    ))
}

pub fn context(server: &MockServer, credentials: Credentials) -> Arc<ProviderContext> {
    context_with_cache(server, credentials, Arc::new(MemoryCache::new()))
}

pub fn credentials(vimeo: &str, wistia: &str) -> Credentials {
    Credentials {
        vimeo_token: vimeo.to_string(),
        wistia_token: wistia.to_string(),
    }
}
