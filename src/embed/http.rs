// HTTP helpers shared by provider implementations

use std::io::Cursor;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::config::FacadeConfig;
use super::errors::EmbedError;
use super::models::ThumbnailImage;

/// Build the shared client (timeout, user agent, optional proxy)
pub fn build_client(config: &FacadeConfig) -> Result<reqwest::Client, EmbedError> {
    let builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone());

    let builder = match config.proxy.as_deref() {
        Some(proxy_url) => match reqwest::Proxy::all(proxy_url) {
            Ok(proxy) => builder.proxy(proxy),
            Err(e) => {
                // invalid proxy: go direct rather than fail every render
                warn!("[Http] Invalid proxy URL {}: {}", proxy_url, e);
                builder
            }
        },
        None => builder,
    };

    builder
        .build()
        .map_err(|e| EmbedError::Transport(format!("failed to build HTTP client: {}", e)))
}

/// GET `url`, failing on transport errors and non-2xx statuses
pub async fn get_checked(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<reqwest::Response, EmbedError> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        debug!("[Http] {} -> {}", url, status);
        return Err(EmbedError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// GET and decode a JSON body
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<T, EmbedError> {
    let response = get_checked(client, url, headers).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// GET an image and read its pixel dimensions
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<ThumbnailImage, EmbedError> {
    let response = get_checked(client, url, &[]).await?;
    let bytes = response.bytes().await?;
    let (width, height) = image_dimensions(&bytes)?;
    Ok(ThumbnailImage::new(url, width, height))
}

/// Pixel dimensions from encoded image bytes (header only)
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), EmbedError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| EmbedError::Image(e.to_string()))?;

    if reader.format().is_none() {
        return Err(EmbedError::Image("unrecognized image format".to_string()));
    }

    Ok(reader.into_dimensions()?)
}

/// Replace the query string of `url` with a single parameter
pub fn with_query(url: &str, name: &str, value: &str) -> String {
    let base = strip_query(url);
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(name, value)
        .finish();
    format!("{}?{}", base, encoded)
}

/// `url` without anything after the first `?`
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_png_dimensions() {
        assert_eq!(image_dimensions(&png(640, 360)).unwrap(), (640, 360));
    }

    #[test]
    fn test_garbage_is_image_error() {
        let err = image_dimensions(b"<html>not found</html>").unwrap_err();
        assert!(matches!(err, EmbedError::Image(_)));
    }

    #[test]
    fn test_with_query_replaces_existing() {
        assert_eq!(
            with_query(
                "https://embed-ssl.wistia.com/deliveries/abc.jpg?image_crop_resized=200x120",
                "image_crop_resized",
                "640x360"
            ),
            "https://embed-ssl.wistia.com/deliveries/abc.jpg?image_crop_resized=640x360"
        );
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("https://a/b.jpg?x=1&y=2"), "https://a/b.jpg");
        assert_eq!(strip_query("https://a/b.jpg"), "https://a/b.jpg");
    }

    #[test]
    fn test_client_with_bad_proxy_still_builds() {
        let config = FacadeConfig::default().with_proxy(Some("::not a proxy::".to_string()));
        assert!(build_client(&config).is_ok());
    }
}
