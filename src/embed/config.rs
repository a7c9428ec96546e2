// Runtime configuration for the facade pipeline

use std::path::PathBuf;

/// Default cache namespace, also used as the settings/cache directory name
pub const DEFAULT_NAMESPACE: &str = "tribe-embed";

/// One day
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 86_400;

/// Upstream base URLs (overridable for mock servers)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Static thumbnail host, `{base}/{id}/{slug}.jpg`
    pub youtube_images: String,
    pub vimeo_api: String,
    pub dailymotion_api: String,
    pub wistia_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            youtube_images: "https://img.youtube.com/vi".to_string(),
            vimeo_api: "https://api.vimeo.com".to_string(),
            dailymotion_api: "https://api.dailymotion.com".to_string(),
            wistia_api: "https://api.wistia.com/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every provider at the same base (mock server)
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            youtube_images: format!("{}/vi", base),
            vimeo_api: base.to_string(),
            dailymotion_api: base.to_string(),
            wistia_api: format!("{}/v1", base),
        }
    }
}

/// Where thumbnail sets are cached
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Process-local map, lost on exit
    #[default]
    Memory,
    /// One JSON file per key under this directory
    File(PathBuf),
}

impl CacheBackend {
    /// File cache under the user cache directory, memory if none exists
    pub fn user_cache_dir() -> Self {
        match dirs::cache_dir() {
            Some(dir) => Self::File(dir.join(DEFAULT_NAMESPACE)),
            None => Self::Memory,
        }
    }
}

/// Configuration for the facade pipeline
#[derive(Debug, Clone)]
pub struct FacadeConfig {
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Cache key prefix, keys are `{namespace}_{video_id}`
    pub cache_namespace: String,
    pub cache_ttl_seconds: u64,
    pub cache_backend: CacheBackend,
    pub endpoints: Endpoints,
    /// Explicit settings file, defaults to the user config directory
    pub settings_path: Option<PathBuf>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_seconds: 10,
            user_agent: format!("embed-facade/{}", env!("CARGO_PKG_VERSION")),
            cache_namespace: DEFAULT_NAMESPACE.to_string(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            cache_backend: CacheBackend::Memory,
            endpoints: Endpoints::default(),
            settings_path: None,
        }
    }
}

impl FacadeConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache_namespace = namespace.into();
        self
    }

    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    pub fn with_cache_backend(mut self, backend: CacheBackend) -> Self {
        self.cache_backend = backend;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_settings_path(mut self, path: Option<PathBuf>) -> Self {
        self.settings_path = path;
        self
    }

    pub fn cache_ttl(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.cache_ttl_seconds).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FacadeConfig::default();
        assert_eq!(config.cache_namespace, "tribe-embed");
        assert_eq!(config.cache_ttl(), time::Duration::days(1));
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.endpoints.youtube_images, "https://img.youtube.com/vi");
    }

    #[test]
    fn test_endpoints_all_trims_trailing_slash() {
        let endpoints = Endpoints::all("http://127.0.0.1:4000/");
        assert_eq!(endpoints.youtube_images, "http://127.0.0.1:4000/vi");
        assert_eq!(endpoints.vimeo_api, "http://127.0.0.1:4000");
        assert_eq!(endpoints.wistia_api, "http://127.0.0.1:4000/v1");
    }

    #[test]
    fn test_builder_chain() {
        let config = FacadeConfig::default()
            .with_timeout(3)
            .with_cache_namespace("site-7")
            .with_cache_ttl(60)
            .with_proxy(Some("socks5h://127.0.0.1:1080".to_string()));

        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.cache_namespace, "site-7");
        assert_eq!(config.cache_ttl(), time::Duration::minutes(1));
        assert!(config.proxy.is_some());
    }
}
