// Provider resolution: URL host -> provider instance

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::hooks::{Hooks, ProviderQuery};
use super::hosts::{self, HostPattern};
use super::models::Block;
use super::providers;
use super::traits::{Provider, ProviderContext};
use super::url_parser::ParsedUrl;

pub type ProviderConstructor = Arc<dyn Fn(&ParsedUrl, Arc<ProviderContext>) -> Arc<dyn Provider> + Send + Sync>;

/// A provider variant the factory can match and construct
#[derive(Clone)]
pub struct ProviderRegistration {
    pub slug: String,
    pub allowed_hosts: Vec<HostPattern>,
    constructor: ProviderConstructor,
}

impl ProviderRegistration {
    pub fn new<F>(slug: &str, allowed_hosts: Vec<HostPattern>, constructor: F) -> Self
    where
        F: Fn(&ParsedUrl, Arc<ProviderContext>) -> Arc<dyn Provider> + Send + Sync + 'static,
    {
        Self {
            slug: slug.to_string(),
            allowed_hosts,
            constructor: Arc::new(constructor),
        }
    }

    /// Fresh instance bound to `url`
    pub fn construct(&self, url: &ParsedUrl, ctx: Arc<ProviderContext>) -> Arc<dyn Provider> {
        (self.constructor)(url, ctx)
    }
}

impl fmt::Debug for ProviderRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistration")
            .field("slug", &self.slug)
            .field("allowed_hosts", &self.allowed_hosts)
            .finish_non_exhaustive()
    }
}

/// Resolves a provider for a parsed URL.
///
/// Registered variants are tried in order and the first whose allowed
/// hosts accept the URL host wins.
pub struct ProviderFactory {
    registrations: Vec<ProviderRegistration>,
    hooks: Arc<Hooks>,
    ctx: Arc<ProviderContext>,
}

impl ProviderFactory {
    /// Factory over the built-in providers
    pub fn new(ctx: Arc<ProviderContext>, hooks: Arc<Hooks>) -> Self {
        Self::with_registrations(ctx, hooks, Vec::new())
    }

    /// Factory over an explicit list, falling back to the built-ins when empty
    pub fn with_registrations(
        ctx: Arc<ProviderContext>,
        hooks: Arc<Hooks>,
        registrations: Vec<ProviderRegistration>,
    ) -> Self {
        let base = if registrations.is_empty() {
            providers::default_registrations()
        } else {
            registrations
        };
        let registrations = hooks.provider_registrations.apply(base, &());

        Self {
            registrations,
            hooks,
            ctx,
        }
    }

    pub fn registrations(&self) -> &[ProviderRegistration] {
        &self.registrations
    }

    /// Provider for `url`, or `None` when the host is not supported
    pub fn resolve(&self, url: &ParsedUrl, block: &Block) -> Option<Arc<dyn Provider>> {
        if !self.hooks.video_provider.is_empty() {
            let query = ProviderQuery {
                url: url.clone(),
                block: block.clone(),
            };
            if let Some(provider) = self.hooks.video_provider.apply(None, &query) {
                debug!("[Factory] Custom provider {} for {}", provider.slug(), url.host);
                return Some(provider);
            }
        }

        if url.host.is_empty() {
            return None;
        }

        let host = url.host.to_lowercase();
        for registration in &self.registrations {
            if hosts::any_match(&self.allowed_hosts_for(registration), &host) {
                debug!("[Factory] {} matched {}", registration.slug, host);
                return Some(registration.construct(url, self.ctx.clone()));
            }
        }

        debug!("[Factory] No provider for {}", host);
        None
    }

    /// Allowed hosts after per-provider then global overrides
    pub fn allowed_hosts_for(&self, registration: &ProviderRegistration) -> Vec<HostPattern> {
        let filtered = self
            .hooks
            .filter_allowed_hosts(&registration.slug, registration.allowed_hosts.clone());
        hosts::dedupe(filtered)
    }

    /// Image sizes after per-provider then global overrides
    pub fn image_sizes_for(&self, provider: &dyn Provider) -> Vec<String> {
        self.hooks
            .filter_image_sizes(provider.slug(), provider.image_sizes())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::embed::cache::MemoryCache;
    use crate::embed::config::FacadeConfig;
    use crate::embed::credentials::Credentials;
    use crate::embed::models::{ThumbnailImage, ThumbnailSet};
    use crate::embed::url_parser::parse;
    use async_trait::async_trait;

    pub(crate) struct StubProvider {
        pub slug: &'static str,
        pub video_id: String,
        pub thumb: ThumbnailSet,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn slug(&self) -> &str {
            self.slug
        }

        fn video_id(&self) -> &str {
            &self.video_id
        }

        fn image_sizes(&self) -> Vec<String> {
            vec!["small".to_string(), "large".to_string()]
        }

        async fn thumbnail_data(&self, _image_sizes: &[String]) -> ThumbnailSet {
            self.thumb.clone()
        }
    }

    pub(crate) fn stub_thumb() -> ThumbnailSet {
        let mut set = ThumbnailSet::new();
        set.insert("small", ThumbnailImage::new("https://cdn.example.com/s.jpg", 320, 180));
        set.insert("large", ThumbnailImage::new("https://cdn.example.com/l.jpg", 1280, 720));
        set
    }

    pub(crate) fn context(hooks: Arc<Hooks>) -> Arc<ProviderContext> {
        Arc::new(ProviderContext::new(
            &FacadeConfig::default(),
            reqwest::Client::new(),
            Arc::new(MemoryCache::new()),
            Credentials::default(),
            hooks,
        ))
    }

    fn factory(hooks: Hooks) -> ProviderFactory {
        let hooks = Arc::new(hooks);
        ProviderFactory::new(context(hooks.clone()), hooks)
    }

    fn slug_for(factory: &ProviderFactory, raw: &str) -> Option<String> {
        let url = parse(raw).unwrap();
        factory
            .resolve(&url, &Block::embed(raw, ""))
            .map(|p| p.slug().to_string())
    }

    #[test]
    fn test_builtin_hosts() {
        let f = factory(Hooks::new());
        assert_eq!(slug_for(&f, "https://www.youtube.com/watch?v=a").as_deref(), Some("youtube"));
        assert_eq!(slug_for(&f, "https://YOUTU.BE/a").as_deref(), Some("youtube"));
        assert_eq!(slug_for(&f, "https://vimeo.com/1").as_deref(), Some("vimeo"));
        assert_eq!(slug_for(&f, "https://dai.ly/x1").as_deref(), Some("dailymotion"));
        assert_eq!(slug_for(&f, "https://tri-4.wistia.com/medias/a").as_deref(), Some("wistia"));
    }

    #[test]
    fn test_unknown_host_is_none() {
        let f = factory(Hooks::new());
        assert_eq!(slug_for(&f, "https://example.com/video/123"), None);
        assert_eq!(slug_for(&f, "https://notwistia.com/medias/a"), None);
    }

    #[test]
    fn test_new_instance_per_url() {
        let f = factory(Hooks::new());
        let a = parse("https://youtu.be/first").unwrap();
        let b = parse("https://youtu.be/second").unwrap();
        let block = Block::default();

        let pa = f.resolve(&a, &block).unwrap();
        let pb = f.resolve(&b, &block).unwrap();
        assert_eq!(pa.video_id(), "first");
        assert_eq!(pb.video_id(), "second");
    }

    #[test]
    fn test_supplier_short_circuits() {
        let mut hooks = Hooks::new();
        hooks.video_provider.add(|current, query| {
            if query.url.host == "example.com" {
                return Some(Arc::new(StubProvider {
                    slug: "example",
                    video_id: "123".to_string(),
                    thumb: stub_thumb(),
                }) as Arc<dyn Provider>);
            }
            current
        });
        let f = factory(hooks);

        assert_eq!(slug_for(&f, "https://example.com/video/123").as_deref(), Some("example"));
        assert_eq!(slug_for(&f, "https://vimeo.com/1").as_deref(), Some("vimeo"));
    }

    #[test]
    fn test_registration_list_override() {
        let mut hooks = Hooks::new();
        hooks.provider_registrations.add(|mut list, _| {
            list.retain(|r| r.slug != "vimeo");
            list.push(ProviderRegistration::new(
                "example",
                vec![HostPattern::literal("videos.example.com")],
                |url, _ctx| {
                    Arc::new(StubProvider {
                        slug: "example",
                        video_id: url.path.trim_matches('/').to_string(),
                        thumb: ThumbnailSet::new(),
                    }) as Arc<dyn Provider>
                },
            ));
            list
        });
        let f = factory(hooks);

        assert_eq!(f.registrations().len(), 4);
        assert_eq!(slug_for(&f, "https://vimeo.com/1"), None);
        assert_eq!(slug_for(&f, "https://videos.example.com/42").as_deref(), Some("example"));
    }

    #[test]
    fn test_allowed_hosts_override() {
        let mut hooks = Hooks::new();
        hooks.on_allowed_hosts_for("youtube", |mut hosts, _| {
            hosts.push(HostPattern::literal("m.youtube.com"));
            hosts
        });
        hooks.allowed_hosts.add(|hosts, slug| {
            if slug == "dailymotion" {
                Vec::new()
            } else {
                hosts
            }
        });
        let f = factory(hooks);

        assert_eq!(slug_for(&f, "https://m.youtube.com/watch?v=a").as_deref(), Some("youtube"));
        assert_eq!(slug_for(&f, "https://dai.ly/x1"), None);
    }

    #[test]
    fn test_allowed_hosts_are_deduped() {
        let mut hooks = Hooks::new();
        hooks.allowed_hosts.add(|mut hosts, _| {
            let again = hosts.clone();
            hosts.extend(again);
            hosts
        });
        let f = factory(hooks);
        let youtube = &f.registrations()[0];
        assert_eq!(f.allowed_hosts_for(youtube).len(), 3);
    }

    #[test]
    fn test_image_sizes_override() {
        let mut hooks = Hooks::new();
        hooks.on_image_sizes_for("youtube", |_, _| vec!["hqdefault".to_string()]);
        let f = factory(hooks);

        let url = parse("https://youtu.be/abc").unwrap();
        let provider = f.resolve(&url, &Block::default()).unwrap();
        assert_eq!(f.image_sizes_for(provider.as_ref()), vec!["hqdefault".to_string()]);
    }
}
