//! Extension points.
//!
//! Every extension point is a [`FilterChain`]: an ordered list of transforms
//! that each receive the current value plus read-only arguments and return
//! the (possibly replaced) value. Filters run in registration order. An
//! empty chain returns its input untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::factory::ProviderRegistration;
use super::hosts::HostPattern;
use super::models::{Block, ThumbnailSet};
use super::traits::Provider;
use super::url_parser::ParsedUrl;

pub type Filter<T, A> = Arc<dyn Fn(T, &A) -> T + Send + Sync>;

pub struct FilterChain<T, A: ?Sized> {
    filters: Vec<Filter<T, A>>,
}

impl<T, A: ?Sized> FilterChain<T, A> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn add<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(T, &A) -> T + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn apply(&self, value: T, args: &A) -> T {
        self.filters.iter().fold(value, |acc, filter| filter(acc, args))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }
}

impl<T, A: ?Sized> Default for FilterChain<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: ?Sized> Clone for FilterChain<T, A> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
        }
    }
}

impl<T, A: ?Sized> fmt::Debug for FilterChain<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterChain({} filters)", self.filters.len())
    }
}

/// Arguments for the custom provider supplier
#[derive(Debug, Clone)]
pub struct ProviderQuery {
    pub url: ParsedUrl,
    pub block: Block,
}

/// Arguments for the raw thumbnail-data filter
#[derive(Debug, Clone)]
pub struct ThumbnailQuery {
    pub provider_slug: String,
    pub video_id: String,
    pub image_sizes: Vec<String>,
}

/// Arguments shared by every facade markup filter
#[derive(Debug, Clone)]
pub struct MarkupContext {
    pub block: Block,
    pub video_id: String,
    pub thumb: ThumbnailSet,
    /// Empty while the wrapper classes themselves are being filtered
    pub wrapper_classes: Vec<String>,
}

/// Arguments for the final facade HTML filter
#[derive(Debug, Clone)]
pub struct FacadeContext {
    pub provider_slug: String,
    pub block: Block,
    pub original_html: String,
}

pub type ProviderSupplier = Option<Arc<dyn Provider>>;

/// All registered extension points
#[derive(Clone, Default)]
pub struct Hooks {
    /// Registered provider list
    pub provider_registrations: FilterChain<Vec<ProviderRegistration>, ()>,
    /// Ready-made provider for a URL + block, short-circuits host matching
    pub video_provider: FilterChain<ProviderSupplier, ProviderQuery>,
    /// Per-provider allowed hosts, keyed by slug. Argument is the slug.
    pub allowed_hosts_by_provider: HashMap<String, FilterChain<Vec<HostPattern>, str>>,
    /// Global allowed hosts, applied after the per-provider chain
    pub allowed_hosts: FilterChain<Vec<HostPattern>, str>,
    pub image_sizes_by_provider: HashMap<String, FilterChain<Vec<String>, str>>,
    pub image_sizes: FilterChain<Vec<String>, str>,
    /// Per-provider raw thumbnail data, keyed by slug. Argument is the video id.
    pub provider_thumbnail_data: HashMap<String, FilterChain<ThumbnailSet, str>>,
    /// Thumbnail data as seen by the thumbnail service
    pub thumbnail_data: FilterChain<ThumbnailSet, ThumbnailQuery>,
    pub wrapper_classes: FilterChain<Vec<String>, MarkupContext>,
    pub open_markup: FilterChain<String, MarkupContext>,
    pub button_html: FilterChain<String, MarkupContext>,
    pub thumb_markup: FilterChain<String, MarkupContext>,
    pub close_markup: FilterChain<String, MarkupContext>,
    pub embed_template: FilterChain<String, MarkupContext>,
    pub facade_html: FilterChain<String, FacadeContext>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_allowed_hosts_for<F>(&mut self, slug: &str, filter: F) -> &mut Self
    where
        F: Fn(Vec<HostPattern>, &str) -> Vec<HostPattern> + Send + Sync + 'static,
    {
        self.allowed_hosts_by_provider
            .entry(slug.to_string())
            .or_default()
            .add(filter);
        self
    }

    pub fn on_image_sizes_for<F>(&mut self, slug: &str, filter: F) -> &mut Self
    where
        F: Fn(Vec<String>, &str) -> Vec<String> + Send + Sync + 'static,
    {
        self.image_sizes_by_provider
            .entry(slug.to_string())
            .or_default()
            .add(filter);
        self
    }

    pub fn on_provider_thumbnail_data<F>(&mut self, slug: &str, filter: F) -> &mut Self
    where
        F: Fn(ThumbnailSet, &str) -> ThumbnailSet + Send + Sync + 'static,
    {
        self.provider_thumbnail_data
            .entry(slug.to_string())
            .or_default()
            .add(filter);
        self
    }

    pub(crate) fn filter_allowed_hosts(&self, slug: &str, hosts: Vec<HostPattern>) -> Vec<HostPattern> {
        let hosts = match self.allowed_hosts_by_provider.get(slug) {
            Some(chain) => chain.apply(hosts, slug),
            None => hosts,
        };
        self.allowed_hosts.apply(hosts, slug)
    }

    pub(crate) fn filter_image_sizes(&self, slug: &str, sizes: Vec<String>) -> Vec<String> {
        let sizes = match self.image_sizes_by_provider.get(slug) {
            Some(chain) => chain.apply(sizes, slug),
            None => sizes,
        };
        self.image_sizes.apply(sizes, slug)
    }

    pub(crate) fn filter_provider_thumbnail_data(
        &self,
        slug: &str,
        video_id: &str,
        data: ThumbnailSet,
    ) -> ThumbnailSet {
        match self.provider_thumbnail_data.get(slug) {
            Some(chain) => chain.apply(data, video_id),
            None => data,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("provider_registrations", &self.provider_registrations)
            .field("video_provider", &self.video_provider)
            .field("allowed_hosts", &self.allowed_hosts)
            .field("image_sizes", &self.image_sizes)
            .field("thumbnail_data", &self.thumbnail_data)
            .field("facade_html", &self.facade_html)
            .finish_non_exhaustive()
    }
}
