// Video embed facades: swap heavyweight player embeds for a thumbnail
// placeholder that loads the real player on interaction

pub mod embed;

use std::sync::Arc;

use tracing::debug;

pub use embed::{
    Block, BlockAttrs, BlockFilter, CacheBackend, Credentials, EmbedError, Endpoints, FacadeBuilder,
    FacadeConfig, Hooks, HostPattern, ParsedUrl, Provider, ProviderRegistration, ResolvedThumb,
    Settings, ThumbnailImage, ThumbnailSet,
};

/// Wire the full pipeline for one configuration.
///
/// Credentials come from the environment first, then the settings file.
pub fn block_filter(config: FacadeConfig, hooks: Hooks) -> Result<BlockFilter, EmbedError> {
    let settings = Settings::load_or_default(config.settings_path.as_deref());
    let credentials = Credentials::resolve(&settings);
    block_filter_with_credentials(config, hooks, credentials)
}

/// Same as [`block_filter`] with explicit credentials
pub fn block_filter_with_credentials(
    config: FacadeConfig,
    hooks: Hooks,
    credentials: Credentials,
) -> Result<BlockFilter, EmbedError> {
    debug!("[Setup] Building pipeline with {:?}", credentials);

    let hooks = Arc::new(hooks);
    let http = embed::http::build_client(&config)?;
    let cache = embed::cache::from_backend(&config.cache_backend);

    let ctx = Arc::new(embed::ProviderContext::new(
        &config,
        http,
        cache,
        credentials,
        hooks.clone(),
    ));
    let factory = Arc::new(embed::ProviderFactory::new(ctx, hooks.clone()));
    let thumbnails = Arc::new(embed::ThumbnailService::new(factory, hooks.clone()));

    Ok(BlockFilter::new(thumbnails, FacadeBuilder::new(hooks.clone()), hooks))
}
