// Embed facade module: provider resolution, thumbnails and facade markup

pub mod block_filter;
pub mod builder;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod factory;
pub mod hooks;
pub mod hosts;
pub mod http;
pub mod models;
pub mod providers;
pub mod sanitize;
pub mod thumbnails;
pub mod traits;
pub mod url_parser;

pub use block_filter::BlockFilter;
pub use builder::FacadeBuilder;
pub use cache::{FileCache, MemoryCache, ThumbnailCache};
pub use config::{CacheBackend, Endpoints, FacadeConfig};
pub use credentials::{Credentials, Settings};
pub use errors::EmbedError;
pub use factory::{ProviderFactory, ProviderRegistration};
pub use hooks::{FilterChain, Hooks};
pub use hosts::HostPattern;
pub use models::{Block, BlockAttrs, ThumbnailImage, ThumbnailSet};
pub use thumbnails::{ResolvedThumb, ThumbnailService};
pub use traits::{Provider, ProviderContext};
pub use url_parser::{parse, ParsedUrl};
