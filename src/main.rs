// Command-line front end for resolving embed URLs and rendering facades

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use embed_facade::{Block, CacheBackend, EmbedError, FacadeConfig, Hooks};

#[derive(Parser)]
#[command(name = "embed-facade", version, about = "Video embed facade renderer")]
struct Cli {
    /// Settings file holding provider credentials
    #[arg(long, global = true, env = "TRIBE_EMBED_SETTINGS")]
    settings: Option<PathBuf>,

    /// SOCKS5/HTTP proxy for upstream requests
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Persist thumbnail sets in the user cache directory
    #[arg(long, global = true)]
    file_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the provider, video id and thumbnails for a URL as JSON
    Resolve { url: String },
    /// Print the facade markup for an embed block, or the original markup
    Render {
        url: String,
        /// Provider slug as stored on the block
        #[arg(long, default_value = "")]
        slug: String,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        align: Option<String>,
        /// Original inner markup of the block
        #[arg(long, default_value = "")]
        inner_html: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), EmbedError> {
    let backend = if cli.file_cache {
        CacheBackend::user_cache_dir()
    } else {
        CacheBackend::Memory
    };
    let config = FacadeConfig::default()
        .with_proxy(cli.proxy)
        .with_timeout(cli.timeout)
        .with_cache_backend(backend)
        .with_settings_path(cli.settings);

    let filter = embed_facade::block_filter(config, Hooks::new())?;

    match cli.command {
        Command::Resolve { url } => {
            let parsed = embed_facade::embed::parse(&url)
                .ok_or_else(|| EmbedError::InvalidUrl(url.clone()))?;
            let block = Block::embed(url.as_str(), "");

            let output = match filter.thumbnails().resolve_thumb(&parsed, &block).await {
                Some(resolved) => serde_json::json!({
                    "provider": resolved.slug,
                    "video_id": resolved.video_id,
                    "thumbnails": resolved.thumb,
                }),
                None => serde_json::json!({
                    "provider": null,
                    "host": parsed.host,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Render {
            url,
            slug,
            class,
            align,
            inner_html,
        } => {
            let mut block = Block::embed(url, slug).with_inner_html(inner_html.as_str());
            block.attrs.class_name = class;
            block.attrs.align = align;

            println!("{}", filter.filter_render_block(&inner_html, &block).await);
        }
    }

    Ok(())
}
