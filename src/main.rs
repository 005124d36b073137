use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use offline_shell::cache::MemoryCacheStorage;
use offline_shell::config::Config;
use offline_shell::fetch::HttpFetcher;
use offline_shell::http::{Destination, Request, RequestMode};
use offline_shell::{FetchOutcome, ServiceWorker};

/// Offline Shell - offline-first request interception and caching layer
#[derive(Parser, Debug)]
#[command(name = "offline-shell")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// URL to dispatch through the worker after activation (repeatable)
    #[arg(long = "fetch", value_name = "URL")]
    fetch: Vec<String>,

    /// Dispatch the URLs as top-level navigations
    #[arg(long)]
    navigate: bool,

    /// Request destination for dispatched URLs (image, script, style, ...)
    #[arg(long, value_name = "DESTINATION")]
    destination: Option<Destination>,

    /// Print Prometheus metrics before exiting
    #[arg(long)]
    metrics: bool,
}

fn build_request(args: &Args, url: &str) -> Result<Request> {
    let mut request = Request::get(url).with_context(|| format!("Invalid URL '{}'", url))?;
    if args.navigate {
        request = request
            .with_mode(RequestMode::Navigate)
            .with_destination(Destination::Document);
    }
    if let Some(destination) = args.destination {
        request = request.with_destination(destination);
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    config.validate().map_err(anyhow::Error::msg)?;

    offline_shell::logging::init_subscriber(&config.logging)?;

    tracing::info!(
        config_file = %args.config.display(),
        scope = %config.worker.scope,
        cache = %config.worker.cache_name(),
        assets = config.precache.assets.len(),
        trusted_origins = config.origins.trusted.len(),
        "Configuration loaded successfully"
    );

    if args.test {
        println!("Configuration OK: {}", args.config.display());
        return Ok(());
    }

    let fetcher = HttpFetcher::new(&config.network, {
        let scope = url::Url::parse(&config.worker.scope)?;
        scope.origin().ascii_serialization()
    })?;
    let worker = ServiceWorker::new(
        &config,
        Arc::new(MemoryCacheStorage::new()),
        Arc::new(fetcher),
    )?;

    worker.install().await?;
    worker.activate().await?;

    for url in &args.fetch {
        let request = build_request(&args, url)?;
        match worker.handle_fetch(request).await {
            FetchOutcome::Respond(response) => tracing::info!(
                url = %url,
                status = response.status().as_u16(),
                content_type = response.content_type().unwrap_or(""),
                bytes = response.body_bytes().len(),
                "Served"
            ),
            FetchOutcome::Abstain(reason) => {
                tracing::info!(url = %url, reason = %reason, "Not intercepted")
            }
        }
    }

    worker.flush().await;

    if args.metrics {
        print!("{}", worker.metrics().export()?);
    }

    Ok(())
}
