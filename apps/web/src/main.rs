use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use skimtube::{AppConfig, AppState, router};
use skimtube_core::{
    ChatCompletionClient, Provider, SkimPipeline, Summarizer, YoutubeCaptionSource,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, ValueEnum)]
enum CliProvider {
    Openai,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "skimtube")]
#[command(about = "Serve one-sentence summaries of YouTube videos, a few minutes at a time")]
struct Cli {
    /// Config file (defaults to ./skimtube.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. "127.0.0.1:5000"
    #[arg(short, long)]
    listen: Option<String>,

    /// AI provider for summaries
    #[arg(short, long)]
    provider: Option<CliProvider>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {e:#}");
            std::process::exit(1);
        }
    };
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    if let Some(provider) = cli.provider {
        config.provider = provider.into();
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Validate API key early
    let api_key = match config.provider.resolve_api_key(&config.key_file) {
        Ok(key) => key,
        Err(e) => {
            error!(provider = config.provider.name(), "{e}");
            std::process::exit(1);
        }
    };

    let mut completion = ChatCompletionClient::new(&config.provider, api_key);
    if let Some(model) = &config.model {
        completion = completion.with_model(model);
    }
    if let Some(api_url) = &config.api_url {
        completion = completion.with_api_url(api_url);
    }
    info!(
        provider = config.provider.name(),
        model = completion.model(),
        "completion service ready"
    );

    let captions = YoutubeCaptionSource::new(config.languages.clone())
        .context("Failed to build YouTube client")?;
    let summarizer =
        Summarizer::new(Arc::new(completion)).with_concurrency(config.summary_concurrency);

    let state = AppState {
        pipeline: Arc::new(SkimPipeline::new(Arc::new(captions), summarizer)),
        html_links: config.html_links,
        default_chunk_minutes: config.default_chunk_minutes,
    };

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}
