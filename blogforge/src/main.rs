/*
blogforge - main.rs
Starts the Rocket HTTP server serving the blog post generation API.
*/

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use blogforge::composer::PostComposer;
use blogforge::llm::remote::RemoteLlmProvider;
use blogforge::news::{CurrentsClient, NewsProvider};
use blogforge::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "blogforge", about = "AI blog post generator server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Pick up a local .env file, if any, before resolving credentials
    dotenv::dotenv().ok();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    // Load configuration with defaults
    let config = Config::load_with_defaults(
        if default_path.exists() {
            Some(&default_path)
        } else {
            None
        },
        override_path.as_deref(),
    )
    .await
    .context("failed to load configuration")?;
    info!(default = ?default_path, override_path = ?override_path, "configuration loaded");

    // Generation provider: the API key is required; refuse to start without it
    let llm_cfg = &config.llm;
    let api_key_env = llm_cfg.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
    let api_key = std::env::var(api_key_env)
        .with_context(|| format!("generation API key env var '{}' not set", api_key_env))?;

    let api_url = llm_cfg
        .api_url
        .clone()
        .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
    let model = llm_cfg
        .model
        .clone()
        .unwrap_or_else(|| "gpt-4o-mini".to_string());
    let body_model = llm_cfg
        .body_model
        .clone()
        .unwrap_or_else(|| "gpt-4o".to_string());
    let timeout_secs = llm_cfg.timeout_seconds.unwrap_or(60);

    let llm = RemoteLlmProvider::new(api_url, api_key, model.clone())
        .with_defaults(timeout_secs, 2048, 0.7);
    info!(%model, %body_model, "generation provider initialized");

    // News provider: optional; a missing key disables enrichment, nothing more
    let news_cfg = config.news.clone().unwrap_or_default();
    let news_key_env = news_cfg.api_key_env.as_deref().unwrap_or("CURRENTS_API_KEY");
    let news: Option<Arc<dyn NewsProvider>> = match std::env::var(news_key_env) {
        Ok(key) => {
            let news_url = news_cfg
                .api_url
                .clone()
                .unwrap_or_else(|| "https://api.currentsapi.services/v1/search".to_string());
            let language = news_cfg.language.clone().unwrap_or_else(|| "en".to_string());
            info!(%language, "news enrichment enabled");
            Some(Arc::new(CurrentsClient::new(news_url, key, language)))
        }
        Err(_) => {
            warn!(
                "news API key env var '{}' not set; news enrichment disabled",
                news_key_env
            );
            None
        }
    };

    let composer = PostComposer::new(Arc::new(llm), news).with_body_model(body_model);

    let state = AppState {
        started_at: Utc::now(),
        config: Arc::new(config),
        composer: Arc::new(composer),
    };

    // Launch the Rocket server (blocking until Rocket shuts down)
    server::launch(state).await
}
