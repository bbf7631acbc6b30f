use anyhow::Context;
use clap::Parser;
use nw_core::{InferenceModel, NewsSink, NewsStore, NullSink, SummaryOptions};
use nw_inference::{Summarizer, DEFAULT_MODEL_URL};
use nw_scrapers::cli::{handle_command, ScraperArgs};
use nw_scrapers::logging::init_logging;
use nw_scrapers::scrapers::brazil::default_sources;
use nw_scrapers::scrapers::homepage_scrapers;
use nw_scrapers::scrapers::links::DEFAULT_MAX_LINKS;
use nw_scrapers::sources::load_sources;
use nw_scrapers::{FallbackPolicy, Fetcher, IngestionConfig, IngestionManager};
use nw_web::{create_app, AppState, BroadcastHub};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Accepts `30`, `45s`, `5m`, `1h15m30s`, `1d`. A bare number is seconds.
    /// Zero and values that overflow are rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_number = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            if current_number.is_empty() {
                return Err(format!("Unit '{}' must follow a number", c));
            }
            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Number too large in duration: {}", current_number))?;
            let multiplier = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            total_seconds = num
                .checked_mul(multiplier)
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            current_number.clear();
            has_number = true;
        }

        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| format!("Number too large in duration: {}", current_number))?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| format!("Duration too large: {}", s))?;
            has_number = true;
        }

        if !has_number {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape, summarize and stream news headlines", long_about = None)]
pub struct Cli {
    /// Storage backend: sqlite or memory
    #[arg(long, default_value = "sqlite")]
    storage: String,
    #[arg(long, default_value = "noticias.db")]
    db_path: PathBuf,
    /// Summarization backend: lead or ollama
    #[arg(long, default_value = "lead")]
    model: String,
    #[arg(long, default_value = DEFAULT_MODEL_URL)]
    model_url: String,
    #[arg(long)]
    model_name: Option<String>,
    /// Give up on a summarization request after this long (e.g. 30s)
    #[arg(long)]
    model_timeout: Option<HumanDuration>,
    #[arg(long, default_value = "127.0.0.1:5001")]
    bind: SocketAddr,
    /// Directory holding index.html and its assets
    #[arg(long, default_value = ".")]
    static_dir: PathBuf,
    /// TOML file with a [[sources]] list; the built-in Brazilian outlets otherwise
    #[arg(long)]
    sources: Option<PathBuf>,
    /// Pause between ingestion cycles (e.g. 5m, 1h, 1h15m30s)
    #[arg(long, default_value = "300s")]
    interval: HumanDuration,
    #[arg(long, default_value = "5s")]
    fetch_timeout: HumanDuration,
    #[arg(long, default_value_t = DEFAULT_MAX_LINKS)]
    max_links: usize,
    #[arg(long, value_enum, default_value_t = FallbackPolicy::Persist)]
    on_fallback: FallbackPolicy,
    /// Keep only the newest N items after each cycle
    #[arg(long)]
    retain: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the API and run the ingestion loop (default)
    Serve,
    /// One-shot scraping commands
    Scrape(ScraperArgs),
}

fn build_manager(
    cli: &Cli,
    storage: Arc<dyn NewsStore>,
    sink: Arc<dyn NewsSink>,
) -> anyhow::Result<IngestionManager> {
    let model_config = nw_inference::Config {
        model: cli.model.clone(),
        model_url: Some(cli.model_url.clone()),
        model_name: cli.model_name.clone(),
        request_timeout: cli.model_timeout.map(|d| d.0),
    };
    let model = nw_inference::create_model(&model_config)?;
    info!("🧠 Inference model initialized (using {})", model.name());
    let summarizer = Summarizer::with_options(model, SummaryOptions::default());

    let sources = match &cli.sources {
        Some(path) => load_sources(path)
            .with_context(|| format!("loading sources from {}", path.display()))?,
        None => default_sources(),
    };
    let fetcher = Fetcher::with_timeout(cli.fetch_timeout.0)?;
    let scrapers = homepage_scrapers(&sources, &fetcher, cli.max_links);
    info!(
        "🦗 Scrapers initialized: {}",
        sources.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    let config = IngestionConfig {
        interval: cli.interval.0,
        fallback_policy: cli.on_fallback,
        retain: cli.retain,
    };
    Ok(IngestionManager::new(storage, summarizer, sink, config).with_scrapers(scrapers))
}

async fn serve(cli: &Cli, storage: Arc<dyn NewsStore>) -> anyhow::Result<()> {
    let hub = BroadcastHub::default();
    let manager = build_manager(cli, storage.clone(), Arc::new(hub.clone()))?;
    let handle = manager.spawn();

    let state = AppState {
        storage,
        hub,
        monitor: handle.monitor(),
        static_dir: cli.static_dir.clone(),
    };
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    info!("🌐 Listening on http://{}", cli.bind);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down ingestion loop");
    handle.stop().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let storage = nw_storage::create_storage(&cli.storage, &cli.db_path).await?;

    match &cli.command {
        None | Some(Commands::Serve) => serve(&cli, storage).await,
        Some(Commands::Scrape(args)) => {
            let manager = build_manager(&cli, storage, Arc::new(NullSink))?;
            handle_command(args.clone(), &manager).await?;
            Ok(())
        }
    }
}
