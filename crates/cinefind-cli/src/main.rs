//! cinefind - terminal movie discovery CLI.

/// Application configuration (TOML + environment).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, log_file_path, resolve_config_path};
use crate::tui::run_browser;
use cinefind_api::appwrite::AppwriteClient;
use cinefind_api::tmdb::{Movie, MovieApi, TmdbClient};
use cinefind_core::analytics::{AnalyticsRecorder, DEFAULT_TRENDING_LIMIT};
use cinefind_core::debounce::Debouncer;
use cinefind_core::orchestrator::Orchestrator;
use cinefind_core::workflow::{
    NO_MOVIES_FOUND, POPULAR_FAILED, SEARCH_FAILED, TRENDING_FAILED, TRENDING_LIMIT,
};

/// User-Agent sent to every API.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse popular and trending movies and search interactively via TUI.
    Browse,
    /// List the first page of popular movies.
    Popular,
    /// List today's top trending movies.
    Trending,
    /// Search movies by title.
    Search(SearchArgs),
    /// List the most searched terms.
    TopSearches(TopSearchesArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "spirited away").
    #[arg(long, required = true)]
    query: String,
    /// Do not count this search in the analytics store.
    #[arg(long)]
    no_record: bool,
}

/// Arguments for the `top-searches` subcommand.
#[derive(clap::Args)]
struct TopSearchesArgs {
    /// Maximum number of terms to list.
    #[arg(long, default_value_t = DEFAULT_TRENDING_LIMIT)]
    limit: u32,
}

/// Parses a TMDB base URL, adding the trailing slash relative paths need.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("invalid TMDB base URL: {raw}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builds a TMDB client from config.
///
/// # Errors
///
/// Returns an error if the API key is missing, the base URL is invalid,
/// or the client fails to build.
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder()
        .api_key(config.tmdb_api_key()?)
        .user_agent(USER_AGENT);
    if let Some(raw) = config.tmdb.base_url.as_deref() {
        builder = builder.base_url(parse_base_url(raw)?);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the analytics recorder, or `None` when the store is not configured.
///
/// # Errors
///
/// Returns an error if the endpoint is invalid or the client fails to build.
fn build_recorder(config: &AppConfig) -> Result<Option<AnalyticsRecorder<AppwriteClient>>> {
    let Some(ids) = config.appwrite.collection_ids() else {
        tracing::info!("Appwrite is not configured, search analytics disabled");
        return Ok(None);
    };

    let mut builder = AppwriteClient::builder()
        .project_id(ids.project_id)
        .database_id(ids.database_id)
        .collection_id(ids.collection_id)
        .user_agent(USER_AGENT);
    if let Some(raw) = config.appwrite.endpoint.as_deref() {
        let endpoint =
            Url::parse(raw).with_context(|| format!("invalid Appwrite endpoint: {raw}"))?;
        builder = builder.endpoint(endpoint);
    }
    let client = builder.build().context("failed to build Appwrite client")?;
    Ok(Some(AnalyticsRecorder::new(client)))
}

/// Logs movies as a table.
fn log_movies(movies: &[Movie]) {
    tracing::info!("ID\tRating\tYear\tLang\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            movie.id,
            movie.rating_label(),
            movie
                .release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            movie.original_language,
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_popular(config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let movies = client.popular().await.context(POPULAR_FAILED)?;
    log_movies(&movies);
    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_trending(config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let mut movies = client.trending().await.context(TRENDING_FAILED)?;
    movies.truncate(TRENDING_LIMIT);
    log_movies(&movies);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// Counts the search in the analytics store when it found something, unless
/// `--no-record` is given or the store is not configured.
///
/// # Errors
///
/// Returns an error if the query is blank, a client fails to build, or the
/// search request fails. Analytics failures are only logged.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    if args.query.trim().is_empty() {
        bail!("--query must not be blank");
    }

    let client = build_tmdb_client(config)?;
    let movies = client.search(&args.query).await.context(SEARCH_FAILED)?;
    let Some(first) = movies.first() else {
        tracing::info!("{NO_MOVIES_FOUND}");
        return Ok(());
    };
    log_movies(&movies);

    if args.no_record {
        return Ok(());
    }
    if let Some(recorder) = build_recorder(config)? {
        recorder.record_search(&args.query, first).await;
    }
    Ok(())
}

/// Runs the `top-searches` subcommand.
///
/// # Errors
///
/// Returns an error if the analytics store is not configured.
#[instrument(skip_all)]
async fn run_top_searches(args: &TopSearchesArgs, config: &AppConfig) -> Result<()> {
    let recorder = build_recorder(config)?.context(
        "Appwrite is not configured: set APPWRITE_PROJECT_ID, APPWRITE_DATABASE_ID and APPWRITE_COLLECTION_ID",
    )?;

    let docs = recorder.trending_by_count(args.limit).await;
    if docs.is_empty() {
        tracing::info!("No searches recorded yet.");
        return Ok(());
    }

    tracing::info!("Rank\tCount\tTerm\tMovie");
    for (rank, doc) in (1_usize..).zip(&docs) {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            rank,
            doc.record.count,
            doc.record.search_term,
            doc.record.title.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if a client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(config: &AppConfig) -> Result<()> {
    let api = Arc::new(build_tmdb_client(config)?);
    let recorder = build_recorder(config)?.map(Arc::new);
    let (orchestrator, completions) = Orchestrator::new(api, recorder.clone());
    let debouncer = Debouncer::new(config.debounce_period());

    tracing::info!(
        debounce_ms = config.search.debounce_ms,
        "Launching movie browser..."
    );
    run_browser(orchestrator, completions, debouncer, recorder)
        .await
        .context("movie browser TUI failed")
}

/// Opens the TUI log file for appending, creating its directory if needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Initializes the tracing subscriber.
///
/// Logs go to stdout, or to `log_file` (without ANSI colors) when given.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(std::io::stdout),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path =
        resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;

    let log_file = if matches!(cli.command, Commands::Browse) {
        Some(open_log_file(&log_file_path(&config_path))?)
    } else {
        None
    };
    init_tracing(log_file);

    let mut config = AppConfig::load(&config_path).context("failed to load config")?;
    config.apply_env();
    config.tmdb_api_key()?;

    match cli.command {
        Commands::Browse => run_browse(&config).await,
        Commands::Popular => run_popular(&config).await,
        Commands::Trending => run_trending(&config).await,
        Commands::Search(args) => run_search(&args, &config).await,
        Commands::TopSearches(args) => run_top_searches(&args, &config).await,
    }
}
