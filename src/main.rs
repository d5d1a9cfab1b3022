//! CLI entry point for venue_ledger.
//!
//! Provides subcommands for resolving place identifiers through Google
//! Places, listing every visited place for manual curation, and generating
//! the drinking-venue summary from a location-history export.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use venue_ledger::{
    analyzers::{aggregate::aggregate, discover::discover_places},
    cache::PlaceCache,
    config::{self, ResolveOptions},
    extract::extract_visits,
    infra::places::GooglePlacesClient,
    loader::load_segments,
    output::{print_discovery_table, write_discovery_csv, write_json},
    overrides::Overrides,
    resolve::resolve_places,
    visit::Visit,
};

#[derive(Parser)]
#[command(name = "venue_ledger")]
#[command(
    about = "Find brewery, bar and winery visits in a location-history export",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing Timeline JSON exports
    #[arg(short, long, default_value = config::DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Place resolution cache
    #[arg(long, default_value = config::DEFAULT_CACHE_PATH)]
    cache: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter for drinking venues and write the summary JSON
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Venue overrides JSON
        #[arg(long, default_value = config::DEFAULT_OVERRIDES_PATH)]
        overrides: PathBuf,

        /// Output JSON path
        #[arg(short, long, default_value = config::DEFAULT_OUTPUT_PATH)]
        output: PathBuf,
    },
    /// Resolve place IDs to names via Google Places and cache the results
    Resolve {
        #[command(flatten)]
        input: InputArgs,

        /// Google Places API key (or set GOOGLE_PLACES_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// List every visited place with visit counts, for manual curation
    Discover {
        #[command(flatten)]
        input: InputArgs,

        /// Optional: also write the listing to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| config::DEFAULT_LOG_FILE.to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("venue_ledger.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            overrides,
            output,
        } => {
            let visits = load_visits(&input.input_dir);
            let cache = PlaceCache::load(&input.cache);
            let overrides = Overrides::load(&overrides);

            info!(
                overrides = overrides.len(),
                cached_places = cache.len(),
                "Generating venue summary"
            );

            let document = aggregate(&visits, &overrides, &cache);
            write_json(&output, &document)?;

            info!(
                venues = document.summary.total_venues,
                visits = document.summary.total_visits,
                output = %output.display(),
                "Found drinking venues"
            );
        }
        Commands::Resolve { input, api_key } => {
            // Credentials are checked before any export is read.
            let api_key = config::resolve_api_key(api_key)?;
            let client = GooglePlacesClient::new(&api_key)?;

            let visits = load_visits(&input.input_dir);
            let mut cache = PlaceCache::load(&input.cache);

            let report =
                resolve_places(&visits, &mut cache, &client, &ResolveOptions::default()).await?;

            info!(
                resolved = report.resolved,
                not_found = report.not_found,
                failed = report.failed,
                skipped_private = report.skipped_private,
                cache_entries = cache.len(),
                cache = %cache.path().display(),
                "Resolve finished"
            );
        }
        Commands::Discover { input, csv } => {
            let visits = load_visits(&input.input_dir);
            let cache = PlaceCache::load(&input.cache);

            let report = discover_places(&visits, &cache);
            print_discovery_table(&mut std::io::stdout().lock(), &report)?;

            if let Some(csv) = csv {
                write_discovery_csv(&csv, &report)?;
            }
        }
    }

    Ok(())
}

/// Loads every export file under `input_dir` and extracts its visits.
fn load_visits(input_dir: &Path) -> Vec<Visit> {
    info!(input_dir = %input_dir.display(), "Loading Timeline data");
    let segments = load_segments(input_dir);
    extract_visits(&segments)
}
