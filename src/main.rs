use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use car_store::admin::StatsPoller;
use car_store::api::{Backend, HttpBackend};
use car_store::catalog::Catalog;
use car_store::compare::CompareManager;
use car_store::config::Settings;
use car_store::error::{Action, ActionFailure, ActionResult, CompareError};
use car_store::models::PageResult;
use car_store::pagination::render_pagination;
use car_store::query::{FilterKey, RawInputs};
use car_store::render::{Renderer, TerminalRenderer};
use car_store::storage::FileStore;
use car_store::suggest::{Autocomplete, SuggestionEvent, TokioScheduler};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Browse the car store catalog from the terminal.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file name (extension optional).
    #[arg(short, long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available cars.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Search cars by text and filters.
    Search {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show one car with similar cars.
    Show { id: u64 },
    /// Show available filter values.
    Filters,
    /// Suggest search terms for a partial query.
    Suggest { query: String },
    /// Manage the comparison list.
    Compare {
        #[command(subcommand)]
        action: CompareCommand,
    },
    /// Show admin dashboard statistics.
    Stats {
        /// Keep polling at the configured interval.
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CompareCommand {
    /// Add a car, or remove it if already selected.
    Toggle { id: String },
    /// Print the comparison page link.
    View,
    /// Print the selected cars.
    Show,
    /// Remove every car from the list.
    Clear,
}

#[derive(Debug, Default, ClapArgs)]
struct FilterArgs {
    #[arg(short = 'q', long = "text")]
    search_text: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    fuel_type: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    #[arg(long)]
    car_type: Option<String>,
    #[arg(long)]
    performance_level: Option<String>,
    #[arg(long)]
    price_min: Option<String>,
    #[arg(long)]
    price_max: Option<String>,
    #[arg(long)]
    year_from: Option<String>,
    #[arg(long)]
    year_to: Option<String>,
    #[arg(long)]
    sort_by: Option<String>,
}

impl FilterArgs {
    fn into_raw_inputs(self) -> RawInputs {
        let fields = [
            (FilterKey::SearchText, self.search_text),
            (FilterKey::Brand, self.brand),
            (FilterKey::FuelType, self.fuel_type),
            (FilterKey::Transmission, self.transmission),
            (FilterKey::CarType, self.car_type),
            (FilterKey::PerformanceLevel, self.performance_level),
            (FilterKey::PriceMin, self.price_min),
            (FilterKey::PriceMax, self.price_max),
            (FilterKey::YearFrom, self.year_from),
            (FilterKey::YearTo, self.year_to),
            (FilterKey::SortBy, self.sort_by),
        ];
        fields
            .into_iter()
            .fold(RawInputs::new(), |raw, (key, value)| match value {
                Some(value) => raw.with(key, value),
                None => raw,
            })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Logs go to stderr so they never mix with rendered output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "car_store=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let settings = match Settings::from_file(&args.config) {
        Ok(s) => {
            tracing::debug!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let backend = Arc::new(HttpBackend::new(&settings).context("Failed to create API backend")?);
    let mut renderer = TerminalRenderer::new(io::stdout().lock());

    match args.command {
        Command::List { page, filters } => {
            let mut catalog = Catalog::new(Arc::clone(&backend));
            let result = catalog.load(page, &filters.into_raw_inputs()).await;
            show_page(&mut renderer, result)?;
        }
        Command::Search { page, filters } => {
            let mut catalog = Catalog::new(Arc::clone(&backend));
            let result = catalog.search_page(&filters.into_raw_inputs(), page).await;
            show_page(&mut renderer, result)?;
        }
        Command::Show { id } => {
            let catalog = Catalog::new(Arc::clone(&backend));
            match catalog.show_details(id).await {
                Ok(details) => renderer.render_details(&details)?,
                Err(failure) => renderer.render_notice(&failure.notice())?,
            }
        }
        Command::Filters => {
            let catalog = Catalog::new(Arc::clone(&backend));
            match catalog.filter_options().await {
                Ok(options) => renderer.render_filters(&options)?,
                Err(failure) => renderer.render_notice(&failure.notice())?,
            }
        }
        Command::Suggest { query } => {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut autocomplete = Autocomplete::new(
                Arc::clone(&backend),
                TokioScheduler,
                settings.suggestion_debounce(),
                settings.suggestion_min_chars,
                tx,
            );
            autocomplete.on_input(&query);
            if let Some(SuggestionEvent::Show { suggestions, .. }) = rx.recv().await {
                renderer.render_suggestions(&suggestions)?;
            }
        }
        Command::Compare { action } => {
            let store = FileStore::new(&settings.storage_path);
            let mut compare = CompareManager::new(store);
            run_compare(&mut compare, &mut renderer, action)?;
        }
        Command::Stats { watch } => {
            if watch {
                watch_stats(backend, &settings, &mut renderer).await?;
            } else {
                match backend.admin_stats().await {
                    Ok(stats) => renderer.render_stats(&stats)?,
                    Err(cause) => {
                        renderer.render_notice(&ActionFailure::new(Action::Stats, cause).notice())?
                    }
                }
            }
        }
    }

    Ok(())
}

fn show_page<R: Renderer>(
    renderer: &mut R,
    result: ActionResult<PageResult>,
) -> Result<()> {
    match result {
        Ok(page) => renderer.render_results(&page, &render_pagination(&page))?,
        Err(failure) => renderer.render_notice(&failure.notice())?,
    }
    Ok(())
}

fn run_compare<R: Renderer>(
    compare: &mut CompareManager<FileStore>,
    renderer: &mut R,
    action: CompareCommand,
) -> Result<()> {
    match action {
        CompareCommand::Toggle { id } => match compare.toggle(&id) {
            Ok(outcome) => {
                renderer.render_notice(&outcome.notice())?;
                renderer.render_compare_state(compare.list()?)?;
            }
            Err(e) => renderer.render_notice(&CompareError::from(e).notice())?,
        },
        CompareCommand::View => match compare.request_comparison_view() {
            Ok(target) => renderer.render_comparison_target(&target)?,
            Err(e) => renderer.render_notice(&e.notice())?,
        },
        CompareCommand::Show => renderer.render_compare_state(compare.list()?)?,
        CompareCommand::Clear => {
            compare.clear()?;
            renderer.render_compare_state(compare.list()?)?;
        }
    }
    Ok(())
}

async fn watch_stats<W: Write>(
    backend: Arc<HttpBackend>,
    settings: &Settings,
    renderer: &mut TerminalRenderer<W>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = StatsPoller::new(backend, settings.stats_poll_interval()).spawn(tx);
    tracing::info!(
        "Polling stats every {}s, press Ctrl-C to stop",
        settings.stats_poll_interval_secs
    );

    loop {
        tokio::select! {
            Some(stats) = rx.recv() => renderer.render_stats(&stats)?,
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    poller.abort();
    Ok(())
}
