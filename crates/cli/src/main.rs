use crate::{env::EnvManager, error::CliError};
use api_config::settings::Settings;
use chrono::{DateTime, Utc};
use clap::Parser;
use commands::Commands;
use model::{pagination::config::PageConfig, time::window::TimeWindow};
use pagination::{
    memory::MemoryProvider,
    paginator::{Paginated, Paginator},
    request::PageRequest,
};
use serde::Serialize;
use serde_json::Value;
use stats::{
    clock::{Clock, FixedClock, SystemClock},
    resolver::{StatsQuery, TimeWindowResolver},
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "pager",
    version = "0.1.0",
    about = "Cursor pagination and stats window tool"
)]
struct Cli {
    #[arg(long, global = true, help = "JSON settings file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = ".env file with settings overrides")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Serialize)]
struct WindowReport {
    #[serde(flatten)]
    window: TimeWindow,
    effective_rollup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckets: Option<Vec<DateTime<Utc>>>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr, stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref(), cli.env_file.as_deref())?;

    match cli.command {
        Commands::Window {
            since,
            until,
            resolution,
            now,
            snap,
            output,
        } => {
            let query = StatsQuery {
                since,
                until,
                resolution,
            };
            let report = resolve_window(&settings, &query, now, snap)?;
            output::emit(&report, output).await?;
        }
        Commands::Page {
            data,
            url,
            query,
            per_page,
            cursor,
            key,
            reverse,
            id_field,
            output,
        } => {
            info!("Paginating {} ordered by {} (reverse: {})", data, key, reverse);

            let mut config = PageConfig::by(key);
            if reverse {
                config = config.reversed();
            }

            let source = tokio::fs::read_to_string(&data).await?;
            let items: Vec<Value> = serde_json::from_str(&source)?;
            let provider = MemoryProvider::with_id_field(items, id_field)?;

            let page = paginate(&settings, provider, config, &url, query, per_page, cursor).await?;
            output::emit(&page, output).await?;
        }
    }

    Ok(())
}

fn load_settings(
    config: Option<&std::path::Path>,
    env_file: Option<&std::path::Path>,
) -> Result<Settings, CliError> {
    let mut env = EnvManager::from_process();
    if let Some(path) = env_file {
        info!("Loading environment from {}", path.display());
        env.load_from_file(path)?;
    }

    Ok(Settings::load(config, env.all())?)
}

fn resolve_window(
    settings: &Settings,
    query: &StatsQuery,
    now: Option<i64>,
    snap: bool,
) -> Result<WindowReport, CliError> {
    let clock: Arc<dyn Clock> = match now {
        Some(secs) => Arc::new(FixedClock::at_timestamp(secs).ok_or_else(|| {
            CliError::InvalidArgument(format!("--now {secs} is out of range"))
        })?),
        None => Arc::new(SystemClock),
    };

    let resolver = TimeWindowResolver::new(settings.resolver_settings()?).with_clock(clock);
    let mut window = resolver.resolve(query)?;
    let effective_rollup = resolver.effective_rollup(&window)?.label.clone();

    let buckets = match (snap, window.rollup()) {
        (true, Some(rollup)) => {
            window = window.snap_to(rollup)?;
            Some(resolver.buckets(&window, rollup)?)
        }
        _ => None,
    };

    Ok(WindowReport {
        window,
        effective_rollup,
        buckets,
    })
}

async fn paginate(
    settings: &Settings,
    provider: MemoryProvider,
    config: PageConfig,
    url: &str,
    mut query: Vec<(String, String)>,
    per_page: Option<String>,
    cursor: Option<String>,
) -> Result<Paginated<Value>, CliError> {
    if let Some(per_page) = per_page {
        query.push(("per_page".to_string(), per_page));
    }
    if let Some(cursor) = cursor {
        query.push(("cursor".to_string(), cursor));
    }

    let limits = settings.page_limits();
    let request = PageRequest::from_query(&query, &limits)?;
    let paginator = Paginator::new(provider, config, limits);

    Ok(paginator.paginate(&request, url, &query).await?)
}
