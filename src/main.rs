mod cli;

use clap::Parser;
use cli::{Cli, Commands, DayArgs, WalkArgs};
use hutcam::config::Config;
use hutcam::engine::{Direction, NavOutcome, Navigator, OpenRequest};
use hutcam::fetcher::{DayFetcher, HttpManifestSource};
use hutcam::latest::{stale_after, LatestStateClient};
use hutcam::model::{DayKey, Period};
use hutcam::observability::{init_tracing, Metrics};
use hutcam::surface::ConsoleSurface;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Day(args) => run_day(&config, args).await?,
        Commands::Walk(args) => run_walk(&config, args).await?,
        Commands::Latest => run_latest(&config).await?,
    }

    Ok(())
}

fn build_fetcher(config: &Config, metrics: Arc<Metrics>) -> Result<Arc<DayFetcher>, Box<dyn std::error::Error + Send + Sync>> {
    let source = HttpManifestSource::new(&config.storage.base_url, &config.fetch)?;
    Ok(Arc::new(DayFetcher::new(Arc::new(source), metrics)))
}

async fn run_day(
    config: &Config,
    args: DayArgs,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new());
    let fetcher = build_fetcher(config, metrics)?;

    let day = args.date.unwrap_or_else(DayKey::today);
    match fetcher.ensure_day(day).await {
        Ok(key) => {
            let manifest = fetcher.manifest(key).await.unwrap_or_default();
            if manifest.is_empty() {
                println!("{key}: no snapshots");
                return Ok(());
            }
            println!("{key}: {} snapshots", manifest.len());
            for period in Period::ALL {
                for entry in manifest.entries(period) {
                    let time = entry.captured_at.as_deref().unwrap_or("--:--");
                    println!(
                        "  {:>6} [{}] {:<24} {}",
                        period,
                        time,
                        config.cameras.label(entry.camera.as_str()),
                        entry.image_url(&config.storage.base_url)
                    );
                }
            }
        }
        Err(err) => println!("{day}: no data ({err})"),
    }
    Ok(())
}

async fn run_walk(
    config: &Config,
    args: WalkArgs,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new());
    let fetcher = build_fetcher(config, metrics.clone())?;
    let surface = ConsoleSurface::new(config.storage.base_url.clone());
    let mut navigator = Navigator::new(
        args.mode.into(),
        fetcher,
        metrics,
        surface,
        config.navigation.max_scan_days,
    );

    let request = match args.date {
        Some(day) => OpenRequest::AnchorDay {
            day,
            period: args.period,
            index: args.index,
        },
        None => OpenRequest::AnchorToday {
            period: args.period,
            index: args.index,
        },
    };
    navigator.open(request).await;

    let direction = if args.back {
        Direction::Back
    } else {
        Direction::Forward
    };
    for _ in 0..args.steps {
        match navigator.step(direction).await {
            NavOutcome::Moved(_) | NavOutcome::Vacant(_) => {}
            // The surface has already printed the reason; stop walking.
            _ => break,
        }
    }
    navigator.close();
    Ok(())
}

async fn run_latest(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let client = LatestStateClient::new(&config.storage.base_url, &config.fetch)?;
    match client.fetch().await {
        Ok(state) => {
            let now = chrono::Utc::now();
            match state.staleness(now) {
                Some(age) => {
                    let stale = state
                        .is_stale(now, stale_after(&config.latest))
                        .unwrap_or(false);
                    let marker = if stale { " (STALE)" } else { "" };
                    println!("last update {} minutes ago{marker}", age.num_minutes());
                }
                None => println!("last update time unknown"),
            }
            for camera in state.cameras() {
                if let Some(path) = state.path_for(camera) {
                    println!(
                        "  {:<24} {}/{}",
                        config.cameras.label(camera.as_str()),
                        config.storage.base_url.trim_end_matches('/'),
                        path
                    );
                }
            }
        }
        Err(err) => println!("latest state unavailable ({err})"),
    }
    Ok(())
}
