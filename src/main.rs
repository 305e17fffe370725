//! # Flatfile Harvest
//!
//! Unattended collectors that pull data from remote HTTP sources into local
//! flat files.
//!
//! ## Collectors
//!
//! - **weather**: polls a weather API for a fixed set of locations on a fixed
//!   interval and appends one CSV row per reported condition. Runs until
//!   SIGINT/SIGTERM. A failing location is logged and skipped; nothing in
//!   this pipeline stops the process.
//! - **news**: walks a paginated HTML listing from page 1 until an empty page
//!   or a 404, then writes every title as a numbered line. Any other failure
//!   aborts the run without writing output.
//!
//! ## Usage
//!
//! ```sh
//! OPENWEATHER_API_KEY=... flatfile_harvest weather
//! flatfile_harvest news -o ./news.txt
//! ```
//!
//! ## Architecture
//!
//! Each collector is three layers:
//! 1. **Source** ([`sources`]): one HTTP request, status check, decode
//! 2. **Store** ([`outputs`]): append or replace a local file
//! 3. **Driver** ([`drivers`]): owns the loop and the failure policy

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod drivers;
mod error;
mod models;
mod outputs;
mod signals;
mod sources;
mod utils;

use cli::{Cli, Command, NewsArgs, WeatherArgs};
use config::Config;
use drivers::{SchedulerDriver, harvest_news};
use outputs::{csv::CsvStore, text::TextStore};
use signals::ShutdownSignal;
use sources::{news::NewsListingClient, weather::OpenWeatherClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "flatfile_harvest starting up");

    let args = Cli::parse();
    debug!(?args.config, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?;

    let result = match args.command {
        Command::Weather(weather_args) => run_weather(config, &weather_args).await,
        Command::News(news_args) => run_news(config, &news_args).await,
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

/// Poll the weather API until a termination signal arrives.
#[instrument(level = "info", skip_all)]
async fn run_weather(config: Config, args: &WeatherArgs) -> Result<(), Box<dyn Error>> {
    let mut weather = config.weather;
    weather.apply_overrides(args);
    weather.validate()?;

    // Handlers go in before the first cycle so an early signal is not lost.
    let mut shutdown = ShutdownSignal::register();

    let source = OpenWeatherClient::new(&weather)?;
    let store = CsvStore::new(weather.store_path.clone(), weather.write_header);
    info!(
        locations = ?weather.locations,
        interval_secs = weather.interval_secs,
        store = %store.path().display(),
        "Weather configuration resolved"
    );
    let mut driver = SchedulerDriver::new(source, store, weather.locations.clone(), weather.interval());

    let report = driver.run(shutdown.recv()).await;
    info!(cycles = report.cycles, "Program finished");
    Ok(())
}

/// Crawl the news listing once and write the titles.
#[instrument(level = "info", skip_all)]
async fn run_news(config: Config, args: &NewsArgs) -> Result<(), Box<dyn Error>> {
    let mut news = config.news;
    news.apply_overrides(args);
    news.validate()?;

    info!(
        url = %news.listing_base_url,
        output = %news.output_path.display(),
        "News configuration resolved"
    );

    let source = NewsListingClient::new(&news)?;
    let store = TextStore::new(news.output_path.clone());
    let report = harvest_news(source, &store).await?;

    info!(
        titles = report.titles.len(),
        pages = report.pages_requested,
        "News harvest complete"
    );
    Ok(())
}
