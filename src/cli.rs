//! Command-line interface definitions.
//!
//! Every flag overrides the matching key of the YAML configuration file.
//! The weather API key can also be supplied through the environment.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the harvester.
///
/// # Examples
///
/// ```sh
/// # Poll every configured city once an hour until SIGINT/SIGTERM
/// OPENWEATHER_API_KEY=... flatfile_harvest weather
///
/// # Poll two cities every ten minutes into a custom file
/// flatfile_harvest weather --location Vladikavkaz --location Beslan \
///     --interval-secs 600 --store-path ./weather.csv
///
/// # Crawl the news listing once
/// flatfile_harvest --config harvest.yaml news --output ./news.txt
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "HARVEST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the weather API on a fixed interval and append rows to a CSV file
    Weather(WeatherArgs),
    /// Walk the paginated news listing once and write every title to a text file
    News(NewsArgs),
}

#[derive(Args, Debug)]
pub struct WeatherArgs {
    /// Weather API key
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    pub api_key: Option<String>,

    /// Location to poll (repeat for several)
    #[arg(short, long = "location")]
    pub locations: Vec<String>,

    /// Seconds between poll cycles
    #[arg(short, long)]
    pub interval_secs: Option<u64>,

    /// CSV file that rows are appended to
    #[arg(short, long)]
    pub store_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Listing URL that accepts `paged=<n>` form posts
    #[arg(long)]
    pub listing_url: Option<String>,

    /// CSS selector matching one title per news item
    #[arg(long)]
    pub selector: Option<String>,

    /// Text file that is replaced with the collected titles
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
