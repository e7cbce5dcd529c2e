//! ratewatch CLI - exchange-rate forecasts from the command line
//!
//! ## Example Usage
//!
//! ```bash
//! # Convert 100 USD to EUR and get the 7/15-day recommendation
//! ratewatch --rates rates.json advise EUR --amount 100
//!
//! # Fetch the last 30 days live (requires the `async` feature)
//! ratewatch --fetch advise JPY --amount 250
//!
//! # Trend details for custom horizons
//! ratewatch --rates rates.csv forecast GBP --horizons 3,7,30
//!
//! # Every currency at once
//! ratewatch --rates rates.json summary
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use ratewatch::currency::Currency;
use ratewatch::data::{self, RateReader, TimeSeriesStore};
use ratewatch::engine::{Chart, EngineConfig, Outcome, RateWatchEngine};
use ratewatch::error::ErrorKind;
use ratewatch::forecast::{self, CurrencyForecast, Directive, DEFAULT_HORIZONS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// ratewatch: convert now or wait?
#[derive(Parser)]
#[command(name = "ratewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exchange-rate trend forecasts with convert-now or wait advice", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rate table to load (.csv or Frankfurter .json)
    #[arg(short, long, global = true)]
    rates: Option<PathBuf>,

    /// Fetch the trailing window from the Frankfurter API
    #[arg(short, long, global = true)]
    fetch: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount and recommend convert now or wait
    Advise {
        /// Target currency (omit to see the no-selection response)
        #[arg(value_name = "CURRENCY")]
        currency: Option<String>,

        /// Amount in the base currency
        #[arg(short = 'a', long, allow_hyphen_values = true)]
        amount: Option<f64>,
    },

    /// Show the fitted trend and projections for one currency
    Forecast {
        #[arg(value_name = "CURRENCY")]
        currency: String,

        /// Comma-separated day offsets (default from config)
        #[arg(long, value_delimiter = ',')]
        horizons: Option<Vec<u32>>,
    },

    /// Print the observed rate history for one currency
    History {
        #[arg(value_name = "CURRENCY")]
        currency: String,
    },

    /// Forecast every configured currency
    Summary,

    /// List supported currencies
    Currencies,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    #[serde(default = "default_window_days")]
    window_days: i64,
    #[serde(default = "default_api_url")]
    api_url: String,
    #[serde(default = "default_horizons")]
    horizons: Vec<u32>,
    #[serde(default = "Currency::quotes")]
    currencies: Vec<Currency>,
    #[serde(default)]
    rates_file: Option<PathBuf>,
    #[serde(default = "default_memoize")]
    memoize_trends: bool,
}

fn default_window_days() -> i64 {
    30
}

fn default_api_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_horizons() -> Vec<u32> {
    DEFAULT_HORIZONS.to_vec()
}

fn default_memoize() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            api_url: default_api_url(),
            horizons: default_horizons(),
            currencies: Currency::quotes(),
            rates_file: None,
            memoize_trends: default_memoize(),
        }
    }
}

impl Config {
    fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => dirs::home_dir().map(|home| home.join(".ratewatch").join("config.toml")),
        };

        if let Some(config_path) = path {
            if config_path.exists() {
                match fs::read_to_string(&config_path) {
                    Ok(contents) => match toml::from_str(&contents) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("{} Failed to parse config: {}", "Warning:".yellow(), e);
                        }
                    },
                    Err(e) => {
                        eprintln!("{} Failed to read config: {}", "Warning:".yellow(), e);
                    }
                }
            }
        }

        Config::default()
    }

    fn engine_config(&self, base: Currency) -> EngineConfig {
        EngineConfig {
            base,
            currencies: self.currencies.clone(),
            horizons: self.horizons.clone(),
            memoize_trends: self.memoize_trends,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());

    if cli.verbose {
        println!(
            "{} v{}",
            "ratewatch".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Horizons: {}",
            format!("{:?}", config.horizons).dimmed()
        );
    }

    if let Err(e) = run(&cli, &config) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    if let Commands::Currencies = cli.command {
        list_currencies();
        return Ok(());
    }

    let store = load_store(cli, config)?;
    if cli.verbose {
        if let Some((first, last)) = store.date_range() {
            println!(
                "Loaded {} dates from {} to {}",
                store.num_dates(),
                first,
                last
            );
        }
    }

    let engine = RateWatchEngine::new(
        config.engine_config(store.base()),
        Arc::new(store.clone()),
    );

    match &cli.command {
        Commands::Advise { currency, amount } => {
            let selection = currency.as_deref().map(parse_currency).transpose()?;
            advise(&engine, selection, *amount, cli.json)
        }
        Commands::Forecast { currency, horizons } => {
            let horizons = horizons.clone().unwrap_or_else(|| config.horizons.clone());
            show_forecast(&store, parse_currency(currency)?, &horizons, cli.json)
        }
        Commands::History { currency } => show_history(&store, parse_currency(currency)?, cli.json),
        Commands::Summary => show_summary(&engine, cli.json),
        Commands::Currencies => Ok(()),
    }
}

fn parse_currency(code: &str) -> Result<Currency> {
    code.parse::<Currency>()
        .with_context(|| format!("supported codes: {}", codes(&Currency::all())))
}

fn codes(currencies: &[Currency]) -> String {
    currencies
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(", ")
}

fn load_store(cli: &Cli, config: &Config) -> Result<TimeSeriesStore> {
    if cli.fetch {
        return fetch_store(config);
    }

    let path = cli
        .rates
        .as_ref()
        .or(config.rates_file.as_ref())
        .context("no rate data: pass --rates <file> or --fetch")?;

    data::load_path(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(feature = "async")]
fn fetch_store(config: &Config) -> Result<TimeSeriesStore> {
    use ratewatch::data::FrankfurterSource;

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let source = FrankfurterSource::with_base_url(&config.api_url)?;
    let store = runtime.block_on(source.fetch_window(
        Currency::USD,
        &config.currencies,
        config.window_days,
    ))?;
    Ok(store)
}

#[cfg(not(feature = "async"))]
fn fetch_store(_config: &Config) -> Result<TimeSeriesStore> {
    anyhow::bail!("--fetch needs ratewatch built with the `async` feature")
}

fn advise(
    engine: &RateWatchEngine,
    selection: Option<Currency>,
    amount: Option<f64>,
    json: bool,
) -> Result<()> {
    let response = engine.respond(selection, amount);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let (Some(currency), Some(amount)) = (response.currency, amount) {
        println!(
            "{} {} = {}",
            format!("{:.2}", amount).bold(),
            engine.config().base,
            format!("{:.2} {}", response.converted_amount, currency)
                .green()
                .bold()
        );
    }

    println!();
    match &response.chart {
        Chart::Series { title, series } => {
            println!("{}", title.cyan().bold());
            for point in series.points() {
                println!("  {}  {:>12.4}", point.date, point.rate);
            }
        }
        Chart::Placeholder { title } => println!("{}", title.dimmed()),
    }

    println!();
    println!("{}", "Prediction & Recommendation".cyan().bold());
    for line in response.recommendation.lines() {
        let line = match response.outcome {
            Outcome::Ready if line.ends_with(Directive::Wait.text()) => line.yellow(),
            Outcome::Ready => line.green(),
            Outcome::NoSelection => line.normal(),
            Outcome::Failed(_) => line.red(),
        };
        println!("  {}", line);
    }

    Ok(())
}

fn show_forecast(
    store: &TimeSeriesStore,
    currency: Currency,
    horizons: &[u32],
    json: bool,
) -> Result<()> {
    let series = store.series(currency)?;
    let result = forecast::forecast_series(&series, horizons)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let model = &result.model;
    println!("{}", format!("{} trend", currency).cyan().bold());
    println!("  points:        {}", series.len());
    println!("  slope:         {:+.6} per day", model.slope);
    println!(
        "  intercept:     {:.6} at {}",
        model.intercept, model.reference_date
    );
    println!("  r squared:     {:.4}", model.r_squared(&series));
    if let Some(sd) = model.residual_std_dev(&series) {
        println!("  residual sd:   {:.6}", sd);
    }
    println!(
        "  latest:        {:.4} on {}",
        result.latest.rate, result.latest.date
    );
    println!();

    for (point, entry) in result
        .forecast
        .iter()
        .zip(result.recommendation.entries.iter())
    {
        println!(
            "  +{:<3} {}  {:>12.4}  {}",
            point.offset_days, point.date, point.rate, entry.directive
        );
    }

    Ok(())
}

fn show_history(store: &TimeSeriesStore, currency: Currency, json: bool) -> Result<()> {
    let series = store.series(currency)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} Exchange Rate ({} Base)", currency, store.base())
            .cyan()
            .bold()
    );
    for point in series.points() {
        println!("  {}  {:>12.4}", point.date, point.rate);
    }
    Ok(())
}

/// One `summary --json` row; failed currencies carry `error` instead of `forecast`
#[derive(Serialize)]
struct SummaryEntry<'a> {
    currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<&'a CurrencyForecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn show_summary(engine: &RateWatchEngine, json: bool) -> Result<()> {
    let results = engine.forecast_all();

    if json {
        let entries: Vec<SummaryEntry> = results
            .iter()
            .map(|(currency, result)| match result {
                Ok(forecast) => SummaryEntry {
                    currency: *currency,
                    forecast: Some(forecast),
                    error: None,
                    message: None,
                },
                Err(e) => SummaryEntry {
                    currency: *currency,
                    forecast: None,
                    error: Some(e.kind()),
                    message: Some(e.to_string()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (currency, result) in results {
        match result {
            Ok(forecast) => {
                let directives: Vec<String> = forecast
                    .forecast
                    .iter()
                    .zip(forecast.recommendation.entries.iter())
                    .map(|(p, e)| match e.directive {
                        Directive::Wait => format!("+{}d wait", p.offset_days).yellow().to_string(),
                        Directive::ConvertNow => {
                            format!("+{}d convert", p.offset_days).green().to_string()
                        }
                    })
                    .collect();
                println!(
                    "{}  {:>12.4}  {}",
                    currency.to_string().bold(),
                    forecast.latest.rate,
                    directives.join("  ")
                );
            }
            Err(e) => println!("{}  {}", currency.to_string().bold(), e.to_string().red()),
        }
    }
    Ok(())
}

fn list_currencies() {
    for currency in Currency::all() {
        let role = if currency == Currency::USD {
            "base"
        } else {
            "quote"
        };
        println!("{}  {:<3}  {}", currency.code().bold(), currency.symbol(), role.dimmed());
    }
}
