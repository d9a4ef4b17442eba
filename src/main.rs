//! coinforecast CLI
//!
//! Daily price forecasts for the catalog's crypto assets. Every subcommand
//! prints its result as JSON on stdout; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coinforecast::application::service::ForecastService;
use coinforecast::config::Config;
use coinforecast::domain::errors::RequestValidationError;
use coinforecast::domain::forecast::{ErrorResponse, ForecastRequest, TrainRequest};
use coinforecast::infrastructure::CoinGeckoHistoricalDataFetcher;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Crypto price forecaster", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast daily prices for one asset
    Predict {
        /// Asset symbol
        #[arg(short, long, default_value = "BTC")]
        symbol: String,

        /// Number of days to forecast
        #[arg(short, long, default_value = "30", allow_negative_numbers = true)]
        days: i64,

        /// Quote currency
        #[arg(short, long, default_value = "USD")]
        currency: String,
    },
    /// Train (or retrain) models for several assets
    Train {
        /// Comma-separated list of symbols; defaults to the head of the catalog
        #[arg(short, long)]
        symbols: Option<String>,
    },
    /// List supported assets
    Coins,
    /// List supported quote currencies
    Currencies,
    /// Service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let (catalog, currencies) = config.load_catalog()?;
    info!(
        "coinforecast: {} assets, {} currencies",
        catalog.len(),
        currencies.len()
    );

    let fetcher = CoinGeckoHistoricalDataFetcher::builder()
        .base_url(config.market_data.base_url.clone())
        .request_delay(config.fetch_delay())
        .provider_ids(catalog.provider_ids())
        .timeout(Duration::from_secs(config.market_data.http_timeout_secs))
        .connect_timeout(Duration::from_secs(
            config.market_data.http_connect_timeout_secs,
        ))
        .build();

    let service = ForecastService::build(
        catalog,
        currencies,
        Arc::new(fetcher),
        config.trainer_config(),
        config.fallback(),
        config.service_limits(),
    );

    match cli.command {
        Commands::Predict {
            symbol,
            days,
            currency,
        } => {
            let request = ForecastRequest::new(symbol, days, currency);
            let response = service.forecast(&request).await;
            print_result(response)
        }
        Commands::Train { symbols } => {
            let request = TrainRequest {
                symbols: symbols.map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                }),
            };
            let report = service.train(&request).await;
            print_result(report)
        }
        Commands::Coins => print_json(&service.supported_coins()),
        Commands::Currencies => print_json(&service.supported_currencies()),
        Commands::Health => print_json(&service.health()),
    }
}

fn print_result<T: Serialize>(result: Result<T, RequestValidationError>) -> Result<()> {
    match result {
        Ok(body) => print_json(&body),
        Err(e) => {
            print_json(&ErrorResponse::from(&e))?;
            Err(anyhow::anyhow!("Request rejected ({}): {}", e.status_code(), e))
        }
    }
}

fn print_json<T: Serialize>(body: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(body).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(())
}
