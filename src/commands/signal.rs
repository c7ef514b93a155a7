//! Signal command implementation
//!
//! One-shot strategy evaluation: fetch a single price window, run the
//! configured strategy over it, and print the recommendation.

use anyhow::{anyhow, Result};
use pocket_options_bot::feed::{MarketData, ReplayFeed, SimulatedFeed};
use pocket_options_bot::strategy::{SignalEngine, StrategyError, StrategyKind};
use pocket_options_bot::Config;
use std::path::Path;
use tracing::info;

pub async fn run(
    config_path: String,
    strategy: Option<StrategyKind>,
    data: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    if let Some(strategy) = strategy {
        config.strategy.kind = strategy;
    }
    if seed.is_some() {
        config.strategy.seed = seed;
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let asset = config.asset();
    let window_size = config.trading.window_size;

    let series = match data {
        Some(path) => {
            info!("Replaying recorded prices from: {}", path);
            let mut feed = ReplayFeed::from_csv(&path)?;
            feed.fetch_window(&asset, window_size).await?
        }
        None => {
            let mut feed = SimulatedFeed::new(1.1, seed);
            feed.fetch_window(&asset, window_size).await?
        }
    };

    let mut engine = SignalEngine::from_config(&config.strategy);
    match engine.signal(&series) {
        Ok(signal) => {
            let latest = series
                .last()
                .map(|p| p.price.to_string())
                .unwrap_or_else(|| "n/a".to_string());
            println!("Asset:     {asset}");
            println!("Strategy:  {}", engine.kind());
            println!("Latest:    {latest}");
            println!("Signal:    {signal:?}");
        }
        Err(StrategyError::InsufficientData { needed, got }) => {
            println!(
                "Not enough data for {}: have {got} observations, need {needed}",
                engine.kind()
            );
        }
    }

    Ok(())
}
