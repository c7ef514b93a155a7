//! Run command implementation

use anyhow::Result;
use pocket_options_bot::executor::PaperExecutor;
use pocket_options_bot::feed::{MarketData, ReplayFeed, SimulatedFeed};
use pocket_options_bot::session::{SessionController, SessionReport};
use pocket_options_bot::strategy::StrategyKind;
use pocket_options_bot::Config;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub struct RunArgs {
    pub config_path: String,
    pub asset: Option<String>,
    pub amount: Option<f64>,
    pub duration: Option<u64>,
    pub interval: Option<u64>,
    pub strategy: Option<StrategyKind>,
    pub martingale: Option<bool>,
    pub seed: Option<u64>,
    pub data: Option<String>,
}

pub async fn run(args: RunArgs) -> Result<()> {
    info!("Starting trading session");

    // Load configuration; a missing file runs on defaults
    let mut config = if Path::new(&args.config_path).exists() {
        let config = Config::from_file(&args.config_path)?;
        info!("Loaded configuration from: {}", args.config_path);
        config
    } else {
        info!(
            "Config file {} not found, using defaults",
            args.config_path
        );
        Config::default()
    };

    // Apply overrides
    if let Some(asset) = args.asset {
        info!("Overriding asset to: {}", asset);
        config.trading.asset = asset;
    }
    if let Some(amount) = args.amount {
        info!("Overriding base amount to: {:.2}", amount);
        config.trading.base_amount = amount;
    }
    if let Some(duration) = args.duration {
        info!("Overriding session duration to: {}s", duration);
        config.trading.duration_secs = duration;
    }
    if let Some(interval) = args.interval {
        info!("Overriding cycle interval to: {}s", interval);
        config.trading.interval_secs = interval;
    }
    if let Some(strategy) = args.strategy {
        info!("Overriding strategy to: {}", strategy);
        config.strategy.kind = strategy;
    }
    if let Some(enabled) = args.martingale {
        info!("Overriding martingale to: {}", enabled);
        config.risk.martingale_enabled = enabled;
    }
    if args.seed.is_some() {
        config.strategy.seed = args.seed;
    }

    let expiry = Duration::from_secs(config.trading.expiry_minutes * 60);
    let executor = PaperExecutor::new(config.trading.payout_ratio, expiry, args.seed);

    let report = match args.data {
        Some(path) => {
            info!("Replaying recorded prices from: {}", path);
            let feed = ReplayFeed::from_csv(&path)?;
            run_session(config, feed, executor).await?
        }
        None => {
            let feed = SimulatedFeed::new(1.1, args.seed);
            run_session(config, feed, executor).await?
        }
    };

    print_report(&report);
    Ok(())
}

async fn run_session<D: MarketData>(
    config: Config,
    feed: D,
    executor: PaperExecutor,
) -> Result<SessionReport> {
    let controller = SessionController::new(config, feed, executor)?;

    // Ctrl-C requests a cooperative stop; any in-flight trade still settles
    let stop = controller.stop_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping session");
            stop.request_stop();
        }
    });

    Ok(controller.run().await)
}

fn print_report(report: &SessionReport) {
    println!("\n{}", "=".repeat(60));
    println!("SESSION RESULTS");
    println!("{}", "=".repeat(60));
    println!("Status:             {:?}", report.state.status);
    println!("Trades Placed:      {}", report.state.trades_placed);
    println!("Wins:               {}", report.wins());
    println!("Losses:             {}", report.losses());
    println!("Win Rate:           {:.2}%", report.win_rate());
    println!("Net PnL:            {}", report.state.cumulative_pnl);
    println!("{}", "=".repeat(60));

    if !report.trades.is_empty() {
        println!("\nTrade Log:");
        for (i, trade) in report.trades.iter().enumerate() {
            println!(
                "  {:>3}. {} {} {} stake {} -> {:?} (payout {})",
                i + 1,
                trade.opened_at.format("%H:%M:%S"),
                trade.asset,
                trade.direction,
                trade.stake,
                trade.outcome,
                trade.payout,
            );
        }
    }
}
