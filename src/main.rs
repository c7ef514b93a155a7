//! Pocket options bot - main entry point
//!
//! This binary provides two subcommands:
//! - run: Run a bounded trading session against the simulated platform
//! - signal: Evaluate the configured strategy once and print the signal

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocket_options_bot::strategy::StrategyKind;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "pocket-options-bot")]
#[command(about = "Automated binary options trading with martingale staking and risk limits", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trading session
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: String,

        /// Asset to trade (overrides config file)
        #[arg(short, long)]
        asset: Option<String>,

        /// Base stake amount (overrides config file)
        #[arg(long)]
        amount: Option<f64>,

        /// Session duration in seconds (overrides config file)
        #[arg(short, long)]
        duration: Option<u64>,

        /// Seconds between decision cycles (overrides config file)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Strategy to use (overrides config file)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Enable martingale staking
        #[arg(long, overrides_with = "no_martingale")]
        martingale: bool,

        /// Disable martingale staking
        #[arg(long)]
        no_martingale: bool,

        /// RNG seed for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,

        /// Replay recorded prices from a CSV file instead of simulating
        #[arg(long)]
        data: Option<String>,
    },

    /// Evaluate the strategy once over the latest price window
    Signal {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.json")]
        config: String,

        /// Strategy to use (overrides config file)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Replay recorded prices from a CSV file instead of simulating
        #[arg(long)]
        data: Option<String>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    // File layer - same format but without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Run { .. } => "run",
        Commands::Signal { .. } => "signal",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::Run {
            config,
            asset,
            amount,
            duration,
            interval,
            strategy,
            martingale,
            no_martingale,
            seed,
            data,
        } => {
            let martingale_override = if martingale {
                Some(true)
            } else if no_martingale {
                Some(false)
            } else {
                None
            };
            commands::run::run(commands::run::RunArgs {
                config_path: config,
                asset,
                amount,
                duration,
                interval,
                strategy,
                martingale: martingale_override,
                seed,
                data,
            })
            .await
        }
        Commands::Signal {
            config,
            strategy,
            data,
            seed,
        } => commands::signal::run(config, strategy, data, seed).await,
    }
}
