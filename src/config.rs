//! Configuration management
//!
//! JSON configuration mirroring the bot's three concerns: trading session
//! parameters, strategy selection, and risk limits. Every field carries a
//! default so a partial file (or no file at all) still yields a runnable
//! configuration; unknown keys are ignored. Validation happens exactly once
//! before a session starts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::strategy::StrategyKind;
use crate::types::Symbol;

/// Configuration validation errors. Any of these fails the session before
/// it transitions out of Idle.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("base_amount ({0}) must be positive and finite")]
    InvalidBaseAmount(f64),

    #[error("payout_ratio ({0}) must be positive and finite")]
    InvalidPayoutRatio(f64),

    #[error("interval_secs must be positive")]
    ZeroInterval,

    #[error("duration_secs must be positive")]
    ZeroDuration,

    #[error("window_size ({window}) too small for {strategy}: needs at least {needed} observations")]
    WindowTooSmall {
        window: usize,
        strategy: StrategyKind,
        needed: usize,
    },

    #[error("ma_short_window ({short}) must be >= 1 and < ma_long_window ({long})")]
    BadMovingAverageWindows { short: usize, long: usize },

    #[error("rsi_period must be >= 1")]
    ZeroRsiPeriod,

    #[error("rsi thresholds must satisfy 0 < oversold ({oversold}) < overbought ({overbought}) < 100")]
    BadRsiThresholds { oversold: f64, overbought: f64 },

    #[error("martingale_factor ({0}) must be >= 1 when martingale is enabled")]
    BadMartingaleFactor(f64),

    #[error("max_martingale_level must be >= 1")]
    ZeroMartingaleLevel,

    #[error("max_daily_loss ({0}) must be positive and finite")]
    InvalidMaxDailyLoss(f64),

    #[error("max_daily_trades must be >= 1")]
    ZeroMaxDailyTrades,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trading: TradingConfig,
    pub strategy: StrategyConfig,
    pub risk: RiskConfig,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;
        Ok(config)
    }

    pub fn asset(&self) -> Symbol {
        Symbol::new(&self.trading.asset)
    }

    /// Validate the full snapshot. Called once at session start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let trading = &self.trading;
        if !trading.base_amount.is_finite() || trading.base_amount <= 0.0 {
            return Err(ConfigError::InvalidBaseAmount(trading.base_amount));
        }
        if !trading.payout_ratio.is_finite() || trading.payout_ratio <= 0.0 {
            return Err(ConfigError::InvalidPayoutRatio(trading.payout_ratio));
        }
        if trading.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if trading.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }

        let strategy = &self.strategy;
        match strategy.kind {
            StrategyKind::TrendFollowing => {
                if strategy.ma_short_window == 0 || strategy.ma_short_window >= strategy.ma_long_window {
                    return Err(ConfigError::BadMovingAverageWindows {
                        short: strategy.ma_short_window,
                        long: strategy.ma_long_window,
                    });
                }
            }
            StrategyKind::Rsi => {
                if strategy.rsi_period == 0 {
                    return Err(ConfigError::ZeroRsiPeriod);
                }
                if !(strategy.rsi_oversold > 0.0
                    && strategy.rsi_oversold < strategy.rsi_overbought
                    && strategy.rsi_overbought < 100.0)
                {
                    return Err(ConfigError::BadRsiThresholds {
                        oversold: strategy.rsi_oversold,
                        overbought: strategy.rsi_overbought,
                    });
                }
            }
            StrategyKind::Random => {}
        }

        let needed = strategy.min_window();
        if trading.window_size < needed {
            return Err(ConfigError::WindowTooSmall {
                window: trading.window_size,
                strategy: strategy.kind,
                needed,
            });
        }

        let risk = &self.risk;
        if risk.martingale_enabled && risk.martingale_factor < 1.0 {
            return Err(ConfigError::BadMartingaleFactor(risk.martingale_factor));
        }
        if risk.max_martingale_level == 0 {
            return Err(ConfigError::ZeroMartingaleLevel);
        }
        if !risk.max_daily_loss.is_finite() || risk.max_daily_loss <= 0.0 {
            return Err(ConfigError::InvalidMaxDailyLoss(risk.max_daily_loss));
        }
        if risk.max_daily_trades == 0 {
            return Err(ConfigError::ZeroMaxDailyTrades);
        }

        Ok(())
    }
}

/// Trading session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    pub asset: String,
    /// Base stake per trade, in account currency
    pub base_amount: f64,
    /// Option expiry passed to the executor
    pub expiry_minutes: u64,
    /// Pause between decision cycles, measured from the end of settling
    pub interval_secs: u64,
    /// Total session length
    pub duration_secs: u64,
    /// Number of observations requested from the data feed each cycle
    pub window_size: usize,
    /// Win profit as a fraction of stake; losses always forfeit the stake
    pub payout_ratio: f64,
    /// Bounded retries when the data feed is down
    pub feed_retries: u32,
    pub feed_backoff_secs: u64,
    /// How long to wait for a trade outcome before treating it as stuck
    pub outcome_timeout_secs: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        TradingConfig {
            asset: "EUR/USD".to_string(),
            base_amount: 1.0,
            expiry_minutes: 1,
            interval_secs: 300,
            duration_secs: 3600,
            window_size: 20,
            payout_ratio: 0.8,
            feed_retries: 3,
            feed_backoff_secs: 5,
            outcome_timeout_secs: 90,
        }
    }
}

/// Strategy selection and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    pub ma_short_window: usize,
    pub ma_long_window: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// RNG seed for the random strategy; unset draws from entropy
    pub seed: Option<u64>,
}

impl StrategyConfig {
    /// Minimum observations the configured strategy needs per cycle
    pub fn min_window(&self) -> usize {
        match self.kind {
            StrategyKind::TrendFollowing => self.ma_long_window + 1,
            StrategyKind::Rsi => self.rsi_period + 1,
            StrategyKind::Random => 0,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            kind: StrategyKind::Random,
            ma_short_window: 5,
            ma_long_window: 10,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            seed: None,
        }
    }
}

/// Session risk limits and martingale staking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub martingale_enabled: bool,
    pub martingale_factor: f64,
    /// Highest rung of the martingale ladder; stakes never grow past it
    pub max_martingale_level: usize,
    pub max_daily_loss: f64,
    pub max_daily_trades: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            martingale_enabled: false,
            martingale_factor: 2.1,
            max_martingale_level: 5,
            max_daily_loss: 20.0,
            max_daily_trades: 20,
        }
    }
}
