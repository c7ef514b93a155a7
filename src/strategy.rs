//! Signal generation strategies
//!
//! The three strategies form a closed set dispatched by [`StrategyKind`].
//! Each variant is a pure mapping from a price window to a [`Signal`]; the
//! only state is the seedable RNG used by the random strategy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StrategyConfig;
use crate::indicators::{rsi, sma};
use crate::types::{PriceSeries, Signal};

/// Errors produced during signal generation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("insufficient data: strategy needs at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },
}

/// Available strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum StrategyKind {
    TrendFollowing,
    Rsi,
    /// Coin-flip signals for diagnostics and testing only
    Random,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::TrendFollowing => write!(f, "trend_following"),
            StrategyKind::Rsi => write!(f, "rsi"),
            StrategyKind::Random => write!(f, "random"),
        }
    }
}

/// Signal generator for one session.
///
/// Holds the strategy parameters and, for the random strategy, a seedable
/// RNG so sessions can be reproduced in tests.
#[derive(Debug)]
pub struct SignalEngine {
    kind: StrategyKind,
    short_window: usize,
    long_window: usize,
    rsi_period: usize,
    rsi_overbought: f64,
    rsi_oversold: f64,
    rng: StdRng,
}

impl SignalEngine {
    pub fn from_config(config: &StrategyConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            kind: config.kind,
            short_window: config.ma_short_window,
            long_window: config.ma_long_window,
            rsi_period: config.rsi_period,
            rsi_overbought: config.rsi_overbought,
            rsi_oversold: config.rsi_oversold,
            rng,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Minimum number of observations the configured strategy needs.
    ///
    /// Trend following compares the two most recent moving-average pairs,
    /// so it needs one observation beyond the long window.
    pub fn min_window(&self) -> usize {
        match self.kind {
            StrategyKind::TrendFollowing => self.long_window + 1,
            StrategyKind::Rsi => self.rsi_period + 1,
            StrategyKind::Random => 0,
        }
    }

    /// Generate the signal for the current decision cycle
    pub fn signal(&mut self, series: &PriceSeries) -> Result<Signal, StrategyError> {
        match self.kind {
            StrategyKind::TrendFollowing => self.trend_signal(&series.prices()),
            StrategyKind::Rsi => self.rsi_signal(&series.prices()),
            StrategyKind::Random => Ok(self.random_signal()),
        }
    }

    /// Moving-average crossover. Emits a signal only when the sign of
    /// (short - long) flips between the previous and current step; holding
    /// above or below without a fresh cross is Neutral. Only the two most
    /// recent average pairs are inspected, so there is no lookahead.
    fn trend_signal(&self, prices: &[f64]) -> Result<Signal, StrategyError> {
        let needed = self.min_window();
        if prices.len() < needed {
            return Err(StrategyError::InsufficientData {
                needed,
                got: prices.len(),
            });
        }

        let short = sma(prices, self.short_window);
        let long = sma(prices, self.long_window);

        let n = prices.len();
        let (Some(short_prev), Some(long_prev), Some(short_curr), Some(long_curr)) =
            (short[n - 2], long[n - 2], short[n - 1], long[n - 1])
        else {
            return Err(StrategyError::InsufficientData {
                needed,
                got: prices.len(),
            });
        };

        let prev = short_prev - long_prev;
        let curr = short_curr - long_curr;

        if prev <= 0.0 && curr > 0.0 {
            Ok(Signal::Call)
        } else if prev >= 0.0 && curr < 0.0 {
            Ok(Signal::Put)
        } else {
            Ok(Signal::Neutral)
        }
    }

    /// RSI mean reversion: oversold expects a bounce (call), overbought a
    /// pullback (put).
    fn rsi_signal(&self, prices: &[f64]) -> Result<Signal, StrategyError> {
        let needed = self.min_window();
        if prices.len() < needed {
            return Err(StrategyError::InsufficientData {
                needed,
                got: prices.len(),
            });
        }

        let Some(value) = rsi(prices, self.rsi_period).last().copied().flatten() else {
            return Err(StrategyError::InsufficientData {
                needed,
                got: prices.len(),
            });
        };

        if value < self.rsi_oversold {
            Ok(Signal::Call)
        } else if value > self.rsi_overbought {
            Ok(Signal::Put)
        } else {
            Ok(Signal::Neutral)
        }
    }

    /// Uniform coin flip, independent of price data
    fn random_signal(&mut self) -> Signal {
        if self.rng.gen_bool(0.5) {
            Signal::Call
        } else {
            Signal::Put
        }
    }
}
