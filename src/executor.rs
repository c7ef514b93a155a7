//! Trade execution collaborators
//!
//! The session controller talks to the trading platform only through the
//! [`TradeExecutor`] trait. The real platform adapter (browser automation,
//! credentials) lives outside this crate; the bundled [`PaperExecutor`]
//! simulates fills and outcomes for dry runs and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::types::{Direction, Money, Outcome, Symbol, TradeHandle, TradeResult};

/// Execution failures. `Execution` is transient (retried once);
/// `Authentication` is fatal and stops the session immediately.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("trade submission failed: {0}")]
    Execution(String),

    #[error("authentication rejected: {0}")]
    Authentication(String),
}

/// Places trades and reports their outcomes
pub trait TradeExecutor {
    /// Submit a trade; returns a handle for the pending position
    fn place_trade(
        &mut self,
        asset: &Symbol,
        direction: Direction,
        stake: Money,
    ) -> impl std::future::Future<Output = Result<TradeHandle, ExecutorError>> + Send;

    /// Wait for the trade behind `handle` to resolve. Implementations must
    /// honor `timeout` and fail with `Execution` when it elapses.
    fn await_outcome(
        &mut self,
        handle: TradeHandle,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<TradeResult, ExecutorError>> + Send;
}

/// Simulated executor: trades resolve after a fixed delay with a coin-flip
/// outcome. Wins pay `stake * payout_ratio`; losses forfeit the stake.
#[derive(Debug)]
pub struct PaperExecutor {
    rng: StdRng,
    payout_ratio: Money,
    resolution_delay: Duration,
    next_id: u64,
    open: Option<(TradeHandle, Money)>,
}

impl PaperExecutor {
    pub fn new(payout_ratio: f64, resolution_delay: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            payout_ratio: Money::from_f64(payout_ratio),
            resolution_delay,
            next_id: 0,
            open: None,
        }
    }
}

impl TradeExecutor for PaperExecutor {
    async fn place_trade(
        &mut self,
        asset: &Symbol,
        direction: Direction,
        stake: Money,
    ) -> Result<TradeHandle, ExecutorError> {
        if self.open.is_some() {
            return Err(ExecutorError::Execution(format!(
                "a trade is already pending on {asset}"
            )));
        }

        self.next_id += 1;
        let handle = TradeHandle(self.next_id);
        self.open = Some((handle, stake));
        tracing::debug!("paper trade accepted: {direction} {stake} on {asset}");
        Ok(handle)
    }

    async fn await_outcome(
        &mut self,
        handle: TradeHandle,
        timeout: Duration,
    ) -> Result<TradeResult, ExecutorError> {
        let Some((open_handle, stake)) = self.open else {
            return Err(ExecutorError::Execution("no pending trade".to_string()));
        };
        if open_handle != handle {
            return Err(ExecutorError::Execution(format!(
                "unknown trade handle {handle:?}"
            )));
        }

        if self.resolution_delay > timeout {
            // Trade stays pending; the caller may re-await
            sleep(timeout).await;
            return Err(ExecutorError::Execution(format!(
                "no outcome within {timeout:?}"
            )));
        }

        sleep(self.resolution_delay).await;
        self.open = None;

        let outcome = if self.rng.gen_bool(0.5) {
            Outcome::Win
        } else {
            Outcome::Loss
        };
        let payout = match outcome {
            Outcome::Win => (stake * self.payout_ratio).round_dp(2),
            Outcome::Loss => -stake,
        };
        Ok(TradeResult { outcome, payout })
    }
}
