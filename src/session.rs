//! Session controller
//!
//! Drives the trading loop: pull a price window, generate a signal, gate it
//! through the risk guard, place the trade, await the outcome, update the
//! session aggregates, sleep, repeat. The controller is the single writer of
//! [`SessionState`] and the sole error-recovery authority: nothing escapes
//! [`SessionController::run`], which always returns a [`SessionReport`].

use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

use crate::config::{Config, ConfigError};
use crate::executor::{ExecutorError, TradeExecutor};
use crate::feed::{FeedError, MarketData};
use crate::risk::{RiskGuard, Verdict};
use crate::stake::MartingalePolicy;
use crate::strategy::{SignalEngine, StrategyError};
use crate::types::{
    Direction, Money, Outcome, PriceSeries, Symbol, TradeHandle, TradeRecord, TradeResult,
};

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The configured duration elapsed
    Completed,
    /// The risk guard denied the next trade
    RiskLimitReached,
    /// An operator requested a stop
    Cancelled,
    /// An unrecoverable collaborator failure
    Error,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Completed => write!(f, "completed"),
            StopReason::RiskLimitReached => write!(f, "risk limit reached"),
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::Error => write!(f, "error"),
        }
    }
}

/// Session lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Idle,
    Running,
    Stopped(StopReason),
}

/// Aggregates for one trading session. Owned and mutated exclusively by the
/// session controller; the stake policy and risk guard only read it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub elapsed: Duration,
    pub trades_placed: u32,
    pub consecutive_losses: u32,
    pub cumulative_pnl: Money,
    pub current_stake: Money,
    pub status: SessionStatus,
}

impl SessionState {
    pub fn idle(base_stake: Money) -> Self {
        Self {
            elapsed: Duration::ZERO,
            trades_placed: 0,
            consecutive_losses: 0,
            cumulative_pnl: Money::ZERO,
            current_stake: base_stake,
            status: SessionStatus::Idle,
        }
    }
}

/// Final state plus the ordered trade log, for reporting by the outer layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub state: SessionState,
    pub trades: Vec<TradeRecord>,
}

impl SessionReport {
    pub fn wins(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.outcome == crate::types::TradeOutcome::Win)
            .count()
    }

    pub fn losses(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.outcome == crate::types::TradeOutcome::Loss)
            .count()
    }

    pub fn win_rate(&self) -> f64 {
        let resolved = self.wins() + self.losses();
        if resolved == 0 {
            return 0.0;
        }
        self.wins() as f64 / resolved as f64 * 100.0
    }
}

/// Cooperative stop request shared between the controller and the operator.
///
/// Checked at the start of every decision cycle and during the inter-cycle
/// sleep; an in-flight trade is always settled before the session closes.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    inner: Arc<StopInner>,
}

#[derive(Debug, Default)]
struct StopInner {
    requested: AtomicBool,
    notify: Notify,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.inner.requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// Resolves once a stop has been requested
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}

enum CycleOutcome {
    Continue,
    Stop(StopReason),
}

/// Sequences decision cycles over one bounded session.
///
/// Fully sequential: at most one trade is pending at any time, and the
/// outcome of trade N is settled into [`SessionState`] before trade N+1 is
/// decided, which the stake policy and risk guard both rely on.
pub struct SessionController<D, E> {
    config: Config,
    asset: Symbol,
    feed: D,
    executor: E,
    engine: SignalEngine,
    policy: MartingalePolicy,
    guard: RiskGuard,
    stop: StopToken,
    state: SessionState,
    trades: Vec<TradeRecord>,
}

impl<D: MarketData, E: TradeExecutor> SessionController<D, E> {
    /// Build a controller from a validated configuration. Fails fast on
    /// validation errors; the session never leaves Idle.
    pub fn new(config: Config, feed: D, executor: E) -> Result<Self, ConfigError> {
        config.validate()?;

        let engine = SignalEngine::from_config(&config.strategy);
        let policy = MartingalePolicy::new(
            config.risk.martingale_enabled,
            config.trading.base_amount,
            config.risk.martingale_factor,
            config.risk.max_martingale_level,
        );
        let guard = RiskGuard::from_config(&config.risk);
        let state = SessionState::idle(policy.base());
        let asset = config.asset();

        Ok(Self {
            config,
            asset,
            feed,
            executor,
            engine,
            policy,
            guard,
            stop: StopToken::new(),
            state,
            trades: Vec::new(),
        })
    }

    /// Token for requesting a cooperative stop from outside the loop
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Run the session to a terminal state and report
    pub async fn run(mut self) -> SessionReport {
        let interval = Duration::from_secs(self.config.trading.interval_secs);
        let duration = Duration::from_secs(self.config.trading.duration_secs);

        self.state.status = SessionStatus::Running;
        let started = Instant::now();

        info!(
            "starting session: asset={} strategy={} base_amount={} martingale={} duration={:?} interval={:?}",
            self.asset,
            self.engine.kind(),
            self.policy.base(),
            self.config.risk.martingale_enabled,
            duration,
            interval,
        );

        let reason = loop {
            self.state.elapsed = started.elapsed();

            if self.stop.is_requested() {
                info!("stop requested by operator");
                break StopReason::Cancelled;
            }
            if self.state.elapsed >= duration {
                break StopReason::Completed;
            }

            match self.cycle().await {
                CycleOutcome::Continue => {}
                CycleOutcome::Stop(reason) => break reason,
            }

            // Interval measured from the end of settling, not cycle start,
            // so variable trade latency does not compound into drift
            tokio::select! {
                _ = sleep(interval) => {}
                _ = self.stop.cancelled() => {}
            }
        };

        self.state.elapsed = started.elapsed();
        self.state.status = SessionStatus::Stopped(reason);

        let report = SessionReport {
            state: self.state,
            trades: self.trades,
        };
        info!(
            "session stopped ({reason}): trades={} wins={} losses={} win_rate={:.2}% pnl={}",
            report.trades.len(),
            report.wins(),
            report.losses(),
            report.win_rate(),
            report.state.cumulative_pnl,
        );
        report
    }

    /// One decision cycle: Deciding -> Trading -> AwaitingOutcome -> Settling
    async fn cycle(&mut self) -> CycleOutcome {
        let series = match self.fetch_with_retry().await {
            Ok(series) => series,
            Err(e) => {
                error!("market data feed failed after retries: {e}");
                return CycleOutcome::Stop(StopReason::Error);
            }
        };

        let signal = match self.engine.signal(&series) {
            Ok(signal) => signal,
            Err(StrategyError::InsufficientData { needed, got }) => {
                warn!("insufficient data for signal (have {got}, need {needed}); skipping cycle");
                return CycleOutcome::Continue;
            }
        };

        let Some(direction) = signal.direction() else {
            debug!("no clear signal this cycle");
            return CycleOutcome::Continue;
        };

        let stake = self.state.current_stake;
        if let Verdict::Deny(reason) = self.guard.may_trade(&self.state, stake) {
            warn!("risk guard denied trade: {reason}");
            return CycleOutcome::Stop(StopReason::RiskLimitReached);
        }

        let handle = match self.place_with_retry(direction, stake).await {
            Ok(Some(handle)) => handle,
            Ok(None) => return CycleOutcome::Continue,
            Err(reason) => return CycleOutcome::Stop(reason),
        };

        let mut record = TradeRecord::open(self.asset.clone(), direction, stake, Utc::now());
        self.state.trades_placed += 1;

        let result = match self.await_outcome_with_retry(handle).await {
            Ok(result) => result,
            Err(reason) => {
                // Outcome unresolved: record the trade as pending and stop
                // rather than guess at financial state
                self.trades.push(record);
                return CycleOutcome::Stop(reason);
            }
        };

        record.settle(result.outcome, result.payout);
        self.state.cumulative_pnl += result.payout;
        match result.outcome {
            Outcome::Win => self.state.consecutive_losses = 0,
            Outcome::Loss => self.state.consecutive_losses += 1,
        }
        self.state.current_stake = self.policy.next_stake(Some(result.outcome), stake);
        self.trades.push(record);

        info!(
            "trade settled: {direction} {stake} -> {:?} (payout {}); session trades={} pnl={} next_stake={}",
            result.outcome,
            result.payout,
            self.state.trades_placed,
            self.state.cumulative_pnl,
            self.state.current_stake,
        );

        CycleOutcome::Continue
    }

    /// Fetch the price window with bounded retries and fixed backoff
    async fn fetch_with_retry(&mut self) -> Result<PriceSeries, FeedError> {
        let attempts = self.config.trading.feed_retries.max(1);
        let backoff = Duration::from_secs(self.config.trading.feed_backoff_secs);
        let window = self.config.trading.window_size;

        let mut attempt = 1;
        loop {
            match self.feed.fetch_window(&self.asset, window).await {
                Ok(series) => return Ok(series),
                Err(e) if attempt < attempts => {
                    warn!("market data fetch failed (attempt {attempt}/{attempts}): {e}");
                    attempt += 1;
                    sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Submit the trade, retrying a transient failure once. `Ok(None)` means
    /// the cycle is abandoned with no risk-accounting effect.
    async fn place_with_retry(
        &mut self,
        direction: Direction,
        stake: Money,
    ) -> Result<Option<TradeHandle>, StopReason> {
        for attempt in 1..=2 {
            match self.executor.place_trade(&self.asset, direction, stake).await {
                Ok(handle) => {
                    info!("placed {direction} trade for {stake} on {}", self.asset);
                    return Ok(Some(handle));
                }
                Err(ExecutorError::Authentication(msg)) => {
                    error!("authentication failure: {msg}");
                    return Err(StopReason::Error);
                }
                Err(ExecutorError::Execution(msg)) => {
                    warn!("trade submission failed (attempt {attempt}/2): {msg}");
                }
            }
        }
        warn!("trade submission failed twice; abandoning this cycle");
        Ok(None)
    }

    /// Await settlement, tolerating one transient failure or timeout. A
    /// trade whose outcome cannot be retrieved leaves the session in an
    /// unknowable financial position, so the second failure is fatal.
    async fn await_outcome_with_retry(
        &mut self,
        handle: TradeHandle,
    ) -> Result<TradeResult, StopReason> {
        let timeout = Duration::from_secs(self.config.trading.outcome_timeout_secs);

        for attempt in 1..=2 {
            match self.executor.await_outcome(handle, timeout).await {
                Ok(result) => return Ok(result),
                Err(ExecutorError::Authentication(msg)) => {
                    error!("authentication failure while awaiting outcome: {msg}");
                    return Err(StopReason::Error);
                }
                Err(ExecutorError::Execution(msg)) => {
                    warn!("outcome retrieval failed (attempt {attempt}/2): {msg}");
                }
            }
        }
        error!("trade outcome unresolved; stopping session");
        Err(StopReason::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;
    use crate::types::{PricePoint, TradeOutcome};
    use chrono::{DateTime, TimeZone};
    use std::collections::VecDeque;

    // ------------------------------------------------------------------
    // In-memory fakes
    // ------------------------------------------------------------------

    /// Feed that always returns the same price window
    struct StaticFeed {
        prices: Vec<f64>,
    }

    impl MarketData for StaticFeed {
        async fn fetch_window(
            &mut self,
            _asset: &Symbol,
            size: usize,
        ) -> Result<PriceSeries, FeedError> {
            let take = size.min(self.prices.len());
            let points = self.prices[self.prices.len() - take..]
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp: ts(60 * i as i64),
                    price,
                })
                .collect();
            PriceSeries::from_points(points).map_err(|e| FeedError::Unavailable(e.to_string()))
        }
    }

    /// Feed that fails every fetch
    struct DownFeed;

    impl MarketData for DownFeed {
        async fn fetch_window(
            &mut self,
            _asset: &Symbol,
            _size: usize,
        ) -> Result<PriceSeries, FeedError> {
            Err(FeedError::Unavailable("feed down".to_string()))
        }
    }

    /// Executor resolving instantly with a scripted outcome sequence
    struct ScriptedExecutor {
        outcomes: VecDeque<Outcome>,
        payout_ratio: Money,
        next_id: u64,
        open_stake: Option<Money>,
    }

    impl ScriptedExecutor {
        fn new(outcomes: &[Outcome], payout_ratio: f64) -> Self {
            Self {
                outcomes: outcomes.iter().copied().collect(),
                payout_ratio: Money::from_f64(payout_ratio),
                next_id: 0,
                open_stake: None,
            }
        }
    }

    impl TradeExecutor for ScriptedExecutor {
        async fn place_trade(
            &mut self,
            _asset: &Symbol,
            _direction: Direction,
            stake: Money,
        ) -> Result<TradeHandle, ExecutorError> {
            assert!(self.open_stake.is_none(), "overlapping trades");
            self.next_id += 1;
            self.open_stake = Some(stake);
            Ok(TradeHandle(self.next_id))
        }

        async fn await_outcome(
            &mut self,
            _handle: TradeHandle,
            _timeout: Duration,
        ) -> Result<TradeResult, ExecutorError> {
            let stake = self.open_stake.take().expect("no pending trade");
            let outcome = self
                .outcomes
                .pop_front()
                .expect("scripted outcomes exhausted");
            let payout = match outcome {
                Outcome::Win => (stake * self.payout_ratio).round_dp(2),
                Outcome::Loss => -stake,
            };
            Ok(TradeResult { outcome, payout })
        }
    }

    /// Executor that always fails authentication
    struct LockedOutExecutor;

    impl TradeExecutor for LockedOutExecutor {
        async fn place_trade(
            &mut self,
            _asset: &Symbol,
            _direction: Direction,
            _stake: Money,
        ) -> Result<TradeHandle, ExecutorError> {
            Err(ExecutorError::Authentication("session expired".to_string()))
        }

        async fn await_outcome(
            &mut self,
            _handle: TradeHandle,
            _timeout: Duration,
        ) -> Result<TradeResult, ExecutorError> {
            Err(ExecutorError::Authentication("session expired".to_string()))
        }
    }

    fn ts(offset_secs: i64) -> DateTime<chrono::Utc> {
        chrono::Utc
            .timestamp_opt(1_700_000_000 + offset_secs, 0)
            .unwrap()
    }

    fn money(value: f64) -> Money {
        Money::from_f64(value)
    }

    /// Two-cycle random-strategy config used by the scenario tests:
    /// duration 10, interval 5, base 1, factor 2, 1:1 payout
    fn scenario_config() -> Config {
        let mut config = Config::default();
        config.trading.duration_secs = 10;
        config.trading.interval_secs = 5;
        config.trading.base_amount = 1.0;
        config.trading.payout_ratio = 1.0;
        config.strategy.kind = StrategyKind::Random;
        config.strategy.seed = Some(1);
        config.risk.martingale_enabled = true;
        config.risk.martingale_factor = 2.0;
        config.risk.max_daily_loss = 100.0;
        config.risk.max_daily_trades = 20;
        config
    }

    fn flat_prices() -> Vec<f64> {
        vec![1.1; 20]
    }

    #[tokio::test(start_paused = true)]
    async fn two_losing_cycles_double_the_stake() {
        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Loss, Outcome::Loss], 1.0);
        let controller = SessionController::new(scenario_config(), feed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Completed));
        assert_eq!(report.trades.len(), 2);
        assert_eq!(report.state.trades_placed, 2);
        // Stake doubled after the first loss: 1 lost, then 2 lost
        assert_eq!(report.trades[0].stake, money(1.0));
        assert_eq!(report.trades[1].stake, money(2.0));
        assert_eq!(report.state.cumulative_pnl, money(-3.0));
        assert_eq!(report.state.current_stake, money(4.0));
        assert_eq!(report.state.consecutive_losses, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn win_resets_stake_and_pays_ratio() {
        let mut config = scenario_config();
        config.trading.payout_ratio = 0.8;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Loss, Outcome::Win], 0.8);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        // Loss of 1, then a win staking 2 at 0.8 payout
        assert_eq!(report.state.cumulative_pnl, money(0.6));
        assert_eq!(report.state.current_stake, money(1.0));
        assert_eq!(report.trades[1].stake, money(2.0));
        assert_eq!(report.state.consecutive_losses, 0);
        assert_eq!(report.wins(), 1);
        assert_eq!(report.losses(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn max_daily_trades_denies_the_second_cycle() {
        let mut config = scenario_config();
        config.risk.max_daily_trades = 1;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Win, Outcome::Win], 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(
            report.state.status,
            SessionStatus::Stopped(StopReason::RiskLimitReached)
        );
        assert_eq!(report.state.trades_placed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn loss_limit_stops_the_session() {
        let mut config = scenario_config();
        config.risk.max_daily_loss = 1.0;
        config.risk.martingale_enabled = false;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Loss, Outcome::Loss], 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(
            report.state.status,
            SessionStatus::Stopped(StopReason::RiskLimitReached)
        );
        assert_eq!(report.state.trades_placed, 1);
        assert_eq!(report.state.cumulative_pnl, money(-1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn neutral_signal_skips_trading() {
        // Flat prices never produce an SMA crossover
        let mut config = scenario_config();
        config.strategy.kind = StrategyKind::TrendFollowing;
        config.strategy.ma_short_window = 2;
        config.strategy.ma_long_window = 3;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[], 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Completed));
        assert_eq!(report.state.trades_placed, 0);
        assert!(report.trades.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_window_is_recovered_as_no_signal() {
        let mut config = scenario_config();
        config.strategy.kind = StrategyKind::Rsi;
        config.strategy.rsi_period = 14;

        // Feed can only serve 5 observations; RSI needs 15
        let feed = StaticFeed {
            prices: vec![1.1; 5],
        };
        let executor = ScriptedExecutor::new(&[], 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Completed));
        assert_eq!(report.state.trades_placed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_outage_stops_with_error_after_retries() {
        let mut config = scenario_config();
        config.trading.feed_retries = 3;
        config.trading.feed_backoff_secs = 1;

        let executor = ScriptedExecutor::new(&[], 1.0);
        let controller = SessionController::new(config, DownFeed, executor).unwrap();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Error));
        assert_eq!(report.state.trades_placed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn authentication_failure_is_fatal() {
        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let controller =
            SessionController::new(scenario_config(), feed, LockedOutExecutor).unwrap();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Error));
        assert_eq!(report.state.trades_placed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_request_cancels_before_trading() {
        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Win, Outcome::Win], 1.0);
        let controller = SessionController::new(scenario_config(), feed, executor).unwrap();

        let token = controller.stop_token();
        token.request_stop();

        let report = controller.run().await;

        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Cancelled));
        assert_eq!(report.state.trades_placed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_request_during_sleep_wakes_the_loop() {
        let mut config = scenario_config();
        config.trading.duration_secs = 3600;
        config.trading.interval_secs = 300;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[Outcome::Win], 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let token = controller.stop_token();
        let session = tokio::spawn(controller.run());

        // Let the first cycle settle, then cancel mid-sleep
        tokio::time::sleep(Duration::from_secs(30)).await;
        token.request_stop();

        let report = session.await.unwrap();
        assert_eq!(report.state.status, SessionStatus::Stopped(StopReason::Cancelled));
        // The in-flight trade was settled before the stop took effect
        assert_eq!(report.state.trades_placed, 1);
        assert_eq!(report.trades[0].outcome, TradeOutcome::Win);
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_invalid_config_before_starting() {
        let mut config = scenario_config();
        config.trading.base_amount = -1.0;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let executor = ScriptedExecutor::new(&[], 1.0);
        let result = SessionController::new(config, feed, executor);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn pnl_equals_sum_of_recorded_payouts() {
        let mut config = scenario_config();
        config.trading.duration_secs = 30;

        let feed = StaticFeed {
            prices: flat_prices(),
        };
        let outcomes = [
            Outcome::Loss,
            Outcome::Win,
            Outcome::Loss,
            Outcome::Loss,
            Outcome::Win,
            Outcome::Win,
        ];
        let executor = ScriptedExecutor::new(&outcomes, 1.0);
        let controller = SessionController::new(config, feed, executor).unwrap();

        let report = controller.run().await;

        let total: Money = report.trades.iter().map(|t| t.payout).sum();
        assert_eq!(report.state.cumulative_pnl, total);
        assert!(report.trades.iter().all(|t| !t.is_pending()));
    }
}
