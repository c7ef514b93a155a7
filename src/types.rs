//! Core data types used across the trading system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for price observations
#[derive(Debug, Error)]
pub enum PriceSeriesError {
    #[error("price ({0}) must be positive and finite")]
    InvalidPrice(f64),

    #[error("observations must be in chronological order: {prev} followed by {next}")]
    OutOfOrder {
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },
}

/// A single timestamped price observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Ordered, append-only sequence of price observations.
///
/// Owned by the market-data collaborator; the decision core only reads it.
/// Appends are validated so downstream indicator code never sees
/// non-positive prices or out-of-order timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from pre-collected points, validating every append
    pub fn from_points(points: Vec<PricePoint>) -> Result<Self, PriceSeriesError> {
        let mut series = Self::new();
        for point in points {
            series.push(point)?;
        }
        Ok(series)
    }

    /// Append an observation. Timestamps must be strictly increasing.
    pub fn push(&mut self, point: PricePoint) -> Result<(), PriceSeriesError> {
        if !point.price.is_finite() || point.price <= 0.0 {
            return Err(PriceSeriesError::InvalidPrice(point.price));
        }
        if let Some(last) = self.points.last() {
            if point.timestamp <= last.timestamp {
                return Err(PriceSeriesError::OutOfOrder {
                    prev: last.timestamp,
                    next: point.timestamp,
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Extract the raw price column for indicator calculations
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Traded asset symbol (e.g. "EUR/USD") using Arc<str> for cheap cloning.
///
/// The symbol travels with every trade record and collaborator call, so
/// cloning should not allocate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(#[serde(with = "arc_str_serde")] std::sync::Arc<str>);

mod arc_str_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Arc::from(s.as_str()))
    }
}

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(std::sync::Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a binary-option trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Call,
    Put,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

/// Directional recommendation for the current cycle. Produced fresh each
/// decision cycle and carries no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Call,
    Put,
    /// No clear signal; the cycle skips trading.
    Neutral,
}

impl Signal {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Signal::Call => Some(Direction::Call),
            Signal::Put => Some(Direction::Put),
            Signal::Neutral => None,
        }
    }
}

impl From<Direction> for Signal {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Call => Signal::Call,
            Direction::Put => Signal::Put,
        }
    }
}

/// Resolved result of a single trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

/// Lifecycle status of a trade record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    Pending,
    Win,
    Loss,
}

impl From<Outcome> for TradeOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => TradeOutcome::Win,
            Outcome::Loss => TradeOutcome::Loss,
        }
    }
}

/// Opaque identifier for an in-flight trade, issued by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeHandle(pub u64);

/// Settlement details returned by the executor once a trade resolves.
/// `payout` is signed: positive for a win, the negated stake for a loss.
#[derive(Debug, Clone, Copy)]
pub struct TradeResult {
    pub outcome: Outcome,
    pub payout: Money,
}

/// Record of a single placed trade. Created Pending when the trade is
/// submitted, settled exactly once when the outcome resolves, and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub asset: Symbol,
    pub direction: Direction,
    pub stake: Money,
    pub opened_at: DateTime<Utc>,
    pub outcome: TradeOutcome,
    pub payout: Money,
}

impl TradeRecord {
    pub fn open(
        asset: Symbol,
        direction: Direction,
        stake: Money,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            asset,
            direction,
            stake,
            opened_at,
            outcome: TradeOutcome::Pending,
            payout: Money::ZERO,
        }
    }

    /// Record the resolved outcome. A record settles at most once.
    pub fn settle(&mut self, outcome: Outcome, payout: Money) {
        debug_assert_eq!(self.outcome, TradeOutcome::Pending, "trade settled twice");
        self.outcome = outcome.into();
        self.payout = payout;
    }

    pub fn is_pending(&self) -> bool {
        self.outcome == TradeOutcome::Pending
    }
}

// ============================================================================
// Money - precise decimal arithmetic for stakes and payouts
// ============================================================================

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Monetary amount backed by `rust_decimal::Decimal`.
///
/// Stakes, payouts, and cumulative PnL all use this type so that martingale
/// progressions and loss-budget accounting never drift the way repeated f64
/// arithmetic would.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create from f64 config values. NaN and infinities map to zero.
    pub fn from_f64(value: f64) -> Self {
        Money(Decimal::try_from(value).unwrap_or_else(|_| {
            if value.is_nan() || value.is_infinite() {
                Decimal::ZERO
            } else {
                Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
            }
        }))
    }

    pub fn to_f64(self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// Round to `dp` decimal places (stakes are kept at 2)
    pub fn round_dp(self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Mul for Money {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Money(self.0 * rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(offset_secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + offset_secs, 0).unwrap()
    }

    #[test]
    fn series_rejects_non_positive_prices() {
        let mut series = PriceSeries::new();
        let err = series.push(PricePoint {
            timestamp: ts(0),
            price: 0.0,
        });
        assert!(matches!(err, Err(PriceSeriesError::InvalidPrice(_))));

        let err = series.push(PricePoint {
            timestamp: ts(0),
            price: f64::NAN,
        });
        assert!(matches!(err, Err(PriceSeriesError::InvalidPrice(_))));
    }

    #[test]
    fn series_rejects_out_of_order_timestamps() {
        let mut series = PriceSeries::new();
        series
            .push(PricePoint {
                timestamp: ts(60),
                price: 1.1,
            })
            .unwrap();
        let err = series.push(PricePoint {
            timestamp: ts(0),
            price: 1.2,
        });
        assert!(matches!(err, Err(PriceSeriesError::OutOfOrder { .. })));
    }

    #[test]
    fn trade_record_settles_once() {
        let mut record = TradeRecord::open(
            Symbol::new("EUR/USD"),
            Direction::Call,
            Money::from_f64(1.0),
            ts(0),
        );
        assert!(record.is_pending());

        record.settle(Outcome::Win, Money::from_f64(0.8));
        assert_eq!(record.outcome, TradeOutcome::Win);
        assert_eq!(record.payout, Money::from_f64(0.8));
        assert!(!record.is_pending());
    }

    #[test]
    fn money_precision() {
        let a = Money::from_f64(0.1);
        let b = Money::from_f64(0.2);
        assert_eq!(a + b, Money::from_f64(0.3));
    }

    #[test]
    fn money_martingale_progression_is_exact() {
        // 1 * 2.1 * 2.1 stays exact in decimal where f64 would drift
        let factor = Money::from_f64(2.1);
        let stake = Money::from_f64(1.0) * factor * factor;
        assert_eq!(stake, Money::from_f64(4.41));
    }

    #[test]
    fn money_sum_and_neg() {
        let payouts = vec![Money::from_f64(0.8), -Money::from_f64(1.0)];
        let total: Money = payouts.iter().sum();
        assert_eq!(total, -Money::from_f64(0.2));
        assert!(total.is_negative());
    }
}
