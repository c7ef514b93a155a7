//! Market data collaborators
//!
//! The decision core only sees the [`MarketData`] trait. Two in-memory
//! implementations ship with the binary: a seedable random-walk feed and a
//! CSV replay feed for recorded price history.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;

use crate::types::{PricePoint, PriceSeries, Symbol};

/// Feed failures. Unavailability is transient; the session retries with
/// backoff before giving up.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("market data unavailable: {0}")]
    Unavailable(String),
}

/// Source of price windows for the decision loop
pub trait MarketData {
    /// Fetch the most recent `size` observations for `asset`
    fn fetch_window(
        &mut self,
        asset: &Symbol,
        size: usize,
    ) -> impl std::future::Future<Output = Result<PriceSeries, FeedError>> + Send;
}

/// Random-walk price feed with one new observation per fetch.
///
/// Stands in for live platform data: prices drift around the starting level
/// in small uniform steps, and the walk is seedable so sessions replay
/// identically in tests.
#[derive(Debug)]
pub struct SimulatedFeed {
    rng: StdRng,
    price: f64,
    next_ts: DateTime<Utc>,
    history: Vec<PricePoint>,
}

impl SimulatedFeed {
    const STEP: f64 = 0.0015;

    pub fn new(start_price: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            price: start_price,
            next_ts: Utc::now(),
            history: Vec::new(),
        }
    }

    fn step(&mut self) {
        let change = self.rng.gen_range(-Self::STEP..=Self::STEP);
        self.price = (self.price + change).max(Self::STEP);
        self.history.push(PricePoint {
            timestamp: self.next_ts,
            price: self.price,
        });
        self.next_ts += ChronoDuration::seconds(60);
    }
}

impl MarketData for SimulatedFeed {
    async fn fetch_window(
        &mut self,
        _asset: &Symbol,
        size: usize,
    ) -> Result<PriceSeries, FeedError> {
        // Warm the walk up to a full window, then advance one step per call
        while self.history.len() < size {
            self.step();
        }
        self.step();

        let tail = self.history[self.history.len() - size..].to_vec();
        PriceSeries::from_points(tail).map_err(|e| FeedError::Unavailable(e.to_string()))
    }
}

/// Replays recorded prices from a CSV file, advancing one observation per
/// fetch. Returns `Unavailable` once the recording is exhausted.
#[derive(Debug)]
pub struct ReplayFeed {
    points: Vec<PricePoint>,
    cursor: usize,
}

impl ReplayFeed {
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let points = load_price_csv(path)?;
        Ok(Self { points, cursor: 0 })
    }

    pub fn from_points(points: Vec<PricePoint>) -> Self {
        Self { points, cursor: 0 }
    }
}

impl MarketData for ReplayFeed {
    async fn fetch_window(
        &mut self,
        _asset: &Symbol,
        size: usize,
    ) -> Result<PriceSeries, FeedError> {
        if self.cursor == 0 {
            self.cursor = size;
        } else {
            self.cursor += 1;
        }

        if self.cursor > self.points.len() {
            return Err(FeedError::Unavailable("replay data exhausted".to_string()));
        }

        let window = self.points[self.cursor - size.min(self.cursor)..self.cursor].to_vec();
        PriceSeries::from_points(window).map_err(|e| FeedError::Unavailable(e.to_string()))
    }
}

/// Load (timestamp, price) rows from a CSV file.
///
/// Column 0 is an RFC 3339 or `%Y-%m-%d %H:%M:%S` timestamp, column 1 the
/// price. A header row is skipped automatically by the reader.
pub fn load_price_csv(path: impl AsRef<Path>) -> Result<Vec<PricePoint>> {
    let mut reader = csv::Reader::from_path(path.as_ref()).context("Failed to open CSV file")?;

    let mut points = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.context(format!("Failed to read row {}", row_idx + 1))?;

        let ts_str = record.get(0).context("Missing timestamp column")?;
        let timestamp = ts_str
            .parse::<DateTime<Utc>>()
            .or_else(|_| {
                chrono::NaiveDateTime::parse_from_str(ts_str, "%Y-%m-%d %H:%M:%S")
                    .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
            })
            .context(format!("Failed to parse timestamp: {ts_str}"))?;

        let price: f64 = record
            .get(1)
            .context("Missing price column")?
            .parse()
            .context("Failed to parse price")?;

        points.push(PricePoint { timestamp, price });
    }

    Ok(points)
}
