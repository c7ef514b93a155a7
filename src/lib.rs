//! Pocket Options Bot
//!
//! An automated binary-options trading engine: signal generation over price
//! windows, martingale stake sizing, session risk limits, and a sequential
//! session controller driving pluggable market-data and execution backends.

pub mod config;
pub mod executor;
pub mod feed;
pub mod indicators;
pub mod risk;
pub mod session;
pub mod stake;
pub mod strategy;
pub mod types;

pub use config::Config;
pub use types::*;
