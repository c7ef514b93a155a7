//! Session risk limits
//!
//! The risk guard gates every trade against the session's loss budget and
//! trade count. A denial is not a fault: it is the expected terminal signal
//! that stops the session.

use std::fmt;

use crate::config::RiskConfig;
use crate::session::SessionState;
use crate::types::Money;

/// Risk guard verdict for a proposed trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

/// Why the guard refused the trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    MaxTradesReached { placed: u32, limit: u32 },
    DailyLossReached { pnl: Money, limit: Money },
    StakeExceedsBudget { stake: Money, budget: Money },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MaxTradesReached { placed, limit } => {
                write!(f, "daily trade limit reached ({placed}/{limit})")
            }
            DenyReason::DailyLossReached { pnl, limit } => {
                write!(f, "daily loss limit reached (pnl {pnl}, limit {limit})")
            }
            DenyReason::StakeExceedsBudget { stake, budget } => {
                write!(
                    f,
                    "stake {stake} exceeds remaining loss budget {budget}"
                )
            }
        }
    }
}

/// Evaluates session aggregates against the configured limits
#[derive(Debug, Clone)]
pub struct RiskGuard {
    max_daily_loss: Money,
    max_daily_trades: u32,
}

impl RiskGuard {
    pub fn new(max_daily_loss: f64, max_daily_trades: u32) -> Self {
        Self {
            max_daily_loss: Money::from_f64(max_daily_loss),
            max_daily_trades,
        }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.max_daily_loss, config.max_daily_trades)
    }

    /// May the proposed stake be traded given the current session state?
    ///
    /// Denies when the trade count is exhausted, when the realized loss
    /// already breaches the limit, or when losing this stake would push the
    /// realized loss past the limit in the worst case.
    pub fn may_trade(&self, state: &SessionState, stake: Money) -> Verdict {
        if state.trades_placed >= self.max_daily_trades {
            return Verdict::Deny(DenyReason::MaxTradesReached {
                placed: state.trades_placed,
                limit: self.max_daily_trades,
            });
        }

        if state.cumulative_pnl <= -self.max_daily_loss {
            return Verdict::Deny(DenyReason::DailyLossReached {
                pnl: state.cumulative_pnl,
                limit: self.max_daily_loss,
            });
        }

        // Worst case this trade loses the full stake
        let budget = self.max_daily_loss + state.cumulative_pnl;
        if stake > budget {
            return Verdict::Deny(DenyReason::StakeExceedsBudget { stake, budget });
        }

        Verdict::Allow
    }
}
