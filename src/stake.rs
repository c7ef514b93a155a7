//! Martingale stake sizing
//!
//! Pure stake progression: the policy maps the prior outcome to the next
//! unconstrained stake. Whether that stake fits the remaining loss budget is
//! the risk guard's call, keeping the two concerns independently testable.

use crate::types::{Money, Outcome};

/// Loss-recovery staking policy.
///
/// Disabled, first trade, and every win all stake the base amount. A loss
/// multiplies the previous stake by the factor, rounded to cents and capped
/// at the top rung of the martingale ladder (`max_level` steps from base).
#[derive(Debug, Clone)]
pub struct MartingalePolicy {
    enabled: bool,
    base: Money,
    factor: Money,
    ceiling: Money,
}

impl MartingalePolicy {
    pub fn new(enabled: bool, base_amount: f64, factor: f64, max_level: usize) -> Self {
        let base = Money::from_f64(base_amount).round_dp(2);
        let factor = Money::from_f64(factor);

        // Top of the ladder, built the same way stakes grow: round at
        // every rung so the cap matches a reachable stake exactly.
        let mut ceiling = base;
        for _ in 1..max_level.max(1) {
            ceiling = (ceiling * factor).round_dp(2);
        }

        Self {
            enabled,
            base,
            factor,
            ceiling,
        }
    }

    pub fn base(&self) -> Money {
        self.base
    }

    /// Next stake given the prior outcome and the stake just used.
    /// `prior_outcome` is None for the first trade of a session.
    pub fn next_stake(&self, prior_outcome: Option<Outcome>, current_stake: Money) -> Money {
        if !self.enabled {
            return self.base;
        }
        match prior_outcome {
            None | Some(Outcome::Win) => self.base,
            Some(Outcome::Loss) => (current_stake * self.factor).round_dp(2).min(self.ceiling),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: f64) -> Money {
        Money::from_f64(value)
    }

    #[test]
    fn disabled_always_stakes_base() {
        let policy = MartingalePolicy::new(false, 1.0, 2.0, 5);
        assert_eq!(policy.next_stake(None, money(1.0)), money(1.0));
        assert_eq!(policy.next_stake(Some(Outcome::Loss), money(8.0)), money(1.0));
        assert_eq!(policy.next_stake(Some(Outcome::Win), money(8.0)), money(1.0));
    }

    #[test]
    fn loss_loss_win_loss_progression() {
        // Outcome sequence [Loss, Loss, Win, Loss] stakes [B, B*F, B*F^2, B]
        let policy = MartingalePolicy::new(true, 1.0, 2.0, 10);

        let first = policy.next_stake(None, policy.base());
        assert_eq!(first, money(1.0));

        let second = policy.next_stake(Some(Outcome::Loss), first);
        assert_eq!(second, money(2.0));

        let third = policy.next_stake(Some(Outcome::Loss), second);
        assert_eq!(third, money(4.0));

        let fourth = policy.next_stake(Some(Outcome::Win), third);
        assert_eq!(fourth, money(1.0));
    }

    #[test]
    fn fractional_factor_rounds_to_cents() {
        let policy = MartingalePolicy::new(true, 1.0, 2.1, 10);
        let second = policy.next_stake(Some(Outcome::Loss), policy.base());
        assert_eq!(second, Money::from(dec!(2.10)));

        let third = policy.next_stake(Some(Outcome::Loss), second);
        assert_eq!(third, Money::from(dec!(4.41)));
    }

    #[test]
    fn losses_never_push_past_the_ladder_top() {
        // Three rungs: 1.00, 2.00, 4.00
        let policy = MartingalePolicy::new(true, 1.0, 2.0, 3);
        let mut stake = policy.base();
        for _ in 0..10 {
            stake = policy.next_stake(Some(Outcome::Loss), stake);
            assert!(stake <= money(4.0));
        }
        assert_eq!(stake, money(4.0));
    }

    #[test]
    fn stake_never_drops_below_base() {
        let policy = MartingalePolicy::new(true, 2.5, 2.0, 5);
        for prior in [None, Some(Outcome::Win), Some(Outcome::Loss)] {
            assert!(policy.next_stake(prior, policy.base()) >= policy.base());
        }
    }
}
