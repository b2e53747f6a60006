#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource economy: spendable balance, passive accrual and pickup cadence.

use std::time::Duration;

use lane_defence_core::EconomyConfig;

/// Outcome of advancing the economy timers by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Accrual {
    /// Total passive income credited during the tick.
    pub passive_credited: u32,
    /// Number of resource pickups that became due during the tick.
    pub pickups_due: u32,
}

/// Spendable balance together with the timers that feed it.
#[derive(Clone, Debug)]
pub struct Economy {
    initial_balance: u32,
    balance: u32,
    passive_amount: u32,
    passive_interval: Duration,
    passive_elapsed: Duration,
    pickup_interval: Duration,
    pickup_elapsed: Duration,
}

impl Economy {
    /// Creates an economy holding the configured initial balance.
    #[must_use]
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            initial_balance: config.initial_balance,
            balance: config.initial_balance,
            passive_amount: config.passive_amount,
            passive_interval: config.passive_interval(),
            passive_elapsed: Duration::ZERO,
            pickup_interval: config.pickup_interval(),
            pickup_elapsed: Duration::ZERO,
        }
    }

    /// Restores the construction-time balance and timers.
    pub fn reset(&mut self) {
        self.balance = self.initial_balance;
        self.passive_elapsed = Duration::ZERO;
        self.pickup_elapsed = Duration::ZERO;
    }

    /// Current spendable balance.
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    /// Adds the provided amount to the balance.
    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Debits `cost` when the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn try_debit(&mut self, cost: u32) -> bool {
        match self.balance.checked_sub(cost) {
            Some(remaining) => {
                self.balance = remaining;
                true
            }
            None => false,
        }
    }

    /// Advances the passive and pickup timers, crediting passive income.
    ///
    /// Each timer keeps its remainder so long ticks never lose accrual.
    pub fn advance(&mut self, dt: Duration) -> Accrual {
        let passive_periods = drain_periods(&mut self.passive_elapsed, self.passive_interval, dt);
        let passive_credited = self.passive_amount.saturating_mul(passive_periods);
        self.credit(passive_credited);

        let pickups_due = drain_periods(&mut self.pickup_elapsed, self.pickup_interval, dt);

        Accrual {
            passive_credited,
            pickups_due,
        }
    }
}

fn drain_periods(elapsed: &mut Duration, interval: Duration, dt: Duration) -> u32 {
    if interval.is_zero() {
        return 0;
    }

    *elapsed = elapsed.saturating_add(dt);
    let mut periods = 0;
    while *elapsed >= interval {
        *elapsed -= interval;
        periods += 1;
    }
    periods
}
