//! Lot normalization.
//!
//! With a minimum lot size `L > 1`, the optimizer works in lots instead of
//! shares: quantities are divided by `L` before seeding (exact, validation
//! guarantees divisibility) and the best solution is multiplied back by `L`
//! before extraction. Caller records are never modified; shrinking returns
//! owned copies.

use crate::domain::{ClientOrder, Trade};
use crate::ledger::Solution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotScale {
    lot: u64,
}

impl LotScale {
    /// A lot of zero is treated as one; validation rejects it earlier.
    pub fn new(lot: u64) -> Self {
        Self { lot: lot.max(1) }
    }

    pub fn lot(&self) -> u64 {
        self.lot
    }

    pub fn is_unit(&self) -> bool {
        self.lot == 1
    }

    pub fn shrink_orders<'a>(
        &self,
        orders: impl IntoIterator<Item = &'a ClientOrder>,
    ) -> Vec<ClientOrder> {
        orders
            .into_iter()
            .map(|o| ClientOrder {
                id: o.id,
                quantity: o.quantity / self.lot,
            })
            .collect()
    }

    pub fn shrink_trades<'a>(&self, trades: impl IntoIterator<Item = &'a Trade>) -> Vec<Trade> {
        trades
            .into_iter()
            .map(|t| Trade {
                id: t.id,
                quantity: t.quantity / self.lot,
                price: t.price,
            })
            .collect()
    }

    /// Return a solution computed in lots to share units.
    pub fn expand(&self, solution: &mut Solution) {
        if !self.is_unit() {
            solution.expand(self.lot);
        }
    }
}
