//! Per-client allocation state with incremental average-price tracking.

use crate::domain::{ClientId, ClientOrder};
use serde::{Deserialize, Serialize};

/// Price accumulators of a client ledger, captured before a swap so that a
/// rejected swap restores them bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMark {
    notional: f64,
    average_price: f64,
}

/// One client's share of the pool.
///
/// Invariant: `allocated <= requested`; `allocated` equals the sum of
/// `holdings`. Holdings are addressed by trade position in the book; `None`
/// means the client has never held that trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientLedger {
    pub id: ClientId,
    pub requested: u64,
    /// Requested quantity over the pool total, fixed at seeding.
    pub target_pct: f64,
    allocated: u64,
    notional: f64,
    average_price: f64,
    holdings: Vec<Option<u64>>,
}

impl ClientLedger {
    pub fn new(order: &ClientOrder, pool_total: u64, trade_count: usize) -> Self {
        let target_pct = if pool_total == 0 {
            0.0
        } else {
            order.quantity as f64 / pool_total as f64
        };
        Self {
            id: order.id,
            requested: order.quantity,
            target_pct,
            allocated: 0,
            notional: 0.0,
            average_price: 0.0,
            holdings: vec![None; trade_count],
        }
    }

    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    pub fn shortfall(&self) -> u64 {
        self.requested - self.allocated
    }

    pub fn average_price(&self) -> f64 {
        self.average_price
    }

    /// Quantity of the trade at `trade` currently held (0 if never held).
    pub fn held(&self, trade: usize) -> u64 {
        self.holdings[trade].unwrap_or(0)
    }

    /// Whether the trade at `trade` is registered in this ledger.
    pub fn holds(&self, trade: usize) -> bool {
        self.holdings[trade].is_some()
    }

    /// Registered `(trade position, quantity)` pairs in book order.
    pub fn holdings(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.holdings
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.map(|q| (i, q)))
    }

    /// Distance of this client's average price from the benchmark. An empty
    /// ledger sits at price 0.
    pub fn deviation(&self, benchmark: f64) -> f64 {
        (self.average_price - benchmark).abs()
    }

    pub fn mark(&self) -> PriceMark {
        PriceMark {
            notional: self.notional,
            average_price: self.average_price,
        }
    }

    pub(crate) fn restore(&mut self, mark: PriceMark) {
        self.notional = mark.notional;
        self.average_price = mark.average_price;
    }

    /// Record `amount` more of a trade. Caller has checked the bounds.
    pub(crate) fn credit(&mut self, trade: usize, amount: u64, price: f64) {
        let held = self.holdings[trade].get_or_insert(0);
        *held += amount;
        self.allocated += amount;
        self.notional += amount as f64 * price;
        self.reprice();
    }

    /// Record `amount` less of a held trade. Caller has checked the bounds.
    pub(crate) fn debit(&mut self, trade: usize, amount: u64, price: f64) {
        if let Some(held) = self.holdings[trade].as_mut() {
            *held -= amount;
        }
        self.allocated -= amount;
        self.notional -= amount as f64 * price;
        self.reprice();
    }

    fn reprice(&mut self) {
        if self.allocated > 0 {
            self.average_price = self.notional / self.allocated as f64;
        } else {
            self.notional = 0.0;
            self.average_price = 0.0;
        }
    }

    pub(crate) fn scale(&mut self, lot: u64) {
        self.requested *= lot;
        self.allocated *= lot;
        self.notional *= lot as f64;
        for held in self.holdings.iter_mut().flatten() {
            *held *= lot;
        }
    }
}
