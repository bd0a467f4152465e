//! Allocation ledger: the mutable state the annealer works on.
//!
//! A [`Solution`] owns the trade book and one [`ClientLedger`] per client.
//! [`Solution::add_allocation`] and [`Solution::remove_allocation`] are the
//! only mutation points; every seed step, swap and rollback is built from
//! them, and each call is O(1).

pub mod book;
pub mod client;
pub mod swap;

pub use book::{TradeBook, TradeSlot};
pub use client::{ClientLedger, PriceMark};
pub use swap::{AppliedSwap, Leg, Swap};

use crate::domain::{ClientOrder, Trade};
use crate::error::BreakdownError;

/// One candidate allocation of the whole pool.
///
/// Clones are independent snapshots (book included) and are only ever read.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    book: TradeBook,
    clients: Vec<ClientLedger>,
}

impl Solution {
    /// Empty solution: nothing allocated, every trade fully remaining.
    pub fn new(orders: &[ClientOrder], trades: &[Trade]) -> Self {
        let book = TradeBook::new(trades);
        let pool_total = book.total_quantity();
        let clients = orders
            .iter()
            .map(|o| ClientLedger::new(o, pool_total, book.len()))
            .collect();
        Self { book, clients }
    }

    pub fn book(&self) -> &TradeBook {
        &self.book
    }

    pub fn clients(&self) -> &[ClientLedger] {
        &self.clients
    }

    pub fn client(&self, index: usize) -> &ClientLedger {
        &self.clients[index]
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn trade_count(&self) -> usize {
        self.book.len()
    }

    /// Give `amount` of the trade at `trade` to the client at `client`.
    ///
    /// Registers the trade in the client's ledger if it is new. Fails without
    /// mutating anything if the client would exceed its request or the trade
    /// would go negative.
    pub fn add_allocation(
        &mut self,
        client: usize,
        trade: usize,
        amount: u64,
    ) -> Result<(), BreakdownError> {
        let ledger = &self.clients[client];
        let after = ledger.allocated() + amount;
        if after > ledger.requested {
            return Err(BreakdownError::OverAllocation {
                client: ledger.id,
                allocated: after,
                requested: ledger.requested,
            });
        }
        self.book.take(trade, amount)?;
        let price = self.book.slot(trade).price;
        self.clients[client].credit(trade, amount, price);
        Ok(())
    }

    /// Inverse of [`add_allocation`](Self::add_allocation).
    pub fn remove_allocation(
        &mut self,
        client: usize,
        trade: usize,
        amount: u64,
    ) -> Result<(), BreakdownError> {
        let ledger = &self.clients[client];
        let held = ledger.held(trade);
        if !ledger.holds(trade) || held < amount {
            return Err(BreakdownError::MissingAllocation {
                client: ledger.id,
                trade: self.book.slot(trade).id,
                held,
                amount,
            });
        }
        self.book.give_back(trade, amount)?;
        let price = self.book.slot(trade).price;
        self.clients[client].debit(trade, amount, price);
        Ok(())
    }

    /// Sum over clients of `|average price - benchmark|`.
    pub fn slippage(&self, benchmark: f64) -> f64 {
        self.clients.iter().map(|c| c.deviation(benchmark)).sum()
    }

    /// Quantity a swap between `first` and `second` could move: the smaller
    /// of the two holdings.
    pub fn transferable(&self, first: Leg, second: Leg) -> u64 {
        self.clients[first.client]
            .held(first.trade)
            .min(self.clients[second.client].held(second.trade))
    }

    /// Exchange `swap.amount` of `first.trade` held by `first.client` for the
    /// same amount of `second.trade` held by `second.client`.
    pub fn apply_swap(&mut self, swap: Swap) -> Result<AppliedSwap, BreakdownError> {
        let Swap {
            first,
            second,
            amount,
        } = swap;
        let marks = [
            self.clients[first.client].mark(),
            self.clients[second.client].mark(),
        ];
        self.remove_allocation(first.client, first.trade, amount)?;
        self.remove_allocation(second.client, second.trade, amount)?;
        self.add_allocation(first.client, second.trade, amount)?;
        self.add_allocation(second.client, first.trade, amount)?;
        Ok(AppliedSwap { swap, marks })
    }

    /// Undo an applied swap with its exact inverse, then reinstate both
    /// clients' price accumulators.
    pub fn revert_swap(&mut self, applied: AppliedSwap) -> Result<(), BreakdownError> {
        let Swap {
            first,
            second,
            amount,
        } = applied.swap;
        self.remove_allocation(second.client, first.trade, amount)?;
        self.remove_allocation(first.client, second.trade, amount)?;
        self.add_allocation(second.client, second.trade, amount)?;
        self.add_allocation(first.client, first.trade, amount)?;
        let [first_mark, second_mark] = applied.marks;
        self.clients[second.client].restore(second_mark);
        self.clients[first.client].restore(first_mark);
        Ok(())
    }

    /// Multiply every quantity back into original share units.
    pub(crate) fn expand(&mut self, lot: u64) {
        self.book.scale(lot);
        for client in &mut self.clients {
            client.scale(lot);
        }
    }

    /// Full O(clients × trades) audit of the conservation invariants.
    ///
    /// Every client holds exactly what it requested, and every trade is
    /// distributed exactly.
    pub fn verify_complete(&self) -> Result<(), BreakdownError> {
        let mut per_trade = vec![0u64; self.book.len()];
        for client in &self.clients {
            let mut total = 0u64;
            for (trade, qty) in client.holdings() {
                per_trade[trade] += qty;
                total += qty;
            }
            if total != client.requested || client.allocated() != client.requested {
                return Err(BreakdownError::OverAllocation {
                    client: client.id,
                    allocated: total,
                    requested: client.requested,
                });
            }
        }
        for (slot, given) in self.book.slots().iter().zip(per_trade) {
            if given != slot.quantity || slot.remaining != 0 || slot.allocated != given {
                return Err(BreakdownError::InvariantViolation {
                    trade: slot.id,
                    remaining: i128::from(slot.quantity) - i128::from(given),
                });
            }
        }
        Ok(())
    }
}
