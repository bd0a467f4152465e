//! Per-trade remaining-quantity counters shared by every client ledger.
//!
//! Clients refer to a trade by its position in the book; the book is the
//! single owner of how much of each trade is still unallocated.

use crate::domain::{Trade, TradeId};
use crate::error::BreakdownError;
use serde::{Deserialize, Serialize};

/// Allocation state of one trade across all clients.
///
/// Invariant: `allocated + remaining == quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSlot {
    pub id: TradeId,
    pub price: f64,
    pub quantity: u64,
    pub allocated: u64,
    pub remaining: u64,
}

/// Trade slots in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBook {
    slots: Vec<TradeSlot>,
}

impl TradeBook {
    pub fn new(trades: &[Trade]) -> Self {
        let slots = trades
            .iter()
            .map(|t| TradeSlot {
                id: t.id,
                price: t.price,
                quantity: t.quantity,
                allocated: 0,
                remaining: t.quantity,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> &TradeSlot {
        &self.slots[index]
    }

    pub fn slots(&self) -> &[TradeSlot] {
        &self.slots
    }

    pub fn total_quantity(&self) -> u64 {
        self.slots.iter().map(|s| s.quantity).sum()
    }

    /// Volume-weighted average price over every trade in the book.
    pub fn benchmark_price(&self) -> f64 {
        let (quantity, notional) = self.slots.iter().fold((0u64, 0.0f64), |(q, n), s| {
            (q + s.quantity, n + s.quantity as f64 * s.price)
        });
        if quantity == 0 {
            0.0
        } else {
            notional / quantity as f64
        }
    }

    /// Hand `amount` of the trade at `index` to some client.
    pub(crate) fn take(&mut self, index: usize, amount: u64) -> Result<(), BreakdownError> {
        let slot = &mut self.slots[index];
        if amount > slot.remaining {
            return Err(BreakdownError::InvariantViolation {
                trade: slot.id,
                remaining: i128::from(slot.remaining) - i128::from(amount),
            });
        }
        slot.remaining -= amount;
        slot.allocated += amount;
        Ok(())
    }

    /// Return `amount` of the trade at `index` to the unallocated pool.
    pub(crate) fn give_back(&mut self, index: usize, amount: u64) -> Result<(), BreakdownError> {
        let slot = &mut self.slots[index];
        if amount > slot.allocated {
            return Err(BreakdownError::InvariantViolation {
                trade: slot.id,
                remaining: i128::from(slot.remaining) + i128::from(amount),
            });
        }
        slot.allocated -= amount;
        slot.remaining += amount;
        Ok(())
    }

    pub(crate) fn scale(&mut self, lot: u64) {
        for slot in &mut self.slots {
            slot.quantity *= lot;
            slot.allocated *= lot;
            slot.remaining *= lot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> TradeBook {
        TradeBook::new(&[
            Trade::new(1, 100, 10.0),
            Trade::new(2, 100, 11.0),
            Trade::new(3, 100, 12.0),
        ])
    }

    #[test]
    fn benchmark_is_volume_weighted() {
        let book = book();
        assert_eq!(book.len(), 3);
        assert!(!book.is_empty());
        assert_eq!(book.benchmark_price(), 11.0);
        let skewed = TradeBook::new(&[Trade::new(1, 300, 10.0), Trade::new(2, 100, 14.0)]);
        assert_eq!(skewed.benchmark_price(), 11.0);
    }

    #[test]
    fn take_and_give_back_keep_slot_balanced() {
        let mut book = book();
        book.take(1, 40).unwrap();
        let slot = book.slot(1);
        assert_eq!((slot.allocated, slot.remaining), (40, 60));

        book.give_back(1, 15).unwrap();
        let slot = book.slot(1);
        assert_eq!((slot.allocated, slot.remaining), (25, 75));
        assert_eq!(slot.allocated + slot.remaining, slot.quantity);
    }

    #[test]
    fn over_taking_reports_negative_remaining() {
        let mut book = book();
        book.take(0, 90).unwrap();
        let err = book.take(0, 20).unwrap_err();
        assert_eq!(
            err,
            BreakdownError::InvariantViolation {
                trade: TradeId(1),
                remaining: -10,
            }
        );
        // Failed take leaves the slot untouched.
        assert_eq!(book.slot(0).remaining, 10);
    }

    #[test]
    fn giving_back_more_than_allocated_fails() {
        let mut book = book();
        book.take(2, 5).unwrap();
        assert!(book.give_back(2, 6).is_err());
    }
}
