//! Convert a solution into the caller-facing allocation map.

use crate::domain::{AllocatedFill, ClientId, TradeId};
use crate::ledger::Solution;
use std::collections::BTreeMap;

/// Client id → trade id → allocated fill.
pub type Allocations = BTreeMap<ClientId, BTreeMap<TradeId, AllocatedFill>>;

/// Every client appears, even with no fills; zero-quantity fills are omitted.
pub fn allocations(solution: &Solution) -> Allocations {
    let book = solution.book();
    solution
        .clients()
        .iter()
        .map(|client| {
            let fills = client
                .holdings()
                .filter(|&(_, qty)| qty > 0)
                .map(|(trade, qty)| {
                    let slot = book.slot(trade);
                    (
                        slot.id,
                        AllocatedFill {
                            trade_id: slot.id,
                            quantity: qty,
                            price: slot.price,
                        },
                    )
                })
                .collect();
            (client.id, fills)
        })
        .collect()
}
