use crate::domain::ids::TradeId;
use serde::{Deserialize, Serialize};

/// One completed execution: a fill of `quantity` shares at `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub quantity: u64,
    pub price: f64,
}

impl Trade {
    pub fn new(id: u64, quantity: u64, price: f64) -> Self {
        Self {
            id: TradeId(id),
            quantity,
            price,
        }
    }

    /// Traded value (quantity × price).
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}
