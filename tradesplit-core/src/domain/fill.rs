use crate::domain::ids::TradeId;
use serde::{Deserialize, Serialize};

/// The piece of one trade handed to a single client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedFill {
    pub trade_id: TradeId,
    pub quantity: u64,
    pub price: f64,
}
