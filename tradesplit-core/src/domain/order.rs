use crate::domain::ids::ClientId;
use serde::{Deserialize, Serialize};

/// A client's request for a share of the executed pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOrder {
    pub id: ClientId,
    /// Requested quantity, in shares.
    pub quantity: u64,
}

impl ClientOrder {
    pub fn new(id: u64, quantity: u64) -> Self {
        Self {
            id: ClientId(id),
            quantity,
        }
    }
}
