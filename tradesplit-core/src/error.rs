//! Errors raised by a breakdown run.
//!
//! `InvalidInput` and `InvalidConfig` are caller mistakes caught before any
//! allocation happens. The ledger variants signal a broken conservation
//! invariant inside the optimizer; they abort the run and are never retried.

use crate::domain::{ClientId, TradeId};
use thiserror::Error;

/// Errors from validation, seeding and annealing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakdownError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("client {client} over-allocated: {allocated} of {requested} requested")]
    OverAllocation {
        client: ClientId,
        allocated: u64,
        requested: u64,
    },

    #[error("trade {trade} over-distributed: remaining would be {remaining}")]
    InvariantViolation { trade: TradeId, remaining: i128 },

    #[error("client {client} holds {held} of trade {trade}, cannot remove {amount}")]
    MissingAllocation {
        client: ClientId,
        trade: TradeId,
        held: u64,
        amount: u64,
    },
}

impl BreakdownError {
    /// True for errors caused by the caller's data or configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidConfig(_))
    }
}
