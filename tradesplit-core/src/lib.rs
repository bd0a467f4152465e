//! TradeSplit Core: fair allocation of executed fills across client orders.
//!
//! Given a pool of executed trades and the quantities each client asked
//! for, find an allocation where every client's average price sits as close
//! as possible to the pool's volume-weighted average price:
//! - Input validation and lot normalization
//! - Proportional seeding with leftover fill
//! - Allocation ledger with O(1) add/remove and exact swap rollback
//! - Simulated-annealing search with FastSwap / RandomSwap moves
//! - Extraction into a client → trade → fill map

pub mod annealer;
pub mod breakdown;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod ledger;
pub mod lots;
pub mod rng;
pub mod seeding;
pub mod validate;

pub use annealer::{AnnealOutcome, AnnealSchedule, AnnealStats, Annealer, ACCEPTABLE_ERROR};
pub use breakdown::{breakdown, Breakdown};
pub use config::{BreakdownConfig, ConfigError, SwapPolicy};
pub use domain::{AllocatedFill, ClientId, ClientOrder, Trade, TradeId};
pub use error::BreakdownError;
pub use extract::Allocations;
pub use ledger::{ClientLedger, Solution, TradeBook};
pub use rng::SeedHierarchy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a batch worker moves between threads
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Trade>();
        require_sync::<Trade>();
        require_send::<ClientOrder>();
        require_sync::<ClientOrder>();
        require_send::<BreakdownConfig>();
        require_sync::<BreakdownConfig>();
        require_send::<Breakdown>();
        require_sync::<Breakdown>();
        require_send::<BreakdownError>();
        require_sync::<BreakdownError>();
        require_send::<Solution>();
        require_sync::<Solution>();

        // The annealer owns its RNG and may move to a worker, but is never
        // shared.
        require_send::<Annealer>();
    }
}
