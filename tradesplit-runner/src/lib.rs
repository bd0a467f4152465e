//! TradeSplit Runner: orchestration around `tradesplit-core`.
//!
//! This crate provides:
//! - Input loading from TOML, JSON, or CSV
//! - Policy suggestion (best of FastSwap and RandomSwap)
//! - Concurrent batches with per-job derived seeds
//! - Synthetic pools and timed simulation runs
//! - Profiling scopes

pub mod batch;
pub mod input;
pub mod profiling;
pub mod simulate;
pub mod suggest;
pub mod synthetic;

pub use batch::{run_batch, BatchError, BatchJob, BatchOutcome};
pub use input::{BreakdownInput, InputError};
pub use simulate::{default_scenarios, simulate, SimulationReport, SimulationScenario};
pub use suggest::{suggest, Suggestion};
pub use synthetic::{even_split, SyntheticPool};
