//! Concurrent batches of independent breakdowns.
//!
//! Each job runs single-threaded on a rayon worker with its own RNG, seeded
//! from a master seed via [`SeedHierarchy`] so the batch is reproducible
//! regardless of thread count or completion order. Results come back in
//! job order.

use crate::input::{BreakdownInput, InputError};
use crate::profiling::ProfileScope;
use rayon::prelude::*;
use thiserror::Error;
use tradesplit_core::{breakdown, Breakdown, BreakdownConfig, BreakdownError, SeedHierarchy};

/// A named breakdown request.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub name: String,
    pub input: BreakdownInput,
}

impl BatchJob {
    pub fn new(name: impl Into<String>, input: BreakdownInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Why a single job failed. Other jobs in the batch are unaffected.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("job {job}: {source}")]
    Input {
        job: String,
        #[source]
        source: InputError,
    },
    #[error("job {job}: {source}")]
    Breakdown {
        job: String,
        #[source]
        source: BreakdownError,
    },
}

/// Result of one job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub seed: u64,
    pub result: Result<Breakdown, BatchError>,
}

/// Run every job concurrently.
///
/// A job's own config (if any) replaces `base`; its seed is always derived
/// from `master_seed`, the job name and its position.
pub fn run_batch(jobs: &[BatchJob], base: &BreakdownConfig, master_seed: u64) -> Vec<BatchOutcome> {
    let seeds = SeedHierarchy::new(master_seed);
    tracing::info!(jobs = jobs.len(), master_seed, "running batch");

    jobs.par_iter()
        .enumerate()
        .map(|(index, job)| {
            let seed = seeds.sub_seed(&job.name, index as u64);
            let config = job.input.config_or(base).with_seed(seed);
            BatchOutcome {
                name: job.name.clone(),
                seed,
                result: run_job(job, &config),
            }
        })
        .collect()
}

fn run_job(job: &BatchJob, config: &BreakdownConfig) -> Result<Breakdown, BatchError> {
    let _scope = ProfileScope::new("batch_job");
    let input_err = |source| BatchError::Input {
        job: job.name.clone(),
        source,
    };
    let orders = job.input.order_map().map_err(input_err)?;
    let trades = job.input.trade_map().map_err(input_err)?;
    breakdown(&orders, &trades, config).map_err(|source| BatchError::Breakdown {
        job: job.name.clone(),
        source,
    })
}
