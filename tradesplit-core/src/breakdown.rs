//! The breakdown entry point: validate, normalize, seed, anneal, extract.

use crate::annealer::{AnnealSchedule, AnnealStats, Annealer};
use crate::config::BreakdownConfig;
use crate::domain::{ClientId, ClientOrder, Trade, TradeId};
use crate::error::BreakdownError;
use crate::extract::{allocations, Allocations};
use crate::lots::LotScale;
use crate::rng::{entropy_seed, run_rng};
use crate::seeding::initial_solution;
use crate::validate::validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of one breakdown run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub allocations: Allocations,
    /// Achieved slippage: Σ |client average price − benchmark price|.
    pub slippage: f64,
    pub benchmark_price: f64,
    /// Seed the run used (drawn from entropy when none was configured).
    pub seed: u64,
    pub stats: AnnealStats,
}

impl Breakdown {
    /// Average price realized by `client`, if it received anything.
    pub fn average_price(&self, client: ClientId) -> Option<f64> {
        let fills = self.allocations.get(&client)?;
        let (qty, notional) = fills.values().fold((0u64, 0.0f64), |(q, n), f| {
            (q + f.quantity, n + f.quantity as f64 * f.price)
        });
        (qty > 0).then(|| notional / qty as f64)
    }

    /// Total quantity handed to `client`.
    pub fn allocated_to(&self, client: ClientId) -> u64 {
        self.allocations
            .get(&client)
            .map(|fills| fills.values().map(|f| f.quantity).sum())
            .unwrap_or(0)
    }
}

/// Split `trades` across `orders` so that every client's average price is
/// as close as possible to the pool's VWAP.
///
/// Orders and trades are processed in key order. Fails before any
/// allocation work on invalid input or configuration; ledger errors abort
/// the run.
pub fn breakdown(
    orders: &BTreeMap<ClientId, ClientOrder>,
    trades: &BTreeMap<TradeId, Trade>,
    config: &BreakdownConfig,
) -> Result<Breakdown, BreakdownError> {
    validate(orders, trades, config.min_lot_size)?;
    config.validate()?;

    let scale = LotScale::new(config.min_lot_size);
    let orders = scale.shrink_orders(orders.values());
    let trades = scale.shrink_trades(trades.values());

    let seed = config.seed.unwrap_or_else(entropy_seed);
    let start = initial_solution(&orders, &trades)?;
    let benchmark_price = start.book().benchmark_price();

    tracing::info!(
        clients = orders.len(),
        trades = trades.len(),
        lot = scale.lot(),
        policy = config.swap_policy.name(),
        seed,
        benchmark_price,
        "starting breakdown"
    );

    let mut annealer = Annealer::new(AnnealSchedule::from(config), run_rng(seed));
    let outcome = annealer.run(start, benchmark_price)?;

    let mut best = outcome.best;
    scale.expand(&mut best);
    best.verify_complete()?;

    tracing::info!(
        iterations = outcome.stats.iterations,
        improvements = outcome.stats.improvements,
        slippage = outcome.best_slippage,
        "breakdown finished"
    );

    Ok(Breakdown {
        allocations: allocations(&best),
        slippage: outcome.best_slippage,
        benchmark_price,
        seed,
        stats: outcome.stats,
    })
}
