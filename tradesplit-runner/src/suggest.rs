//! Policy suggestion: run both swap policies and keep the better result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tradesplit_core::rng::entropy_seed;
use tradesplit_core::{
    breakdown, Breakdown, BreakdownConfig, BreakdownError, ClientId, ClientOrder, SwapPolicy,
    Trade, TradeId,
};

/// Outcome of running FastSwap and RandomSwap on the same pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub policy: SwapPolicy,
    pub breakdown: Breakdown,
    pub fast_slippage: f64,
    pub random_slippage: f64,
}

/// Run both policies with the same seed and return the lower-slippage one.
///
/// Ties go to RandomSwap.
pub fn suggest(
    orders: &BTreeMap<ClientId, ClientOrder>,
    trades: &BTreeMap<TradeId, Trade>,
    config: &BreakdownConfig,
) -> Result<Suggestion, BreakdownError> {
    let seed = config.seed.unwrap_or_else(entropy_seed);
    let base = config.clone().with_seed(seed);

    let fast = breakdown(orders, trades, &base.clone().with_policy(SwapPolicy::FastSwap))?;
    let random = breakdown(orders, trades, &base.with_policy(SwapPolicy::RandomSwap))?;

    let fast_slippage = fast.slippage;
    let random_slippage = random.slippage;
    let (policy, chosen) = if fast_slippage < random_slippage {
        (SwapPolicy::FastSwap, fast)
    } else {
        (SwapPolicy::RandomSwap, random)
    };
    tracing::info!(
        chosen = policy.name(),
        fast_slippage,
        random_slippage,
        "policy suggestion"
    );

    Ok(Suggestion {
        policy,
        breakdown: chosen,
        fast_slippage,
        random_slippage,
    })
}
