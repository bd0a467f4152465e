//! Property tests for allocation invariants.
//!
//! Uses proptest to verify:
//! 1. Conservation: every client gets exactly its request, every trade is
//!    distributed exactly
//! 2. Determinism: same seed, same inputs, same output
//! 3. Rollback: a swap followed by its revert is bit-identical
//! 4. Best slippage never increases over a run

use proptest::prelude::*;
use std::collections::BTreeMap;
use tradesplit_core::annealer::{AnnealSchedule, Annealer};
use tradesplit_core::ledger::{Leg, Swap};
use tradesplit_core::rng::run_rng;
use tradesplit_core::seeding::initial_solution;
use tradesplit_core::{
    breakdown, BreakdownConfig, ClientId, ClientOrder, SwapPolicy, Trade, TradeId,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..15.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_trades() -> impl Strategy<Value = Vec<Trade>> {
    prop::collection::vec((1u64..200, arb_price()), 1..8).prop_map(|legs| {
        legs.into_iter()
            .enumerate()
            .map(|(i, (qty, px))| Trade::new(i as u64 + 1, qty, px))
            .collect()
    })
}

/// A pool plus client orders that exactly exhaust it.
fn arb_pool() -> impl Strategy<Value = (Vec<ClientOrder>, Vec<Trade>)> {
    arb_trades().prop_flat_map(|trades| {
        let total: u64 = trades.iter().map(|t| t.quantity).sum();
        prop::collection::vec(0..=total, 0..5).prop_map(move |mut cuts| {
            cuts.push(0);
            cuts.push(total);
            cuts.sort_unstable();
            let orders = cuts
                .windows(2)
                .enumerate()
                .map(|(i, w)| ClientOrder::new(i as u64 + 1, w[1] - w[0]))
                .collect();
            (orders, trades.clone())
        })
    })
}

fn arb_policy() -> impl Strategy<Value = SwapPolicy> {
    prop_oneof![Just(SwapPolicy::FastSwap), Just(SwapPolicy::RandomSwap)]
}

fn quick_config(policy: SwapPolicy, seed: u64) -> BreakdownConfig {
    BreakdownConfig {
        start_temperature: 200.0,
        cooling_factor: 0.98,
        swap_policy: policy,
        min_lot_size: 1,
        seed: Some(seed),
    }
}

fn keyed(
    orders: &[ClientOrder],
    trades: &[Trade],
) -> (BTreeMap<ClientId, ClientOrder>, BTreeMap<TradeId, Trade>) {
    (
        orders.iter().map(|o| (o.id, o.clone())).collect(),
        trades.iter().map(|t| (t.id, t.clone())).collect(),
    )
}

// ── 1. Conservation ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn allocations_conserve_orders_and_trades(
        (orders, trades) in arb_pool(),
        policy in arb_policy(),
        seed in any::<u64>(),
    ) {
        let (order_map, trade_map) = keyed(&orders, &trades);
        let result = breakdown(&order_map, &trade_map, &quick_config(policy, seed)).unwrap();

        prop_assert_eq!(result.allocations.len(), orders.len());
        for order in &orders {
            prop_assert_eq!(result.allocated_to(order.id), order.quantity);
        }

        let mut per_trade: BTreeMap<TradeId, u64> = BTreeMap::new();
        for fills in result.allocations.values() {
            for (trade_id, fill) in fills {
                prop_assert!(fill.quantity > 0);
                prop_assert_eq!(fill.trade_id, *trade_id);
                *per_trade.entry(*trade_id).or_default() += fill.quantity;
            }
        }
        for trade in &trades {
            prop_assert_eq!(per_trade.get(&trade.id).copied().unwrap_or(0), trade.quantity);
        }
        prop_assert!(result.slippage >= 0.0);
        prop_assert!(result.slippage <= result.stats.initial_slippage);
    }
}

// ── 2. Determinism ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn same_seed_same_breakdown(
        (orders, trades) in arb_pool(),
        policy in arb_policy(),
        seed in any::<u64>(),
    ) {
        let (order_map, trade_map) = keyed(&orders, &trades);
        let config = quick_config(policy, seed);
        let first = breakdown(&order_map, &trade_map, &config).unwrap();
        let second = breakdown(&order_map, &trade_map, &config).unwrap();
        prop_assert_eq!(first.slippage.to_bits(), second.slippage.to_bits());
        prop_assert_eq!(first, second);
    }
}

// ── 3. Swap rollback ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn swap_then_revert_is_identity(
        (orders, trades) in arb_pool(),
        picks in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
        fraction in 0.0..1.0_f64,
    ) {
        let mut solution = initial_solution(&orders, &trades).unwrap();
        let held: Vec<Leg> = solution
            .clients()
            .iter()
            .enumerate()
            .flat_map(|(c, ledger)| {
                ledger.holdings().filter(|&(_, q)| q > 0).map(move |(t, _)| Leg::new(c, t))
            })
            .collect();
        if held.len() >= 2 {
            let i = picks.0.index(held.len());
            let j = (i + 1 + picks.1.index(held.len() - 1)) % held.len();
            let (first, second) = (held[i], held[j]);

            let max = solution.transferable(first, second);
            let amount = 1 + ((max - 1) as f64 * fraction) as u64;

            let before = solution.clone();
            let applied = solution.apply_swap(Swap::new(first, second, amount)).unwrap();
            solution.revert_swap(applied).unwrap();

            prop_assert_eq!(&solution, &before);
            for (after, prior) in solution.clients().iter().zip(before.clients()) {
                prop_assert_eq!(after.average_price().to_bits(), prior.average_price().to_bits());
                prop_assert_eq!(after.allocated(), prior.allocated());
            }
        }
    }
}

// ── 4. Best slippage is monotone ─────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn best_slippage_never_increases(
        (orders, trades) in arb_pool(),
        policy in arb_policy(),
        seed in any::<u64>(),
    ) {
        let start = initial_solution(&orders, &trades).unwrap();
        let benchmark = start.book().benchmark_price();
        let initial = start.slippage(benchmark);
        let schedule = AnnealSchedule {
            start_temperature: 200.0,
            cooling_factor: 0.98,
            swap_policy: policy,
        };
        let outcome = Annealer::new(schedule, run_rng(seed)).run(start, benchmark).unwrap();

        let mut previous = initial;
        for &(_, best) in &outcome.best_trace {
            prop_assert!(best < previous);
            previous = best;
        }
        prop_assert_eq!(outcome.best_slippage, previous);
        outcome.best.verify_complete().unwrap();
    }
}
