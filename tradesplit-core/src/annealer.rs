//! Simulated-annealing search over the allocation ledger.
//!
//! Each iteration proposes a random swap between two client/trade pairs,
//! applies it in place, and keeps it or rolls it back with the exact inverse
//! (Metropolis acceptance). The temperature decays geometrically, so the
//! iteration budget is fixed by the schedule:
//! `ceil(ln(1 / start_temperature) / ln(cooling_factor))`.
//!
//! The best solution seen is kept as a separate snapshot, cloned only on
//! improvement and never resumed.

use crate::config::{BreakdownConfig, SwapPolicy};
use crate::error::BreakdownError;
use crate::ledger::{Leg, Solution, Swap};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Slippage at or below which the search stops early.
pub const ACCEPTABLE_ERROR: f64 = 0.0;

/// Cooling schedule and move policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    pub start_temperature: f64,
    pub cooling_factor: f64,
    pub swap_policy: SwapPolicy,
}

impl From<&BreakdownConfig> for AnnealSchedule {
    fn from(config: &BreakdownConfig) -> Self {
        Self {
            start_temperature: config.start_temperature,
            cooling_factor: config.cooling_factor,
            swap_policy: config.swap_policy,
        }
    }
}

/// Counters describing one annealing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnealStats {
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
    /// Iterations whose picks had nothing to exchange.
    pub no_ops: u64,
    pub improvements: u64,
    pub initial_slippage: f64,
    pub final_temperature: f64,
}

/// Result of [`Annealer::run`].
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub best: Solution,
    pub best_slippage: f64,
    pub stats: AnnealStats,
    /// `(iteration, best slippage)` each time the best improved.
    pub best_trace: Vec<(u64, f64)>,
}

/// Annealing optimizer. Owns the run's RNG; never share one across
/// concurrently executing runs.
pub struct Annealer {
    schedule: AnnealSchedule,
    rng: StdRng,
}

impl Annealer {
    pub fn new(schedule: AnnealSchedule, rng: StdRng) -> Self {
        Self { schedule, rng }
    }

    /// Anneal from `current` toward the benchmark price.
    ///
    /// `current` is mutated in place for the whole run; the returned best
    /// solution is an independent snapshot.
    pub fn run(
        &mut self,
        mut current: Solution,
        benchmark: f64,
    ) -> Result<AnnealOutcome, BreakdownError> {
        let mut current_slippage = current.slippage(benchmark);
        let mut best = current.clone();
        let mut best_slippage = current_slippage;
        let mut best_trace = Vec::new();
        let mut stats = AnnealStats {
            initial_slippage: current_slippage,
            ..Default::default()
        };

        let mut temperature = self.schedule.start_temperature;
        while temperature > 1.0 && best_slippage > ACCEPTABLE_ERROR {
            stats.iterations += 1;

            let applied = match self.propose(&current) {
                Some(swap) => Some(current.apply_swap(swap)?),
                None => {
                    stats.no_ops += 1;
                    None
                }
            };
            let new_slippage = current.slippage(benchmark);

            if self.accept(new_slippage, current_slippage, temperature) {
                current_slippage = new_slippage;
                stats.accepted += 1;
            } else {
                if let Some(applied) = applied {
                    current.revert_swap(applied)?;
                }
                stats.rejected += 1;
            }

            // A rejected move is never below the current slippage, which is
            // never below the best, so `current` here is the improving state.
            if new_slippage < best_slippage {
                best.clone_from(&current);
                best_slippage = new_slippage;
                stats.improvements += 1;
                best_trace.push((stats.iterations, best_slippage));
                tracing::debug!(
                    iteration = stats.iterations,
                    temperature,
                    slippage = best_slippage,
                    "new best allocation"
                );
            }

            temperature *= self.schedule.cooling_factor;
        }
        stats.final_temperature = temperature;

        Ok(AnnealOutcome {
            best,
            best_slippage,
            stats,
            best_trace,
        })
    }

    /// Pick two client/trade legs and the amount to exchange between them.
    ///
    /// Returns `None` when either leg holds nothing, or when both picks land
    /// on the same leg (one client and one trade).
    fn propose(&mut self, solution: &Solution) -> Option<Swap> {
        let (client1, client2) = self.pick_pair(solution.client_count());
        let (trade1, trade2) = self.pick_pair(solution.trade_count());
        let first = Leg::new(client1, trade1);
        let second = Leg::new(client2, trade2);

        let max = solution.transferable(first, second);
        if max == 0 || first == second {
            return None;
        }
        let amount = match self.schedule.swap_policy {
            SwapPolicy::FastSwap => max,
            SwapPolicy::RandomSwap => self.random_amount(max),
        };
        Some(Swap::new(first, second, amount))
    }

    /// Two indices in `0..n`; on a collision the second advances by one
    /// (mod `n`).
    fn pick_pair(&mut self, n: usize) -> (usize, usize) {
        let first = self.rng.gen_range(0..n);
        let mut second = self.rng.gen_range(0..n);
        if first == second {
            second = (second + 1) % n;
        }
        (first, second)
    }

    /// Uniform in `[1, max)`. The range is empty when `max == 1`; that move
    /// degenerates to a single share.
    fn random_amount(&mut self, max: u64) -> u64 {
        if max <= 1 {
            1
        } else {
            self.rng.gen_range(1..max)
        }
    }

    /// Metropolis criterion.
    fn accept(&mut self, new_slippage: f64, current_slippage: f64, temperature: f64) -> bool {
        new_slippage < current_slippage
            || ((current_slippage - new_slippage) / temperature).exp() > self.rng.gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientOrder, Trade};
    use crate::rng::run_rng;
    use crate::seeding::initial_solution;

    fn schedule(policy: SwapPolicy) -> AnnealSchedule {
        AnnealSchedule {
            start_temperature: 1100.0,
            cooling_factor: 0.995,
            swap_policy: policy,
        }
    }

    fn pool() -> (Vec<ClientOrder>, Vec<Trade>) {
        let orders = vec![
            ClientOrder::new(1, 400),
            ClientOrder::new(2, 300),
            ClientOrder::new(3, 200),
            ClientOrder::new(4, 123),
        ];
        let trades = (1..=9)
            .map(|i| Trade::new(i, 100 + i * 3 + (i % 2) * 10, 10.0 + (i % 4) as f64 * 0.25))
            .collect::<Vec<_>>();
        (orders, trades)
    }

    fn balanced_pool() -> (Vec<ClientOrder>, Vec<Trade>) {
        let (orders, mut trades) = pool();
        let traded: u64 = trades.iter().map(|t| t.quantity).sum();
        let requested: u64 = orders.iter().map(|o| o.quantity).sum();
        trades[0].quantity = trades[0].quantity + requested - traded;
        (orders, trades)
    }

    fn run(policy: SwapPolicy, seed: u64) -> AnnealOutcome {
        let (orders, trades) = balanced_pool();
        let start = initial_solution(&orders, &trades).unwrap();
        let benchmark = start.book().benchmark_price();
        Annealer::new(schedule(policy), run_rng(seed))
            .run(start, benchmark)
            .unwrap()
    }

    #[test]
    fn best_never_worse_than_seed() {
        for policy in [SwapPolicy::FastSwap, SwapPolicy::RandomSwap] {
            let outcome = run(policy, 11);
            assert!(outcome.best_slippage <= outcome.stats.initial_slippage);
            outcome.best.verify_complete().unwrap();
        }
    }

    #[test]
    fn best_trace_strictly_decreases() {
        let outcome = run(SwapPolicy::RandomSwap, 3);
        for pair in outcome.best_trace.windows(2) {
            assert!(pair[1].1 < pair[0].1, "{:?}", pair);
            assert!(pair[1].0 > pair[0].0);
        }
        if let Some(&(_, last)) = outcome.best_trace.last() {
            assert_eq!(last, outcome.best_slippage);
        }
    }

    #[test]
    fn best_snapshot_matches_reported_slippage() {
        let outcome = run(SwapPolicy::FastSwap, 5);
        let (_, trades) = balanced_pool();
        let benchmark = Solution::new(&[], &trades).book().benchmark_price();
        assert_eq!(outcome.best.slippage(benchmark), outcome.best_slippage);
    }

    #[test]
    fn iteration_budget_follows_schedule() {
        let outcome = run(SwapPolicy::FastSwap, 17);
        let budget = BreakdownConfig::default().expected_iterations();
        if outcome.best_slippage > ACCEPTABLE_ERROR {
            assert_eq!(outcome.stats.iterations, budget);
            assert!(outcome.stats.final_temperature <= 1.0);
        } else {
            assert!(outcome.stats.iterations <= budget);
        }
        assert_eq!(
            outcome.stats.accepted + outcome.stats.rejected,
            outcome.stats.iterations
        );
    }

    #[test]
    fn same_seed_same_outcome() {
        let a = run(SwapPolicy::RandomSwap, 99);
        let b = run(SwapPolicy::RandomSwap, 99);
        assert_eq!(a.best, b.best);
        assert_eq!(a.best_slippage.to_bits(), b.best_slippage.to_bits());
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn perfect_seed_skips_search() {
        let start = initial_solution(&[ClientOrder::new(1, 100)], &[Trade::new(1, 100, 10.5)])
            .unwrap();
        let outcome = Annealer::new(schedule(SwapPolicy::RandomSwap), run_rng(1))
            .run(start, 10.5)
            .unwrap();
        assert_eq!(outcome.best_slippage, 0.0);
        assert_eq!(outcome.stats.iterations, 0);
    }

    #[test]
    fn pick_pair_never_collides_with_two_or_more() {
        let mut annealer = Annealer::new(schedule(SwapPolicy::FastSwap), run_rng(8));
        for n in 2..6 {
            for _ in 0..200 {
                let (a, b) = annealer.pick_pair(n);
                assert_ne!(a, b);
                assert!(a < n && b < n);
            }
        }
        assert_eq!(annealer.pick_pair(1), (0, 0));
    }

    #[test]
    fn random_amount_stays_below_max() {
        let mut annealer = Annealer::new(schedule(SwapPolicy::RandomSwap), run_rng(8));
        assert_eq!(annealer.random_amount(1), 1);
        for _ in 0..200 {
            let amount = annealer.random_amount(5);
            assert!((1..5).contains(&amount));
        }
    }
}
