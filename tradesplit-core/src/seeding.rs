//! Initial feasible allocation: a proportional pass and a leftover pass.
//!
//! 1. For each trade, for each client (both in input order), allocate
//!    `floor(trade.quantity × target_pct)`, capped by the trade's size.
//! 2. For each client still short, walk the trades in order and take
//!    `min(shortfall, remaining)` until the request is met.
//!
//! Because requested and traded totals are equal, the second pass always
//! completes every client exactly.

use crate::domain::{ClientOrder, Trade};
use crate::error::BreakdownError;
use crate::ledger::Solution;

/// Build the starting solution for the annealer.
pub fn initial_solution(
    orders: &[ClientOrder],
    trades: &[Trade],
) -> Result<Solution, BreakdownError> {
    let mut solution = Solution::new(orders, trades);
    proportional_pass(&mut solution)?;
    leftover_pass(&mut solution)?;
    Ok(solution)
}

fn proportional_pass(solution: &mut Solution) -> Result<(), BreakdownError> {
    for trade in 0..solution.trade_count() {
        let quantity = solution.book().slot(trade).quantity;
        for client in 0..solution.client_count() {
            let ledger = solution.client(client);
            let share = (quantity as f64 * ledger.target_pct).floor() as u64;
            // Rounding in target_pct can push the floor one share past what
            // is actually left.
            let amount = share
                .min(quantity)
                .min(solution.book().slot(trade).remaining)
                .min(ledger.shortfall());
            solution.add_allocation(client, trade, amount)?;
        }
    }
    Ok(())
}

fn leftover_pass(solution: &mut Solution) -> Result<(), BreakdownError> {
    for client in 0..solution.client_count() {
        let mut missing = solution.client(client).shortfall();
        if missing == 0 {
            continue;
        }
        for trade in 0..solution.trade_count() {
            let remaining = solution.book().slot(trade).remaining;
            if remaining == 0 {
                continue;
            }
            solution.add_allocation(client, trade, missing.min(remaining))?;
            missing = solution.client(client).shortfall();
            if missing == 0 {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trades() -> Vec<Trade> {
        vec![
            Trade::new(1, 100, 10.0),
            Trade::new(2, 100, 11.0),
            Trade::new(3, 100, 12.0),
        ]
    }

    #[test]
    fn seed_is_complete_and_conserving() {
        let orders = vec![ClientOrder::new(1, 250), ClientOrder::new(2, 50)];
        let sol = initial_solution(&orders, &trades()).unwrap();
        sol.verify_complete().unwrap();
    }

    #[test]
    fn proportional_then_leftover_layout() {
        let orders = vec![ClientOrder::new(1, 250), ClientOrder::new(2, 50)];
        let sol = initial_solution(&orders, &trades()).unwrap();

        // floor(100 × 5/6) = 83 and floor(100 × 1/6) = 16 per trade, then
        // client 1 tops up from trade 1 and client 2 from trades 2 and 3.
        let c1: Vec<_> = sol.client(0).holdings().collect();
        let c2: Vec<_> = sol.client(1).holdings().collect();
        assert_eq!(c1, vec![(0, 84), (1, 83), (2, 83)]);
        assert_eq!(c2, vec![(0, 16), (1, 17), (2, 17)]);
    }

    #[test]
    fn single_client_single_trade_is_exact() {
        let orders = vec![ClientOrder::new(9, 500)];
        let sol = initial_solution(&orders, &[Trade::new(4, 500, 42.5)]).unwrap();
        assert_eq!(sol.client(0).held(0), 500);
        assert_eq!(sol.slippage(sol.book().benchmark_price()), 0.0);
    }

    #[test]
    fn zero_request_client_gets_nothing() {
        let orders = vec![
            ClientOrder::new(1, 200),
            ClientOrder::new(2, 0),
            ClientOrder::new(3, 100),
        ];
        let sol = initial_solution(&orders, &trades()).unwrap();
        sol.verify_complete().unwrap();
        assert_eq!(sol.client(1).allocated(), 0);
        assert!(sol.client(1).holdings().all(|(_, q)| q == 0));
    }

    #[test]
    fn awkward_ratios_never_trip_invariants() {
        let orders: Vec<_> = (1..=7).map(|i| ClientOrder::new(i, 143)).collect();
        let trades: Vec<_> = (1..=13)
            .map(|i| Trade::new(i, 77, 10.0 + i as f64 * 0.01))
            .collect();
        let sol = initial_solution(&orders, &trades).unwrap();
        sol.verify_complete().unwrap();
    }
}
