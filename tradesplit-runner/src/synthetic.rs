//! Synthetic trade pools for simulation and benchmarking.
//!
//! Trades get a uniform quantity in `[100, 500)` and a whole-number price
//! in `[10, 15)`. The pool is split evenly across clients, with the
//! remainder going to the last client.

use crate::input::BreakdownInput;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tradesplit_core::{ClientOrder, Trade};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticPool {
    pub trades: usize,
    pub clients: u64,
    pub seed: u64,
}

impl Default for SyntheticPool {
    fn default() -> Self {
        Self {
            trades: 1000,
            clients: 10,
            seed: 42,
        }
    }
}

impl SyntheticPool {
    pub fn generate(&self) -> BreakdownInput {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let trades: Vec<Trade> = (0..self.trades)
            .map(|i| {
                let quantity = rng.gen_range(100..500);
                let price = rng.gen_range(10..15) as f64;
                Trade::new(i as u64, quantity, price)
            })
            .collect();
        let total: u64 = trades.iter().map(|t| t.quantity).sum();
        BreakdownInput::new(even_split(total, self.clients), trades)
    }
}

/// `clients` orders summing to `total`; the last one absorbs the remainder.
pub fn even_split(total: u64, clients: u64) -> Vec<ClientOrder> {
    if clients == 0 {
        return Vec::new();
    }
    let each = total / clients;
    (0..clients)
        .map(|i| {
            let quantity = if i + 1 == clients {
                total - each * (clients - 1)
            } else {
                each
            };
            ClientOrder::new(i, quantity)
        })
        .collect()
}
