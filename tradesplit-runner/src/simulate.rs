//! Performance simulation: repeated timed breakdowns per schedule.

use crate::profiling::profile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tradesplit_core::{
    breakdown, BreakdownConfig, BreakdownError, ClientId, ClientOrder, SwapPolicy, Trade, TradeId,
};

/// A labelled configuration to time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationScenario {
    pub label: String,
    pub config: BreakdownConfig,
}

impl SimulationScenario {
    pub fn new(label: impl Into<String>, config: BreakdownConfig) -> Self {
        Self {
            label: label.into(),
            config,
        }
    }
}

/// Timing and quality summary of one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub label: String,
    pub policy: SwapPolicy,
    pub repetitions: usize,
    /// Lowest slippage over all repetitions.
    pub best_slippage: f64,
    pub mean_slippage: f64,
    pub total_ms: f64,
    pub mean_ms: f64,
    pub mean_iterations: f64,
}

/// Default schedules: the standard one and a hotter, slower-cooling one,
/// each under both swap policies.
pub fn default_scenarios(seed: u64) -> Vec<SimulationScenario> {
    let standard = BreakdownConfig::default().with_seed(seed);
    let slow = BreakdownConfig {
        start_temperature: 11000.0,
        cooling_factor: 0.999,
        ..standard.clone()
    };
    vec![
        SimulationScenario::new("fast_swap", standard.clone().with_policy(SwapPolicy::FastSwap)),
        SimulationScenario::new("random_swap", standard.with_policy(SwapPolicy::RandomSwap)),
        SimulationScenario::new("slow_cooling_fast_swap", slow.clone().with_policy(SwapPolicy::FastSwap)),
        SimulationScenario::new("slow_cooling_random_swap", slow.with_policy(SwapPolicy::RandomSwap)),
    ]
}

/// Run each scenario `repetitions` times (at least once) and summarize.
pub fn simulate(
    orders: &BTreeMap<ClientId, ClientOrder>,
    trades: &BTreeMap<TradeId, Trade>,
    scenarios: &[SimulationScenario],
    repetitions: usize,
) -> Result<Vec<SimulationReport>, BreakdownError> {
    let repetitions = repetitions.max(1);
    let mut reports = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let mut slippages = Vec::with_capacity(repetitions);
        let mut iterations = 0u64;
        let (outcome, elapsed) = profile("simulation_scenario", || -> Result<(), BreakdownError> {
            for _ in 0..repetitions {
                let result = breakdown(orders, trades, &scenario.config)?;
                iterations += result.stats.iterations;
                slippages.push(result.slippage);
            }
            Ok(())
        });
        outcome?;

        let n = repetitions as f64;
        let total_ms = elapsed.as_secs_f64() * 1000.0;
        let report = SimulationReport {
            label: scenario.label.clone(),
            policy: scenario.config.swap_policy,
            repetitions,
            best_slippage: slippages.iter().copied().fold(f64::INFINITY, f64::min),
            mean_slippage: slippages.iter().sum::<f64>() / n,
            total_ms,
            mean_ms: total_ms / n,
            mean_iterations: iterations as f64 / n,
        };
        tracing::info!(
            scenario = %report.label,
            best_slippage = report.best_slippage,
            total_ms = report.total_ms,
            "simulation scenario finished"
        );
        reports.push(report);
    }

    Ok(reports)
}
