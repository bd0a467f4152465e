//! Breakdown input files.
//!
//! A single TOML or JSON document carries orders, trades and an optional
//! config:
//!
//! ```toml
//! [[orders]]
//! id = 1
//! quantity = 250
//!
//! [[trades]]
//! id = 1
//! quantity = 100
//! price = 10.0
//!
//! [config]
//! swap_policy = "FAST_SWAP"
//! ```
//!
//! Orders and trades can also come from two CSV files with headers
//! `id,quantity` and `id,quantity,price`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tradesplit_core::{BreakdownConfig, ClientId, ClientOrder, Trade, TradeId};

/// Errors from reading input files.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse TOML input: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("parse JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("unsupported input format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },
}

/// Orders, trades and an optional per-file config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownInput {
    pub orders: Vec<ClientOrder>,
    pub trades: Vec<Trade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BreakdownConfig>,
}

impl BreakdownInput {
    pub fn new(orders: Vec<ClientOrder>, trades: Vec<Trade>) -> Self {
        Self {
            orders,
            trades,
            config: None,
        }
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let content = read(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(InputError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load orders and trades from two CSV files.
    pub fn from_csv(orders_path: &Path, trades_path: &Path) -> Result<Self, InputError> {
        Ok(Self::new(
            read_csv(orders_path)?,
            read_csv(trades_path)?,
        ))
    }

    /// Orders keyed by client id. Duplicate ids are rejected rather than
    /// silently merged.
    pub fn order_map(&self) -> Result<BTreeMap<ClientId, ClientOrder>, InputError> {
        let mut map = BTreeMap::new();
        for order in &self.orders {
            if map.insert(order.id, order.clone()).is_some() {
                return Err(InputError::DuplicateId {
                    kind: "client",
                    id: order.id.0,
                });
            }
        }
        Ok(map)
    }

    /// Trades keyed by trade id. Duplicate ids are rejected.
    pub fn trade_map(&self) -> Result<BTreeMap<TradeId, Trade>, InputError> {
        let mut map = BTreeMap::new();
        for trade in &self.trades {
            if map.insert(trade.id, trade.clone()).is_some() {
                return Err(InputError::DuplicateId {
                    kind: "trade",
                    id: trade.id.0,
                });
            }
        }
        Ok(map)
    }

    /// The file's config, or `fallback` when it has none.
    pub fn config_or(&self, fallback: &BreakdownConfig) -> BreakdownConfig {
        self.config.clone().unwrap_or_else(|| fallback.clone())
    }

    pub fn total_traded(&self) -> u64 {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, InputError> {
    let csv_err = |source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradesplit_core::SwapPolicy;

    const SAMPLE_TOML: &str = r#"
        [[orders]]
        id = 1
        quantity = 250

        [[orders]]
        id = 2
        quantity = 50

        [[trades]]
        id = 1
        quantity = 100
        price = 10

        [[trades]]
        id = 2
        quantity = 200
        price = 11.5

        [config]
        swap_policy = "FAST_SWAP"
        seed = 9
    "#;

    #[test]
    fn toml_input_parses_with_config() {
        let input = BreakdownInput::from_toml(SAMPLE_TOML).unwrap();
        assert_eq!(input.orders.len(), 2);
        assert_eq!(input.trades[0].price, 10.0);
        assert_eq!(input.total_traded(), 300);
        let config = input.config.unwrap();
        assert_eq!(config.swap_policy, SwapPolicy::FastSwap);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.cooling_factor, 0.995);
    }

    #[test]
    fn json_input_without_config() {
        let input = BreakdownInput::from_json(
            r#"{"orders":[{"id":3,"quantity":10}],"trades":[{"id":4,"quantity":10,"price":9.5}]}"#,
        )
        .unwrap();
        assert!(input.config.is_none());
        let fallback = BreakdownConfig::default().with_seed(1);
        assert_eq!(input.config_or(&fallback), fallback);
        assert!(input.order_map().unwrap().contains_key(&ClientId(3)));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let input = BreakdownInput::new(
            vec![ClientOrder::new(1, 5), ClientOrder::new(1, 5)],
            vec![Trade::new(1, 10, 10.0)],
        );
        assert!(matches!(
            input.order_map(),
            Err(InputError::DuplicateId { kind: "client", id: 1 })
        ));
        assert!(input.trade_map().is_ok());
    }
}
