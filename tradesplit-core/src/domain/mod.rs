//! Domain types for TradeSplit

pub mod fill;
pub mod ids;
pub mod order;
pub mod trade;

pub use fill::AllocatedFill;
pub use ids::{ClientId, TradeId};
pub use order::ClientOrder;
pub use trade::Trade;
