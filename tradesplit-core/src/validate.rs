//! Input validation, run before any allocation work.
//!
//! Every failure names the offending id so the caller can fix the batch.

use crate::domain::{ClientId, ClientOrder, Trade, TradeId};
use crate::error::BreakdownError;
use std::collections::BTreeMap;

/// Check that orders and trades describe one consistent pool.
///
/// Fails with [`BreakdownError::InvalidInput`] when:
/// - `min_lot_size` is zero
/// - there are no trades, or the pool holds zero shares
/// - a map key disagrees with the record's declared id
/// - a trade price is not a finite positive number
/// - a trade or order quantity is not a multiple of the lot size
/// - requested and traded totals differ
pub fn validate(
    orders: &BTreeMap<ClientId, ClientOrder>,
    trades: &BTreeMap<TradeId, Trade>,
    min_lot_size: u64,
) -> Result<(), BreakdownError> {
    if min_lot_size < 1 {
        return Err(invalid("min_lot_size must be equal to or greater than 1".into()));
    }
    if trades.is_empty() {
        return Err(invalid("at least one trade is required".into()));
    }

    let mut traded: u128 = 0;
    for (key, trade) in trades {
        if *key != trade.id {
            return Err(invalid(format!(
                "trade key {key} does not match declared id {}",
                trade.id
            )));
        }
        if !trade.price.is_finite() || trade.price <= 0.0 {
            return Err(invalid(format!(
                "trade {key} has invalid price {}",
                trade.price
            )));
        }
        if trade.quantity % min_lot_size != 0 {
            return Err(invalid(format!(
                "trade {key} quantity {} is not divisible by min lot size {min_lot_size}",
                trade.quantity
            )));
        }
        traded += u128::from(trade.quantity);
    }

    let mut requested: u128 = 0;
    for (key, order) in orders {
        if *key != order.id {
            return Err(invalid(format!(
                "client key {key} does not match declared id {}",
                order.id
            )));
        }
        if order.quantity % min_lot_size != 0 {
            return Err(invalid(format!(
                "client {key} quantity {} is not divisible by min lot size {min_lot_size}",
                order.quantity
            )));
        }
        requested += u128::from(order.quantity);
    }

    if requested != traded {
        return Err(invalid(format!(
            "clients requested {requested} but trades sum to {traded}"
        )));
    }
    if traded == 0 {
        return Err(invalid("trade pool holds zero shares".into()));
    }
    if traded > u128::from(u64::MAX) {
        return Err(invalid(format!("trade pool of {traded} shares overflows u64")));
    }

    Ok(())
}

fn invalid(message: String) -> BreakdownError {
    BreakdownError::InvalidInput(message)
}
