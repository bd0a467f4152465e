use super::client::PriceMark;

/// A client/trade pair: "the trade at position `trade` as held by the
/// client at position `client`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub client: usize,
    pub trade: usize,
}

impl Leg {
    pub fn new(client: usize, trade: usize) -> Self {
        Self { client, trade }
    }
}

/// Exchange of `amount` shares between two legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub first: Leg,
    pub second: Leg,
    pub amount: u64,
}

impl Swap {
    pub fn new(first: Leg, second: Leg, amount: u64) -> Self {
        Self {
            first,
            second,
            amount,
        }
    }
}

/// A swap that has been applied, with what is needed to undo it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedSwap {
    pub swap: Swap,
    pub(crate) marks: [PriceMark; 2],
}
