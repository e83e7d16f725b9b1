// Order record types
//
// An order record is the unit of interest in the session: immutable once
// recorded, except that its amount is drawn down in place while a matching
// pass consumes it. Settled trades reuse the same record shape with the side
// rewritten to AskSale/BidSale.

use serde::Serialize;

/// Order side. `AskSale` and `BidSale` mark settled-trade outputs and are
/// never produced by the decoder; `Unknown` is the decoder fallback for an
/// unrecognized side token (the record is kept but can never match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Ask,
    Bid,
    AskSale,
    BidSale,
    Unknown,
}

impl Side {
    /// Parse a record side token. Anything but "ask"/"bid" is `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "ask" => Side::Ask,
            "bid" => Side::Bid,
            _ => Side::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Ask => "ask",
            Side::Bid => "bid",
            Side::AskSale => "asksale",
            Side::BidSale => "bidsale",
            Side::Unknown => "unknown",
        }
    }
}

/// Opaque participant identity.
///
/// The simulated participant's id comes from configuration and is handed
/// explicitly to the matching engine and session; dataset records carry the
/// market identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        OwnerId(id.into())
    }

    /// Identity attached to every record in the input dataset.
    pub fn market() -> Self {
        OwnerId("market".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single order record: one row of recorded interest, or one settled trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub side: Side,
    /// Trading pair of the form BASE/QUOTE, e.g. "ETH/BTC". Never empty.
    pub product: String,
    /// Quantity of QUOTE per unit BASE.
    pub price: f64,
    /// Quantity of BASE. Drawn down in place during a matching pass; never
    /// negative, never increased once matching begins.
    pub amount: f64,
    /// Opaque session time marker; lexicographic order is the timeline.
    pub timestamp: String,
    pub owner: OwnerId,
}

impl OrderRecord {
    pub fn new(
        side: Side,
        product: impl Into<String>,
        price: f64,
        amount: f64,
        timestamp: impl Into<String>,
        owner: OwnerId,
    ) -> Self {
        Self {
            side,
            product: product.into(),
            price,
            amount,
            timestamp: timestamp.into(),
            owner,
        }
    }

    /// Split the product into its BASE and QUOTE halves.
    /// `None` when the identifier is not of the form BASE/QUOTE.
    pub fn base_and_quote(&self) -> Option<(&str, &str)> {
        match self.product.split_once('/') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {
                Some((base, quote))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_token() {
        assert_eq!(Side::from_token("ask"), Side::Ask);
        assert_eq!(Side::from_token("bid"), Side::Bid);
        assert_eq!(Side::from_token("asksale"), Side::Unknown);
        assert_eq!(Side::from_token("garbage"), Side::Unknown);
    }

    #[test]
    fn test_base_and_quote() {
        let order = OrderRecord::new(
            Side::Ask,
            "ETH/BTC",
            0.02,
            1.0,
            "2020/03/17 17:01:24",
            OwnerId::market(),
        );
        assert_eq!(order.base_and_quote(), Some(("ETH", "BTC")));
    }

    #[test]
    fn test_base_and_quote_malformed() {
        let mut order = OrderRecord::new(
            Side::Ask,
            "ETHBTC",
            0.02,
            1.0,
            "t1",
            OwnerId::market(),
        );
        assert_eq!(order.base_and_quote(), None);

        order.product = "/BTC".to_string();
        assert_eq!(order.base_and_quote(), None);
    }
}
