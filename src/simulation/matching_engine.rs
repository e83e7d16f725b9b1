// Order matching engine
// Price-time priority double auction over one (product, timestamp) pair

use tracing::debug;

use crate::book::entry::{OrderRecord, OwnerId, Side};

/// Matches filtered ask/bid subsets and emits trade records.
///
/// The engine holds the simulated participant's identity explicitly; emitted
/// trades carry that identity whenever either matched side belonged to the
/// participant, so the caller can settle exactly those against the ledger.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    participant: OwnerId,
}

impl MatchingEngine {
    pub fn new(participant: OwnerId) -> Self {
        Self { participant }
    }

    pub fn participant(&self) -> &OwnerId {
        &self.participant
    }

    /// Match asks against bids for one product at one timestamp.
    ///
    /// Both slices must already be filtered to the given product, timestamp
    /// and side. Amounts are drawn down in place over exactly this pass; the
    /// caller decides whether the reduced amounts outlive it. Empty input on
    /// either side is a no-liquidity condition, not a failure, and this
    /// routine never fails.
    pub fn match_asks_to_bids(
        &self,
        asks: &mut [OrderRecord],
        bids: &mut [OrderRecord],
        product: &str,
        timestamp: &str,
    ) -> Vec<OrderRecord> {
        let mut trades = Vec::new();

        if asks.is_empty() || bids.is_empty() {
            debug!("no liquidity for {} at {}", product, timestamp);
            return trades;
        }

        // Best price first on both sides: cheapest ask, highest bid.
        asks.sort_by(|a, b| a.price.total_cmp(&b.price));
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));

        for ask in asks.iter_mut() {
            if ask.amount <= 0.0 {
                continue;
            }
            for bid in bids.iter_mut() {
                if bid.amount <= 0.0 {
                    continue;
                }
                if bid.price < ask.price {
                    continue;
                }

                // Fills always land at the ask's price; price-improvement
                // accrues to the bidder.
                if bid.amount == ask.amount {
                    trades.push(self.trade(ask, bid, ask.amount, product, timestamp));
                    bid.amount = 0.0;
                    break;
                } else if bid.amount > ask.amount {
                    trades.push(self.trade(ask, bid, ask.amount, product, timestamp));
                    bid.amount -= ask.amount;
                    break;
                } else {
                    trades.push(self.trade(ask, bid, bid.amount, product, timestamp));
                    ask.amount -= bid.amount;
                    bid.amount = 0.0;
                }
            }
        }

        trades
    }

    /// Build one trade record for a fill.
    ///
    /// Classification follows the participant's side: their bid makes the
    /// trade a BidSale (they bought BASE), their ask an AskSale (they sold).
    /// When the participant somehow sits on both sides the bid wins; a trade
    /// with no participant involvement is reported as an AskSale under the
    /// market identity and is never settled.
    fn trade(
        &self,
        ask: &OrderRecord,
        bid: &OrderRecord,
        amount: f64,
        product: &str,
        timestamp: &str,
    ) -> OrderRecord {
        let (side, owner) = if bid.owner == self.participant {
            (Side::BidSale, self.participant.clone())
        } else if ask.owner == self.participant {
            (Side::AskSale, self.participant.clone())
        } else {
            (Side::AskSale, OwnerId::market())
        };

        OrderRecord::new(side, product, ask.price, amount, timestamp, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(price: f64, amount: f64) -> OrderRecord {
        OrderRecord::new(Side::Ask, "ETH/BTC", price, amount, "t1", OwnerId::market())
    }

    fn bid(price: f64, amount: f64) -> OrderRecord {
        OrderRecord::new(Side::Bid, "ETH/BTC", price, amount, "t1", OwnerId::market())
    }

    fn engine() -> MatchingEngine {
        MatchingEngine::new(OwnerId::new("local"))
    }

    #[test]
    fn test_exact_match() {
        let mut asks = vec![ask(200.0, 1.0)];
        let mut bids = vec![bid(200.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].amount, 1.0);
        assert_eq!(trades[0].price, 200.0);
        assert_eq!(bids[0].amount, 0.0);
    }

    #[test]
    fn test_one_ask_fills_two_bids() {
        let mut asks = vec![ask(100.0, 2.0)];
        let mut bids = vec![bid(110.0, 1.0), bid(105.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 2);
        for trade in &trades {
            assert_eq!(trade.amount, 1.0);
            assert_eq!(trade.price, 100.0);
        }
        assert_eq!(asks[0].amount, 0.0);
    }

    #[test]
    fn test_bid_larger_than_ask_keeps_remainder() {
        let mut asks = vec![ask(100.0, 1.0)];
        let mut bids = vec![bid(100.0, 2.5)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].amount, 1.0);
        assert_eq!(bids[0].amount, 1.5);
    }

    #[test]
    fn test_bid_below_ask_never_matches() {
        let mut asks = vec![ask(100.0, 1.0)];
        let mut bids = vec![bid(99.9, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");
        assert!(trades.is_empty());
        assert_eq!(asks[0].amount, 1.0);
        assert_eq!(bids[0].amount, 1.0);
    }

    #[test]
    fn test_cheapest_asks_fill_first() {
        let mut asks = vec![ask(102.0, 1.0), ask(100.0, 1.0)];
        let mut bids = vec![bid(101.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, 100.0);
    }

    #[test]
    fn test_empty_sides_yield_no_trades() {
        let eng = engine();
        assert!(eng
            .match_asks_to_bids(&mut [], &mut [bid(100.0, 1.0)], "ETH/BTC", "t1")
            .is_empty());
        assert!(eng
            .match_asks_to_bids(&mut [ask(100.0, 1.0)], &mut [], "ETH/BTC", "t1")
            .is_empty());
    }

    #[test]
    fn test_fill_conservation() {
        let mut asks = vec![ask(100.0, 1.3), ask(101.0, 0.7), ask(99.0, 2.0)];
        let mut bids = vec![bid(100.5, 1.1), bid(99.5, 0.4), bid(102.0, 0.9)];

        let ask_total: f64 = asks.iter().map(|a| a.amount).sum();
        let bid_total: f64 = bids.iter().map(|b| b.amount).sum();

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        let filled: f64 = trades.iter().map(|t| t.amount).sum();
        assert!(filled <= ask_total.min(bid_total) + 1e-12);
        assert!(trades.iter().all(|t| t.amount > 0.0));
    }

    #[test]
    fn test_participant_bid_classified_bidsale() {
        let mut asks = vec![ask(100.0, 1.0)];
        let mut bids = vec![OrderRecord::new(
            Side::Bid,
            "ETH/BTC",
            100.0,
            1.0,
            "t1",
            OwnerId::new("local"),
        )];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].side, Side::BidSale);
        assert_eq!(trades[0].owner, OwnerId::new("local"));
    }

    #[test]
    fn test_participant_ask_classified_asksale() {
        let mut asks = vec![OrderRecord::new(
            Side::Ask,
            "ETH/BTC",
            100.0,
            1.0,
            "t1",
            OwnerId::new("local"),
        )];
        let mut bids = vec![bid(100.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].side, Side::AskSale);
        assert_eq!(trades[0].owner, OwnerId::new("local"));
    }

    #[test]
    fn test_market_trade_carries_market_identity() {
        let mut asks = vec![ask(100.0, 1.0)];
        let mut bids = vec![bid(100.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades[0].owner, OwnerId::market());
        assert_eq!(trades[0].side, Side::AskSale);
    }

    #[test]
    fn test_exhausted_bids_are_skipped() {
        // Two asks against one bid: the bid is zeroed by the first ask and
        // must not produce a zero-amount trade against the second.
        let mut asks = vec![ask(100.0, 1.0), ask(100.0, 1.0)];
        let mut bids = vec![bid(100.0, 1.0)];

        let trades = engine().match_asks_to_bids(&mut asks, &mut bids, "ETH/BTC", "t1");

        assert_eq!(trades.len(), 1);
        assert!(trades.iter().all(|t| t.amount > 0.0));
    }
}
