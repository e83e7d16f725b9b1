// Simulation session
// One run's explicit state: book index, ledger, matching engine, time cursor

use tracing::{debug, info, warn};

use crate::book::entry::{OrderRecord, OwnerId, Side};
use crate::book::index::BookIndex;
use crate::error::{SimError, SimResult};
use crate::simulation::ledger::Ledger;
use crate::simulation::matching_engine::MatchingEngine;

/// Per-product ask statistics at the current time step.
#[derive(Debug, Clone)]
pub struct ProductStats {
    pub product: String,
    pub asks_seen: usize,
    pub max_ask: Option<f64>,
    pub min_ask: Option<f64>,
}

/// One simulation run. Owns the book and the ledger; processes one time step
/// to completion before the next action is accepted.
#[derive(Debug)]
pub struct SimSession {
    book: BookIndex,
    ledger: Ledger,
    engine: MatchingEngine,
    current_time: String,
}

impl SimSession {
    /// Seed a session from decoded records, granting the opening balances to
    /// the participant's ledger and positioning the cursor at the earliest
    /// recorded timestamp.
    pub fn new(
        records: Vec<OrderRecord>,
        participant: OwnerId,
        opening_balances: &[(String, f64)],
    ) -> SimResult<Self> {
        let book = BookIndex::new(records);
        let current_time = book
            .earliest_timestamp()
            .unwrap_or_default()
            .to_string();

        let mut ledger = Ledger::new();
        for (asset, amount) in opening_balances {
            ledger.credit(asset, *amount)?;
        }

        Ok(Self {
            book,
            ledger,
            engine: MatchingEngine::new(participant),
            current_time,
        })
    }

    pub fn current_time(&self) -> &str {
        &self.current_time
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn book(&self) -> &BookIndex {
        &self.book
    }

    pub fn participant(&self) -> &OwnerId {
        self.engine.participant()
    }

    /// Submit a participant order at the current time step.
    ///
    /// Admission is gated by the ledger: an order the participant cannot
    /// cover is rejected before it ever enters the book, and the rejection is
    /// reported to the submitter rather than ending the session.
    pub fn submit_order(
        &mut self,
        side: Side,
        product: &str,
        price: f64,
        amount: f64,
    ) -> SimResult<()> {
        let order = OrderRecord::new(
            side,
            product,
            price,
            amount,
            self.current_time.clone(),
            self.engine.participant().clone(),
        );

        if !self.ledger.can_afford(&order) {
            let (base, quote) = order
                .base_and_quote()
                .ok_or_else(|| SimError::MalformedProduct(product.to_string()))?;
            let (asset, required) = match side {
                Side::Ask => (base, amount),
                _ => (quote, amount * price),
            };
            return Err(SimError::InsufficientFunds {
                asset: asset.to_string(),
                required,
                available: self
                    .ledger
                    .balances()
                    .find(|(a, _)| *a == asset)
                    .map(|(_, b)| b)
                    .unwrap_or(0.0),
            });
        }

        info!(
            "accepted {} {} {} @ {} at {}",
            side.as_str(),
            amount,
            product,
            price,
            self.current_time
        );
        self.book.insert(order);
        Ok(())
    }

    /// Process the current time step: match every product, settle the
    /// participant's trades, then advance the cursor cyclically. Returns all
    /// trades emitted over the step.
    pub fn step(&mut self) -> Vec<OrderRecord> {
        let mut all_trades = Vec::new();

        for product in self.book.known_products() {
            let mut asks = self.book.orders_at(Side::Ask, &product, &self.current_time);
            let mut bids = self.book.orders_at(Side::Bid, &product, &self.current_time);

            if asks.is_empty() || bids.is_empty() {
                debug!("{} at {}: no bids or asks", product, self.current_time);
                continue;
            }

            let trades =
                self.engine
                    .match_asks_to_bids(&mut asks, &mut bids, &product, &self.current_time);

            for trade in &trades {
                debug!(
                    "sale {} {} @ {}",
                    trade.product, trade.amount, trade.price
                );
                if trade.owner == *self.engine.participant() {
                    // A jointly-overdrawing ask+bid pair can fail here even
                    // though both orders were admissible at entry; skip the
                    // settlement and keep the session alive.
                    if let Err(e) = self.ledger.apply_trade(trade) {
                        warn!("settlement skipped for {}: {}", trade.product, e);
                    }
                }
            }

            info!(
                "{} at {}: {} sales",
                product,
                self.current_time,
                trades.len()
            );
            all_trades.extend(trades);
        }

        if let Some(next) = self.book.next_timestamp(&self.current_time) {
            self.current_time = next.to_string();
        }

        all_trades
    }

    /// Ask-side statistics per product at the current time step.
    pub fn market_stats(&self) -> Vec<ProductStats> {
        self.book
            .known_products()
            .into_iter()
            .map(|product| {
                let asks = self.book.orders_at(Side::Ask, &product, &self.current_time);
                ProductStats {
                    asks_seen: asks.len(),
                    max_ask: BookIndex::high_price(&asks),
                    min_ask: BookIndex::low_price(&asks),
                    product,
                }
            })
            .collect()
    }
}
