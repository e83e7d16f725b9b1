// Balance ledger: admission checks and trade settlement
//
// One asset at a time, two mutation paths (credit, debit). Every path that
// could drive a balance negative is rejected before application, never
// clamped after, so balances are non-negative by construction.

use std::collections::BTreeMap;

use crate::book::entry::{OrderRecord, Side};
use crate::error::{SimError, SimResult};

/// Mapping from asset symbol (the BASE or QUOTE half of a product) to a
/// non-negative balance.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: BTreeMap<String, f64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the balance of `asset` by `amount`, creating the asset at
    /// zero when unknown. Rejects negative amounts.
    pub fn credit(&mut self, asset: &str, amount: f64) -> SimResult<()> {
        if amount < 0.0 {
            return Err(SimError::InvalidAmount(amount));
        }
        *self.balances.entry(asset.to_string()).or_insert(0.0) += amount;
        Ok(())
    }

    /// Attempt to decrease the balance of `asset` by `amount`. Returns false
    /// with no mutation when the amount is negative, the asset is unknown,
    /// or the balance is short.
    pub fn debit(&mut self, asset: &str, amount: f64) -> bool {
        if amount < 0.0 {
            return false;
        }
        match self.balances.get_mut(asset) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                true
            }
            _ => false,
        }
    }

    /// Pure predicate; an unknown asset reads as zero balance.
    pub fn has_at_least(&self, asset: &str, amount: f64) -> bool {
        self.balances.get(asset).copied().unwrap_or(0.0) >= amount
    }

    /// Admission check for order entry: an asker must hold what they are
    /// selling (BASE), a bidder must hold what they are paying with (QUOTE).
    /// Any other side is inadmissible.
    pub fn can_afford(&self, order: &OrderRecord) -> bool {
        let Some((base, quote)) = order.base_and_quote() else {
            return false;
        };
        match order.side {
            Side::Ask => self.has_at_least(base, order.amount),
            Side::Bid => self.has_at_least(quote, order.amount * order.price),
            _ => false,
        }
    }

    /// Settle a trade against the balances. An AskSale sells BASE for QUOTE,
    /// a BidSale buys BASE with QUOTE.
    ///
    /// The debit runs first and failure aborts before any credit: admission
    /// was checked at order entry, but an ask+bid pair from the same
    /// participant can jointly overdraw once fills land, and that case must
    /// surface as an error rather than a negative balance.
    pub fn apply_trade(&mut self, trade: &OrderRecord) -> SimResult<()> {
        let (base, quote) = trade
            .base_and_quote()
            .ok_or_else(|| SimError::MalformedProduct(trade.product.clone()))?;

        let (debit_asset, debit_amount, credit_asset, credit_amount) = match trade.side {
            Side::AskSale => (base, trade.amount, quote, trade.amount * trade.price),
            Side::BidSale => (quote, trade.amount * trade.price, base, trade.amount),
            _ => return Err(SimError::BadInput(format!(
                "cannot settle a {} record",
                trade.side.as_str()
            ))),
        };

        if !self.debit(debit_asset, debit_amount) {
            return Err(SimError::InsufficientFunds {
                asset: debit_asset.to_string(),
                required: debit_amount,
                available: self.balances.get(debit_asset).copied().unwrap_or(0.0),
            });
        }
        self.credit(credit_asset, credit_amount)
    }

    /// Ordered snapshot of `(asset, balance)` pairs.
    pub fn balances(&self) -> impl Iterator<Item = (&str, f64)> {
        self.balances.iter().map(|(asset, amount)| (asset.as_str(), *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (asset, amount) in self.balances() {
            writeln!(f, "{} : {}", asset, amount)?;
        }
        Ok(())
    }
}
