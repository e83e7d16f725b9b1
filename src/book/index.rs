// Book index: the full time-ordered collection of order records for a session
//
// Records are never deleted; matched quantity is drawn down on the one-pass
// filtered subsets, not on the index's own records, so the audit trail stays
// intact and every re-query of a timestamp starts from the recorded amounts.

use crate::book::entry::{OrderRecord, Side};

/// Insertion-ordered sequence of order records, re-sorted by timestamp on
/// every insert. Owns all records for the session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct BookIndex {
    orders: Vec<OrderRecord>,
}

impl BookIndex {
    pub fn new(mut orders: Vec<OrderRecord>) -> Self {
        orders.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self { orders }
    }

    /// Append an order and re-establish timestamp order. Re-submission of an
    /// equivalent order is legal; no duplicate detection.
    pub fn insert(&mut self, order: OrderRecord) {
        self.orders.push(order);
        self.orders.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }

    /// All records matching the side, product and timestamp exactly, as
    /// owned snapshot clones. A matching pass mutates the returned subset;
    /// the index's own records are left untouched.
    pub fn orders_at(&self, side: Side, product: &str, timestamp: &str) -> Vec<OrderRecord> {
        self.orders
            .iter()
            .filter(|e| e.side == side && e.product == product && e.timestamp == timestamp)
            .cloned()
            .collect()
    }

    /// Distinct products across all records, sorted so that per-product
    /// settlement order is deterministic.
    pub fn known_products(&self) -> Vec<String> {
        let mut products: Vec<String> = self.orders.iter().map(|e| e.product.clone()).collect();
        products.sort();
        products.dedup();
        products
    }

    /// First timestamp of the session timeline, `None` on an empty book.
    pub fn earliest_timestamp(&self) -> Option<&str> {
        self.orders.first().map(|e| e.timestamp.as_str())
    }

    /// Smallest timestamp strictly greater than `after`, wrapping to the
    /// earliest when none exists. The timeline is cyclic by design.
    pub fn next_timestamp(&self, after: &str) -> Option<&str> {
        self.orders
            .iter()
            .map(|e| e.timestamp.as_str())
            .find(|ts| *ts > after)
            .or_else(|| self.earliest_timestamp())
    }

    /// Highest price in a set of orders, `None` on empty input.
    pub fn high_price(orders: &[OrderRecord]) -> Option<f64> {
        orders.iter().map(|e| e.price).reduce(f64::max)
    }

    /// Lowest price in a set of orders, `None` on empty input.
    pub fn low_price(orders: &[OrderRecord]) -> Option<f64> {
        orders.iter().map(|e| e.price).reduce(f64::min)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
