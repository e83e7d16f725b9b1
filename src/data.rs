// Order record decoder
// Turns delimited text lines into typed order records, skip-and-count style:
// one bad record must never abort a replay run.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::book::entry::{OrderRecord, OwnerId, Side};
use crate::error::{SimError, SimResult};

/// Outcome of loading a data file: the decoded records plus how many lines
/// were dropped as malformed.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<OrderRecord>,
    pub skipped: usize,
}

/// Read an order data file. Malformed lines are warned about, counted and
/// skipped; an unreadable file is the only hard failure.
pub fn load_order_records<P: AsRef<Path>>(path: P) -> SimResult<LoadReport> {
    let content = fs::read_to_string(&path).map_err(|e| SimError::DataFile {
        path: path.as_ref().display().to_string(),
        source: e,
    })?;

    let mut report = LoadReport::default();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line, idx + 1) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!("{}", e);
                report.skipped += 1;
            }
        }
    }

    info!(
        "loaded {} order records from {} ({} skipped)",
        report.records.len(),
        path.as_ref().display(),
        report.skipped
    );
    Ok(report)
}

/// Parse one `timestamp,product,side,price,amount` line.
///
/// Wrong field count or a non-numeric price/amount is a `MalformedRecord`.
/// An unrecognized side token decodes to `Side::Unknown` and the record is
/// kept; it can never be admitted or matched.
pub fn parse_record(line: &str, line_no: usize) -> SimResult<OrderRecord> {
    let tokens = tokenise(line, ',');
    if tokens.len() != 5 {
        return Err(SimError::MalformedRecord {
            line: line_no,
            reason: format!("expected 5 fields, got {}", tokens.len()),
        });
    }

    let price = parse_field(&tokens[3], "price", line_no)?;
    let amount = parse_field(&tokens[4], "amount", line_no)?;

    Ok(OrderRecord::new(
        Side::from_token(&tokens[2]),
        tokens[1].clone(),
        price,
        amount,
        tokens[0].clone(),
        OwnerId::market(),
    ))
}

/// Validate interactive `(product, price, amount)` input through the same
/// numeric path as file records.
pub fn parse_order_fields(
    product: &str,
    price: &str,
    amount: &str,
) -> SimResult<(String, f64, f64)> {
    let price: f64 = price
        .trim()
        .parse()
        .map_err(|_| SimError::BadInput(format!("price is not a number: {}", price)))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| SimError::BadInput(format!("amount is not a number: {}", amount)))?;
    if !price.is_finite() || !amount.is_finite() {
        return Err(SimError::BadInput("price and amount must be finite".to_string()));
    }
    Ok((product.trim().to_string(), price, amount))
}

/// Split a line on `separator`, dropping empty tokens.
pub fn tokenise(line: &str, separator: char) -> Vec<String> {
    line.split(separator)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_field(token: &str, name: &str, line_no: usize) -> SimResult<f64> {
    let value: f64 = token.parse().map_err(|_| SimError::MalformedRecord {
        line: line_no,
        reason: format!("bad {}: {}", name, token),
    })?;
    if !value.is_finite() {
        return Err(SimError::MalformedRecord {
            line: line_no,
            reason: format!("non-finite {}: {}", name, token),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenise() {
        assert_eq!(tokenise("a,b,c", ','), vec!["a", "b", "c"]);
        assert_eq!(tokenise("a,,c", ','), vec!["a", "c"]);
        assert_eq!(tokenise("", ','), Vec::<String>::new());
    }

    #[test]
    fn test_parse_record_well_formed() {
        let record =
            parse_record("2020/03/17 17:01:24.884492,ETH/BTC,bid,0.02187308,7.44564869", 1)
                .unwrap();
        assert_eq!(record.side, Side::Bid);
        assert_eq!(record.product, "ETH/BTC");
        assert_eq!(record.price, 0.02187308);
        assert_eq!(record.amount, 7.44564869);
        assert_eq!(record.owner, OwnerId::market());
    }

    #[test]
    fn test_parse_record_wrong_field_count() {
        let err = parse_record("t1,ETH/BTC,bid,0.02", 3).unwrap_err();
        assert!(matches!(err, SimError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_parse_record_bad_number() {
        assert!(parse_record("t1,ETH/BTC,bid,abc,1.0", 1).is_err());
        assert!(parse_record("t1,ETH/BTC,bid,0.02,xyz", 1).is_err());
        assert!(parse_record("t1,ETH/BTC,bid,NaN,1.0", 1).is_err());
    }

    #[test]
    fn test_parse_record_unknown_side_kept() {
        let record = parse_record("t1,ETH/BTC,asksale,0.02,1.0", 1).unwrap();
        assert_eq!(record.side, Side::Unknown);
    }

    #[test]
    fn test_parse_order_fields() {
        let (product, price, amount) = parse_order_fields("ETH/BTC", "200", "0.5").unwrap();
        assert_eq!(product, "ETH/BTC");
        assert_eq!(price, 200.0);
        assert_eq!(amount, 0.5);

        assert!(parse_order_fields("ETH/BTC", "two hundred", "0.5").is_err());
        assert!(parse_order_fields("ETH/BTC", "inf", "0.5").is_err());
    }
}
