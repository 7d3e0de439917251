//! Transaction record ingestion.
//!
//! CSV reader for the ledger upload format. Rows that fail validation are
//! rejected into a line-numbered error list; valid rows become
//! `Transaction`s. The analysis engine itself performs no validation -
//! everything it receives has passed through here (or an equivalent
//! upstream source).
//!
//! Expected header: `transaction_id,sender_id,receiver_id,amount,timestamp`
//! with amounts as non-negative decimals and timestamps as Unix epoch
//! seconds.

use crate::types::Transaction;
use muleflow_core::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One raw CSV row before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    transaction_id: Option<String>,
    sender_id: Option<String>,
    receiver_id: Option<String>,
    amount: Option<String>,
    timestamp: Option<String>,
}

/// Outcome of parsing a ledger upload.
#[derive(Debug, Clone, Default)]
pub struct ParsedLedger {
    /// Validated transactions, input order.
    pub transactions: Vec<Transaction>,
    /// Human-readable, line-numbered messages for rejected rows.
    pub errors: Vec<String>,
}

impl ParsedLedger {
    /// Whether any rows were rejected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse ledger records from a CSV file on disk.
pub fn parse_records_from_path(path: impl AsRef<Path>) -> Result<ParsedLedger> {
    let file = File::open(path)?;
    Ok(parse_records(file))
}

/// Parse ledger records from any reader.
///
/// Never fails as a whole: malformed rows (including rows the CSV layer
/// itself rejects) land in the error list and parsing continues. An empty
/// input yields an empty ledger with no errors.
pub fn parse_records<R: Read>(reader: R) -> ParsedLedger {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut ledger = ParsedLedger::default();

    for (index, row) in csv_reader.deserialize::<RawRecord>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        match row {
            Ok(raw) => match validate_row(raw) {
                Ok(tx) => ledger.transactions.push(tx),
                Err(reason) => ledger.errors.push(format!("line {line}: {reason}")),
            },
            Err(err) => ledger.errors.push(format!("line {line}: {err}")),
        }
    }

    tracing::debug!(
        accepted = ledger.transactions.len(),
        rejected = ledger.errors.len(),
        "ledger records parsed"
    );
    ledger
}

fn validate_row(raw: RawRecord) -> std::result::Result<Transaction, String> {
    let id = required(raw.transaction_id, "transaction_id")?;
    let sender = required(raw.sender_id, "sender_id")?;
    let receiver = required(raw.receiver_id, "receiver_id")?;

    let amount_field = required(raw.amount, "amount")?;
    let amount: f64 = amount_field
        .parse()
        .map_err(|_| format!("unparsable amount '{amount_field}'"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("amount '{amount_field}' must be non-negative"));
    }

    let timestamp_field = required(raw.timestamp, "timestamp")?;
    let timestamp: u64 = timestamp_field
        .parse()
        .map_err(|_| format!("unparsable timestamp '{timestamp_field}'"))?;

    Ok(Transaction::new(id, sender, receiver, amount, timestamp))
}

fn required(field: Option<String>, name: &str) -> std::result::Result<String, String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("missing required field {name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_rows_parse() {
        let input = "\
transaction_id,sender_id,receiver_id,amount,timestamp
t1,alice,bob,1500.50,1700000000
t2,bob,carol,200,1700000060
";
        let ledger = parse_records(input.as_bytes());

        assert!(!ledger.has_errors());
        assert_eq!(ledger.transactions.len(), 2);
        assert_eq!(ledger.transactions[0].sender, "alice");
        assert_eq!(ledger.transactions[0].amount, 1500.50);
        assert_eq!(ledger.transactions[1].timestamp, 1_700_000_060);
    }

    #[test]
    fn test_rejected_rows_are_line_numbered() {
        let input = "\
transaction_id,sender_id,receiver_id,amount,timestamp
t1,alice,bob,not-a-number,1700000000
t2,,carol,200,1700000060
t3,bob,carol,200,tomorrow
t4,bob,dave,50,1700000120
";
        let ledger = parse_records(input.as_bytes());

        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.transactions[0].id, "t4");
        assert_eq!(ledger.errors.len(), 3);
        assert!(ledger.errors[0].starts_with("line 2:"));
        assert!(ledger.errors[0].contains("unparsable amount"));
        assert!(ledger.errors[1].starts_with("line 3:"));
        assert!(ledger.errors[1].contains("sender_id"));
        assert!(ledger.errors[2].starts_with("line 4:"));
        assert!(ledger.errors[2].contains("unparsable timestamp"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = "\
transaction_id,sender_id,receiver_id,amount,timestamp
t1,alice,bob,-10,1700000000
";
        let ledger = parse_records(input.as_bytes());

        assert!(ledger.transactions.is_empty());
        assert!(ledger.errors[0].contains("non-negative"));
    }

    #[test]
    fn test_short_row_rejected() {
        let input = "\
transaction_id,sender_id,receiver_id,amount,timestamp
t1,alice,bob
";
        let ledger = parse_records(input.as_bytes());

        assert!(ledger.transactions.is_empty());
        assert_eq!(ledger.errors.len(), 1);
        assert!(ledger.errors[0].starts_with("line 2:"));
    }

    #[test]
    fn test_empty_input_is_valid() {
        let ledger = parse_records("".as_bytes());
        assert!(ledger.transactions.is_empty());
        assert!(!ledger.has_errors());
    }
}
