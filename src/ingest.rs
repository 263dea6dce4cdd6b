//! CSV ingestion: parse a transaction batch from a CSV document. This is a
//! convenience layer on top of the detection core, which takes a plain
//! `&[Transaction]` and has no I/O dependency of its own.
//!
//! Mirrors the source's `build_graph_from_csv`: required columns are
//! `transaction_id, sender_id, receiver_id, amount, timestamp`, and a
//! missing column is a schema error rather than a silently-empty field.

use crate::error::FraudRingError;
use crate::graph::AccountId;
use crate::{Result, Transaction};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// Parse a transaction batch from a CSV reader. Row order in the input
/// becomes transaction order, which the graph builder and every detector
/// treat as the batch's canonical order.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    {
        let headers = csv_reader
            .headers()
            .map_err(|e| FraudRingError::Parse(e.to_string()))?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(FraudRingError::Schema(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }
    }

    let mut transactions = Vec::new();
    for record in csv_reader.deserialize() {
        let row: Row = record.map_err(|e| FraudRingError::Parse(e.to_string()))?;
        transactions.push(row.into_transaction()?);
    }
    Ok(transactions)
}

/// Parse a transaction batch from a CSV string.
pub fn load_transactions_str(csv_content: &str) -> Result<Vec<Transaction>> {
    load_transactions(csv_content.as_bytes())
}

#[derive(Debug, serde::Deserialize)]
struct Row {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: String,
    timestamp: String,
}

impl Row {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|e| FraudRingError::Parse(format!("invalid amount '{}': {e}", self.amount)))?;
        let timestamp = parse_timestamp(&self.timestamp)?;
        Ok(Transaction {
            transaction_id: self.transaction_id,
            sender_id: AccountId::from(self.sender_id),
            receiver_id: AccountId::from(self.receiver_id),
            amount,
            timestamp,
        })
    }
}

/// Accepts RFC3339 first, then falls back through the seconds-less and
/// date-only forms `pandas.read_csv`'s `parse_dates` (backed by
/// `dateutil`) also accepts, assuming UTC wherever the input carries no
/// offset. This includes the bare `YYYY-MM-DDTHH:MM` form used by
/// spec.md's own worked examples (e.g. `"2024-01-01T00:00"`).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    const NAIVE_DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    Err(FraudRingError::Parse(format!(
        "invalid timestamp '{raw}': expected RFC3339 or one of 'YYYY-MM-DD[ T]HH:MM[:SS]', 'YYYY-MM-DD'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_csv() {
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                    t1,A,B,100.50,2024-01-01T00:00:00Z\n";
        let txs = load_transactions_str(csv).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].sender_id, AccountId::from("A"));
        assert_eq!(txs[0].amount, Decimal::new(10050, 2));
    }

    #[test]
    fn accepts_space_separated_timestamp() {
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                    t1,A,B,100,2024-01-01 12:30:00\n";
        let txs = load_transactions_str(csv).unwrap();
        assert_eq!(txs[0].timestamp.to_rfc3339(), "2024-01-01T12:30:00+00:00");
    }

    #[test]
    fn accepts_spec_triangle_cycle_timestamp() {
        // The literal seconds-less timestamp from spec.md's "Triangle
        // cycle" and "Rapid movement" scenarios: "2024-01-01T00:00".
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                    t1,A,B,100,2024-01-01T00:00\n";
        let txs = load_transactions_str(csv).unwrap();
        assert_eq!(txs[0].timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn accepts_date_only_timestamp() {
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                    t1,A,B,100,2024-01-01\n";
        let txs = load_transactions_str(csv).unwrap();
        assert_eq!(txs[0].timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn missing_column_is_schema_error() {
        let csv = "transaction_id,sender_id,receiver_id,amount\nt1,A,B,100\n";
        let err = load_transactions_str(csv).unwrap_err();
        assert!(matches!(err, FraudRingError::Schema(_)));
    }

    #[test]
    fn malformed_amount_is_parse_error() {
        let csv = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
                    t1,A,B,not-a-number,2024-01-01T00:00:00Z\n";
        let err = load_transactions_str(csv).unwrap_err();
        assert!(matches!(err, FraudRingError::Parse(_)));
    }

    #[test]
    fn loads_from_a_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "transaction_id,sender_id,receiver_id,amount,timestamp").unwrap();
        writeln!(file, "t1,A,B,250.00,2024-01-01T00:00:00Z").unwrap();
        file.flush().unwrap();

        let reopened = std::fs::File::open(file.path()).unwrap();
        let txs = load_transactions(reopened).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].receiver_id, AccountId::from("B"));
    }
}
