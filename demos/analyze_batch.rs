//! Fraud-ring analysis example
//!
//! Reads a transaction CSV from stdin (or a built-in sample batch if no
//! input is piped in), runs the full detection pipeline, and prints the
//! JSON response. Set `RUST_LOG=debug` to see the analyzer's per-phase
//! `tracing` spans (cycle/fan/shell/two-hop/rapid-movement counts) alongside
//! the result.

use fraudring_engine::ingest::load_transactions_str;
use fraudring_engine::Analyzer;
use std::io::Read;

const SAMPLE_CSV: &str = "transaction_id,sender_id,receiver_id,amount,timestamp\n\
t1,A,B,500.00,2024-01-01T00:00:00Z\n\
t2,B,C,480.00,2024-01-01T00:05:00Z\n\
t3,C,A,460.00,2024-01-01T00:10:00Z\n\
t4,C,D,100.00,2024-01-01T00:15:00Z\n";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Fraud Ring Detection ===\n");

    let mut input = String::new();
    let csv = if std::io::stdin().read_to_string(&mut input).unwrap_or(0) > 0 {
        input
    } else {
        println!("(no stdin input piped in, using built-in sample batch)\n");
        SAMPLE_CSV.to_string()
    };

    let transactions = match load_transactions_str(&csv) {
        Ok(txs) => txs,
        Err(e) => {
            eprintln!("failed to parse transaction batch: {e}");
            std::process::exit(1);
        }
    };

    let analyzer = Analyzer::new();
    let response = match analyzer.analyze(&transactions) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("analysis failed: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Accounts analyzed: {}",
        response.summary.total_accounts_analyzed
    );
    println!(
        "Suspicious accounts flagged: {}",
        response.summary.suspicious_accounts_flagged
    );
    println!("Fraud rings detected: {}\n", response.summary.fraud_rings_detected);

    match response.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize response: {e}"),
    }
}
