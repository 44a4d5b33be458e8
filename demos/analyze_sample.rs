//! Builds a small transaction batch exhibiting each detectable pattern and
//! prints the analysis result as JSON.

use chrono::{Duration, Utc};
use money_muling_engine::{analyze_default, Transaction};

fn tx(id: &str, from: &str, to: &str, amount: f64, offset_hours: i64) -> Transaction {
    Transaction {
        transaction_id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        amount,
        timestamp: Utc::now() + Duration::hours(offset_hours),
    }
}

fn main() {
    env_logger::init();

    let mut transactions = vec![
        // A 3-cycle: A -> B -> C -> A.
        tx("C1", "A", "B", 5000.0, 0),
        tx("C2", "B", "C", 5000.0, 1),
        tx("C3", "C", "A", 5000.0, 2),
        // A 4-hop shell chain through dormant intermediaries.
        tx("S1", "S1", "S2", 2000.0, 0),
        tx("S2", "S2", "S3", 2000.0, 1),
        tx("S3", "S3", "S4", 2000.0, 2),
        tx("S4", "S4", "S5", 2000.0, 3),
    ];

    // A fan-in burst: 10 senders hitting one aggregator within a day.
    for i in 0..10 {
        transactions.push(tx(&format!("F{i}"), &format!("SRC{i}"), "AGGREGATOR", 800.0, i));
    }

    let result = analyze_default(&transactions);
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
