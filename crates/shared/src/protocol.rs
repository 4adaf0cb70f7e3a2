use serde::{Deserialize, Serialize};

use crate::domain::OrderLine;

/// Outbound payloads for the remote ledger endpoint. The endpoint multiplexes
/// on the `action` field of the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerRequest {
    Save {
        order_details: String,
        total_money: i64,
    },
    GetStats {
        password: String,
    },
    CheckDate {
        password: String,
        /// "YYYY-MM-DD"
        target_date: String,
    },
}

/// Response to `get_stats`. Amounts default to zero so a rejection body
/// (`result` != "success") still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub result: String,
    #[serde(default)]
    pub today: i64,
    #[serde(default)]
    pub month: i64,
    #[serde(default)]
    pub year: i64,
    #[serde(default)]
    pub count: i64,
}

/// Response to `check_date`: `total` on success, `msg` on rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTotalResponse {
    pub result: String,
    #[serde(default)]
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

pub const LEDGER_RESULT_SUCCESS: &str = "success";

/// Compact human-readable order summary stored in the ledger:
/// `(qty) name [note]`, comma-joined, in cart line order.
pub fn format_order_details(lines: &[OrderLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let qty = line.quantity.settled();
            if line.note.is_empty() {
                format!("({qty}) {}", line.name)
            } else {
                format!("({qty}) {} [{}]", line.name, line.note)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
