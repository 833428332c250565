use super::models::{CustomerRoll, PickStrategy, REFUSAL_NONE, TransactionRecord, UNFILLED};
use super::selector::select;
use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

/// Operator-supplied metadata for one draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    pub staff_id: String,
    pub service_name: String,
    pub amount: u32,
    #[serde(default)]
    pub money: u64,
    #[serde(default = "default_refusal")]
    pub refusal_type: String,
    #[serde(default)]
    pub pick_strategy: PickStrategy,
    pub winner_count: u32,
}

fn default_refusal() -> String {
    REFUSAL_NONE.to_string()
}

/// Build an immutable record for a draw. Callers validate `amount` first.
pub fn build(rolls: &[CustomerRoll], meta: &RecordMeta) -> TransactionRecord {
    build_at(rolls, meta, Utc::now())
}

pub(crate) fn build_at(rolls: &[CustomerRoll], meta: &RecordMeta, time: DateTime<Utc>) -> TransactionRecord {
    let selected_customers = select(rolls, meta.pick_strategy, i64::from(meta.winner_count));
    let selected_customer = selected_customers.first().cloned();

    TransactionRecord {
        id: record_id(time),
        time,
        customers: rolls.to_vec(),
        selected_customers,
        selected_customer,
        staff_id: or_unfilled(&meta.staff_id),
        service_name: or_unfilled(&meta.service_name),
        amount: meta.amount,
        money: meta.money,
        refusal_type: meta.refusal_type.clone(),
        pick_strategy: meta.pick_strategy,
        winner_count: meta.winner_count,
    }
}

/// Millisecond timestamp plus a random suffix, e.g. `1760616000000-k3J9xq`.
fn record_id(time: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}-{}", time.timestamp_millis(), suffix)
}

// Non-blank ids are kept verbatim; staff views match them exactly.
fn or_unfilled(value: &str) -> String {
    if value.trim().is_empty() {
        UNFILLED.to_string()
    } else {
        value.to_string()
    }
}
