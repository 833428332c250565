use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Placeholder used when an operator leaves the staff or service field blank.
pub const UNFILLED: &str = "unfilled";

/// The refusal tag that means "no refusal happened".
pub const REFUSAL_NONE: &str = "none";

/// Refusal tags the shop usually records. Any other string is still accepted.
pub const KNOWN_REFUSALS: &[&str] = &[
    REFUSAL_NONE,
    "schedule conflict",
    "style mismatch",
    "price objection",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRoll {
    pub customer_id: String,
    pub roll_value: u32,
}

impl CustomerRoll {
    pub fn new(customer_id: impl Into<String>, roll_value: u32) -> Self {
        Self {
            customer_id: customer_id.into(),
            roll_value,
        }
    }

    /// `name(value)` form used by the public summaries.
    pub fn display_pair(&self) -> String {
        format!("{}({})", self.customer_id, self.roll_value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStrategy {
    #[default]
    Max,
    Min,
}

impl PickStrategy {
    /// Human label for the extremity this strategy favours.
    pub fn extremity(self) -> &'static str {
        match self {
            PickStrategy::Max => "highest",
            PickStrategy::Min => "lowest",
        }
    }
}

impl fmt::Display for PickStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickStrategy::Max => f.write_str("max"),
            PickStrategy::Min => f.write_str("min"),
        }
    }
}

impl FromStr for PickStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "highest" | "high" => Ok(PickStrategy::Max),
            "min" | "lowest" | "low" => Ok(PickStrategy::Min),
            other => anyhow::bail!("unknown pick strategy: {other} (expected max or min)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub time: DateTime<Utc>,
    pub customers: Vec<CustomerRoll>,
    pub selected_customers: Vec<CustomerRoll>,
    // Kept for single-winner consumers of older collections.
    pub selected_customer: Option<CustomerRoll>,
    pub staff_id: String,
    pub service_name: String,
    pub amount: u32,
    pub money: u64,
    pub refusal_type: String,
    pub pick_strategy: PickStrategy,
    pub winner_count: u32,
}

impl TransactionRecord {
    pub fn has_refusal(&self) -> bool {
        self.refusal_type != REFUSAL_NONE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStat {
    pub staff_id: String,
    pub service_name: String,
    pub total_count: u64,
    pub transaction_count: u64,
    pub total_money: u64,
    pub refusals: BTreeMap<String, u64>,
    pub salary: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    Manager,
    Staff,
    Guest,
}

impl FromStr for ViewerRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manager" | "admin" => Ok(ViewerRole::Manager),
            "staff" => Ok(ViewerRole::Staff),
            "guest" | "public" => Ok(ViewerRole::Guest),
            other => anyhow::bail!("unknown role: {other} (expected manager, staff or guest)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecordView {
    pub id: String,
    pub time: String,
    pub customers: Vec<CustomerRoll>,
    pub selected_customers: Vec<CustomerRoll>,
    pub staff_id: String,
    pub service_name: String,
    pub amount: u32,
    pub money: u64,
    pub refusal_type: String,
    pub pick_strategy: PickStrategy,
    pub winner_count: u32,
}

/// Public projection: only joined display strings, never ids or raw lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSummary {
    pub time: String,
    pub customers: String,
    pub winners: String,
    pub staff_id: String,
    pub service_name: String,
    pub amount: u32,
    pub money: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", content = "record", rename_all = "lowercase")]
pub enum RecordView {
    Full(TransactionRecord),
    Own(StaffRecordView),
    Public(PublicSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportCell {
    Text(String),
    Number(u64),
}

impl ExportCell {
    pub fn text(s: impl Into<String>) -> Self {
        ExportCell::Text(s.into())
    }
}

impl fmt::Display for ExportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportCell::Text(s) => f.write_str(s),
            ExportCell::Number(n) => write!(f, "{n}"),
        }
    }
}
