use super::models::{
    CustomerRoll, PublicSummary, RecordView, StaffRecordView, TransactionRecord, ViewerRole,
};
use chrono::{DateTime, Local, Utc};

const DISPLAY_TIME: &str = "%Y-%m-%d %H:%M:%S";
const TIME_OF_DAY: &str = "%H:%M:%S";

/// Project the collection for a viewer. Staff only ever see their own records.
pub fn filter(records: &[TransactionRecord], role: ViewerRole, viewer_id: Option<&str>) -> Vec<RecordView> {
    match role {
        ViewerRole::Manager => records.iter().cloned().map(RecordView::Full).collect(),
        ViewerRole::Staff => {
            let Some(viewer) = viewer_id else {
                return Vec::new();
            };
            records
                .iter()
                .filter(|r| r.staff_id == viewer)
                .map(|r| RecordView::Own(staff_view(r)))
                .collect()
        }
        ViewerRole::Guest => records
            .iter()
            .map(|r| RecordView::Public(public_summary(r)))
            .collect(),
    }
}

pub fn display_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(DISPLAY_TIME).to_string()
}

pub fn time_of_day(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(TIME_OF_DAY).to_string()
}

fn joined(rolls: &[CustomerRoll]) -> String {
    rolls
        .iter()
        .map(CustomerRoll::display_pair)
        .collect::<Vec<_>>()
        .join(", ")
}

fn staff_view(record: &TransactionRecord) -> StaffRecordView {
    StaffRecordView {
        id: record.id.clone(),
        time: display_time(&record.time),
        customers: record.customers.clone(),
        selected_customers: record.selected_customers.clone(),
        staff_id: record.staff_id.clone(),
        service_name: record.service_name.clone(),
        amount: record.amount,
        money: record.money,
        refusal_type: record.refusal_type.clone(),
        pick_strategy: record.pick_strategy,
        winner_count: record.winner_count,
    }
}

fn public_summary(record: &TransactionRecord) -> PublicSummary {
    PublicSummary {
        time: time_of_day(&record.time),
        customers: joined(&record.customers),
        winners: joined(&record.selected_customers),
        staff_id: record.staff_id.clone(),
        service_name: record.service_name.clone(),
        amount: record.amount,
        money: record.money,
    }
}

/// Closest known staff id to `wanted`, for "did you mean" hints.
pub fn suggest_staff_id(records: &[TransactionRecord], wanted: &str) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;
    for record in records {
        let candidate = record.staff_id.as_str();
        if candidate == wanted {
            return None;
        }
        let score = strsim::jaro_winkler(&candidate.to_lowercase(), &wanted.to_lowercase());
        if score >= 0.8 && best.is_none_or(|(s, _)| score > s) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, id)| id.to_string())
}
