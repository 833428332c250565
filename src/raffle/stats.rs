//! Per-(staff, service) statistics and the spreadsheet export built on them.

use super::models::{ExportCell, REFUSAL_NONE, StaffStat, TransactionRecord};
use anyhow::Result;
use std::collections::HashMap;

pub const EXPORT_HEADER: [&str; 7] = [
    "Staff",
    "Service",
    "Slots",
    "Transactions",
    "Money",
    "Refusals",
    "Salary",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Half the money, rounded half up. Applied per record, never to totals.
pub fn salary_share(money: u64) -> u64 {
    money / 2 + money % 2
}

/// Fold the whole collection into one stat per (staff, service), first-seen order.
pub fn aggregate(records: &[TransactionRecord]) -> Vec<StaffStat> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut stats: Vec<StaffStat> = Vec::new();

    for record in records {
        let key = (record.staff_id.as_str(), record.service_name.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            stats.push(StaffStat {
                staff_id: record.staff_id.clone(),
                service_name: record.service_name.clone(),
                total_count: 0,
                transaction_count: 0,
                total_money: 0,
                refusals: Default::default(),
                salary: 0,
            });
            stats.len() - 1
        });

        let stat = &mut stats[slot];
        stat.total_count = stat.total_count.saturating_add(u64::from(record.amount));
        stat.transaction_count = stat.transaction_count.saturating_add(1);
        stat.total_money = stat.total_money.saturating_add(record.money);
        let seen = stat.refusals.entry(record.refusal_type.clone()).or_insert(0);
        *seen = seen.saturating_add(1);
        stat.salary = stat.salary.saturating_add(salary_share(record.money));
    }

    stats
}

fn refusal_summary(stat: &StaffStat) -> String {
    let parts: Vec<String> = stat
        .refusals
        .iter()
        .filter(|(label, _)| label.as_str() != REFUSAL_NONE)
        .map(|(label, count)| format!("{label}×{count}"))
        .collect();
    if parts.is_empty() {
        "no refusals".to_string()
    } else {
        parts.join(", ")
    }
}

/// Header, one row per stat, then a totals row.
pub fn build_export_rows(stats: &[StaffStat]) -> Vec<Vec<ExportCell>> {
    let mut rows = Vec::with_capacity(stats.len() + 2);
    rows.push(EXPORT_HEADER.iter().map(|h| ExportCell::text(*h)).collect());

    let (mut count, mut transactions, mut money, mut salary) = (0u64, 0u64, 0u64, 0u64);
    for stat in stats {
        count = count.saturating_add(stat.total_count);
        transactions = transactions.saturating_add(stat.transaction_count);
        money = money.saturating_add(stat.total_money);
        salary = salary.saturating_add(stat.salary);
        rows.push(vec![
            ExportCell::text(&stat.staff_id),
            ExportCell::text(&stat.service_name),
            ExportCell::Number(stat.total_count),
            ExportCell::Number(stat.transaction_count),
            ExportCell::Number(stat.total_money),
            ExportCell::Text(refusal_summary(stat)),
            ExportCell::Number(stat.salary),
        ]);
    }

    rows.push(vec![
        ExportCell::text("Total"),
        ExportCell::text("-"),
        ExportCell::Number(count),
        ExportCell::Number(transactions),
        ExportCell::Number(money),
        ExportCell::text("-"),
        ExportCell::Number(salary),
    ]);
    rows
}

/// Every cell quoted, comma separated, UTF-8 with a BOM for spreadsheets.
pub fn to_csv(rows: &[Vec<ExportCell>]) -> Result<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(&mut buf);
        for row in rows {
            writer.write_record(row.iter().map(|c| c.to_string()))?;
        }
        writer.flush()?;
    }
    Ok(buf)
}
