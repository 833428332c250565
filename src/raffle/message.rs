use super::models::{TransactionRecord, UNFILLED};

pub const NO_WINNERS_NOTICE: &str = "No qualifying customers found.";

/// Announcement text for a finished draw.
pub fn render(record: &TransactionRecord) -> String {
    if record.selected_customers.is_empty() {
        return NO_WINNERS_NOTICE.to_string();
    }

    let winners = record
        .selected_customers
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}（{}点）", i + 1, c.customer_id, c.roll_value))
        .collect::<Vec<_>>()
        .join("；");

    let staff = if record.staff_id.trim().is_empty() {
        UNFILLED
    } else {
        record.staff_id.as_str()
    };

    let mut lines = vec![
        format!("Winners: {winners}"),
        format!("{} customer(s) selected.", record.selected_customers.len()),
        format!("Staff: {staff} | Service: {}", record.service_name),
        format!("Slots: {}", record.amount),
        format!("Priority: {} roll first", record.pick_strategy.extremity()),
    ];
    if record.money != 0 {
        lines.push(format!("Amount: {}", record.money));
    }
    if record.has_refusal() {
        lines.push(format!("Refusal: {}", record.refusal_type));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raffle::models::{CustomerRoll, PickStrategy, REFUSAL_NONE};
    use crate::raffle::parser::parse;
    use crate::raffle::record::{RecordMeta, build};

    fn meta() -> RecordMeta {
        RecordMeta {
            staff_id: "s01".into(),
            service_name: "portrait".into(),
            amount: 3,
            money: 0,
            refusal_type: REFUSAL_NONE.into(),
            pick_strategy: PickStrategy::Max,
            winner_count: 2,
        }
    }

    #[test]
    fn empty_selection_renders_notice() {
        let record = build(&[], &meta());
        assert_eq!(render(&record), NO_WINNERS_NOTICE);
    }

    #[test]
    fn lists_winners_with_fullwidth_separators() {
        let rolls = vec![CustomerRoll::new("A", 5), CustomerRoll::new("B", 9)];
        let text = render(&build(&rolls, &meta()));
        assert!(text.contains("1. B（9点）；2. A（5点）"));
        assert!(text.contains("2 customer(s) selected."));
        assert!(text.contains("Slots: 3"));
        assert!(text.contains("highest"));
        assert!(!text.contains("Amount:"));
        assert!(!text.contains("Refusal:"));
    }

    #[test]
    fn money_and_refusal_lines_are_conditional() {
        let mut m = meta();
        m.money = 250;
        m.refusal_type = "price objection".into();
        let text = render(&build(&[CustomerRoll::new("A", 1)], &m));
        assert!(text.contains("Amount: 250"));
        assert!(text.contains("Refusal: price objection"));
    }

    #[test]
    fn blank_staff_on_stored_record_renders_placeholder() {
        let mut record = build(&[CustomerRoll::new("A", 1)], &meta());
        record.staff_id = "  ".into();
        let text = render(&record);
        assert!(text.contains(&format!("Staff: {UNFILLED} | Service: portrait")));
    }

    #[test]
    fn end_to_end_min_draw() {
        let rolls = parse("[TagA] Alice rolls 672 points!\nBob rolls 127 points!");
        let mut m = meta();
        m.pick_strategy = PickStrategy::Min;
        m.winner_count = 1;
        let record = build(&rolls, &m);
        assert_eq!(record.selected_customers, vec![CustomerRoll::new("Bob", 127)]);

        let text = render(&record);
        assert_ne!(text, NO_WINNERS_NOTICE);
        assert!(text.contains("Bob"));
        assert!(text.contains("lowest"));
        assert!(text.contains("Slots: 3"));
    }
}
