use rollpoint_desk::raffle::{
    CustomerRoll, PickStrategy, RecordMeta, RecordView, ViewerRole, aggregate, build,
    build_export_rows, filter, message::NO_WINNERS_NOTICE, parse, render, select,
};

const CHAT: &str = "\
[TagA] Alice rolls 672 points!
Bob rolls 127 points!
system: dice 1-1000
Carol rolls 999 points (max1000)
【公会】小明 掷出了 672 点
";

fn meta(staff: &str, strategy: PickStrategy, winners: u32) -> RecordMeta {
    RecordMeta {
        staff_id: staff.into(),
        service_name: "portrait".into(),
        amount: 1,
        money: 75,
        refusal_type: "none".into(),
        pick_strategy: strategy,
        winner_count: winners,
    }
}

#[test]
fn chat_log_to_announcement() {
    let rolls = parse(CHAT);
    assert_eq!(
        rolls,
        vec![
            CustomerRoll::new("Alice", 672),
            CustomerRoll::new("Bob", 127),
            CustomerRoll::new("小明", 672),
        ]
    );

    // Alice and 小明 tie on 672; Alice posted first.
    assert_eq!(select(&rolls, PickStrategy::Max, 1), vec![CustomerRoll::new("Alice", 672)]);

    let record = build(&rolls, &meta("s01", PickStrategy::Min, 1));
    assert_eq!(record.selected_customers, vec![CustomerRoll::new("Bob", 127)]);

    let text = render(&record);
    assert_ne!(text, NO_WINNERS_NOTICE);
    assert!(text.contains("1. Bob（127点）"));
    assert!(text.contains("lowest"));
    assert!(text.contains("Slots: 1"));
    assert!(text.contains("Amount: 75"));
}

#[test]
fn collection_views_and_stats() {
    let rolls = parse(CHAT);
    let records = vec![
        build(&rolls, &meta("s01", PickStrategy::Max, 2)),
        build(&rolls, &meta("s02", PickStrategy::Min, 1)),
        build(&rolls, &meta("s01", PickStrategy::Max, 1)),
    ];

    let stats = aggregate(&records);
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].staff_id, "s01");
    assert_eq!(stats[0].transaction_count, 2);
    assert_eq!(stats[0].salary, 76);

    let rows = build_export_rows(&stats);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows.last().unwrap()[6].to_string(), "114");

    let own = filter(&records, ViewerRole::Staff, Some("s01"));
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|v| matches!(v, RecordView::Own(r) if r.staff_id == "s01")));

    let public = filter(&records, ViewerRole::Guest, None);
    assert_eq!(public.len(), 3);
    for view in &public {
        let json = serde_json::to_value(view).unwrap();
        assert!(json["record"].get("id").is_none());
        assert!(json["record"]["customers"].is_string());
    }
}
