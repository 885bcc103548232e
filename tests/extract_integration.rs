use ib_pnl_extract::{
    extract_records, DomStatement, ExtractionRecord, Money, PayloadKind, RecordSet, SchemaVariant,
    StatementPayload,
};

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> Vec<ExtractionRecord> {
    let set = RecordSet::from_file(fixture_path(name)).expect("read fixture");
    set.records
}

fn money(s: &str) -> Money {
    s.parse().expect("valid decimal")
}

#[test]
fn legacy_2013_total_only() {
    let html = std::fs::read_to_string(fixture_path("activity_2013.html")).expect("read fixture");
    let dom = DomStatement::parse(&html);
    assert_eq!(dom.classify(), SchemaVariant::Legacy2013);

    let records = load_fixture("activity_2013.html");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.account.id.0, "U1234567");
    assert_eq!(record.account.name, "John Doe");
    assert_eq!((record.period.year, record.period.month), (Some(2013), Some(11)));
    assert_eq!(record.pnl.total, money("2500.00"));
    assert_eq!(record.pnl.stocks, Money::ZERO);
    assert_eq!(record.pnl.options, Money::ZERO);
    assert_eq!(record.pnl.forex, Money::ZERO);
}

#[test]
fn current_variant_reads_all_categories() {
    let html =
        std::fs::read_to_string(fixture_path("activity_current.html")).expect("read fixture");
    assert_eq!(DomStatement::parse(&html).classify(), SchemaVariant::Current);

    let records = load_fixture("activity_current.html");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.account.id.0, "U1234567");
    assert_eq!((record.period.year, record.period.month), (Some(2021), Some(1)));
    assert_eq!(
        record.period.display_label(),
        "January 1, 2021 - January 31, 2021"
    );
    assert_eq!(record.pnl.stocks, money("1500.25"));
    assert_eq!(record.pnl.options, money("-250.00"));
    assert_eq!(record.pnl.forex, money("1234.56"));
    assert_eq!(record.pnl.total, money("2484.81"));
}

#[test]
fn malformed_category_does_not_affect_others() {
    let html = std::fs::read_to_string(fixture_path("activity_masked.html")).expect("read fixture");
    assert_eq!(DomStatement::parse(&html).classify(), SchemaVariant::Interim);

    let records = load_fixture("activity_masked.html");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.account.id.0, "U***4567");
    // «N/A» вместо форекса: только эта категория остаётся нулевой.
    assert_eq!(record.pnl.forex, Money::ZERO);
    assert_eq!(record.pnl.stocks, money("300.00"));
    assert_eq!(record.pnl.options, money("-25.50"));
    assert_eq!(record.pnl.total, money("274.50"));
}

#[test]
fn fixed_layout_primary_and_forex_sub() {
    let records = load_fixture("activity_fixed.txt");
    assert_eq!(records.len(), 2);

    let primary = &records[0];
    assert_eq!(primary.account.id.0, "U1234567");
    assert_eq!(primary.account.name, "John Doe");
    assert_eq!((primary.period.year, primary.period.month), (Some(2014), Some(5)));
    assert_eq!(primary.pnl.stocks, money("123.45"));
    assert_eq!(primary.pnl.options, money("55.50"));
    assert_eq!(primary.pnl.total, money("999.99"));
    assert_eq!(primary.pnl.forex, Money::ZERO);

    let forex_sub = &records[1];
    assert_eq!(forex_sub.account.id.0, "U1234567F");
    assert_eq!(forex_sub.pnl.forex, money("42.00"));
    assert_eq!(forex_sub.pnl.total, money("42.00"));
    assert_eq!(forex_sub.pnl.stocks, Money::ZERO);
}

#[test]
fn extraction_is_idempotent() {
    let html =
        std::fs::read_to_string(fixture_path("activity_current.html")).expect("read fixture");
    let payload = StatementPayload::from_text("activity_current.html", PayloadKind::Markup, &html);
    assert_eq!(extract_records(&payload), extract_records(&payload));
}

#[test]
fn no_accounts_means_no_records() {
    let payload = StatementPayload::from_text(
        "empty.html",
        PayloadKind::Markup,
        "<html><body><p>nothing here</p></body></html>",
    );
    assert!(extract_records(&payload).is_empty());

    let payload =
        StatementPayload::from_text("empty.txt", PayloadKind::FixedLayout, "nothing here");
    assert!(extract_records(&payload).is_empty());
}

#[test]
fn batch_loads_sorted_and_aggregates() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let set = RecordSet::from_dir(dir).expect("read fixtures dir");
    assert_eq!(set.records.len(), 5);

    let sorted = set.sorted_records();
    let keys: Vec<(Option<i32>, Option<u32>, &str)> = sorted
        .iter()
        .map(|r| (r.period.year, r.period.month, r.account.id.0.as_str()))
        .collect();
    assert_eq!(
        keys,
        [
            (Some(2013), Some(11), "U1234567"),
            (Some(2014), Some(5), "U1234567"),
            (Some(2014), Some(5), "U1234567F"),
            (Some(2021), Some(1), "U1234567"),
            (Some(2022), Some(2), "U***4567"),
        ]
    );

    let by_year = set.summary_by_year();
    assert_eq!(by_year.len(), 5);
    let y2014 = by_year
        .iter()
        .find(|row| row.account.0 == "U1234567" && row.year == Some(2014))
        .expect("2014 summary row");
    assert_eq!(y2014.stocks, money("123.45"));
    assert_eq!(y2014.total, money("999.99"));

    let monthly = set.monthly_summary();
    assert_eq!(monthly.len(), 4);
    let may_2014 = monthly
        .iter()
        .find(|row| (row.year, row.month) == (Some(2014), Some(5)))
        .expect("2014-05 pivot row");
    assert_eq!(may_2014.totals.len(), 2);
    assert_eq!(
        may_2014
            .totals
            .get(&ib_pnl_extract::AccountId("U1234567F".to_string())),
        Some(&money("42.00"))
    );
}

#[test]
fn parse_real_dir_if_present() {
    if let Ok(dir) = std::env::var("REAL_STATEMENT_DIR") {
        let set = RecordSet::from_dir(&dir).expect("parse real statements");
        assert!(!set.records.is_empty());
    }
}
