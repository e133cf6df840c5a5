use std::{collections::HashSet, sync::Arc};

use chrono::{Duration, TimeZone, Utc};
use pooltix_domain::{Catalog, DayCalendar, Ticket, TicketId};
use regex::Regex;

use crate::{
    issue_service::{IssueRequest, IssueService},
    ledger_store::LedgerStore,
    report_service::ReportService,
    storage::{KeyValueStore, MemoryStore, TICKETS_KEY},
    time::FixedClock,
};

fn nowruz_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 20, 7, 15, 0).unwrap(),
    ))
}

fn open(memory: &MemoryStore, clock: &Arc<FixedClock>) -> LedgerStore {
    LedgerStore::open(
        Box::new(memory.clone()),
        clock.clone(),
        DayCalendar::default(),
    )
}

fn dated(id: &str, date: &str) -> Ticket {
    Ticket {
        id: TicketId::new(id),
        type_id: "adult".into(),
        type_name: "Adult".into(),
        price: 220_000,
        timestamp: 0,
        date: date.into(),
        time: "10:00".into(),
        calendar: None,
    }
}

#[test]
fn ledger_length_matches_requested_quantities_and_ids_are_unique() {
    let memory = MemoryStore::new();
    let clock = nowruz_clock();
    let mut store = open(&memory, &clock);
    let catalog = Catalog::standard();

    let quantities = [3u32, 1, 5, 2, 1];
    for (idx, quantity) in quantities.iter().enumerate() {
        let ticket_type = catalog.iter().nth(idx).unwrap();
        store.append(ticket_type, ticket_type.price, *quantity).unwrap();
        if idx % 2 == 0 {
            clock.advance(Duration::milliseconds(1));
        }
    }

    let expected: u32 = quantities.iter().sum();
    assert_eq!(store.len(), expected as usize);
    let ids: HashSet<_> = store.tickets().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), store.len());

    let numeric = Regex::new(r"^\d{13}$").unwrap();
    assert!(store.tickets().iter().all(|t| numeric.is_match(t.id.as_str())));
}

#[test]
fn appended_batch_shows_up_in_todays_report() {
    let memory = MemoryStore::new();
    let mut store = open(&memory, &nowruz_clock());
    let catalog = Catalog::standard();
    let private = catalog.find("private").unwrap();

    store.append(private, private.price, 4).unwrap();

    let report = ReportService::today(&store, &catalog);
    let line = report.line("private").expect("private line");
    assert_eq!(line.count, 4);
    assert_eq!(line.amount, 4 * 4_700_000);
}

#[test]
fn adult_and_child_scenario_totals() {
    let memory = MemoryStore::new();
    let mut store = open(&memory, &nowruz_clock());
    let catalog = Catalog::standard();

    IssueService::issue(&mut store, &catalog, &IssueRequest::new("adult").with_quantity(2))
        .unwrap();
    IssueService::issue(&mut store, &catalog, &IssueRequest::new("child")).unwrap();

    let report = ReportService::today(&store, &catalog);
    assert_eq!(report.date, "1403/01/01");
    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.lines[0].type_id, "adult");
    assert_eq!((report.lines[0].count, report.lines[0].amount), (2, 440_000));
    assert_eq!(report.lines[1].type_id, "child");
    assert_eq!((report.lines[1].count, report.lines[1].amount), (1, 190_000));
    assert_eq!((report.total.count, report.total.amount), (3, 630_000));
}

#[test]
fn report_omits_empty_types_and_totals_match_lines() {
    let memory = MemoryStore::new();
    let mut store = open(&memory, &nowruz_clock());
    let catalog = Catalog::standard();
    IssueService::issue(
        &mut store,
        &catalog,
        &IssueRequest::new("buffet_card").with_amount("120,000").with_quantity(3),
    )
    .unwrap();

    let report = ReportService::today(&store, &catalog);
    assert_eq!(report.lines.len(), 1);
    assert!(report.line("adult").is_none());
    let summed: usize = report.lines.iter().map(|l| l.count).sum();
    assert_eq!(report.total.count, summed);
    assert_eq!(report.total.amount, 360_000);
}

#[test]
fn remove_where_drops_exactly_the_matching_date() {
    let memory = MemoryStore::new();
    let seeded = vec![
        dated("1", "1403/01/01"),
        dated("2", "1403/01/02"),
        dated("3", "1403/01/01"),
        dated("4", "1403/01/02"),
        dated("5", "1403/01/01"),
    ];
    memory
        .set(TICKETS_KEY, &serde_json::to_string(&seeded).unwrap())
        .unwrap();
    let mut store = open(&memory, &nowruz_clock());

    let (remaining, removed) = store.remove_on("1403/01/01").unwrap();
    assert_eq!(removed, 3);
    let ids: Vec<_> = remaining.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);
    assert!(remaining.iter().all(|t| t.date == "1403/01/02"));

    let reopened = open(&memory, &nowruz_clock());
    assert_eq!(reopened.len(), 2);
}

#[test]
fn clear_then_restart_yields_empty_ledger() {
    let memory = MemoryStore::new();
    let clock = nowruz_clock();
    let mut store = open(&memory, &clock);
    let catalog = Catalog::standard();
    IssueService::issue(&mut store, &catalog, &IssueRequest::new("adult").with_quantity(3))
        .unwrap();
    assert!(memory.contains(TICKETS_KEY));

    store.clear().unwrap();
    assert!(store.is_empty());
    assert!(!memory.contains(TICKETS_KEY));

    let restarted = open(&memory, &clock);
    assert!(restarted.is_empty());
}

#[test]
fn remove_by_id_persists_single_deletion() {
    let memory = MemoryStore::new();
    let clock = nowruz_clock();
    let mut store = open(&memory, &clock);
    let catalog = Catalog::standard();
    let issued =
        IssueService::issue(&mut store, &catalog, &IssueRequest::new("child").with_quantity(2))
            .unwrap();

    store.remove_by_id(&issued[0].id).unwrap();

    let restarted = open(&memory, &clock);
    assert_eq!(restarted.len(), 1);
    assert_eq!(restarted.tickets()[0].id, issued[1].id);
}

#[test]
fn day_rollover_changes_today_without_touching_stored_dates() {
    let memory = MemoryStore::new();
    let clock = nowruz_clock();
    let mut store = open(&memory, &clock);
    let catalog = Catalog::standard();
    IssueService::issue(&mut store, &catalog, &IssueRequest::new("adult")).unwrap();

    clock.advance(Duration::days(1));
    let report = ReportService::today(&store, &catalog);
    assert!(report.is_empty());
    assert_eq!(store.tickets()[0].date, "1403/01/01");
    assert_eq!(store.count_on(&store.today()), 0);
}
