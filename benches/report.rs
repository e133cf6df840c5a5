use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pooltix_core::ReportService;
use pooltix_domain::{Catalog, DayCalendar, Ticket, TicketId};

fn build_sample_ledger(ticket_count: usize) -> (Vec<Ticket>, String) {
    let catalog = Catalog::standard();
    let calendar = DayCalendar::default();
    let types: Vec<_> = catalog.iter().collect();
    let start = Utc.with_ymd_and_hms(2024, 3, 20, 6, 0, 0).unwrap();

    let tickets: Vec<Ticket> = (0..ticket_count)
        .map(|idx| {
            let ticket_type = types[idx % types.len()];
            let issued_at = start + Duration::minutes((idx % (60 * 24 * 30)) as i64);
            let price = if ticket_type.amount_required {
                10_000 + (idx % 50) as u64 * 1_000
            } else {
                ticket_type.price
            };
            Ticket::issue(
                TicketId::from_sequence(issued_at.timestamp_millis() + idx as i64),
                ticket_type,
                price,
                issued_at,
                &calendar,
            )
        })
        .collect();
    let day = calendar.date_key(start);
    (tickets, day)
}

fn bench_daily_report(c: &mut Criterion) {
    let catalog = Catalog::standard();
    let (tickets, day) = build_sample_ledger(50_000);

    c.bench_function("build_daily_report_50k", |b| {
        b.iter(|| {
            let report =
                ReportService::build_daily_report(black_box(&tickets), black_box(&day), &catalog);
            black_box(report.total.amount);
        })
    });

    c.bench_function("day_summary_50k", |b| {
        b.iter(|| black_box(ReportService::day_summary(black_box(&tickets), &day)))
    });
}

criterion_group!(benches, bench_daily_report);
criterion_main!(benches);
