//! Daily aggregation over the ledger.

use pooltix_domain::{Catalog, DailyReport, DaySummary, ReportLine, ReportTotals, Ticket};
use tracing::debug;

use crate::LedgerStore;

pub struct ReportService;

impl ReportService {
    /// Groups the tickets dated `date` by type, in catalog order.
    ///
    /// Dates compare as exact strings. Types with no tickets that day are left
    /// out, and tickets whose type is missing from the catalog are not counted.
    pub fn build_daily_report(tickets: &[Ticket], date: &str, catalog: &Catalog) -> DailyReport {
        let day: Vec<&Ticket> = tickets.iter().filter(|ticket| ticket.is_on(date)).collect();

        let lines: Vec<ReportLine> = catalog
            .iter()
            .filter_map(|ticket_type| {
                let (count, amount) = day
                    .iter()
                    .filter(|ticket| ticket.type_id == ticket_type.id)
                    .fold((0usize, 0u64), |(count, amount), ticket| {
                        (count + 1, amount.saturating_add(ticket.price))
                    });
                (count > 0).then(|| ReportLine {
                    type_id: ticket_type.id.clone(),
                    type_name: ticket_type.name.clone(),
                    color: ticket_type.color.clone(),
                    count,
                    amount,
                })
            })
            .collect();

        let total = lines.iter().fold(ReportTotals::default(), |acc, line| ReportTotals {
            count: acc.count + line.count,
            amount: acc.amount.saturating_add(line.amount),
        });

        debug!(date, lines = lines.len(), tickets = total.count, "built daily report");
        DailyReport {
            date: date.to_string(),
            lines,
            total,
        }
    }

    /// Report for the store's current day.
    pub fn today(store: &LedgerStore, catalog: &Catalog) -> DailyReport {
        Self::build_daily_report(store.tickets(), &store.today(), catalog)
    }

    pub fn day_summary(tickets: &[Ticket], date: &str) -> DaySummary {
        tickets
            .iter()
            .filter(|ticket| ticket.is_on(date))
            .fold(
                DaySummary {
                    total_tickets: tickets.len(),
                    ..DaySummary::default()
                },
                |mut summary, ticket| {
                    summary.day_tickets += 1;
                    summary.day_amount = summary.day_amount.saturating_add(ticket.price);
                    summary
                },
            )
    }
}
