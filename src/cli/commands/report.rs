use pooltix_core::ReportService;
use pooltix_domain::DailyReport;

use crate::cli::core::{money, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, separator, swatch};
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "report",
        summary: "Show the sales report for a day (today by default)",
        usage: "report [YYYY/MM/DD] [--json]",
        run: cmd_report,
    },
    Command {
        name: "stats",
        summary: "Show headline figures",
        usage: "stats",
        run: cmd_stats,
    },
];

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let json = args.iter().any(|arg| *arg == "--json");
    let date = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(raw) => context.ledger.calendar().normalize_key(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY/MM/DD)", raw))
        })?,
        None => context.ledger.today(),
    };

    let report = ReportService::build_daily_report(context.ledger.tickets(), &date, &context.catalog);
    if json {
        io::print_info(serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &DailyReport) {
    output_section(format!("Daily report {}", report.date));
    if report.is_empty() {
        io::print_info("No tickets issued on this day.");
        return;
    }
    for line in &report.lines {
        io::print_info(format!(
            "  {:<22} {:>5}  {:>16}",
            swatch(&line.type_name, &line.color),
            line.count,
            money(line.amount)
        ));
    }
    separator();
    io::print_info(format!(
        "  {:<22} {:>5}  {:>16}",
        "Total",
        report.total.count,
        money(report.total.amount)
    ));
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.ledger.today();
    let summary = ReportService::day_summary(context.ledger.tickets(), &today);
    output_section("Stats");
    io::print_info(format!("  All tickets     : {}", summary.total_tickets));
    io::print_info(format!("  Issued today    : {} ({})", summary.day_tickets, today));
    io::print_info(format!("  Today's revenue : {}", money(summary.day_amount)));
    Ok(())
}
