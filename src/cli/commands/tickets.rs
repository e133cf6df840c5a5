use pooltix_core::{CoreError, IssueRequest, IssueService};
use pooltix_domain::TicketId;

use crate::cli::core::{money, CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, swatch};
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "types",
        summary: "List the ticket catalog",
        usage: "types",
        run: cmd_types,
    },
    Command {
        name: "issue",
        summary: "Issue one or more tickets of a type",
        usage: "issue <type> [quantity] [amount]",
        run: cmd_issue,
    },
    Command {
        name: "recent",
        summary: "Show the most recently issued tickets",
        usage: "recent [count]",
        run: cmd_recent,
    },
    Command {
        name: "delete",
        summary: "Delete a single ticket",
        usage: "delete <id>",
        run: cmd_delete,
    },
];

fn cmd_types(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Ticket types");
    for ticket_type in context.catalog.iter() {
        let price = if ticket_type.amount_required {
            "amount entered at issue".to_string()
        } else {
            money(ticket_type.price)
        };
        io::print_info(format!(
            "  {:<12} {:<22} {}",
            swatch(&ticket_type.id, &ticket_type.color),
            ticket_type.name,
            price
        ));
    }
    Ok(())
}

fn cmd_issue(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let type_id = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: issue <type> [quantity] [amount]".into())
    })?;
    let quantity = match args.get(1) {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a valid quantity", raw))
        })?,
        None => 1,
    };
    let mut request = IssueRequest::new(*type_id).with_quantity(quantity);
    if args.len() > 2 {
        request = request.with_amount(args[2..].join(""));
    }

    let needs_amount = context
        .catalog
        .find(type_id)
        .map(|ticket_type| ticket_type.amount_required)
        .unwrap_or(false);
    if needs_amount && request.amount.is_none() && context.mode == CliMode::Interactive {
        let amount = io::prompt_text(&context.theme, "Amount")?;
        request = request.with_amount(amount);
    }

    let resolved = IssueService::resolve(&context.catalog, &request)?;
    let preview = format!(
        "Issue {} x {} for {}?",
        resolved.quantity,
        resolved.ticket_type.name,
        money(resolved.order_total())
    );
    if !context.confirm(&preview)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let issued = IssueService::issue(&mut context.ledger, &context.catalog, &request)?;
    let total: u64 = issued.iter().map(|ticket| ticket.price).sum();
    io::print_success(format!(
        "Issued {} {} ticket(s), total {}.",
        issued.len(),
        type_id,
        money(total)
    ));
    for ticket in &issued {
        io::print_info(format!("  #{}  {} {}", ticket.id, ticket.date, ticket.time));
    }
    Ok(())
}

fn cmd_recent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{}` is not a valid count", raw))
            })?,
        None => context.config.recent_limit,
    };

    let recent = context.ledger.recent(limit);
    if recent.is_empty() {
        io::print_info("No tickets issued yet.");
        return Ok(());
    }
    output_section("Latest tickets");
    for ticket in recent {
        io::print_info(format!(
            "  #{}  {} {}  {:<22} {}",
            ticket.id,
            ticket.date,
            ticket.time,
            ticket.type_name,
            money(ticket.price)
        ));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: delete <id>".into()))?;
    let id = TicketId::new(raw.trim_start_matches('#'));
    let ticket = context
        .ledger
        .get(&id)
        .ok_or_else(|| CoreError::TicketNotFound(id.to_string()))?;
    let prompt = format!(
        "Delete ticket #{} ({}, {})?",
        ticket.id,
        ticket.type_name,
        money(ticket.price)
    );
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    context.ledger.remove_by_id(&id)?;
    io::print_success(format!("Ticket #{} deleted.", id));
    Ok(())
}
