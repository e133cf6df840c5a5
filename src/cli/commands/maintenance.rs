use pooltix_core::TICKETS_KEY;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[
    Command {
        name: "reset-today",
        summary: "Delete every ticket issued today",
        usage: "reset-today",
        run: cmd_reset_today,
    },
    Command {
        name: "clear",
        summary: "Delete all tickets",
        usage: "clear",
        run: cmd_clear,
    },
    Command {
        name: "backups",
        summary: "List backups taken before the ledger was cleared",
        usage: "backups",
        run: cmd_backups,
    },
    Command {
        name: "restore",
        summary: "Replace the ledger with a backup",
        usage: "restore <backup>",
        run: cmd_restore,
    },
];

fn cmd_reset_today(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let today = context.ledger.today();
    let count = context.ledger.count_on(&today);
    if count == 0 {
        io::print_info("No tickets issued today.");
        return Ok(());
    }
    if !context.confirm(&format!("Delete {} ticket(s) issued on {}?", count, today))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let (_, removed) = context.ledger.remove_on(&today)?;
    io::print_success(format!("{} ticket(s) removed.", removed));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let count = context.ledger.len();
    if count == 0 {
        io::print_info("Nothing to delete.");
        return Ok(());
    }
    if !context.confirm(&format!("Delete all {} ticket(s)? This cannot be undone.", count))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    context.ledger.clear()?;
    io::print_success(format!("All {} ticket(s) deleted.", count));
    io::print_hint("A copy was kept; see `backups`.");
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.storage.list_backups(TICKETS_KEY)?;
    if backups.is_empty() {
        io::print_info("No backups available.");
        return Ok(());
    }
    output_section("Backups");
    for backup in backups {
        let created = backup
            .created_at
            .map(|at| {
                at.with_timezone(&context.ledger.calendar().offset())
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "unknown".into());
        io::print_info(format!(
            "  {:<40} {}  {} bytes",
            backup.id, created, backup.size_bytes
        ));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let backup_id = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: restore <backup>".into()))?;
    let replaced = context.ledger.len();
    if replaced > 0
        && !context.confirm(&format!(
            "Replace the current {} ticket(s) with `{}`?",
            replaced, backup_id
        ))?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let (backup, payload) = context.storage.read_backup(TICKETS_KEY, backup_id)?;
    let restored = context.ledger.restore_from(&payload)?.len();
    io::print_success(format!(
        "Restored {} ticket(s) from `{}`.",
        restored, backup.id
    ));
    context.report_integrity();
    Ok(())
}
