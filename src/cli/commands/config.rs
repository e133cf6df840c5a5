use pooltix_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::Command;

pub(crate) const COMMANDS: &[Command] = &[Command {
    name: "config",
    summary: "View and change desk preferences",
    usage: "config [show|set <key> <value>]",
    run: cmd_config,
}];

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_config_value(context, &key, value.trim())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    io::print_info(format!("  {:<20} {}", "home", context.home().display()));
    io::print_info(format!("  {:<20} {}", "storage", context.data_root().display()));
    for key in Config::KEYS {
        let value = context.config.value_of(key).unwrap_or_default();
        io::print_info(format!("  {:<20} {}", key, value));
    }
    let catalog = if context.config.catalog.is_some() {
        "custom"
    } else {
        "standard"
    };
    io::print_info(format!(
        "  {:<20} {} ({} types)",
        "catalog",
        catalog,
        context.catalog.len()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated
        .apply(key, value)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let previous = std::mem::replace(&mut context.config, updated);
    if let Err(err) = context.reopen() {
        context.config = previous;
        return Err(err);
    }
    context.persist_config()?;
    io::print_success(format!(
        "{} set to {}.",
        key,
        context.config.value_of(key).unwrap_or_default()
    ));
    Ok(())
}
