pub mod config;
pub mod maintenance;
pub mod report;
pub mod system;
pub mod tickets;

use crate::cli::registry::CommandTable;

const ROOT_COMMAND_ORDER: &[&str] = &[
    "types",
    "issue",
    "report",
    "stats",
    "recent",
    "delete",
    "reset-today",
    "clear",
    "backups",
    "restore",
    "config",
    "help",
    "version",
    "exit",
];

pub(crate) fn table() -> CommandTable {
    let commands = [
        tickets::COMMANDS,
        report::COMMANDS,
        maintenance::COMMANDS,
        config::COMMANDS,
        system::COMMANDS,
    ]
    .concat();
    CommandTable::ordered(commands, ROOT_COMMAND_ORDER)
}
