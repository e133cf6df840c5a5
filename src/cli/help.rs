use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{Command, CommandTable};

pub fn print_overview(commands: &CommandTable) {
    output_section("Available commands");
    for command in commands.iter() {
        io::print_info(format!("  {:<12} {}", command.name, command.summary));
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(command: &Command) {
    output_section(format!("Help: {}", command.name));
    io::print_info(format!("  Description: {}", command.summary));
    io::print_info(format!("  Usage: {}", command.usage));
}
