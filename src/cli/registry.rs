use std::collections::HashSet;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command as typed at the prompt.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
    pub run: CommandHandler,
}

/// Shell commands in the order `help` lists them.
pub struct CommandTable {
    commands: Vec<Command>,
}

impl CommandTable {
    /// Ranks `commands` by their position in `order`. Names missing from
    /// `order` trail in definition order; a repeated name keeps its first entry.
    pub fn ordered(mut commands: Vec<Command>, order: &[&str]) -> Self {
        commands.sort_by_key(|command| {
            order
                .iter()
                .position(|listed| *listed == command.name)
                .unwrap_or(order.len())
        });
        let mut seen = HashSet::new();
        commands.retain(|command| seen.insert(command.name));
        Self { commands }
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.name)
    }
}
