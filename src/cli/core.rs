//! Core CLI loop, dispatch, and shell context helpers.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use pooltix_config::{default_home, ConfigError, ConfigManager};
use pooltix_core::{ledger_warnings, Clock, CoreError, LedgerStore};
use pooltix_storage_json::{JsonFileStore, StoragePaths};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::warn;

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::Command;
use super::system_clock::SystemClock;
pub use crate::cli::shell_context::{CliMode, ShellContext};

/// Currency label appended to formatted amounts.
pub const CURRENCY_LABEL: &str = "Toman";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, &default_home(), Arc::new(SystemClock))
    }

    /// Builds a context rooted at `home` with an explicit clock.
    pub fn with_home(mode: CliMode, home: &Path, clock: Arc<dyn Clock>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home)?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);
        let catalog = config.catalog().map_err(CoreError::from)?;

        let data_root = config.resolve_data_dir(home);
        let storage =
            JsonFileStore::with_retention(StoragePaths::under(&data_root), config.backup_retention)?;
        let ledger = LedgerStore::open(
            Box::new(storage.clone()),
            clock.clone(),
            config.day_calendar(),
        );

        let app = ShellContext {
            mode,
            commands: commands::table(),
            theme: ColorfulTheme::default(),
            home: home.to_path_buf(),
            config_manager,
            config,
            catalog,
            clock,
            storage,
            ledger,
            running: true,
        };
        app.report_integrity();
        Ok(app)
    }

    /// Rebuilds catalog, storage and ledger after a configuration change.
    pub(crate) fn reopen(&mut self) -> CommandResult {
        let catalog = self.config.catalog().map_err(CoreError::from)?;
        let data_root = self.config.resolve_data_dir(&self.home);
        let storage = JsonFileStore::with_retention(
            StoragePaths::under(&data_root),
            self.config.backup_retention,
        )?;
        self.ledger = LedgerStore::open(
            Box::new(storage.clone()),
            self.clock.clone(),
            self.config.day_calendar(),
        );
        self.storage = storage;
        self.catalog = catalog;
        output::set_color_enabled(self.config.ui_color_enabled);
        self.report_integrity();
        Ok(())
    }

    pub(crate) fn report_integrity(&self) {
        let warnings = ledger_warnings(
            self.ledger.tickets(),
            &self.catalog,
            self.ledger.calendar(),
        );
        for message in warnings {
            warn!(%message, "ledger integrity");
            cli_io::print_warning(message);
        }
    }

    pub(crate) fn data_root(&self) -> PathBuf {
        self.config.resolve_data_dir(&self.home)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.commands.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        let today = self.ledger.today();
        format!("pooltix [{} | {} today] > ", today, self.ledger.count_on(&today))
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(run) = self.commands.get(command).map(|entry| entry.run) {
            match run(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = closest_command(self.commands.names(), input) {
            cli_io::print_hint(format!("Did you mean `{}`?", best));
        }
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::UnknownTicketType(id)) => {
                self.print_error(&format!("Unknown ticket type `{}`.", id));
                self.print_hint("Use `types` to list the catalog.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

fn closest_command<'a>(
    names: impl Iterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &input), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

/// Formats an amount with thousands separators and the currency label.
pub(crate) fn money(amount: u64) -> String {
    format!("{} {}", pooltix_core::format_amount(amount), CURRENCY_LABEL)
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Line editor failure: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Config(inner) => CliError::Config(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    home: &Path,
    clock: Arc<dyn Clock>,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_home(CliMode::Script, home, clock)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
