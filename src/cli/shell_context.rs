//! Shared runtime state for CLI interactions and command execution.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use pooltix_config::{Config, ConfigManager};
use pooltix_core::{Clock, LedgerStore};
use pooltix_domain::Catalog;
use pooltix_storage_json::JsonFileStore;

use super::registry::CommandTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub commands: CommandTable,
    pub theme: ColorfulTheme,
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub catalog: Catalog,
    pub clock: Arc<dyn Clock>,
    pub storage: JsonFileStore,
    pub ledger: LedgerStore,
    pub running: bool,
}

impl ShellContext {
    pub fn home(&self) -> &Path {
        &self.home
    }
}
