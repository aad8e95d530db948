//! Shared runtime state for CLI interactions and command execution.

use dialoguer::theme::ColorfulTheme;

use ledgerdesk_config::{Config, ConfigManager};
use ledgerdesk_core::{ApiTransport, ErpApi, SessionStore};
use ledgerdesk_domain::EntityId;

use super::registry::CommandRegistry;

/// API client with the transport and session store chosen at startup.
pub type CliApi = ErpApi<Box<dyn ApiTransport>, Box<dyn SessionStore>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub api: CliApi,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Company picked with `company use`, else the configured default.
    pub company_id: Option<EntityId>,
    pub location_id: Option<EntityId>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, company: {:?}, location: {:?} }}",
            self.running, self.last_command, self.company_id, self.location_id
        )
    }
}
