//! Core CLI loop, dispatch, and shell context helpers.

use std::io;

use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;

use ledgerdesk_config::{Config, ConfigError, ConfigManager};
use ledgerdesk_core::{ApiTransport, CoreError, ErpApi, Scope, SessionStore};
use ledgerdesk_domain::{CurrentUser, EntityId};
use ledgerdesk_http::HttpTransport;
use ledgerdesk_session_json::JsonSessionStore;

pub use crate::cli::shell_context::{CliApi, CliMode, ShellContext};
pub use crate::errors::CliError;

use super::args::ArgMap;
use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::CommandEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not signed in. Use `login <email>` first.")]
    NotSignedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthenticated => CommandError::NotSignedIn,
            other => CommandError::Core(other),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => inner.into(),
            CliError::Config(inner) => CommandError::Config(inner),
            CliError::Io(inner) => CommandError::Io(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
            CliError::Readline(inner) => CommandError::Message(inner.to_string()),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub(crate) fn apply_output_preferences(mode: CliMode, config: &Config) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        plain_mode: mode == CliMode::Script,
    });
}

impl ShellContext {
    /// Context backed by the HTTP transport and the on-disk session file.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::from_env()?;
        let config = config_manager.load_effective()?;

        let transport: Box<dyn ApiTransport> = Box::new(HttpTransport::from_config(&config)?);
        let store: Box<dyn SessionStore> =
            Box::new(JsonSessionStore::new(config.resolve_session_dir())?);
        tracing::debug!(api = %config.api_base_url, "shell starting");

        Ok(Self::with_api(mode, ErpApi::new(transport, store), config_manager, config))
    }

    pub fn with_api(
        mode: CliMode,
        api: CliApi,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        let registry = commands::registry();
        apply_output_preferences(mode, &config);

        ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            api,
            config_manager,
            company_id: config.default_company_id,
            location_id: config.default_location_id,
            config,
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    /// Whether dialoguer prompts may be shown.
    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.scope_label() {
            Some(label) => format!("ledgerdesk [{}]> ", label),
            None => "ledgerdesk> ".to_string(),
        }
    }

    fn scope_label(&self) -> Option<String> {
        let user = self.api.session().current_user().ok().flatten()?;
        let company_id = self
            .company_id
            .or_else(|| user.companies.first().map(|company| company.id))?;
        let company = user.company(company_id)?;
        let label = match self.location_id.and_then(|id| company.location(id)) {
            Some(location) => format!("{} / {}", company.name, location.name),
            None => company.name.clone(),
        };
        Some(label)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
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

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                self.print_error(&CommandError::NotSignedIn.to_string());
                self.print_hint("Try `login you@example.com`.");
            }
            CommandError::Core(CoreError::Validation(errors)) => {
                self.print_error("Please fix the following:");
                for field in errors.as_slice() {
                    self.print_error(&format!("  {}", field));
                }
            }
            other => self.print_error(&other.to_string()),
        }
        Ok(())
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

    pub(crate) fn require_user(&self) -> Result<CurrentUser, CommandError> {
        Ok(self.api.current_user()?)
    }

    /// `--company`, else the active company, else the user's first company.
    pub(crate) fn company(&self, args: &ArgMap<'_>) -> Result<EntityId, CommandError> {
        let requested = args.id("company")?.or(self.company_id);
        let user = self.require_user()?;
        Ok(Scope::new(&user).resolve_company(requested)?)
    }

    /// `--location`, else the active location when it belongs to `company_id`.
    pub(crate) fn location(
        &self,
        args: &ArgMap<'_>,
        company_id: EntityId,
    ) -> Result<Option<EntityId>, CommandError> {
        if let Some(id) = args.id("location")? {
            return Ok(Some(id));
        }
        let user = self.require_user()?;
        let company = Scope::new(&user).ensure_company(company_id)?;
        Ok(self.location_id.filter(|id| company.location(*id).is_some()))
    }

    /// Like [`ShellContext::location`], falling back to the company's only location.
    pub(crate) fn require_location(
        &self,
        args: &ArgMap<'_>,
        company_id: EntityId,
    ) -> Result<EntityId, CommandError> {
        if let Some(id) = self.location(args, company_id)? {
            return Ok(id);
        }
        let user = self.require_user()?;
        match Scope::new(&user).locations(company_id)? {
            [only] => Ok(only.id),
            [] => Err(CommandError::Message(
                "No location of this company is assigned to you.".into(),
            )),
            _ => Err(CommandError::InvalidArguments(
                "this company has several locations; pass `--location <id>` or run `company use <id> <location>`"
                    .into(),
            )),
        }
    }

    pub(crate) fn date_format(&self) -> &str {
        &self.config.date_format
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Asks before a destructive action; scripts are assumed to mean it.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }
}

#[cfg(test)]
pub(crate) fn process_script(context: &mut ShellContext, lines: &[&str]) -> Result<(), CliError> {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}
