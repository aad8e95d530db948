pub mod auth;
pub mod bank;
pub mod coa;
pub mod company;
pub mod config;
pub mod dashboard;
pub mod depreciation;
pub mod iou;
pub mod partner;
pub mod requisition;
pub mod series;
pub mod system;
pub mod voucher;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "login",
    "logout",
    "whoami",
    "company",
    "coa",
    "bank",
    "partner",
    "voucher",
    "series",
    "iou",
    "requisition",
    "dashboard",
    "depreciation",
    "config",
    "help",
    "version",
    "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(auth::definitions());
    commands.extend(company::definitions());
    commands.extend(coa::definitions());
    commands.extend(bank::definitions());
    commands.extend(partner::definitions());
    commands.extend(voucher::definitions());
    commands.extend(series::definitions());
    commands.extend(iou::definitions());
    commands.extend(requisition::definitions());
    commands.extend(dashboard::definitions());
    commands.extend(depreciation::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn registry() -> CommandRegistry {
    CommandRegistry::ordered(all_entries(), ROOT_COMMAND_ORDER)
}

/// Splits `args` into the action word and the remaining arguments.
pub(crate) fn split_action<'a>(
    args: &'a [&'a str],
    usage: &str,
) -> Result<(String, &'a [&'a str]), CommandError> {
    match args.split_first() {
        Some((action, rest)) => Ok((action.to_lowercase(), rest)),
        None => Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    }
}

pub(crate) fn unknown_action(command: &str, action: &str) -> CommandError {
    CommandError::InvalidArguments(format!("unknown {} action `{}`", command, action))
}
