use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show build metadata and the API endpoint in use",
            "version",
            cmd_version,
        ),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("LedgerDesk {}", meta.version));
    io::print_info(format!("  Build        : {}", meta.short()));
    io::print_info(format!("  Built at     : {} for {} ({})", meta.timestamp, meta.target, meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    io::print_info(format!(
        "  API          : {} (timeout {}s)",
        context.config.api_base_url, context.config.request_timeout_secs
    ));
    let session = match context.api.session().current_user() {
        Ok(Some(user)) => format!("signed in as {}", user.name),
        Ok(None) => "signed out".to_string(),
        Err(err) => format!("unreadable ({})", err),
    };
    io::print_info(format!("  Session      : {}", session));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    match context.command(&name.to_lowercase()) {
        Some(entry) => help::print_command(entry),
        None => context.suggest_command(name),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
