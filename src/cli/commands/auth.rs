use ledgerdesk_core::Scope;

use crate::cli::args::ArgMap;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table_renderer::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in to the accounting API",
            "login <email> [--password <secret>]",
            cmd_login,
        ),
        CommandEntry::new("logout", "Sign out and forget the session", "logout", cmd_logout),
        CommandEntry::new(
            "whoami",
            "Show the signed-in user and what it may access",
            "whoami",
            cmd_whoami,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = ArgMap::parse(args);
    let email = match args.positional(0) {
        Some(email) => email.to_string(),
        None if context.can_prompt() => io::prompt_text(context.theme(), "Email", None)?,
        None => {
            return Err(CommandError::InvalidArguments(
                "usage: login <email> [--password <secret>]".into(),
            ))
        }
    };
    let password = match args.get("password") {
        Some(password) => password.to_string(),
        None if context.can_prompt() => io::prompt_password(context.theme(), "Password")?,
        None => {
            return Err(CommandError::InvalidArguments(
                "pass `--password` when running a script".into(),
            ))
        }
    };

    let user = context.api.login(email.trim(), &password)?;

    // Drop a remembered company the new user cannot see.
    let scope = Scope::new(&user);
    if let Some(company_id) = context.company_id {
        if scope.ensure_company(company_id).is_err() {
            context.company_id = None;
            context.location_id = None;
        }
    }

    io::print_success(format!("Signed in as {}.", user.name));
    match scope.resolve_company(context.company_id) {
        Ok(company_id) => {
            if let Some(company) = user.company(company_id) {
                io::print_info(format!("Working in {}.", company.name));
            }
        }
        Err(_) => io::print_warning("No company is assigned to this user."),
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.api.session().is_signed_in()? {
        io::print_info("Not signed in.");
        return Ok(());
    }
    context.api.logout()?;
    context.company_id = context.config.default_company_id;
    context.location_id = context.config.default_location_id;
    io::print_success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let user = context.require_user()?;
    output_section(&user.name);
    if let Some(email) = &user.email {
        io::print_info(format!("  Email         : {}", email));
    }
    let types: Vec<String> = user.voucher_types.iter().map(|t| t.to_string()).collect();
    io::print_info(format!(
        "  Voucher types : {}",
        if types.is_empty() { "none".to_string() } else { types.join(", ") }
    ));

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Company"),
        TableColumn::left("Locations"),
    ]);
    for company in &user.companies {
        let locations: Vec<String> = company
            .locations
            .iter()
            .map(|location| format!("{} ({})", location.name, location.id))
            .collect();
        table.push([company.id.to_string(), company.name.clone(), locations.join(", ")]);
    }
    block(&table.render());
    Ok(())
}
