use ledgerdesk_core::PartnerService;
use ledgerdesk_domain::{PartnerType, ResPartner};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{optional, yes_no};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "partner <list [--search TERM] [--type T]|add <name> --type T [--email E] [--phone P]|edit <id> [--name N] [--email E] [--active yes|no]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "partner",
        "Customers, vendors and employees",
        USAGE,
        cmd_partner,
    )
    .with_actions(&["list", "add", "edit"])]
}

fn cmd_partner(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_partners(context, &args),
        "add" => add_partner(context, &args),
        "edit" => edit_partner(context, &args),
        other => Err(unknown_action("partner", other)),
    }
}

fn parse_type(raw: &str) -> Result<PartnerType, CommandError> {
    PartnerType::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown partner type `{}` (customer, vendor, employee, other)",
            raw
        ))
    })
}

fn list_partners(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let partner_type = args.get("type").map(parse_type).transpose()?;
    let partners = context.api.partners(company_id)?;
    let matches: Vec<&ResPartner> = PartnerService::search(&partners, args.get("search").unwrap_or(""))
        .into_iter()
        .filter(|partner| partner_type.map_or(true, |t| partner.partner_type == t))
        .collect();
    if matches.is_empty() {
        io::print_info("No partners match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Name").max(36),
        TableColumn::left("Type"),
        TableColumn::left("Email"),
        TableColumn::left("Phone"),
        TableColumn::left("Active"),
    ]);
    for partner in matches {
        table.push([
            optional(partner.id),
            partner.name.clone(),
            partner.partner_type.to_string(),
            optional(partner.email.as_deref()),
            optional(partner.phone.as_deref()),
            yes_no(partner.is_active).to_string(),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn add_partner(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let name = args.rest(0).ok_or_else(|| {
        CommandError::InvalidArguments("usage: partner add <name> --type T".into())
    })?;
    let partner = ResPartner {
        email: args.string("email"),
        phone: args.string("phone"),
        address: args.string("address"),
        tax_id: args.string("tax-id"),
        coa_id: args.id("coa")?,
        ..ResPartner::new(name, parse_type(args.require("type")?)?)
    };

    let company_id = context.company(args)?;
    let created = context.api.create_partner(company_id, partner)?;
    io::print_success(format!(
        "{} `{}` added.",
        created.partner_type, created.name
    ));
    Ok(())
}

fn edit_partner(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "partner edit <id> [--name N] [--email E]")?;
    let company_id = context.company(args)?;
    let partners = context.api.partners(company_id)?;
    let mut partner = partners
        .into_iter()
        .find(|partner| partner.id == Some(id))
        .ok_or_else(|| CommandError::Message(format!("Partner {} not found.", id)))?;

    let before = partner.clone();
    if let Some(name) = args.string("name") {
        partner.name = name;
    }
    if let Some(raw) = args.get("type") {
        partner.partner_type = parse_type(raw)?;
    }
    for (key, field) in [
        ("email", &mut partner.email),
        ("phone", &mut partner.phone),
        ("address", &mut partner.address),
        ("tax-id", &mut partner.tax_id),
    ] {
        if let Some(value) = args.get(key) {
            // An empty value clears the field.
            *field = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        }
    }
    if let Some(active) = args.boolean("active")? {
        partner.is_active = active;
    }
    if partner == before {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass an option such as `--email` or `--active no`".into(),
        ));
    }

    let updated = context.api.update_partner(company_id, &partner)?;
    io::print_success(format!("Partner `{}` updated.", updated.name));
    Ok(())
}
