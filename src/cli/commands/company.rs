use ledgerdesk_core::Scope;
use ledgerdesk_domain::{CreateCompanyLocation, NewCompany, NewLocation};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::optional;
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "company <list [--all]|create <name> --locations <a,b>|use <id> [location-id]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "company",
        "List, create and switch companies",
        USAGE,
        cmd_company,
    )
    .with_actions(&["list", "create", "use"])]
}

fn cmd_company(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_companies(context, &args),
        "create" => create_company(context, &args),
        "use" => use_company(context, &args),
        other => Err(unknown_action("company", other)),
    }
}

fn list_companies(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let companies = if args.has("all") {
        context.api.companies()?
    } else {
        context.api.permitted_companies()?
    };
    if companies.is_empty() {
        io::print_info("No companies found.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Name"),
        TableColumn::left("Code"),
        TableColumn::left("Currency"),
        TableColumn::left("Locations").max(48),
    ]);
    for company in &companies {
        let marker = if Some(company.id) == context.company_id { "*" } else { "" };
        let locations: Vec<&str> = company.locations.iter().map(|l| l.name.as_str()).collect();
        table.push([
            format!("{}{}", marker, company.id),
            company.name.clone(),
            optional(company.code.as_deref()),
            optional(company.currency.as_deref()),
            locations.join(", "),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn create_company(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let name = args.rest(0).ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: company create <name> --locations <a,b> [--code X] [--currency X]".into(),
        )
    })?;
    let locations: Vec<NewLocation> = args
        .get("locations")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(NewLocation::new)
        .collect();

    let payload = CreateCompanyLocation {
        company: NewCompany {
            code: args.string("code"),
            address: args.string("address"),
            currency: args.string("currency"),
            ..NewCompany::new(name)
        },
        locations,
    };
    let company = context.api.create_company_location(&payload)?;
    io::print_success(format!(
        "Company `{}` created with {} location(s).",
        company.name,
        payload.locations.len()
    ));
    io::print_hint("Sign in again to pick up new company assignments.");
    Ok(())
}

fn use_company(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = require_id(args, 0, "company use <id> [location-id]")?;
    let location_id = match args.positional(1) {
        Some(_) => Some(require_id(args, 1, "company use <id> [location-id]")?),
        None => None,
    };

    let user = context.require_user()?;
    let scope = Scope::new(&user);
    let company = scope.ensure_company(company_id)?;
    let location = match location_id {
        Some(location_id) => Some(scope.ensure_location(company_id, location_id)?),
        None => None,
    };

    context.company_id = Some(company.id);
    context.location_id = location.map(|location| location.id);
    match location {
        Some(location) => io::print_success(format!(
            "Now working in {} / {}.",
            company.name, location.name
        )),
        None => io::print_success(format!("Now working in {}.", company.name)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;

    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    #[test]
    fn use_switches_company_and_location() {
        let (mut context, _fixture) = signed_in_context();
        process_script(&mut context, &["company use 2 21"]).expect("script");
        assert_eq!(context.company_id, Some(2));
        assert_eq!(context.location_id, Some(21));
    }

    #[test]
    fn use_rejects_a_foreign_location() {
        let (mut context, _fixture) = signed_in_context();
        process_script(&mut context, &["company use 2 10"]).expect("script");
        assert_eq!(context.company_id, None);
    }

    #[test]
    fn create_sends_company_and_locations() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(
            Method::Post,
            "/api/company/create-company-location",
            json!({ "data": { "id": 3, "name": "Gamma Ltd", "locations": [] } }),
        );
        process_script(
            &mut context,
            &[r#"company create Gamma Ltd --locations "Main, Depot" --currency EUR"#],
        )
        .expect("script");

        let sent = fixture.sent_to(Method::Post, "/api/company/create-company-location");
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["company"]["name"], "Gamma Ltd");
        assert_eq!(body["company"]["currency"], "EUR");
        assert_eq!(body["locations"][1]["name"], "Depot");
    }
}
