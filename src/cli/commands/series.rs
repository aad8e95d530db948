use ledgerdesk_core::NumberSeriesService;
use ledgerdesk_domain::{Displayable, NumberSeries, NumberSeriesPatch, VoucherType};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{optional, yes_no};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "series <list [--location ID]|add <type> --start N --end N [--prefix P] [--padding N]|edit <id> [--prefix P] [--start N] [--end N] [--active yes|no]|delete <id>|preview <id>>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "series",
        "Voucher numbering windows",
        USAGE,
        cmd_series,
    )
    .with_actions(&["list", "add", "edit", "delete", "preview"])]
}

fn cmd_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_series(context, &args),
        "add" => add_series(context, &args),
        "edit" => edit_series(context, &args),
        "delete" => delete_series(context, &args),
        "preview" => preview_series(context, &args),
        other => Err(unknown_action("series", other)),
    }
}

fn list_series(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let location_id = context.location(args, company_id)?;
    let series = context.api.number_series(company_id, location_id)?;
    if series.is_empty() {
        io::print_info("No number series defined.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Type"),
        TableColumn::right("Location"),
        TableColumn::left("Prefix"),
        TableColumn::right("Start"),
        TableColumn::right("End"),
        TableColumn::right("Current"),
        TableColumn::left("Next"),
        TableColumn::left("Year"),
        TableColumn::left("Active"),
    ]);
    for item in &series {
        let preview = NumberSeriesService::preview(item);
        table.push([
            optional(item.id),
            item.voucher_type.to_string(),
            item.location_id.to_string(),
            item.prefix.clone(),
            item.starting_number.to_string(),
            item.ending_number.to_string(),
            item.current_number.to_string(),
            preview.next_number.unwrap_or_else(|| "exhausted".into()),
            optional(item.fiscal_year.as_deref()),
            yes_no(item.is_active).to_string(),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn add_series(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let raw_type = args.positional(0).ok_or_else(|| {
        CommandError::InvalidArguments(
            "usage: series add <cash|bank|journal|contra> --start N --end N".into(),
        )
    })?;
    let voucher_type = VoucherType::parse(raw_type).ok_or_else(|| {
        CommandError::InvalidArguments(format!("unknown voucher type `{}`", raw_type))
    })?;
    let company_id = context.company(args)?;
    let location_id = context.require_location(args, company_id)?;

    let mut series = NumberSeries::new(
        company_id,
        location_id,
        voucher_type,
        args.required("start", "a whole number")?,
        args.required("end", "a whole number")?,
    );
    if let Some(prefix) = args.string("prefix") {
        series.prefix = prefix;
    }
    if let Some(padding) = args.parsed("padding", "a digit count")? {
        series.padding = padding;
    }
    series.fiscal_year = args.string("fiscal-year");

    let created = context.api.create_series(&series)?;
    let preview = NumberSeriesService::preview(&created);
    io::print_success(format!(
        "{} series {} created.",
        created.voucher_type,
        created.display_label()
    ));
    if let Some(next) = preview.next_number {
        io::print_info(format!("Next number: {}", next));
    }
    Ok(())
}

fn edit_series(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "series edit <id> [--prefix P] [--end N]")?;
    let patch = NumberSeriesPatch {
        prefix: args.string("prefix"),
        starting_number: args.parsed("start", "a whole number")?,
        ending_number: args.parsed("end", "a whole number")?,
        padding: args.parsed("padding", "a digit count")?,
        is_active: args.boolean("active")?,
    };
    if patch == NumberSeriesPatch::default() {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass `--prefix`, `--start`, `--end`, `--padding` or `--active`".into(),
        ));
    }
    let company_id = context.company(args)?;
    let updated = context.api.update_series(company_id, id, &patch)?;
    io::print_success(format!("Series {} updated.", updated.display_label()));
    Ok(())
}

fn delete_series(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "series delete <id>")?;
    let company_id = context.company(args)?;
    if !context.confirm(&format!("Delete number series {}?", id))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    context.api.delete_series(company_id, id)?;
    io::print_success(format!("Series {} deleted.", id));
    Ok(())
}

fn preview_series(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "series preview <id>")?;
    let company_id = context.company(args)?;
    let series = context
        .api
        .number_series(company_id, None)?
        .into_iter()
        .find(|series| series.id == Some(id))
        .ok_or_else(|| CommandError::Message(format!("Number series {} not found.", id)))?;

    let preview = NumberSeriesService::preview(&series);
    match preview.next_number {
        Some(next) => io::print_info(format!(
            "Next number {} ({} left in {}).",
            next,
            preview.remaining,
            series.display_label()
        )),
        None => io::print_warning(format!(
            "Series {} is exhausted; add a new window.",
            series.display_label()
        )),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;

    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    const PATH: &str = "/api/number-series";

    fn existing() -> serde_json::Value {
        json!([{ "id": 4, "companyId": 1, "locationId": 10, "voucherType": "JOURNAL", "prefix": "JV",
                 "startingNumber": 1, "endingNumber": 999, "currentNumber": 12 }])
    }

    #[test]
    fn add_refuses_an_overlapping_window() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, PATH, existing());
        process_script(&mut context, &["series add journal --start 500 --end 1500"]).expect("script");
        assert!(fixture.sent_to(Method::Post, PATH).is_empty());
    }

    #[test]
    fn add_posts_a_new_window_with_the_type_prefix() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, PATH, existing())
            .respond(
                Method::Post,
                PATH,
                json!({ "id": 5, "companyId": 1, "locationId": 10, "voucherType": "JOURNAL", "prefix": "JV",
                        "startingNumber": 1000, "endingNumber": 1999, "currentNumber": 999 }),
            );
        process_script(&mut context, &["series add journal --start 1000 --end 1999"]).expect("script");

        let sent = fixture.sent_to(Method::Post, PATH);
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["prefix"], "JV");
        assert_eq!(body["locationId"], 10);
        assert_eq!(body["padding"], 5);
    }

    #[test]
    fn edit_validates_against_the_stored_series() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, PATH, existing());
        process_script(&mut context, &["series edit 4 --end 10"]).expect("script");
        assert!(fixture.sent_to(Method::Patch, "/api/number-series/4").is_empty());
    }

    #[test]
    fn delete_sends_the_request() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, PATH, existing())
            .respond(Method::Delete, "/api/number-series/4", json!({ "success": true }));
        process_script(&mut context, &["series delete 4", "series delete 5"]).expect("script");
        assert_eq!(fixture.sent_to(Method::Delete, "/api/number-series/4").len(), 1);
        assert!(fixture.sent_to(Method::Delete, "/api/number-series/5").is_empty());
    }
}
