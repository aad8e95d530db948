use rust_decimal::Decimal;

use ledgerdesk_core::DepreciationService;
use ledgerdesk_domain::{DepreciationLine, DepreciationMethod, DepreciationScheduleRequest};

use crate::cli::args::ArgMap;
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{date, money, optional};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "depreciation <preview|create> <asset name> --asset ID --expense ID --accumulated ID --cost N --life MONTHS [--salvage N] [--method sl|db] [--rate PCT] [--start D] | depreciation report";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "depreciation",
        "Preview and create asset depreciation schedules",
        USAGE,
        cmd_depreciation,
    )
    .with_actions(&["preview", "create", "report"])]
}

fn cmd_depreciation(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "preview" => preview(context, &args),
        "create" => create(context, &args),
        "report" => report(context, &args),
        other => Err(unknown_action("depreciation", other)),
    }
}

fn schedule_request(
    context: &ShellContext,
    args: &ArgMap<'_>,
) -> Result<DepreciationScheduleRequest, CommandError> {
    let asset_name = args.rest(0).ok_or_else(|| {
        CommandError::InvalidArguments(format!("usage: {}", USAGE))
    })?;
    let method = match args.get("method") {
        Some(raw) => DepreciationMethod::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown method `{}` (straight-line, declining-balance)",
                raw
            ))
        })?,
        None => DepreciationMethod::default(),
    };
    Ok(DepreciationScheduleRequest {
        asset_name,
        asset_coa_id: args.required("asset", "an account id")?,
        expense_coa_id: args.required("expense", "an account id")?,
        accumulated_coa_id: args.required("accumulated", "an account id")?,
        company_id: context.company(args)?,
        cost: args.required("cost", "an amount")?,
        salvage_value: args.decimal("salvage")?.unwrap_or(Decimal::ZERO),
        useful_life_months: args.required("life", "a number of months")?,
        method,
        rate: args.decimal("rate")?,
        start_date: args.date("start")?.unwrap_or_else(|| context.today()),
    })
}

fn render_schedule(context: &ShellContext, request: &DepreciationScheduleRequest, lines: &[DepreciationLine]) {
    output_section(format!(
        "{} ({}, {} months)",
        request.asset_name, request.method, request.useful_life_months
    ));
    let pattern = context.date_format();
    let mut table = Table::new(vec![
        TableColumn::right("Period"),
        TableColumn::left("Date"),
        TableColumn::right("Opening"),
        TableColumn::right("Depreciation"),
        TableColumn::right("Accumulated"),
        TableColumn::right("Closing"),
    ]);
    for line in lines {
        table.push([
            line.period.to_string(),
            date(line.date, pattern),
            money(line.opening_value),
            money(line.depreciation),
            money(line.accumulated),
            money(line.closing_value),
        ]);
    }
    block(&table.render());
    io::print_info(format!(
        "Total depreciation {} over {} period(s).",
        money(DepreciationService::total_depreciation(lines)),
        lines.len()
    ));
}

fn preview(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let request = schedule_request(context, args)?;
    let lines = context.api.preview_depreciation(&request)?;
    render_schedule(context, &request, &lines);
    Ok(())
}

fn create(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let request = schedule_request(context, args)?;
    let lines = context.api.preview_depreciation(&request)?;
    render_schedule(context, &request, &lines);
    if !context.confirm("Create this schedule?")? {
        io::print_info("Nothing created.");
        return Ok(());
    }
    context.api.create_depreciation(&request)?;
    io::print_success(format!("Depreciation schedule for {} created.", request.asset_name));
    Ok(())
}

fn report(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let rows = context.api.depreciation_report(company_id)?;
    if rows.is_empty() {
        io::print_info("No depreciation schedules yet.");
        return Ok(());
    }
    let pattern = context.date_format();
    let mut table = Table::new(vec![
        TableColumn::left("Asset").max(32),
        TableColumn::right("Cost"),
        TableColumn::right("Accumulated"),
        TableColumn::right("Book value"),
        TableColumn::left("Last posted"),
    ]);
    for row in &rows {
        table.push([
            row.asset_name.clone(),
            money(row.cost),
            money(row.accumulated),
            money(row.book_value),
            optional(row.last_posted.map(|posted| date(posted, pattern))),
        ]);
    }
    block(&table.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;

    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    const PREVIEW: &str = "/api/depreciation-schedules/preview-depreciation-schedule";
    const CREATE: &str = "/api/depreciation-schedules/create-depreciation-schedule";
    const ARGS: &str = "Delivery Van --asset 11 --expense 51 --accumulated 12 --cost 1200 --life 2 --start 2024-01-31";

    fn schedule() -> serde_json::Value {
        json!([
            { "period": 1, "date": "2024-01-31", "openingValue": "1200", "depreciation": "600",
              "accumulated": "600", "closingValue": "600" },
            { "period": 2, "date": "2024-02-29", "openingValue": "600", "depreciation": "600",
              "accumulated": "1200", "closingValue": "0" }
        ])
    }

    #[test]
    fn create_previews_then_creates() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Post, PREVIEW, schedule())
            .respond(Method::Post, CREATE, json!({ "success": true }));
        process_script(&mut context, &[format!("depreciation create {}", ARGS).as_str()]).expect("script");

        let created = fixture.sent_to(Method::Post, CREATE);
        assert_eq!(created.len(), 1);
        let body = created[0].body.as_ref().expect("body");
        assert_eq!(body["assetName"], "Delivery Van");
        assert_eq!(body["method"], "STRAIGHT_LINE");
        assert_eq!(body["usefulLifeMonths"], 2);
    }

    #[test]
    fn declining_balance_without_a_rate_is_refused() {
        let (mut context, fixture) = signed_in_context();
        process_script(&mut context, &[format!("depreciation preview {} --method db", ARGS).as_str()])
            .expect("script");
        assert!(fixture.transport.sent().is_empty());
    }

    #[test]
    fn inconsistent_preview_blocks_creation() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(
                Method::Post,
                PREVIEW,
                json!([{ "period": 1, "date": "2024-01-31", "openingValue": "1200", "depreciation": "600",
                         "accumulated": "600", "closingValue": "700" }]),
            )
            .respond(Method::Post, CREATE, json!({ "success": true }));
        process_script(&mut context, &[format!("depreciation create {}", ARGS).as_str()]).expect("script");
        assert!(fixture.sent_to(Method::Post, CREATE).is_empty());
    }
}
