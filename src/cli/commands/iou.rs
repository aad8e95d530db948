use ledgerdesk_core::IouService;
use ledgerdesk_domain::{AdjustmentMethod, IouAdjustment, IouRecord, PartnerType};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{date, money, optional};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "iou <list|new --employee ID --amount N [--due D] [--purpose P]|adjust <id> --amount N [--method cash|salary|bank|other]|overdue [--as-of D]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "iou",
        "Employee cash advances and their settlement",
        USAGE,
        cmd_iou,
    )
    .with_actions(&["list", "new", "adjust", "overdue"])]
}

fn cmd_iou(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_ious(context, &args),
        "new" => new_iou(context, &args),
        "adjust" => adjust_iou(context, &args),
        "overdue" => overdue_ious(context, &args),
        other => Err(unknown_action("iou", other)),
    }
}

fn render(context: &ShellContext, ious: &[&IouRecord]) {
    let pattern = context.date_format();
    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Employee").max(28),
        TableColumn::left("Issued"),
        TableColumn::left("Due"),
        TableColumn::right("Amount"),
        TableColumn::right("Outstanding"),
        TableColumn::left("Status"),
        TableColumn::left("Purpose").max(30),
    ]);
    for iou in ious {
        table.push([
            optional(iou.id),
            iou.employee_name.clone(),
            date(iou.issue_date, pattern),
            iou.due_date
                .map(|due| date(due, pattern))
                .unwrap_or_default(),
            money(iou.amount),
            money(IouService::outstanding(iou)),
            iou.status.to_string(),
            iou.purpose.clone().unwrap_or_default(),
        ]);
    }
    block(&table.render());
}

fn list_ious(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let ious = context.api.ious(company_id)?;
    if ious.is_empty() {
        io::print_info("No IOUs recorded.");
        return Ok(());
    }
    let rows: Vec<&IouRecord> = ious.iter().collect();
    render(context, &rows);

    let summary = IouService::summarize(&ious);
    io::print_info(format!(
        "{} IOU(s), {} open. Issued {}, adjusted {}, outstanding {}.",
        summary.count,
        summary.open_count,
        money(summary.issued),
        money(summary.adjusted),
        money(summary.outstanding)
    ));
    Ok(())
}

fn new_iou(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let employee_id = args.required("employee", "an employee id")?;
    let amount = args
        .decimal("amount")?
        .ok_or_else(|| CommandError::InvalidArguments("missing required option `--amount`".into()))?;
    let issue_date = args.date("date")?.unwrap_or_else(|| context.today());

    let employee_name = match args.string("name") {
        Some(name) => name,
        None => context
            .api
            .partners(company_id)?
            .into_iter()
            .find(|partner| {
                partner.id == Some(employee_id) && partner.partner_type == PartnerType::Employee
            })
            .map(|partner| partner.name)
            .ok_or_else(|| {
                CommandError::Message(format!("Employee {} not found.", employee_id))
            })?,
    };

    let iou = IouRecord {
        employee_name,
        due_date: args.date("due")?,
        purpose: args.string("purpose"),
        ..IouRecord::new(employee_id, company_id, amount, issue_date)
    };
    let created = context.api.create_iou(&iou)?;
    io::print_success(format!(
        "IOU of {} issued to {}.",
        money(created.amount),
        created.employee_name
    ));
    Ok(())
}

fn adjust_iou(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "iou adjust <id> --amount N")?;
    let company_id = context.company(args)?;
    let iou = context
        .api
        .ious(company_id)?
        .into_iter()
        .find(|iou| iou.id == Some(id))
        .ok_or_else(|| CommandError::Message(format!("IOU {} not found.", id)))?;

    let method = match args.get("method") {
        Some(raw) => AdjustmentMethod::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown method `{}` (cash, salary, bank, other)",
                raw
            ))
        })?,
        None => AdjustmentMethod::default(),
    };
    let amount = match args.decimal("amount")? {
        Some(amount) => amount,
        // Settle in full when no amount is given.
        None => IouService::outstanding(&iou),
    };
    let adjustment = IouAdjustment {
        id: None,
        iou_id: id,
        amount,
        date: args.date("date")?.unwrap_or_else(|| context.today()),
        method,
        notes: args.string("notes"),
    };

    context.api.adjust_iou(&iou, &adjustment)?;
    let remaining = IouService::outstanding(&iou) - adjustment.amount;
    if remaining.is_zero() {
        io::print_success(format!("IOU {} settled.", id));
    } else {
        io::print_success(format!(
            "Adjusted {} against IOU {}; {} still outstanding.",
            money(adjustment.amount),
            id,
            money(remaining)
        ));
    }
    Ok(())
}

fn overdue_ious(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let as_of = args.date("as-of")?.unwrap_or_else(|| context.today());
    let ious = context.api.ious(company_id)?;
    let overdue = IouService::overdue(&ious, as_of);
    if overdue.is_empty() {
        io::print_success(format!("Nothing overdue as of {}.", as_of));
        return Ok(());
    }
    render(context, &overdue);
    io::print_warning(format!("{} IOU(s) overdue as of {}.", overdue.len(), as_of));
    Ok(())
}
