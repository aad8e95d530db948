use rust_decimal::Decimal;

use ledgerdesk_core::{CoaService, Scope, VoucherService};
use ledgerdesk_domain::{
    EntityId, JournalDetail, JournalEntry, JournalQuery, VoucherState, VoucherType,
};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{run_voucher_wizard, FormResult, WizardData};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{date, money, money_or_blank, optional};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "voucher <new [type] [--lines coa:dr:cr,...]|list [--type T] [--state S] [--from D] [--to D]|show <id>|post <id>|reverse <id> --reason R [--date D]>";

const LINES_HELP: &str =
    "`--lines` takes `coa:debit:credit[:bank-account]` items separated by commas, e.g. `5:100:,7::100`";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "voucher",
        "Enter, review, post and reverse vouchers",
        USAGE,
        cmd_voucher,
    )
    .with_actions(&["new", "list", "show", "post", "reverse"])]
}

fn cmd_voucher(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "new" => new_voucher(context, &args),
        "list" => list_vouchers(context, &args),
        "show" => show_voucher(context, &args),
        "post" => post_voucher(context, &args),
        "reverse" => reverse_voucher(context, &args),
        other => Err(unknown_action("voucher", other)),
    }
}

fn parse_voucher_type(raw: &str) -> Result<VoucherType, CommandError> {
    VoucherType::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown voucher type `{}` (cash, bank, journal, contra)",
            raw
        ))
    })
}

fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not an amount", raw)))
}

/// Parses `coa:debit:credit[:bank-account]` items.
pub(crate) fn parse_lines(raw: &str) -> Result<Vec<JournalDetail>, CommandError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let parts: Vec<&str> = item.split(':').collect();
            if !(3..=4).contains(&parts.len()) {
                return Err(CommandError::InvalidArguments(format!(
                    "bad line `{}`; {}",
                    item, LINES_HELP
                )));
            }
            let coa_id: EntityId = parts[0].trim().parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{}` is not an account id", parts[0]))
            })?;
            let mut line = JournalDetail::debit(coa_id, parse_amount(parts[1])?);
            line.credit = parse_amount(parts[2])?;
            if let Some(bank) = parts.get(3).map(|raw| raw.trim()).filter(|raw| !raw.is_empty()) {
                let bank_id = bank.parse().map_err(|_| {
                    CommandError::InvalidArguments(format!("`{}` is not a bank account id", bank))
                })?;
                line = line.with_bank_account(bank_id);
            }
            Ok(line)
        })
        .collect()
}

fn pick_voucher_type(
    context: &ShellContext,
    args: &ArgMap<'_>,
) -> Result<VoucherType, CommandError> {
    if let Some(raw) = args.positional(0) {
        return parse_voucher_type(raw);
    }
    if !context.can_prompt() {
        return Err(CommandError::InvalidArguments(
            "usage: voucher new <cash|bank|journal|contra> --lines ...".into(),
        ));
    }
    let user = context.require_user()?;
    let permitted = Scope::new(&user).voucher_types().to_vec();
    if permitted.is_empty() {
        return Err(CommandError::Message(
            "No voucher types are assigned to you.".into(),
        ));
    }
    io::select(context.theme(), "Voucher type", &permitted, 0)?
        .map(|index| permitted[index])
        .ok_or_else(|| CommandError::Message("Cancelled.".into()))
}

fn new_voucher(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let voucher_type = pick_voucher_type(context, args)?;
    let company_id = context.company(args)?;
    let location_id = context.require_location(args, company_id)?;
    let voucher_date = args.date("date")?.unwrap_or_else(|| context.today());
    let currency = args
        .string("currency")
        .unwrap_or_else(|| context.currency().to_string());

    let mut entry = JournalEntry::new(voucher_type, voucher_date, company_id, location_id, currency);
    entry.narration = args.string("narration");
    entry.reference = args.string("reference");
    if let Some(rate) = args.decimal("rate")? {
        entry.exchange_rate = rate;
    }

    let entry = match args.get("lines") {
        Some(raw) => {
            entry.details = parse_lines(raw)?;
            entry
        }
        None if context.can_prompt() => {
            if entry.narration.is_none() {
                entry.narration = io::prompt_optional(context.theme(), "Narration (optional)")?;
            }
            let data = WizardData {
                accounts: context.api.chart_of_accounts(company_id)?,
                bank_accounts: context.api.bank_accounts(company_id)?,
            };
            match run_voucher_wizard(context, entry, &data)? {
                FormResult::Completed(entry) => entry,
                FormResult::Cancelled => {
                    io::print_info("Voucher discarded.");
                    return Ok(());
                }
            }
        }
        None => return Err(CommandError::InvalidArguments(LINES_HELP.into())),
    };

    let saved = context.api.create_voucher(&entry)?;
    io::print_success(format!(
        "{} voucher {} saved as draft ({}).",
        saved.voucher_type,
        saved.voucher_no.as_deref().unwrap_or("(unnumbered)"),
        money(saved.total_debit())
    ));
    if let Some(id) = saved.id {
        io::print_hint(format!("Post it with `voucher post {}`.", id));
    }
    Ok(())
}

fn list_vouchers(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let location_id = context.location(args, company_id)?;
    let query = JournalQuery {
        voucher_type: args.get("type").map(parse_voucher_type).transpose()?,
        state: args
            .get("state")
            .map(|raw| {
                VoucherState::parse(raw).ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "unknown state `{}` (draft, posted, reversed)",
                        raw
                    ))
                })
            })
            .transpose()?,
        from: args.date("from")?,
        to: args.date("to")?,
        voucher_id: None,
    };
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(CommandError::InvalidArguments(
                "`--from` must not be after `--to`".into(),
            ));
        }
    }

    let vouchers = context.api.journal_details(company_id, location_id, &query)?;
    if vouchers.is_empty() {
        io::print_info("No vouchers match.");
        return Ok(());
    }

    let pattern = context.date_format().to_string();
    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Number"),
        TableColumn::left("Type"),
        TableColumn::left("Date"),
        TableColumn::left("State"),
        TableColumn::right("Amount"),
        TableColumn::left("Narration").max(36),
    ]);
    for voucher in &vouchers {
        table.push([
            optional(voucher.id),
            optional(voucher.voucher_no.as_deref()),
            voucher.voucher_type.to_string(),
            date(voucher.date, &pattern),
            voucher.state.to_string(),
            money(voucher.total_debit()),
            voucher.narration.clone().unwrap_or_default(),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn show_voucher(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "voucher show <id>")?;
    let company_id = context.company(args)?;
    let voucher = context.api.voucher(company_id, id)?;
    let accounts = context.api.chart_of_accounts(company_id)?;

    output_section(format!(
        "{} voucher {}",
        voucher.voucher_type,
        voucher.voucher_no.as_deref().unwrap_or("(unnumbered)")
    ));
    io::print_info(format!("  Date      : {}", date(voucher.date, context.date_format())));
    io::print_info(format!("  State     : {}", voucher.state));
    io::print_info(format!(
        "  Currency  : {} @ {}",
        voucher.currency, voucher.exchange_rate
    ));
    if let Some(reference) = &voucher.reference {
        io::print_info(format!("  Reference : {}", reference));
    }
    if let Some(narration) = &voucher.narration {
        io::print_info(format!("  Narration : {}", narration));
    }

    let mut table = Table::new(vec![
        TableColumn::left("Account").max(40),
        TableColumn::right("Debit"),
        TableColumn::right("Credit"),
        TableColumn::left("Notes").max(30),
    ]);
    for line in &voucher.details {
        let account = CoaService::find(&accounts, line.coa_id)
            .map(|account| format!("{} {}", account.code, account.name))
            .unwrap_or_else(|| format!("#{}", line.coa_id));
        table.push([
            account,
            money_or_blank(line.debit),
            money_or_blank(line.credit),
            line.notes.clone().unwrap_or_default(),
        ]);
    }
    let totals = VoucherService::totals(&voucher);
    table.push([
        "Total".to_string(),
        money(totals.debit),
        money(totals.credit),
        String::new(),
    ]);
    block(&table.render());
    if !totals.difference.is_zero() {
        io::print_warning(format!(
            "Out of balance by {}.",
            money(totals.difference.abs())
        ));
    }
    Ok(())
}

fn post_voucher(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "voucher post <id>")?;
    let company_id = context.company(args)?;
    let voucher = context.api.voucher(company_id, id)?;
    VoucherService::ensure_postable(&voucher)?;
    if !context.confirm(&format!("Post voucher {}?", id))? {
        io::print_info("Nothing posted.");
        return Ok(());
    }
    context.api.post_voucher(&voucher)?;
    io::print_success(format!("Voucher {} posted.", id));
    Ok(())
}

fn reverse_voucher(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "voucher reverse <id> --reason R [--date D]")?;
    let reason = match args.string("reason") {
        Some(reason) => reason,
        None if context.can_prompt() => io::prompt_text(context.theme(), "Reason", None)?,
        None => return Err(CommandError::InvalidArguments("missing required option `--reason`".into())),
    };
    let reversal_date = args.date("date")?.unwrap_or_else(|| context.today());

    let company_id = context.company(args)?;
    let voucher = context.api.voucher(company_id, id)?;
    if !context.confirm(&format!("Reverse voucher {}?", id))? {
        io::print_info("Nothing reversed.");
        return Ok(());
    }
    context.api.reverse_voucher(&voucher, reversal_date, &reason)?;
    io::print_success(format!("Voucher {} reversed on {}.", id, reversal_date));
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use ledgerdesk_core::Method;

    use super::parse_lines;
    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    const DETAILS: &str = "/api/journal/getJournalDetails";

    fn chart() -> serde_json::Value {
        json!([
            { "id": 5, "code": "10101", "name": "Petty Cash", "accountType": "ASSET", "isCash": true },
            { "id": 7, "code": "50101", "name": "Office Supplies", "accountType": "EXPENSE" }
        ])
    }

    #[test]
    fn lines_parse_debits_credits_and_banks() {
        let lines = parse_lines("5:100:, 7::100:3").expect("lines");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].debit, Decimal::new(100, 0));
        assert!(lines[0].credit.is_zero());
        assert_eq!(lines[1].credit, Decimal::new(100, 0));
        assert_eq!(lines[1].bank_account_id, Some(3));

        assert!(parse_lines("5:100").is_err());
        assert!(parse_lines("x:1:").is_err());
    }

    #[test]
    fn unbalanced_voucher_is_not_sent() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, "/api/chart-of-accounts/get-all-coa", chart());
        process_script(
            &mut context,
            &["voucher new journal --date 2024-05-02 --lines 7:100:,5::90"],
        )
        .expect("script");
        assert!(fixture.sent_to(Method::Post, "/api/journal/entry").is_empty());
    }

    #[test]
    fn balanced_cash_voucher_is_saved_with_the_creator() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, "/api/chart-of-accounts/get-all-coa", chart())
            .respond(
                Method::Post,
                "/api/journal/entry",
                json!({ "id": 31, "voucherNo": "CV00001", "voucherType": "CASH", "date": "2024-05-02",
                        "companyId": 1, "locationId": 10, "currency": "USD" }),
            );
        process_script(
            &mut context,
            &[r#"voucher new cash --date 2024-05-02 --lines "7:250.50:,5::250.50" --narration "Stationery""#],
        )
        .expect("script");

        let sent = fixture.sent_to(Method::Post, "/api/journal/entry");
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["voucherType"], "CASH");
        assert_eq!(body["locationId"], 10);
        assert_eq!(body["createdBy"], 42);
        assert_eq!(body["narration"], "Stationery");
        assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn voucher_type_outside_the_users_permissions_is_refused() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, "/api/chart-of-accounts/get-all-coa", chart());
        process_script(
            &mut context,
            &["voucher new contra --date 2024-05-02 --lines 5:10:,5::10"],
        )
        .expect("script");
        assert!(fixture.sent_to(Method::Post, "/api/journal/entry").is_empty());
    }

    #[test]
    fn list_sends_the_filters() {
        let (mut context, fixture) = signed_in_context();
        fixture.respond(Method::Get, DETAILS, json!([]));
        process_script(
            &mut context,
            &["voucher list --type bank --state posted --from 2024-01-01 --to 2024-03-31"],
        )
        .expect("script");

        let sent = fixture.sent_to(Method::Get, DETAILS);
        let query = &sent[0].query;
        assert!(query.contains(&("voucherType".to_string(), "BANK".to_string())));
        assert!(query.contains(&("state".to_string(), "POSTED".to_string())));
        assert!(query.contains(&("from".to_string(), "2024-01-01".to_string())));
        assert!(query.contains(&("companyId".to_string(), "1".to_string())));
    }

    #[test]
    fn post_uses_the_signed_in_user() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(
                Method::Get,
                DETAILS,
                json!([{ "id": 31, "voucherType": "JOURNAL", "date": "2024-05-02", "companyId": 1,
                         "locationId": 10, "currency": "USD", "state": "DRAFT" }]),
            )
            .respond(Method::Post, "/api/journal/postJournal/31/42", json!(null));
        process_script(&mut context, &["voucher post 31"]).expect("script");
        assert_eq!(fixture.sent_to(Method::Post, "/api/journal/postJournal/31/42").len(), 1);
    }

    #[test]
    fn reverse_needs_a_posted_voucher() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(
                Method::Get,
                DETAILS,
                json!([{ "id": 31, "voucherType": "JOURNAL", "date": "2024-05-02", "companyId": 1,
                         "locationId": 10, "currency": "USD", "state": "DRAFT" }]),
            )
            .respond(Method::Post, "/api/journal/reverseEntry", json!(null));
        process_script(&mut context, &["voucher reverse 31 --reason duplicate"]).expect("script");
        assert!(fixture.sent_to(Method::Post, "/api/journal/reverseEntry").is_empty());
    }
}
