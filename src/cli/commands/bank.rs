use rust_decimal::Decimal;

use ledgerdesk_domain::{BankAccount, BankAccountPatch, BankAccountType};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::block;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::{money, optional, yes_no};
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "bank <list|add --bank B --name N --number X --coa ID|edit <id> [--bank B] [--name N] [--number X] [--branch B] [--active yes|no]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "bank",
        "Manage bank accounts linked to the ledger",
        USAGE,
        cmd_bank,
    )
    .with_actions(&["list", "add", "edit"])]
}

fn cmd_bank(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_accounts(context, &args),
        "add" => add_account(context, &args),
        "edit" => edit_account(context, &args),
        other => Err(unknown_action("bank", other)),
    }
}

fn list_accounts(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let accounts = context.api.bank_accounts(company_id)?;
    if accounts.is_empty() {
        io::print_info("No bank accounts registered.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Bank"),
        TableColumn::left("Branch"),
        TableColumn::left("Account").max(32),
        TableColumn::left("Number"),
        TableColumn::left("Type"),
        TableColumn::right("Opening"),
        TableColumn::left("Active"),
    ]);
    for account in &accounts {
        table.push([
            optional(account.id),
            account.bank_name.clone(),
            optional(account.branch.as_deref()),
            account.account_name.clone(),
            account.account_number.clone(),
            account.account_type.to_string(),
            money(account.opening_balance),
            yes_no(account.is_active).to_string(),
        ]);
    }
    block(&table.render());
    Ok(())
}

fn add_account(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let account_type = match args.get("type") {
        Some(raw) => BankAccountType::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown bank account type `{}` (current, savings, overdraft, other)",
                raw
            ))
        })?,
        None => BankAccountType::default(),
    };

    let account = BankAccount {
        id: None,
        bank_name: args.require("bank")?.to_string(),
        branch: args.string("branch"),
        account_name: args.require("name")?.to_string(),
        account_number: args.require("number")?.to_string(),
        account_type,
        coa_id: args.required("coa", "a ledger account id")?,
        company_id,
        currency: args
            .string("currency")
            .or_else(|| Some(context.currency().to_string())),
        opening_balance: args.decimal("opening")?.unwrap_or(Decimal::ZERO),
        is_active: true,
    };

    let created = context.api.create_bank_account(&account)?;
    io::print_success(format!(
        "Bank account {} at {} registered.",
        created.account_number, created.bank_name
    ));
    Ok(())
}

fn edit_account(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "bank edit <id> [--bank B] [--name N] [--number X]")?;
    let company_id = context.company(args)?;
    let patch = BankAccountPatch {
        bank_name: args.string("bank"),
        branch: args.string("branch"),
        account_name: args.string("name"),
        account_number: args.string("number"),
        is_active: args.boolean("active")?,
    };
    let updated = context.api.update_bank_account(company_id, id, &patch)?;
    io::print_success(format!("Bank account {} updated.", updated.account_number));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;

    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    #[test]
    fn add_validates_the_linked_ledger_account() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, "/api/bank-accounts/get-all-bank-accounts", json!([]))
            .respond(
                Method::Get,
                "/api/chart-of-accounts/get-all-coa",
                json!([
                    { "id": 5, "code": "10102", "name": "City Bank", "accountType": "ASSET", "isBank": true },
                    { "id": 6, "code": "10101", "name": "Petty Cash", "accountType": "ASSET", "isCash": true }
                ]),
            )
            .respond(
                Method::Post,
                "/api/bank-accounts/create-bank-account",
                json!({ "id": 9, "bankName": "City", "accountName": "Ops", "accountNumber": "001-22",
                        "coaId": 5, "companyId": 1 }),
            );

        process_script(
            &mut context,
            &[
                "bank add --bank City --name Ops --number 001-23 --coa 6",
                "bank add --bank City --name Ops --number 001-22 --coa 5 --opening 1500.25",
            ],
        )
        .expect("script");

        let sent = fixture.sent_to(Method::Post, "/api/bank-accounts/create-bank-account");
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["coaId"], 5);
        assert_eq!(body["accountNumber"], "001-22");
        assert_eq!(body["companyId"], 1);
    }

    #[test]
    fn edit_without_changes_sends_nothing() {
        let (mut context, fixture) = signed_in_context();
        process_script(&mut context, &["bank edit 9"]).expect("script");
        assert!(fixture.transport.sent().is_empty());
    }

    fn stored_accounts() -> serde_json::Value {
        json!([
            { "id": 8, "bankName": "City", "accountName": "Payroll", "accountNumber": "001-21",
              "coaId": 5, "companyId": 1 },
            { "id": 9, "bankName": "City", "accountName": "Ops", "accountNumber": "001-22",
              "coaId": 5, "companyId": 1 }
        ])
    }

    fn bank_chart() -> serde_json::Value {
        json!([{ "id": 5, "code": "10102", "name": "City Bank", "accountType": "ASSET", "isBank": true }])
    }

    #[test]
    fn edit_refuses_a_number_held_by_another_account() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, "/api/bank-accounts/get-all-bank-accounts", stored_accounts())
            .respond(Method::Get, "/api/chart-of-accounts/get-all-coa", bank_chart());
        assert!(context.process_line("bank edit 9 --number 00121").is_err());
        assert!(fixture
            .sent_to(Method::Patch, "/api/bank-accounts/update-bank-account/9")
            .is_empty());
    }

    #[test]
    fn edit_sends_only_changed_fields() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, "/api/bank-accounts/get-all-bank-accounts", stored_accounts())
            .respond(Method::Get, "/api/chart-of-accounts/get-all-coa", bank_chart());
        fixture.respond(
            Method::Patch,
            "/api/bank-accounts/update-bank-account/9",
            json!({ "id": 9, "bankName": "City", "accountName": "Ops", "accountNumber": "001-22",
                    "coaId": 5, "companyId": 1, "isActive": false }),
        );
        process_script(&mut context, &["bank edit 9 --active no"]).expect("script");
        let sent = fixture.sent_to(Method::Patch, "/api/bank-accounts/update-bank-account/9");
        assert_eq!(sent[0].body, Some(json!({ "isActive": false })));
    }
}
