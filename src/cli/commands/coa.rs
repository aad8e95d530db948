use ledgerdesk_core::CoaService;
use ledgerdesk_domain::{AccountType, ChartOfAccount};

use crate::cli::args::{require_id, ArgMap};
use crate::cli::commands::{split_action, unknown_action};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::ui::formatting::yes_no;
use crate::cli::ui::table_renderer::{Table, TableColumn};

const USAGE: &str = "coa <list [--type T] [--ledger]|tree|add <name> [--parent CODE] [--type T] [--group] [--cash|--bank]|edit <id> [--name N] [--active yes|no]>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "coa",
        "Browse and maintain the chart of accounts",
        USAGE,
        cmd_coa,
    )
    .with_actions(&["list", "tree", "add", "edit"])]
}

fn cmd_coa(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    let args = ArgMap::parse(rest);
    match action.as_str() {
        "list" => list_accounts(context, &args),
        "tree" => show_tree(context, &args),
        "add" => add_account(context, &args),
        "edit" => edit_account(context, &args),
        other => Err(unknown_action("coa", other)),
    }
}

fn parse_type(raw: &str) -> Result<AccountType, CommandError> {
    AccountType::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown account type `{}` (asset, liability, equity, income, expense)",
            raw
        ))
    })
}

fn list_accounts(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let account_type = args.get("type").map(parse_type).transpose()?;
    let mut accounts = context.api.chart_of_accounts(company_id)?;
    accounts.sort_by(|a, b| a.code.cmp(&b.code));

    let ledger_only = args.has("ledger");
    let rows: Vec<&ChartOfAccount> = accounts
        .iter()
        .filter(|account| account_type.map_or(true, |t| account.account_type == t))
        .filter(|account| !ledger_only || (account.is_active && !account.is_group))
        .collect();
    if rows.is_empty() {
        io::print_info("No accounts match.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::right("ID"),
        TableColumn::left("Code"),
        TableColumn::left("Name").max(40),
        TableColumn::left("Type"),
        TableColumn::left("Group"),
        TableColumn::left("Kind"),
        TableColumn::left("Active"),
    ]);
    for account in rows {
        let kind = if account.is_cash {
            "cash"
        } else if account.is_bank {
            "bank"
        } else {
            ""
        };
        table.push([
            account.id.map(|id| id.to_string()).unwrap_or_default(),
            account.code.clone(),
            account.name.clone(),
            account.account_type.to_string(),
            yes_no(account.is_group).to_string(),
            kind.to_string(),
            yes_no(account.is_active).to_string(),
        ]);
    }
    block(&table.render());
    Ok(())
}

/// Tree lines such as `  1101 Cash in Hand`, indented two spaces per level.
pub(crate) fn render_tree(accounts: &[ChartOfAccount]) -> Vec<String> {
    CoaService::build_tree(accounts)
        .iter()
        .flat_map(|root| {
            root.flatten()
                .into_iter()
                .map(|(depth, account)| {
                    let marker = if account.is_group { "+" } else { "-" };
                    let inactive = if account.is_active { "" } else { " (inactive)" };
                    format!(
                        "{}{} {} {}{}",
                        "  ".repeat(depth),
                        marker,
                        account.code,
                        account.name,
                        inactive
                    )
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn show_tree(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let company_id = context.company(args)?;
    let accounts = context.api.chart_of_accounts(company_id)?;
    if accounts.is_empty() {
        io::print_info("The chart of accounts is empty. Start with `coa add Assets --type asset --group`.");
        return Ok(());
    }
    output_section("Chart of accounts");
    block(&render_tree(&accounts).join("\n"));
    Ok(())
}

fn add_account(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let name = args.rest(0).ok_or_else(|| {
        CommandError::InvalidArguments("usage: coa add <name> [--parent CODE] [--type T]".into())
    })?;
    let parent = args.get("parent");
    let account_type = match (args.get("type"), parent) {
        (Some(raw), _) => parse_type(raw)?,
        // Children take the parent's type.
        (None, Some(_)) => AccountType::Asset,
        (None, None) => {
            return Err(CommandError::InvalidArguments(
                "top-level accounts need `--type`".into(),
            ))
        }
    };

    let mut draft = ChartOfAccount::new(String::new(), name, account_type);
    draft.is_group = args.boolean("group")?.unwrap_or(false);
    draft.is_cash = args.boolean("cash")?.unwrap_or(false);
    draft.is_bank = args.boolean("bank")?.unwrap_or(false);

    let company_id = context.company(args)?;
    let created = context.api.create_account(company_id, draft, parent)?;
    io::print_success(format!(
        "Account {} {} created ({}).",
        created.code, created.name, created.account_type
    ));
    Ok(())
}

fn edit_account(context: &mut ShellContext, args: &ArgMap<'_>) -> CommandResult {
    let id = require_id(args, 0, "coa edit <id> [--name N] [--active yes|no]")?;
    let company_id = context.company(args)?;
    let accounts = context.api.chart_of_accounts(company_id)?;
    let mut account = CoaService::find(&accounts, id)
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("Account {} not found.", id)))?;

    let mut changed = false;
    if let Some(name) = args.string("name") {
        account.name = name;
        changed = true;
    }
    for (key, flag) in [
        ("active", &mut account.is_active),
        ("group", &mut account.is_group),
        ("cash", &mut account.is_cash),
        ("bank", &mut account.is_bank),
    ] {
        if let Some(value) = args.boolean(key)? {
            *flag = value;
            changed = true;
        }
    }
    if !changed {
        return Err(CommandError::InvalidArguments(
            "nothing to change; pass `--name` or a flag such as `--active no`".into(),
        ));
    }

    let updated = context.api.update_account(company_id, &account)?;
    io::print_success(format!("Account {} updated.", updated.code));
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use ledgerdesk_core::Method;
    use ledgerdesk_domain::{AccountType, ChartOfAccount};

    use super::render_tree;
    use crate::cli::core::process_script;
    use crate::cli::test_support::signed_in_context;

    const COA_PATH: &str = "/api/chart-of-accounts/get-all-coa";

    fn chart() -> serde_json::Value {
        json!([
            { "id": 1, "code": "1", "name": "Assets", "accountType": "ASSET", "isGroup": true },
            { "id": 2, "code": "101", "name": "Cash", "accountType": "ASSET", "parentCode": "1", "isGroup": true },
            { "id": 3, "code": "10101", "name": "Petty Cash", "accountType": "ASSET", "parentCode": "101", "isCash": true }
        ])
    }

    #[test]
    fn tree_indents_children() {
        let accounts: Vec<ChartOfAccount> = serde_json::from_value(chart()).unwrap();
        let lines = render_tree(&accounts);
        assert_eq!(lines, vec!["+ 1 Assets", "  + 101 Cash", "    - 10101 Petty Cash"]);
    }

    #[test]
    fn add_generates_the_next_child_code() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, COA_PATH, chart())
            .respond(
                Method::Post,
                "/api/chart-of-accounts/create-coa",
                json!({ "code": "10102", "name": "Cash at Till", "accountType": "ASSET" }),
            );

        process_script(&mut context, &["coa add Cash at Till --parent 101"]).expect("script");

        let sent = fixture.sent_to(Method::Post, "/api/chart-of-accounts/create-coa");
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.as_ref().expect("body");
        assert_eq!(body["code"], "10102");
        assert_eq!(body["parentCode"], "101");
        assert_eq!(body["name"], "Cash at Till");
    }

    #[test]
    fn top_level_add_needs_a_type() {
        let (mut context, fixture) = signed_in_context();
        process_script(&mut context, &["coa add Suspense"]).expect("script");
        assert!(fixture.transport.sent().is_empty());
        assert_eq!(AccountType::parse("liabilities"), Some(AccountType::Liability));
    }

    #[test]
    fn edit_patches_the_account() {
        let (mut context, fixture) = signed_in_context();
        fixture
            .respond(Method::Get, COA_PATH, chart())
            .respond(
                Method::Patch,
                "/api/chart-of-accounts/update-coa/3",
                json!({ "id": 3, "code": "10101", "name": "Petty Cash", "accountType": "ASSET", "isActive": false }),
            );
        process_script(&mut context, &["coa edit 3 --active no"]).expect("script");
        let sent = fixture.sent_to(Method::Patch, "/api/chart-of-accounts/update-coa/3");
        assert_eq!(sent[0].body.as_ref().expect("body")["isActive"], false);
    }
}
