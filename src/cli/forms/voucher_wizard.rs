//! Line-by-line voucher entry with running totals.
//!
//! [`VoucherDraft`] holds the voucher being typed and answers whether it can
//! be saved; [`run_voucher_wizard`] drives it from dialoguer menus. Saving is
//! refused while debits and credits differ.

use rust_decimal::Decimal;

use ledgerdesk_core::{CoaService, VoucherService, VoucherTotals};
use ledgerdesk_domain::{
    BankAccount, ChartOfAccount, Displayable, EntityId, JournalDetail, JournalEntry, VoucherType,
};

use crate::cli::core::{CommandError, ShellContext};
use crate::cli::forms::FormResult;
use crate::cli::io;
use crate::cli::output::{block, section as output_section};
use crate::cli::ui::formatting::{money, money_or_blank};
use crate::cli::ui::table_renderer::{Table, TableColumn};

#[derive(Debug, Clone, PartialEq)]
pub struct VoucherDraft {
    entry: JournalEntry,
}

impl VoucherDraft {
    pub fn new(entry: JournalEntry) -> Self {
        Self { entry }
    }

    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    pub fn lines(&self) -> &[JournalDetail] {
        &self.entry.details
    }

    pub fn add_line(&mut self, line: JournalDetail) {
        self.entry.details.push(line);
    }

    pub fn remove_line(&mut self, index: usize) -> Option<JournalDetail> {
        (index < self.entry.details.len()).then(|| self.entry.details.remove(index))
    }

    pub fn totals(&self) -> VoucherTotals {
        VoucherService::totals(&self.entry)
    }

    /// Adds the line that closes the difference on `coa_id`.
    /// Returns false when the voucher already balances.
    pub fn balance_with(&mut self, coa_id: EntityId) -> bool {
        match VoucherService::balancing_line(&self.entry, coa_id) {
            Some(line) => {
                self.add_line(line);
                true
            }
            None => false,
        }
    }

    /// Reasons the voucher cannot be saved yet, empty when it can.
    pub fn blockers(&self) -> Vec<String> {
        VoucherService::validate_structure(&self.entry)
            .as_slice()
            .iter()
            .map(|error| error.message.clone())
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.totals().is_balanced() && self.blockers().is_empty()
    }

    pub fn into_entry(self) -> JournalEntry {
        self.entry
    }
}

/// Reference data the wizard offers for selection.
#[derive(Debug, Clone, Default)]
pub struct WizardData {
    pub accounts: Vec<ChartOfAccount>,
    pub bank_accounts: Vec<BankAccount>,
}

impl WizardData {
    fn ledger_accounts(&self) -> Vec<&ChartOfAccount> {
        let mut accounts = CoaService::ledger_accounts(&self.accounts);
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    fn account_label(&self, coa_id: EntityId) -> String {
        CoaService::find(&self.accounts, coa_id)
            .map(|account| account.display_label())
            .unwrap_or_else(|| format!("#{}", coa_id))
    }
}

const MENU: [&str; 6] = [
    "Add debit line",
    "Add credit line",
    "Remove a line",
    "Balance the difference",
    "Save voucher",
    "Cancel",
];

#[derive(Debug, Clone, Copy)]
enum Side {
    Debit,
    Credit,
}

pub fn run_voucher_wizard(
    context: &ShellContext,
    entry: JournalEntry,
    data: &WizardData,
) -> Result<FormResult<JournalEntry>, CommandError> {
    let mut draft = VoucherDraft::new(entry);
    loop {
        render_draft(&draft, data);
        let choice = match io::select(context.theme(), "Next step", &MENU, 0)? {
            Some(choice) => choice,
            None => return Ok(FormResult::Cancelled),
        };
        match choice {
            0 => add_line(context, &mut draft, data, Side::Debit)?,
            1 => add_line(context, &mut draft, data, Side::Credit)?,
            2 => remove_line(context, &mut draft, data)?,
            3 => balance(context, &mut draft, data)?,
            4 => {
                if draft.can_submit() {
                    return Ok(FormResult::Completed(draft.into_entry()));
                }
                for reason in draft.blockers() {
                    io::print_warning(reason);
                }
            }
            _ => {
                if draft.lines().is_empty()
                    || io::confirm_action(context.theme(), "Discard this voucher?", false)?
                {
                    return Ok(FormResult::Cancelled);
                }
            }
        }
    }
}

fn render_draft(draft: &VoucherDraft, data: &WizardData) {
    let entry = draft.entry();
    output_section(format!(
        "{} voucher, {}",
        entry.voucher_type, entry.date
    ));
    if draft.lines().is_empty() {
        io::print_info("No lines yet.");
    } else {
        let mut table = Table::new(vec![
            TableColumn::right("#"),
            TableColumn::left("Account").max(40),
            TableColumn::right("Debit"),
            TableColumn::right("Credit"),
            TableColumn::left("Notes").max(30),
        ]);
        for (index, line) in draft.lines().iter().enumerate() {
            table.push([
                (index + 1).to_string(),
                data.account_label(line.coa_id),
                money_or_blank(line.debit),
                money_or_blank(line.credit),
                line.notes.clone().unwrap_or_default(),
            ]);
        }
        block(&table.render());
    }

    let totals = draft.totals();
    let status = if totals.is_balanced() {
        "balanced".to_string()
    } else {
        format!("out by {}", money(totals.difference.abs()))
    };
    io::print_info(format!(
        "Debit {}  Credit {}  ({})",
        money(totals.debit),
        money(totals.credit),
        status
    ));
}

fn pick_account<'a>(
    context: &ShellContext,
    data: &'a WizardData,
    prompt: &str,
) -> Result<Option<&'a ChartOfAccount>, CommandError> {
    let accounts = data.ledger_accounts();
    if accounts.is_empty() {
        io::print_warning("There are no postable accounts. Add some with `coa add`.");
        return Ok(None);
    }
    let labels: Vec<String> = accounts.iter().map(|account| account.display_label()).collect();
    Ok(io::select(context.theme(), prompt, &labels, 0)?.map(|index| accounts[index]))
}

fn add_line(
    context: &ShellContext,
    draft: &mut VoucherDraft,
    data: &WizardData,
    side: Side,
) -> Result<(), CommandError> {
    let Some(account) = pick_account(context, data, "Account")? else {
        return Ok(());
    };
    let Some(coa_id) = account.id else {
        return Ok(());
    };

    let amount: Decimal = io::prompt_parsed(context.theme(), "Amount")?;
    if amount <= Decimal::ZERO {
        io::print_warning("Amount must be greater than zero.");
        return Ok(());
    }
    let mut line = match side {
        Side::Debit => JournalDetail::debit(coa_id, amount),
        Side::Credit => JournalDetail::credit(coa_id, amount),
    };

    if account.is_bank && draft.entry().voucher_type != VoucherType::Journal {
        let banks: Vec<&BankAccount> = data
            .bank_accounts
            .iter()
            .filter(|bank| bank.coa_id == coa_id && bank.is_active)
            .collect();
        if !banks.is_empty() {
            let labels: Vec<String> = banks.iter().map(|bank| bank.display_label()).collect();
            if let Some(index) = io::select(context.theme(), "Bank account", &labels, 0)? {
                if let Some(id) = banks[index].id {
                    line = line.with_bank_account(id);
                }
            }
        }
    }
    line.notes = io::prompt_optional(context.theme(), "Notes (optional)")?;
    draft.add_line(line);
    Ok(())
}

fn remove_line(
    context: &ShellContext,
    draft: &mut VoucherDraft,
    data: &WizardData,
) -> Result<(), CommandError> {
    if draft.lines().is_empty() {
        io::print_info("Nothing to remove.");
        return Ok(());
    }
    let labels: Vec<String> = draft
        .lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let (side, amount) = if line.debit > Decimal::ZERO {
                ("Dr", line.debit)
            } else {
                ("Cr", line.credit)
            };
            format!(
                "{}. {} {} {}",
                index + 1,
                data.account_label(line.coa_id),
                side,
                money(amount)
            )
        })
        .collect();
    if let Some(index) = io::select(context.theme(), "Remove which line?", &labels, 0)? {
        draft.remove_line(index);
    }
    Ok(())
}

fn balance(
    context: &ShellContext,
    draft: &mut VoucherDraft,
    data: &WizardData,
) -> Result<(), CommandError> {
    if draft.totals().difference.is_zero() {
        io::print_info("Debits and credits already match.");
        return Ok(());
    }
    let Some(account) = pick_account(context, data, "Post the difference to")? else {
        return Ok(());
    };
    if let Some(coa_id) = account.id {
        draft.balance_with(coa_id);
    }
    Ok(())
}
