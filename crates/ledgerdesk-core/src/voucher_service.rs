//! Client-side checks for cash, bank, journal and contra vouchers.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerdesk_domain::{
    ChartOfAccount, EntityId, JournalDetail, JournalEntry, ReverseEntryRequest, VoucherState,
    VoucherType,
};

use crate::error::{CoreError, CoreResult, ValidationErrors};

/// Debit and credit totals of a voucher being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoucherTotals {
    pub debit: Decimal,
    pub credit: Decimal,
    /// `debit - credit`; positive means a credit line is missing.
    pub difference: Decimal,
}

impl VoucherTotals {
    pub fn of(entry: &JournalEntry) -> Self {
        let debit = entry.total_debit();
        let credit = entry.total_credit();
        Self {
            debit,
            credit,
            difference: debit - credit,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero() && !self.debit.is_zero()
    }
}

pub struct VoucherService;

impl VoucherService {
    pub fn totals(entry: &JournalEntry) -> VoucherTotals {
        VoucherTotals::of(entry)
    }

    /// Shape checks that need no account data.
    pub fn validate_structure(entry: &JournalEntry) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        errors.check(entry.currency.trim().is_empty(), "currency", "Currency is required");
        errors.check(
            entry.exchange_rate <= Decimal::ZERO,
            "exchangeRate",
            "Exchange rate must be greater than zero",
        );
        errors.check(
            entry.details.len() < 2,
            "details",
            "A voucher needs at least two lines",
        );

        for (index, line) in entry.details.iter().enumerate() {
            let field = format!("details[{}]", index);
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                errors.push(&field, "Amounts cannot be negative");
            } else if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
                errors.push(&field, "A line is either a debit or a credit, not both");
            } else if line.debit.is_zero() && line.credit.is_zero() {
                errors.push(&field, "Enter a debit or a credit amount");
            }
        }

        let totals = VoucherTotals::of(entry);
        if totals.debit.is_zero() {
            errors.push("details", "Voucher total cannot be zero");
        } else if !totals.difference.is_zero() {
            errors.push(
                "details",
                format!(
                    "Debit {} and credit {} differ by {}",
                    totals.debit,
                    totals.credit,
                    totals.difference.abs()
                ),
            );
        }
        errors
    }

    /// Account lookups plus the rules specific to each voucher type.
    pub fn validate_accounts(entry: &JournalEntry, accounts: &[ChartOfAccount]) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        let by_id: HashMap<EntityId, &ChartOfAccount> = accounts
            .iter()
            .filter_map(|account| account.id.map(|id| (id, account)))
            .collect();

        let mut resolved: Vec<(&JournalDetail, &ChartOfAccount)> = Vec::new();
        for (index, line) in entry.details.iter().enumerate() {
            let field = format!("details[{}].coaId", index);
            match by_id.get(&line.coa_id).copied() {
                None => errors.push(field, format!("Account {} does not exist", line.coa_id)),
                Some(account) if account.is_group => errors.push(
                    field,
                    format!("{} is a group account and cannot be posted to", account.code),
                ),
                Some(account) if !account.is_active => {
                    errors.push(field, format!("{} is inactive", account.code))
                }
                Some(account) => resolved.push((line, account)),
            }
        }

        match entry.voucher_type {
            VoucherType::Cash => errors.check(
                !resolved.iter().any(|(_, account)| account.is_cash),
                "details",
                "A cash voucher needs a line on a cash account",
            ),
            VoucherType::Bank => errors.check(
                !entry.details.iter().any(|line| line.bank_account_id.is_some()),
                "details",
                "A bank voucher needs a line with a bank account",
            ),
            VoucherType::Contra => {
                errors.check(
                    resolved.iter().any(|(_, account)| !account.is_liquid()),
                    "details",
                    "Contra lines must all be cash or bank accounts",
                );
                let has_debit = entry.details.iter().any(|line| line.debit > Decimal::ZERO);
                let has_credit = entry.details.iter().any(|line| line.credit > Decimal::ZERO);
                errors.check(
                    !(has_debit && has_credit),
                    "details",
                    "A contra voucher moves funds: it needs a debit and a credit",
                );
            }
            VoucherType::Journal => {}
        }
        errors
    }

    pub fn validate(entry: &JournalEntry, accounts: &[ChartOfAccount]) -> CoreResult<()> {
        let mut errors = Self::validate_structure(entry);
        errors.extend(Self::validate_accounts(entry, accounts));
        errors.into_result()
    }

    /// The line that would close the current difference, posted to `coa_id`.
    pub fn balancing_line(entry: &JournalEntry, coa_id: EntityId) -> Option<JournalDetail> {
        let difference = VoucherTotals::of(entry).difference;
        if difference > Decimal::ZERO {
            Some(JournalDetail::credit(coa_id, difference))
        } else if difference < Decimal::ZERO {
            Some(JournalDetail::debit(coa_id, -difference))
        } else {
            None
        }
    }

    pub fn ensure_postable(entry: &JournalEntry) -> CoreResult<EntityId> {
        let id = entry
            .id
            .ok_or_else(|| CoreError::InvalidOperation("Voucher has not been saved yet".into()))?;
        if entry.state != VoucherState::Draft {
            return Err(CoreError::InvalidOperation(format!(
                "Only draft vouchers can be posted; this one is {}",
                entry.state
            )));
        }
        Ok(id)
    }

    pub fn reversal_request(
        entry: &JournalEntry,
        reversal_date: NaiveDate,
        reason: &str,
        reversed_by: Option<EntityId>,
    ) -> CoreResult<ReverseEntryRequest> {
        let voucher_id = entry
            .id
            .ok_or_else(|| CoreError::InvalidOperation("Voucher has not been saved yet".into()))?;
        if entry.state != VoucherState::Posted {
            return Err(CoreError::InvalidOperation(format!(
                "Only posted vouchers can be reversed; this one is {}",
                entry.state
            )));
        }
        let mut errors = ValidationErrors::default();
        errors.check(reason.trim().is_empty(), "reason", "A reversal reason is required");
        errors.check(
            reversal_date < entry.date,
            "reversalDate",
            format!("Reversal date cannot be before the voucher date {}", entry.date),
        );
        errors.into_result()?;
        Ok(ReverseEntryRequest {
            voucher_id,
            reversal_date,
            reason: reason.trim().to_string(),
            reversed_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_domain::AccountType;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    fn account(id: EntityId, code: &str) -> ChartOfAccount {
        let mut account = ChartOfAccount::new(code, code, AccountType::Asset);
        account.id = Some(id);
        account
    }

    fn accounts() -> Vec<ChartOfAccount> {
        let mut cash = account(1, "1101");
        cash.is_cash = true;
        let mut bank = account(2, "1102");
        bank.is_bank = true;
        let mut expense = account(3, "5101");
        expense.account_type = AccountType::Expense;
        let group = account(4, "11").group();
        vec![cash, bank, expense, group]
    }

    fn entry(voucher_type: VoucherType) -> JournalEntry {
        JournalEntry::new(voucher_type, date(10), 1, 1, "USD")
    }

    #[test]
    fn balanced_journal_passes() {
        let voucher = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(3, Decimal::new(100, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(100, 0)));
        assert!(VoucherTotals::of(&voucher).is_balanced());
        assert!(VoucherService::validate(&voucher, &accounts()).is_ok());
    }

    #[test]
    fn unbalanced_voucher_reports_difference() {
        let voucher = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(3, Decimal::new(100, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(60, 0)));
        let err = VoucherService::validate(&voucher, &accounts()).unwrap_err();
        assert!(err.to_string().contains("differ by 40"));
    }

    #[test]
    fn zero_voucher_is_not_balanced() {
        let voucher = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(3, Decimal::ZERO))
            .with_line(JournalDetail::credit(2, Decimal::ZERO));
        assert!(!VoucherTotals::of(&voucher).is_balanced());
        let errors = VoucherService::validate_structure(&voucher);
        assert!(errors.has_field("details[0]"));
        assert!(errors.has_field("details"));
    }

    #[test]
    fn exchange_rate_and_currency_are_checked() {
        let balanced = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(3, Decimal::new(100, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(100, 0)));

        let mut voucher = balanced.clone();
        voucher.exchange_rate = Decimal::ZERO;
        let errors = VoucherService::validate_structure(&voucher);
        assert!(errors.has_field("exchangeRate"));
        assert_eq!(errors.as_slice().len(), 1);

        voucher.exchange_rate = Decimal::new(-5, 1);
        assert!(VoucherService::validate_structure(&voucher).has_field("exchangeRate"));

        let mut voucher = balanced;
        voucher.currency = "  ".into();
        let errors = VoucherService::validate_structure(&voucher);
        assert!(errors.has_field("currency"));
        assert!(!errors.has_field("exchangeRate"));
    }

    #[test]
    fn line_with_both_sides_is_rejected() {
        let mut line = JournalDetail::debit(3, Decimal::new(5, 0));
        line.credit = Decimal::new(5, 0);
        let voucher = entry(VoucherType::Journal)
            .with_line(line)
            .with_line(JournalDetail::credit(2, Decimal::ZERO));
        let errors = VoucherService::validate_structure(&voucher);
        assert!(errors.has_field("details[0]"));
    }

    #[test]
    fn cash_voucher_needs_cash_account() {
        let voucher = entry(VoucherType::Cash)
            .with_line(JournalDetail::debit(3, Decimal::new(50, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(50, 0)));
        assert!(VoucherService::validate(&voucher, &accounts()).is_err());

        let voucher = entry(VoucherType::Cash)
            .with_line(JournalDetail::debit(3, Decimal::new(50, 0)))
            .with_line(JournalDetail::credit(1, Decimal::new(50, 0)));
        assert!(VoucherService::validate(&voucher, &accounts()).is_ok());
    }

    #[test]
    fn bank_voucher_needs_bank_account_reference() {
        let without = entry(VoucherType::Bank)
            .with_line(JournalDetail::debit(3, Decimal::new(50, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(50, 0)));
        assert!(VoucherService::validate(&without, &accounts()).is_err());

        let with = entry(VoucherType::Bank)
            .with_line(JournalDetail::debit(3, Decimal::new(50, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(50, 0)).with_bank_account(9));
        assert!(VoucherService::validate(&with, &accounts()).is_ok());
    }

    #[test]
    fn contra_lines_must_be_liquid() {
        let voucher = entry(VoucherType::Contra)
            .with_line(JournalDetail::debit(1, Decimal::new(20, 0)))
            .with_line(JournalDetail::credit(3, Decimal::new(20, 0)));
        assert!(VoucherService::validate(&voucher, &accounts()).is_err());

        let voucher = entry(VoucherType::Contra)
            .with_line(JournalDetail::debit(1, Decimal::new(20, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(20, 0)));
        assert!(VoucherService::validate(&voucher, &accounts()).is_ok());
    }

    #[test]
    fn group_and_unknown_accounts_are_rejected() {
        let voucher = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(4, Decimal::new(20, 0)))
            .with_line(JournalDetail::credit(99, Decimal::new(20, 0)));
        let errors = VoucherService::validate_accounts(&voucher, &accounts());
        assert!(errors.has_field("details[0].coaId"));
        assert!(errors.has_field("details[1].coaId"));
    }

    #[test]
    fn balancing_line_closes_the_gap() {
        let voucher = entry(VoucherType::Journal)
            .with_line(JournalDetail::debit(3, Decimal::new(75, 0)))
            .with_line(JournalDetail::credit(2, Decimal::new(25, 0)));
        let line = VoucherService::balancing_line(&voucher, 1).unwrap();
        assert_eq!(line.credit, Decimal::new(50, 0));
        assert!(VoucherTotals::of(&voucher.with_line(line)).is_balanced());
    }

    #[test]
    fn posting_requires_saved_draft() {
        let mut voucher = entry(VoucherType::Journal);
        assert!(VoucherService::ensure_postable(&voucher).is_err());
        voucher.id = Some(8);
        assert_eq!(VoucherService::ensure_postable(&voucher).unwrap(), 8);
        voucher.state = VoucherState::Posted;
        assert!(VoucherService::ensure_postable(&voucher).is_err());
    }

    #[test]
    fn reversal_requires_posted_reason_and_valid_date() {
        let mut voucher = entry(VoucherType::Journal);
        voucher.id = Some(8);
        assert!(VoucherService::reversal_request(&voucher, date(11), "typo", None).is_err());

        voucher.state = VoucherState::Posted;
        let err = VoucherService::reversal_request(&voucher, date(9), " ", None).unwrap_err();
        assert!(err.field_errors().len() == 2);

        let request = VoucherService::reversal_request(&voucher, date(10), " typo ", Some(2)).unwrap();
        assert_eq!(request.voucher_id, 8);
        assert_eq!(request.reason, "typo");
    }
}
