use ledgerdesk_domain::{BankAccount, BankAccountPatch, ChartOfAccount};

use crate::error::{CoreError, CoreResult, ValidationErrors};

pub struct BankService;

impl BankService {
    /// Checks a new or edited bank account against the chart and its peers.
    pub fn validate(
        account: &BankAccount,
        existing: &[BankAccount],
        chart: &[ChartOfAccount],
    ) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(account.bank_name.trim().is_empty(), "bankName", "Bank name is required");
        errors.check(
            account.account_name.trim().is_empty(),
            "accountName",
            "Account name is required",
        );
        errors.check(
            account.account_number.trim().is_empty(),
            "accountNumber",
            "Account number is required",
        );

        let number = normalize(&account.account_number);
        let duplicate = existing.iter().any(|other| {
            other.company_id == account.company_id
                && normalize(&other.account_number) == number
                && (account.id.is_none() || other.id != account.id)
        });
        errors.check(
            !number.is_empty() && duplicate,
            "accountNumber",
            "This account number is already registered for the company",
        );

        match chart.iter().find(|coa| coa.id == Some(account.coa_id)) {
            None => errors.push("coaId", "Linked ledger account does not exist"),
            Some(coa) if !coa.is_bank => errors.push(
                "coaId",
                format!("{} is not flagged as a bank account", coa.code),
            ),
            Some(_) => {}
        }
        errors.into_result()
    }

    pub fn validate_patch(patch: &BankAccountPatch) -> CoreResult<()> {
        if patch.is_empty() {
            return Err(CoreError::InvalidOperation("Nothing to update".into()));
        }
        let mut errors = ValidationErrors::default();
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
        errors.check(blank(&patch.bank_name), "bankName", "Bank name cannot be blank");
        errors.check(blank(&patch.account_name), "accountName", "Account name cannot be blank");
        errors.check(
            blank(&patch.account_number),
            "accountNumber",
            "Account number cannot be blank",
        );
        errors.into_result()
    }
}

fn normalize(number: &str) -> String {
    number
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect()
}
