//! Chart of accounts and bank accounts.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// General-ledger account in the hierarchical chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOfAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_cash: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_bank: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<EntityId>,
}

impl ChartOfAccount {
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            account_type,
            parent_code: None,
            parent_id: None,
            level: 0,
            is_group: false,
            is_cash: false,
            is_bank: false,
            is_active: true,
            company_id: None,
        }
    }

    pub fn group(mut self) -> Self {
        self.is_group = true;
        self
    }

    pub fn with_parent(mut self, parent: &ChartOfAccount) -> Self {
        self.parent_code = Some(parent.code.clone());
        self.parent_id = parent.id;
        self.level = parent.level + 1;
        self
    }

    /// Cash and bank accounts are the only valid legs of a contra voucher.
    pub fn is_liquid(&self) -> bool {
        self.is_cash || self.is_bank
    }
}

impl Identifiable for ChartOfAccount {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl NamedEntity for ChartOfAccount {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for ChartOfAccount {
    fn display_label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Income,
        AccountType::Expense,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asset" | "assets" => Some(AccountType::Asset),
            "liability" | "liabilities" => Some(AccountType::Liability),
            "equity" => Some(AccountType::Equity),
            "income" | "revenue" => Some(AccountType::Income),
            "expense" | "expenses" => Some(AccountType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Equity => "Equity",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub account_name: String,
    pub account_number: String,
    #[serde(default)]
    pub account_type: BankAccountType,
    pub coa_id: EntityId,
    pub company_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Identifiable for BankAccount {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Displayable for BankAccount {
    fn display_label(&self) -> String {
        format!("{} - {}", self.bank_name, self.account_number)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankAccountType {
    #[default]
    Current,
    Savings,
    Overdraft,
    Other,
}

impl BankAccountType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "current" => Some(BankAccountType::Current),
            "savings" | "saving" => Some(BankAccountType::Savings),
            "overdraft" | "od" => Some(BankAccountType::Overdraft),
            "other" => Some(BankAccountType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for BankAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BankAccountType::Current => "Current",
            BankAccountType::Savings => "Savings",
            BankAccountType::Overdraft => "Overdraft",
            BankAccountType::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Partial update for `PATCH /api/bank-accounts/...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl BankAccountPatch {
    pub fn is_empty(&self) -> bool {
        self.bank_name.is_none()
            && self.branch.is_none()
            && self.account_name.is_none()
            && self.account_number.is_none()
            && self.is_active.is_none()
    }

    pub fn apply_to(&self, account: &BankAccount) -> BankAccount {
        let mut updated = account.clone();
        if let Some(bank_name) = &self.bank_name {
            updated.bank_name = bank_name.clone();
        }
        if let Some(branch) = &self.branch {
            updated.branch = Some(branch.clone()).filter(|branch| !branch.trim().is_empty());
        }
        if let Some(account_name) = &self.account_name {
            updated.account_name = account_name.clone();
        }
        if let Some(account_number) = &self.account_number {
            updated.account_number = account_number.clone();
        }
        if let Some(active) = self.is_active {
            updated.is_active = active;
        }
        updated
    }
}
