//! Voucher header/line shapes shared by cash, bank, journal and contra entries.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherType {
    Cash,
    Bank,
    Journal,
    Contra,
}

impl VoucherType {
    pub const ALL: [VoucherType; 4] = [
        VoucherType::Cash,
        VoucherType::Bank,
        VoucherType::Journal,
        VoucherType::Contra,
    ];

    /// Short code used as the default number-series prefix.
    pub fn code(self) -> &'static str {
        match self {
            VoucherType::Cash => "CV",
            VoucherType::Bank => "BV",
            VoucherType::Journal => "JV",
            VoucherType::Contra => "CT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" | "cv" => Some(VoucherType::Cash),
            "bank" | "bv" => Some(VoucherType::Bank),
            "journal" | "jv" => Some(VoucherType::Journal),
            "contra" | "ct" => Some(VoucherType::Contra),
            _ => None,
        }
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VoucherType::Cash => "Cash",
            VoucherType::Bank => "Bank",
            VoucherType::Journal => "Journal",
            VoucherType::Contra => "Contra",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherState {
    #[default]
    Draft,
    Posted,
    Reversed,
}

impl VoucherState {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(VoucherState::Draft),
            "posted" => Some(VoucherState::Posted),
            "reversed" => Some(VoucherState::Reversed),
            _ => None,
        }
    }
}

impl fmt::Display for VoucherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VoucherState::Draft => "Draft",
            VoucherState::Posted => "Posted",
            VoucherState::Reversed => "Reversed",
        };
        f.write_str(label)
    }
}

/// Voucher header plus its debit/credit lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_no: Option<String>,
    pub voucher_type: VoucherType,
    pub date: NaiveDate,
    pub company_id: EntityId,
    pub location_id: EntityId,
    pub currency: String,
    #[serde(default = "JournalEntry::default_exchange_rate")]
    pub exchange_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(default)]
    pub state: VoucherState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<EntityId>,
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

impl JournalEntry {
    pub fn new(
        voucher_type: VoucherType,
        date: NaiveDate,
        company_id: EntityId,
        location_id: EntityId,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            voucher_no: None,
            voucher_type,
            date,
            company_id,
            location_id,
            currency: currency.into(),
            exchange_rate: Self::default_exchange_rate(),
            reference: None,
            narration: None,
            state: VoucherState::Draft,
            created_by: None,
            details: Vec::new(),
        }
    }

    pub fn default_exchange_rate() -> Decimal {
        Decimal::ONE
    }

    pub fn with_line(mut self, line: JournalDetail) -> Self {
        self.details.push(line);
        self
    }

    pub fn total_debit(&self) -> Decimal {
        self.details.iter().map(|line| line.debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.details.iter().map(|line| line.credit).sum()
    }
}

impl Identifiable for JournalEntry {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Displayable for JournalEntry {
    fn display_label(&self) -> String {
        let number = self.voucher_no.as_deref().unwrap_or("(unnumbered)");
        format!("{} {} [{}]", self.voucher_type.code(), number, self.state)
    }
}

/// Single debit or credit line of a voucher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub coa_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub debit: Decimal,
    #[serde(default)]
    pub credit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl JournalDetail {
    pub fn debit(coa_id: EntityId, amount: Decimal) -> Self {
        Self::line(coa_id, amount, Decimal::ZERO)
    }

    pub fn credit(coa_id: EntityId, amount: Decimal) -> Self {
        Self::line(coa_id, Decimal::ZERO, amount)
    }

    fn line(coa_id: EntityId, debit: Decimal, credit: Decimal) -> Self {
        Self {
            id: None,
            coa_id,
            partner_id: None,
            bank_account_id: None,
            cost_center: None,
            debit,
            credit,
            notes: None,
        }
    }

    pub fn with_bank_account(mut self, bank_account_id: EntityId) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }

    pub fn with_partner(mut self, partner_id: EntityId) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    /// Signed amount: debits positive, credits negative.
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Payload for `POST /api/journal/reverseEntry`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReverseEntryRequest {
    pub voucher_id: EntityId,
    pub reversal_date: NaiveDate,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversed_by: Option<EntityId>,
}

/// Filters accepted by `GET /api/journal/getJournalDetails`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalQuery {
    pub voucher_type: Option<VoucherType>,
    pub state: Option<VoucherState>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub voucher_id: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn journal_entry_serializes_camel_case() {
        let entry = JournalEntry::new(VoucherType::Journal, date(), 1, 2, "USD")
            .with_line(JournalDetail::debit(10, Decimal::new(500, 0)))
            .with_line(JournalDetail::credit(11, Decimal::new(500, 0)));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["voucherType"], "JOURNAL");
        assert_eq!(value["companyId"], 1);
        assert_eq!(value["details"][0]["coaId"], 10);
        assert!(value.get("voucherNo").is_none());
    }

    #[test]
    fn totals_sum_each_side() {
        let entry = JournalEntry::new(VoucherType::Cash, date(), 1, 2, "USD")
            .with_line(JournalDetail::debit(1, Decimal::new(125, 1)))
            .with_line(JournalDetail::debit(2, Decimal::new(75, 1)))
            .with_line(JournalDetail::credit(3, Decimal::new(20, 0)));
        assert_eq!(entry.total_debit(), Decimal::new(20, 0));
        assert_eq!(entry.total_credit(), Decimal::new(20, 0));
    }

    #[test]
    fn voucher_type_parses_codes_and_names() {
        assert_eq!(VoucherType::parse("ct"), Some(VoucherType::Contra));
        assert_eq!(VoucherType::parse("Bank"), Some(VoucherType::Bank));
        assert_eq!(VoucherType::parse("memo"), None);
    }
}
