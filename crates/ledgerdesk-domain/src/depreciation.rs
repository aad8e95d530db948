//! Fixed-asset depreciation schedules.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepreciationMethod {
    #[default]
    StraightLine,
    DecliningBalance,
}

impl DepreciationMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "straight-line" | "straight_line" | "sl" => Some(DepreciationMethod::StraightLine),
            "declining-balance" | "declining_balance" | "db" => {
                Some(DepreciationMethod::DecliningBalance)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepreciationMethod::StraightLine => f.write_str("Straight line"),
            DepreciationMethod::DecliningBalance => f.write_str("Declining balance"),
        }
    }
}

/// Payload for both preview and create schedule endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationScheduleRequest {
    pub asset_name: String,
    pub asset_coa_id: EntityId,
    pub expense_coa_id: EntityId,
    pub accumulated_coa_id: EntityId,
    pub company_id: EntityId,
    pub cost: Decimal,
    #[serde(default)]
    pub salvage_value: Decimal,
    pub useful_life_months: u32,
    #[serde(default)]
    pub method: DepreciationMethod,
    /// Annual rate in percent, used by declining balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationLine {
    pub period: u32,
    pub date: NaiveDate,
    pub opening_value: Decimal,
    pub depreciation: Decimal,
    pub accumulated: Decimal,
    pub closing_value: Decimal,
}

impl Amounted for DepreciationLine {
    fn amount(&self) -> Decimal {
        self.depreciation
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationReportRow {
    pub asset_name: String,
    pub cost: Decimal,
    pub accumulated: Decimal,
    pub book_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_posted: Option<NaiveDate>,
}
