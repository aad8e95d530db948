//! Employee IOU (loan/advance) records and their repayments.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IouRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub employee_id: EntityId,
    #[serde(default)]
    pub employee_name: String,
    pub company_id: EntityId,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default)]
    pub status: IouStatus,
    #[serde(default)]
    pub adjustments: Vec<IouAdjustment>,
}

impl IouRecord {
    pub fn new(
        employee_id: EntityId,
        company_id: EntityId,
        amount: Decimal,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            employee_id,
            employee_name: String::new(),
            company_id,
            amount,
            issue_date,
            due_date: None,
            purpose: None,
            status: IouStatus::Open,
            adjustments: Vec::new(),
        }
    }

    pub fn adjusted_total(&self) -> Decimal {
        total_of(&self.adjustments)
    }
}

impl Identifiable for IouRecord {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Amounted for IouRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Displayable for IouRecord {
    fn display_label(&self) -> String {
        format!("IOU {} for {} [{}]", self.amount, self.employee_name, self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IouAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub iou_id: EntityId,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub method: AdjustmentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Amounted for IouAdjustment {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdjustmentMethod {
    #[default]
    Cash,
    Salary,
    Bank,
    Other,
}

impl AdjustmentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(AdjustmentMethod::Cash),
            "salary" | "payroll" => Some(AdjustmentMethod::Salary),
            "bank" => Some(AdjustmentMethod::Bank),
            "other" => Some(AdjustmentMethod::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IouStatus {
    #[default]
    Open,
    PartiallyAdjusted,
    Settled,
}

impl fmt::Display for IouStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IouStatus::Open => "Open",
            IouStatus::PartiallyAdjusted => "Partially adjusted",
            IouStatus::Settled => "Settled",
        };
        f.write_str(label)
    }
}
