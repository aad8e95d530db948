//! Executive dashboard figures returned by `/api/dashboard/*`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FundKind {
    Cash,
    Bank,
}

impl fmt::Display for FundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundKind::Cash => f.write_str("Cash"),
            FundKind::Bank => f.write_str("Bank"),
        }
    }
}

/// Current balance of one cash or bank account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundPosition {
    pub account: String,
    pub kind: FundKind,
    pub balance: Decimal,
}

impl Amounted for FundPosition {
    fn amount(&self) -> Decimal {
        self.balance
    }
}

/// One month of an income/expense/profit series. `month` is `YYYY-MM`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFigure {
    pub month: String,
    pub amount: Decimal,
}

impl Amounted for MonthlyFigure {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdownItem {
    pub category: String,
    pub amount: Decimal,
}

impl Amounted for CostBreakdownItem {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Which monthly series a dashboard endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSeries {
    Income,
    Expense,
    GrossProfit,
    NetProfit,
}

impl DashboardSeries {
    pub fn endpoint(self) -> &'static str {
        match self {
            DashboardSeries::Income => "getIncomeData",
            DashboardSeries::Expense => "getExpenseData",
            DashboardSeries::GrossProfit => "getGPData",
            DashboardSeries::NetProfit => "getNPData",
        }
    }
}

impl fmt::Display for DashboardSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DashboardSeries::Income => "Income",
            DashboardSeries::Expense => "Expense",
            DashboardSeries::GrossProfit => "Gross profit",
            DashboardSeries::NetProfit => "Net profit",
        };
        f.write_str(label)
    }
}
