//! Aggregations behind the executive dashboard.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use ledgerdesk_domain::{CostBreakdownItem, FundKind, FundPosition, MonthlyFigure};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FundSummary {
    pub cash: Decimal,
    pub bank: Decimal,
    pub total: Decimal,
}

/// One month of revenue against cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitRow {
    pub month: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Percent of revenue; `None` when there was no revenue.
    pub margin: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: Decimal,
}

pub struct DashboardService;

impl DashboardService {
    pub fn fund_summary(positions: &[FundPosition]) -> FundSummary {
        positions
            .iter()
            .fold(FundSummary::default(), |mut summary, position| {
                match position.kind {
                    FundKind::Cash => summary.cash += position.balance,
                    FundKind::Bank => summary.bank += position.balance,
                }
                summary.total += position.balance;
                summary
            })
    }

    pub fn margin(profit: Decimal, revenue: Decimal) -> Option<Decimal> {
        if revenue.is_zero() {
            None
        } else {
            Some((profit / revenue * Decimal::ONE_HUNDRED).round_dp(2))
        }
    }

    /// Aligns two monthly series by `YYYY-MM`; months missing on one side count as zero.
    pub fn merge_series(revenue: &[MonthlyFigure], cost: &[MonthlyFigure]) -> Vec<ProfitRow> {
        let mut months: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
        for figure in revenue {
            months.entry(figure.month.as_str()).or_default().0 += figure.amount;
        }
        for figure in cost {
            months.entry(figure.month.as_str()).or_default().1 += figure.amount;
        }
        months
            .into_iter()
            .map(|(month, (revenue, cost))| {
                let profit = revenue - cost;
                ProfitRow {
                    month: month.to_string(),
                    revenue,
                    cost,
                    profit,
                    margin: Self::margin(profit, revenue),
                }
            })
            .collect()
    }

    /// Percent of total per category at two decimals. Positive amounts sum to exactly 100;
    /// the rounding residue goes to the largest category.
    pub fn cost_shares(items: &[CostBreakdownItem]) -> Vec<CostShare> {
        let total: Decimal = items
            .iter()
            .map(|item| item.amount)
            .filter(|amount| *amount > Decimal::ZERO)
            .sum();

        let mut shares: Vec<CostShare> = items
            .iter()
            .map(|item| {
                let percent = if total.is_zero() || item.amount <= Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    (item.amount / total * Decimal::ONE_HUNDRED).round_dp(2)
                };
                CostShare {
                    category: item.category.clone(),
                    amount: item.amount,
                    percent,
                }
            })
            .collect();

        if !total.is_zero() {
            let assigned: Decimal = shares.iter().map(|share| share.percent).sum();
            let residue = Decimal::ONE_HUNDRED - assigned;
            if let Some(largest) = shares.iter_mut().max_by(|a, b| a.amount.cmp(&b.amount)) {
                largest.percent += residue;
            }
        }
        shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(month: &str, amount: i64) -> MonthlyFigure {
        MonthlyFigure {
            month: month.into(),
            amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn fund_summary_splits_by_kind() {
        let positions = vec![
            FundPosition {
                account: "Petty cash".into(),
                kind: FundKind::Cash,
                balance: Decimal::new(150, 0),
            },
            FundPosition {
                account: "City Bank".into(),
                kind: FundKind::Bank,
                balance: Decimal::new(2000, 0),
            },
        ];
        let summary = DashboardService::fund_summary(&positions);
        assert_eq!(summary.cash, Decimal::new(150, 0));
        assert_eq!(summary.bank, Decimal::new(2000, 0));
        assert_eq!(summary.total, Decimal::new(2150, 0));
    }

    #[test]
    fn merge_aligns_months() {
        let income = vec![month("2024-01", 1000), month("2024-02", 800)];
        let expense = vec![month("2024-02", 200), month("2024-03", 50)];
        let rows = DashboardService::merge_series(&income, &expense);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].month, "2024-02");
        assert_eq!(rows[1].profit, Decimal::new(600, 0));
        assert_eq!(rows[1].margin, Some(Decimal::new(75, 0)));
        assert_eq!(rows[2].margin, None);
    }

    #[test]
    fn cost_shares_sum_to_one_hundred() {
        let items: Vec<CostBreakdownItem> = ["Rent", "Salaries", "Utilities"]
            .iter()
            .map(|category| CostBreakdownItem {
                category: category.to_string(),
                amount: Decimal::new(1, 0),
            })
            .collect();
        let shares = DashboardService::cost_shares(&items);
        let sum: Decimal = shares.iter().map(|share| share.percent).sum();
        assert_eq!(sum, Decimal::ONE_HUNDRED);
        assert_eq!(shares[1].percent, Decimal::new(3333, 2));
    }

    #[test]
    fn cost_shares_of_nothing_are_zero() {
        let items = vec![CostBreakdownItem {
            category: "Rent".into(),
            amount: Decimal::ZERO,
        }];
        let shares = DashboardService::cost_shares(&items);
        assert_eq!(shares[0].percent, Decimal::ZERO);
    }
}
