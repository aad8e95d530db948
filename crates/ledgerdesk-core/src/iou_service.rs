//! Employee IOUs (cash advances) and their adjustments.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerdesk_domain::{IouAdjustment, IouRecord, IouStatus};

use crate::error::{CoreError, CoreResult, ValidationErrors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IouSummary {
    pub count: usize,
    pub issued: Decimal,
    pub adjusted: Decimal,
    pub outstanding: Decimal,
    pub open_count: usize,
}

pub struct IouService;

impl IouService {
    /// Amount still owed; never negative.
    pub fn outstanding(iou: &IouRecord) -> Decimal {
        (iou.amount - iou.adjusted_total()).max(Decimal::ZERO)
    }

    pub fn derive_status(iou: &IouRecord) -> IouStatus {
        let adjusted = iou.adjusted_total();
        if adjusted.is_zero() {
            IouStatus::Open
        } else if adjusted >= iou.amount {
            IouStatus::Settled
        } else {
            IouStatus::PartiallyAdjusted
        }
    }

    pub fn validate_new(iou: &IouRecord) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(iou.employee_id <= 0, "employeeId", "Select an employee");
        errors.check(
            iou.amount <= Decimal::ZERO,
            "amount",
            "Amount must be greater than zero",
        );
        if let Some(due) = iou.due_date {
            errors.check(
                due < iou.issue_date,
                "dueDate",
                "Due date cannot be before the issue date",
            );
        }
        errors.into_result()
    }

    pub fn validate_adjustment(iou: &IouRecord, adjustment: &IouAdjustment) -> CoreResult<()> {
        if Self::derive_status(iou) == IouStatus::Settled {
            return Err(CoreError::InvalidOperation(
                "This IOU is already settled".into(),
            ));
        }
        if iou.id.is_some_and(|id| id != adjustment.iou_id) {
            return Err(CoreError::InvalidOperation(
                "Adjustment does not belong to this IOU".into(),
            ));
        }
        let outstanding = Self::outstanding(iou);
        let mut errors = ValidationErrors::default();
        if adjustment.amount <= Decimal::ZERO {
            errors.push("amount", "Amount must be greater than zero");
        } else if adjustment.amount > outstanding {
            errors.push(
                "amount",
                format!("Amount exceeds the outstanding balance of {}", outstanding),
            );
        }
        errors.check(
            adjustment.date < iou.issue_date,
            "date",
            format!("Adjustment cannot be dated before {}", iou.issue_date),
        );
        errors.into_result()
    }

    pub fn overdue(ious: &[IouRecord], today: NaiveDate) -> Vec<&IouRecord> {
        ious.iter()
            .filter(|iou| {
                iou.due_date.is_some_and(|due| due < today) && !Self::outstanding(iou).is_zero()
            })
            .collect()
    }

    pub fn summarize(ious: &[IouRecord]) -> IouSummary {
        ious.iter().fold(IouSummary::default(), |mut summary, iou| {
            summary.count += 1;
            summary.issued += iou.amount;
            summary.adjusted += iou.adjusted_total();
            summary.outstanding += Self::outstanding(iou);
            if Self::derive_status(iou) != IouStatus::Settled {
                summary.open_count += 1;
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_domain::AdjustmentMethod;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn iou(amount: i64) -> IouRecord {
        let mut iou = IouRecord::new(7, 1, Decimal::new(amount, 0), date(1));
        iou.id = Some(3);
        iou
    }

    fn adjustment(amount: i64, day: u32) -> IouAdjustment {
        IouAdjustment {
            id: None,
            iou_id: 3,
            amount: Decimal::new(amount, 0),
            date: date(day),
            method: AdjustmentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn status_follows_adjustments() {
        let mut record = iou(100);
        assert_eq!(IouService::derive_status(&record), IouStatus::Open);
        record.adjustments.push(adjustment(40, 2));
        assert_eq!(IouService::derive_status(&record), IouStatus::PartiallyAdjusted);
        assert_eq!(IouService::outstanding(&record), Decimal::new(60, 0));
        record.adjustments.push(adjustment(60, 3));
        assert_eq!(IouService::derive_status(&record), IouStatus::Settled);
    }

    #[test]
    fn adjustment_cannot_exceed_outstanding() {
        let mut record = iou(100);
        record.adjustments.push(adjustment(70, 2));
        assert!(IouService::validate_adjustment(&record, &adjustment(30, 3)).is_ok());
        let err = IouService::validate_adjustment(&record, &adjustment(31, 3)).unwrap_err();
        assert!(err.to_string().contains("outstanding balance of 30"));
    }

    #[test]
    fn adjustment_before_issue_is_rejected() {
        let record = iou(100);
        let mut early = adjustment(10, 1);
        early.date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(IouService::validate_adjustment(&record, &early).is_err());
    }

    #[test]
    fn overdue_skips_settled() {
        let mut late = iou(50);
        late.due_date = Some(date(5));
        let mut settled = late.clone();
        settled.adjustments.push(adjustment(50, 4));
        let records = vec![late, settled];
        assert_eq!(IouService::overdue(&records, date(10)).len(), 1);
        assert!(IouService::overdue(&records, date(5)).is_empty());
    }

    #[test]
    fn summary_totals() {
        let mut partly = iou(100);
        partly.adjustments.push(adjustment(25, 2));
        let summary = IouService::summarize(&[partly, iou(40)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.issued, Decimal::new(140, 0));
        assert_eq!(summary.outstanding, Decimal::new(115, 0));
        assert_eq!(summary.open_count, 2);
    }
}
