use rust_decimal::Decimal;

use ledgerdesk_domain::{DepreciationLine, DepreciationMethod, DepreciationScheduleRequest};

use crate::error::{CoreError, CoreResult, ValidationErrors};

/// Rounding slack tolerated between server-computed schedule figures.
const SCHEDULE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub struct DepreciationService;

impl DepreciationService {
    pub fn validate(request: &DepreciationScheduleRequest) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(
            request.asset_name.trim().is_empty(),
            "assetName",
            "Asset name is required",
        );
        errors.check(request.cost <= Decimal::ZERO, "cost", "Cost must be greater than zero");
        errors.check(
            request.salvage_value < Decimal::ZERO || request.salvage_value >= request.cost,
            "salvageValue",
            "Salvage value must be zero or more and below cost",
        );
        errors.check(
            request.useful_life_months < 1,
            "usefulLifeMonths",
            "Useful life must be at least one month",
        );
        if request.method == DepreciationMethod::DecliningBalance {
            let valid_rate = request
                .rate
                .is_some_and(|rate| rate > Decimal::ZERO && rate <= Decimal::ONE_HUNDRED);
            errors.check(
                !valid_rate,
                "rate",
                "Declining balance needs a rate above 0 and at most 100",
            );
        }
        let ids = [
            request.asset_coa_id,
            request.expense_coa_id,
            request.accumulated_coa_id,
        ];
        errors.check(
            ids[0] == ids[1] || ids[0] == ids[2] || ids[1] == ids[2],
            "expenseCoaId",
            "Asset, expense and accumulated accounts must be different",
        );
        errors.into_result()
    }

    /// Sanity checks a previewed schedule before it is shown or created.
    pub fn check_schedule(
        request: &DepreciationScheduleRequest,
        lines: &[DepreciationLine],
    ) -> CoreResult<()> {
        if lines.len() > request.useful_life_months as usize {
            return Err(CoreError::InvalidOperation(format!(
                "Schedule has {} periods for a {} month life",
                lines.len(),
                request.useful_life_months
            )));
        }
        let mut previous_accumulated = Decimal::ZERO;
        for (index, line) in lines.iter().enumerate() {
            let expected_period = index as u32 + 1;
            if line.period != expected_period {
                return Err(inconsistent(line.period, "periods are not consecutive"));
            }
            if line.depreciation < Decimal::ZERO {
                return Err(inconsistent(line.period, "depreciation is negative"));
            }
            if (line.opening_value - line.depreciation - line.closing_value).abs() > SCHEDULE_TOLERANCE {
                return Err(inconsistent(line.period, "closing value does not follow"));
            }
            if line.closing_value + SCHEDULE_TOLERANCE < request.salvage_value {
                return Err(inconsistent(line.period, "book value drops below salvage"));
            }
            if line.accumulated + SCHEDULE_TOLERANCE < previous_accumulated {
                return Err(inconsistent(line.period, "accumulated depreciation decreases"));
            }
            previous_accumulated = line.accumulated;
        }
        Ok(())
    }

    pub fn total_depreciation(lines: &[DepreciationLine]) -> Decimal {
        ledgerdesk_domain::total_of(lines)
    }
}

fn inconsistent(period: u32, what: &str) -> CoreError {
    CoreError::InvalidOperation(format!("Schedule period {}: {}", period, what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> DepreciationScheduleRequest {
        DepreciationScheduleRequest {
            asset_name: "Delivery van".into(),
            asset_coa_id: 1,
            expense_coa_id: 2,
            accumulated_coa_id: 3,
            company_id: 1,
            cost: Decimal::new(1200, 0),
            salvage_value: Decimal::new(200, 0),
            useful_life_months: 2,
            method: DepreciationMethod::StraightLine,
            rate: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn line(period: u32, opening: i64, dep: i64) -> DepreciationLine {
        DepreciationLine {
            period,
            date: NaiveDate::from_ymd_opt(2024, period, 28).unwrap(),
            opening_value: Decimal::new(opening, 0),
            depreciation: Decimal::new(dep, 0),
            accumulated: Decimal::new(1200 - opening + dep, 0),
            closing_value: Decimal::new(opening - dep, 0),
        }
    }

    #[test]
    fn salvage_must_be_below_cost() {
        let mut invalid = request();
        invalid.salvage_value = invalid.cost;
        assert!(DepreciationService::validate(&invalid).is_err());
        assert!(DepreciationService::validate(&request()).is_ok());
    }

    #[test]
    fn declining_balance_needs_rate() {
        let mut declining = request();
        declining.method = DepreciationMethod::DecliningBalance;
        assert!(DepreciationService::validate(&declining).is_err());
        declining.rate = Some(Decimal::new(20, 0));
        assert!(DepreciationService::validate(&declining).is_ok());
        declining.rate = Some(Decimal::new(101, 0));
        assert!(DepreciationService::validate(&declining).is_err());
    }

    #[test]
    fn consistent_schedule_passes() {
        let lines = vec![line(1, 1200, 500), line(2, 700, 500)];
        assert!(DepreciationService::check_schedule(&request(), &lines).is_ok());
        assert_eq!(DepreciationService::total_depreciation(&lines), Decimal::new(1000, 0));
    }

    #[test]
    fn schedule_below_salvage_is_flagged() {
        let lines = vec![line(1, 1200, 500), line(2, 700, 600)];
        let err = DepreciationService::check_schedule(&request(), &lines).unwrap_err();
        assert!(err.to_string().contains("below salvage"));
    }
}
