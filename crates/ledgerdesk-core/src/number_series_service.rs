//! Document numbering windows per company, location and voucher type.

use ledgerdesk_domain::NumberSeries;

use crate::error::{CoreError, CoreResult, ValidationErrors};

pub const MAX_PADDING: u8 = 12;

/// What the next issued number would look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPreview {
    pub next_number: Option<String>,
    pub remaining: u64,
    pub is_exhausted: bool,
}

pub struct NumberSeriesService;

impl NumberSeriesService {
    pub fn validate(series: &NumberSeries) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(series.prefix.trim().is_empty(), "prefix", "Prefix is required");
        errors.check(
            series.starting_number < 1,
            "startingNumber",
            "Starting number must be at least 1",
        );
        errors.check(
            series.ending_number < series.starting_number,
            "endingNumber",
            "Ending number must be greater than or equal to starting number",
        );
        let floor = series.starting_number.saturating_sub(1);
        errors.check(
            series.current_number < floor || series.current_number > series.ending_number,
            "currentNumber",
            format!(
                "Current number must be between {} and {}",
                floor, series.ending_number
            ),
        );
        errors.check(
            series.padding > MAX_PADDING,
            "padding",
            format!("Padding cannot exceed {} digits", MAX_PADDING),
        );
        errors.into_result()
    }

    pub fn overlaps(a: &NumberSeries, b: &NumberSeries) -> bool {
        a.starting_number <= b.ending_number && b.starting_number <= a.ending_number
    }

    /// Refuses a second active window in the same scope that overlaps `candidate`.
    pub fn ensure_no_conflict(candidate: &NumberSeries, existing: &[NumberSeries]) -> CoreResult<()> {
        if !candidate.is_active {
            return Ok(());
        }
        let clash = existing.iter().find(|other| {
            other.is_active
                && (candidate.id.is_none() || other.id != candidate.id)
                && candidate.same_scope(other)
                && Self::overlaps(candidate, other)
        });
        match clash {
            Some(other) => Err(CoreError::validation(
                "startingNumber",
                format!(
                    "Overlaps active series {} ({}..{})",
                    other.prefix, other.starting_number, other.ending_number
                ),
            )),
            None => Ok(()),
        }
    }

    pub fn format_number(series: &NumberSeries, number: u64) -> String {
        format!(
            "{}{:0width$}",
            series.prefix,
            number,
            width = usize::from(series.padding)
        )
    }

    pub fn preview(series: &NumberSeries) -> SeriesPreview {
        let remaining = series.ending_number.saturating_sub(series.current_number);
        let is_exhausted = remaining == 0;
        let next_number = if is_exhausted {
            None
        } else {
            let next = series.current_number.max(series.starting_number.saturating_sub(1)) + 1;
            Some(Self::format_number(series, next))
        };
        SeriesPreview {
            next_number,
            remaining,
            is_exhausted,
        }
    }
}
