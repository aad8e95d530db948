use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places with thousands grouping, e.g. `-12,500.00`.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// Blank for zero, used for the empty side of a debit/credit line.
pub fn money_or_blank(amount: Decimal) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        money(amount)
    }
}

pub fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value),
        None => "-".into(),
    }
}

pub fn date(value: NaiveDate, pattern: &str) -> String {
    value.format(pattern).to_string()
}

pub fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(Decimal::new(1250000, 2)), "12,500.00");
        assert_eq!(money(Decimal::new(999, 0)), "999.00");
        assert_eq!(money(Decimal::new(1234567891, 1)), "123,456,789.10");
    }

    #[test]
    fn money_keeps_the_sign_and_rounds_half_away() {
        assert_eq!(money(Decimal::new(-100005, 3)), "-100.01");
        assert_eq!(money(Decimal::new(-1, 3)), "0.00");
    }

    #[test]
    fn zero_amounts_render_blank_on_voucher_lines() {
        assert_eq!(money_or_blank(Decimal::ZERO), "");
        assert_eq!(money_or_blank(Decimal::new(5, 0)), "5.00");
    }
}
