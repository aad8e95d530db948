//! `--key value` parsing for command arguments.
//!
//! Tokens that start with `--` name an option; the following token is its
//! value unless it is itself an option, in which case the option is a bare
//! flag. Everything else is positional, in order.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerdesk_domain::EntityId;

use crate::cli::core::CommandError;

pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default)]
pub struct ArgMap<'a> {
    positional: Vec<&'a str>,
    options: HashMap<String, Option<&'a str>>,
}

impl<'a> ArgMap<'a> {
    pub fn parse(args: &[&'a str]) -> Self {
        let mut map = ArgMap::default();
        let mut iter = args.iter().copied().peekable();
        while let Some(token) = iter.next() {
            match token.strip_prefix("--") {
                Some(key) if !key.is_empty() => {
                    let value = match iter.peek() {
                        Some(next) if !next.starts_with("--") => iter.next(),
                        _ => None,
                    };
                    map.options.insert(key.to_ascii_lowercase(), value);
                }
                _ => map.positional.push(token),
            }
        }
        map
    }

    pub fn positional(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    /// Positional arguments from `index` on, joined by spaces.
    pub fn rest(&self, index: usize) -> Option<String> {
        let rest = self.positional.get(index..)?;
        (!rest.is_empty()).then(|| rest.join(" "))
    }

    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.options.get(key).copied().flatten()
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn require(&self, key: &str) -> Result<&'a str, CommandError> {
        self.get(key).ok_or_else(|| {
            CommandError::InvalidArguments(format!("missing required option `--{}`", key))
        })
    }

    pub fn parsed<T: FromStr>(&self, key: &str, what: &str) -> Result<Option<T>, CommandError> {
        self.get(key)
            .map(|raw| parse_value(raw, key, what))
            .transpose()
    }

    pub fn required<T: FromStr>(&self, key: &str, what: &str) -> Result<T, CommandError> {
        parse_value(self.require(key)?, key, what)
    }

    pub fn id(&self, key: &str) -> Result<Option<EntityId>, CommandError> {
        self.parsed(key, "a numeric id")
    }

    pub fn decimal(&self, key: &str) -> Result<Option<Decimal>, CommandError> {
        self.parsed(key, "an amount")
    }

    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, CommandError> {
        self.get(key).map(parse_date).transpose()
    }

    /// `--active` alone means true; `--active no` means false.
    pub fn boolean(&self, key: &str) -> Result<Option<bool>, CommandError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(None) => Ok(Some(true)),
            Some(Some(raw)) => parse_bool(raw).map(Some).ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{}` expects yes or no", key))
            }),
        }
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &str, what: &str) -> Result<T, CommandError> {
    raw.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`--{}` expects {}, got `{}`", key, what, raw))
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", raw))
    })
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Some(true),
        "no" | "n" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Positional id such as the `7` in `voucher post 7`.
pub fn require_id(args: &ArgMap<'_>, index: usize, usage: &str) -> Result<EntityId, CommandError> {
    let raw = args
        .positional(index)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a valid id", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_flags_and_positionals_are_separated() {
        let args = ArgMap::parse(&["Petty", "Cash", "--type", "asset", "--group", "--parent", "1"]);
        assert_eq!(args.rest(0).as_deref(), Some("Petty Cash"));
        assert_eq!(args.get("type"), Some("asset"));
        assert_eq!(args.boolean("group").unwrap(), Some(true));
        assert_eq!(args.get("parent"), Some("1"));
        assert!(!args.has("cash"));
    }

    #[test]
    fn typed_getters_report_the_offending_option() {
        let args = ArgMap::parse(&["--amount", "12.5x", "--date", "2024-02-30"]);
        let err = args.decimal("amount").unwrap_err().to_string();
        assert!(err.contains("--amount"));
        assert!(args.date("date").is_err());
        assert!(args.required::<u64>("start", "a number").is_err());
    }

    #[test]
    fn boolean_values_accept_common_spellings() {
        let args = ArgMap::parse(&["--active", "no"]);
        assert_eq!(args.boolean("active").unwrap(), Some(false));
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn positional_ids_must_be_numeric() {
        let args = ArgMap::parse(&["post", "abc"]);
        assert!(require_id(&args, 1, "voucher post <id>").is_err());
        assert!(require_id(&args, 2, "voucher post <id>").is_err());
    }
}
