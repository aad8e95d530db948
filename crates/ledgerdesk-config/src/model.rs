use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Overrides `api_base_url` when set.
pub const API_URL_ENV: &str = "LEDGERDESK_API_URL";
/// Base directory for configuration, backups and the session file.
pub const HOME_ENV: &str = "LEDGERDESK_HOME";

/// Stores client preferences and the API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_company_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location_id: Option<i64>,
    pub currency: String,
    pub locale: String,
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory for `session.json`. Defaults to the LedgerDesk home.
    pub session_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            default_company_id: None,
            default_location_id: None,
            currency: "USD".into(),
            locale: "en-US".into(),
            date_format: Self::default_date_format(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            session_dir: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 9] = [
        "api_base_url",
        "request_timeout_secs",
        "default_company_id",
        "default_location_id",
        "currency",
        "locale",
        "date_format",
        "ui_color_enabled",
        "session_dir",
    ];

    pub fn default_api_base_url() -> String {
        "http://localhost:8000".into()
    }

    pub fn default_request_timeout_secs() -> u64 {
        30
    }

    pub fn default_date_format() -> String {
        "%Y-%m-%d".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// `LEDGERDESK_HOME`, else `~/.ledgerdesk`.
    pub fn resolve_home() -> PathBuf {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ledgerdesk")
    }

    pub fn resolve_session_dir(&self) -> PathBuf {
        match &self.session_dir {
            Some(path) => path.clone(),
            None => Self::resolve_home(),
        }
    }

    /// Applies overrides from `lookup`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.set("api_base_url", &url)?;
        }
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Sets a single preference from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "api_base_url" => self.api_base_url = normalize_url(value)?,
            "request_timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| invalid(key, "expected a positive number of seconds"))?;
                self.request_timeout_secs = secs;
            }
            "default_company_id" => self.default_company_id = parse_optional_id(key, value)?,
            "default_location_id" => self.default_location_id = parse_optional_id(key, value)?,
            "currency" => {
                if value.len() != 3 || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(invalid(key, "expected a three-letter currency code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "locale" => {
                if value.is_empty() {
                    return Err(invalid(key, "cannot be empty"));
                }
                self.locale = value.to_string();
            }
            "date_format" => {
                if !value.contains('%') {
                    return Err(invalid(key, "expected a strftime pattern such as %Y-%m-%d"));
                }
                self.date_format = value.to_string();
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid(key, "expected on or off")),
                }
            }
            "session_dir" => {
                self.session_dir = if value.is_empty() || value == "default" {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let optional = |value: Option<i64>| value.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
        vec![
            ("api_base_url", self.api_base_url.clone()),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            ("default_company_id", optional(self.default_company_id)),
            ("default_location_id", optional(self.default_location_id)),
            ("currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            ("date_format", self.date_format.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            (
                "session_dir",
                self.resolve_session_dir().display().to_string(),
            ),
        ]
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn normalize_url(value: &str) -> Result<String, ConfigError> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(invalid("api_base_url", "expected an http:// or https:// URL"));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_optional_id(key: &str, value: &str) -> Result<Option<i64>, ConfigError> {
    if value.is_empty() || value == "-" || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| invalid(key, "expected a numeric id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_normalizes_url() {
        let mut config = Config::default();
        config.set("api_base_url", "https://erp.example.com/").unwrap();
        assert_eq!(config.api_base_url, "https://erp.example.com");
        assert!(config.set("api_base_url", "erp.example.com").is_err());
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(matches!(config.set("theme", "dark"), Err(ConfigError::UnknownKey(_))));
        assert!(config.set("currency", "dollars").is_err());
        assert!(config.set("request_timeout_secs", "0").is_err());
        config.set("currency", "eur").unwrap();
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn company_id_can_be_cleared() {
        let mut config = Config::default();
        config.set("default_company_id", "4").unwrap();
        assert_eq!(config.default_company_id, Some(4));
        config.set("default_company_id", "none").unwrap();
        assert_eq!(config.default_company_id, None);
    }

    #[test]
    fn overrides_replace_api_url() {
        let mut config = Config::default();
        config
            .apply_overrides(|key| (key == API_URL_ENV).then(|| "http://10.0.0.5:9000/".to_string()))
            .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
    }
}
