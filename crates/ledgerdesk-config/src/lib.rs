//! ledgerdesk-config
//!
//! Persistent client preferences: API endpoint, default company and location,
//! display settings. Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, API_URL_ENV, HOME_ENV};
