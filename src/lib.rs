#![doc(test(attr(deny(warnings))))]

//! LedgerDesk is a terminal client for a multi-company accounting API:
//! vouchers, chart of accounts, number series, bank accounts, IOUs, vendor
//! payment requisitions, depreciation schedules and the finance dashboard.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("LedgerDesk tracing initialized.");
    });
}
