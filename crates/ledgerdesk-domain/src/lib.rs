//! ledgerdesk-domain
//!
//! Data shapes exchanged with the accounting API (companies, chart of accounts,
//! vouchers, number series, IOUs, vendor requisitions, dashboard figures).
//! No I/O, no HTTP, no terminal. Only data types and core enums.

pub mod account;
pub mod common;
pub mod company;
pub mod dashboard;
pub mod depreciation;
pub mod iou;
pub mod number_series;
pub mod partner;
pub mod requisition;
pub mod session;
pub mod voucher;

pub use account::*;
pub use common::*;
pub use company::*;
pub use dashboard::*;
pub use depreciation::*;
pub use iou::*;
pub use number_series::*;
pub use partner::*;
pub use requisition::*;
pub use session::*;
pub use voucher::*;
