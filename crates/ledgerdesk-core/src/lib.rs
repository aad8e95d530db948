//! ledgerdesk-core
//!
//! Client-side rules and the typed endpoint client for LedgerDesk.
//! Depends on ledgerdesk-domain. No terminal I/O; HTTP and session persistence
//! are reached only through the [`ApiTransport`] and [`SessionStore`] traits.

pub mod api;
pub mod bank_service;
pub mod coa_service;
pub mod dashboard_service;
pub mod depreciation_service;
pub mod error;
pub mod iou_service;
pub mod memory;
pub mod number_series_service;
pub mod partner_service;
pub mod requisition_service;
pub mod scope;
pub mod session;
pub mod transport;
pub mod voucher_service;

pub use api::{DashboardOverview, ErpApi};
pub use bank_service::*;
pub use coa_service::*;
pub use dashboard_service::*;
pub use depreciation_service::*;
pub use error::{ApiError, CoreError, CoreResult, FieldError, ValidationErrors};
pub use iou_service::*;
pub use number_series_service::*;
pub use partner_service::*;
pub use requisition_service::*;
pub use scope::Scope;
pub use session::{Session, SessionStore, AUTH_TOKEN_KEY, CURRENT_USER_KEY};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, FetchResult, Method};
pub use voucher_service::*;
