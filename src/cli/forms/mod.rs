//! Interactive multi-step data entry.

pub mod voucher_wizard;

pub use voucher_wizard::{run_voucher_wizard, VoucherDraft, WizardData};

/// Outcome of a form run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}
