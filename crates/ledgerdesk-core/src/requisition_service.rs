//! Vendor payment requisition workflow:
//! purchase order, GRN, invoice, approval, payment.

use std::fmt;

use rust_decimal::Decimal;

use ledgerdesk_domain::{
    AdvanceRequest, ApproveInvoiceRequest, CreateInvoiceRequest, PaymentRequisition,
    RequisitionStatus,
};

use crate::error::{CoreError, CoreResult, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequisitionAction {
    CreateAdvance,
    CreateInvoice,
    ApproveInvoice,
    MakePayment,
}

impl RequisitionAction {
    pub const ALL: [RequisitionAction; 4] = [
        RequisitionAction::CreateAdvance,
        RequisitionAction::CreateInvoice,
        RequisitionAction::ApproveInvoice,
        RequisitionAction::MakePayment,
    ];

    pub fn allowed_from(self) -> &'static [RequisitionStatus] {
        match self {
            RequisitionAction::CreateAdvance => &[
                RequisitionStatus::PurchaseOrder,
                RequisitionStatus::GrnCompleted,
            ],
            RequisitionAction::CreateInvoice => &[RequisitionStatus::GrnCompleted],
            RequisitionAction::ApproveInvoice => &[RequisitionStatus::InvoiceCreated],
            RequisitionAction::MakePayment => &[RequisitionStatus::InvoiceApproved],
        }
    }

    /// Status after the action succeeds. Advances leave the status alone.
    pub fn resulting_status(self, current: RequisitionStatus) -> RequisitionStatus {
        match self {
            RequisitionAction::CreateAdvance => current,
            _ => current.next().unwrap_or(current),
        }
    }
}

impl fmt::Display for RequisitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequisitionAction::CreateAdvance => "Create advance",
            RequisitionAction::CreateInvoice => "Create invoice",
            RequisitionAction::ApproveInvoice => "Approve invoice",
            RequisitionAction::MakePayment => "Make payment",
        };
        f.write_str(label)
    }
}

pub struct RequisitionService;

impl RequisitionService {
    pub fn ensure_allowed(
        requisition: &PaymentRequisition,
        action: RequisitionAction,
    ) -> CoreResult<()> {
        if action.allowed_from().contains(&requisition.status) {
            Ok(())
        } else {
            Err(CoreError::InvalidOperation(format!(
                "{} is not possible while the requisition is at {}",
                action, requisition.status
            )))
        }
    }

    pub fn available_actions(requisition: &PaymentRequisition) -> Vec<RequisitionAction> {
        RequisitionAction::ALL
            .into_iter()
            .filter(|action| Self::ensure_allowed(requisition, *action).is_ok())
            .filter(|action| {
                *action != RequisitionAction::CreateAdvance
                    || Self::advance_headroom(requisition) > Decimal::ZERO
            })
            .collect()
    }

    /// How much more can still be advanced against the purchase order.
    pub fn advance_headroom(requisition: &PaymentRequisition) -> Decimal {
        (requisition.purchase_order.amount - requisition.advanced_total()).max(Decimal::ZERO)
    }

    pub fn validate_advance(
        requisition: &PaymentRequisition,
        request: &AdvanceRequest,
    ) -> CoreResult<()> {
        Self::ensure_allowed(requisition, RequisitionAction::CreateAdvance)?;
        let headroom = Self::advance_headroom(requisition);
        let mut errors = ValidationErrors::default();
        if request.amount <= Decimal::ZERO {
            errors.push("amount", "Advance must be greater than zero");
        } else if request.amount > headroom {
            errors.push(
                "amount",
                format!(
                    "Advances cannot exceed the purchase order amount; {} remains",
                    headroom
                ),
            );
        }
        errors.check(
            request.date < requisition.purchase_order.date,
            "date",
            "Advance cannot be dated before the purchase order",
        );
        errors.into_result()
    }

    pub fn validate_invoice(
        requisition: &PaymentRequisition,
        request: &CreateInvoiceRequest,
    ) -> CoreResult<()> {
        Self::ensure_allowed(requisition, RequisitionAction::CreateInvoice)?;
        let mut errors = ValidationErrors::default();
        errors.check(
            request.invoice_number.trim().is_empty(),
            "invoiceNumber",
            "Invoice number is required",
        );
        if request.amount <= Decimal::ZERO {
            errors.push("amount", "Invoice amount must be greater than zero");
        } else if request.amount < requisition.advanced_total() {
            errors.push(
                "amount",
                format!(
                    "Invoice amount is below the {} already advanced",
                    requisition.advanced_total()
                ),
            );
        }
        errors.check(
            request.invoice_date < requisition.purchase_order.date,
            "invoiceDate",
            "Invoice cannot be dated before the purchase order",
        );
        errors.into_result()
    }

    pub fn validate_approval(
        requisition: &PaymentRequisition,
        request: &ApproveInvoiceRequest,
    ) -> CoreResult<()> {
        Self::ensure_allowed(requisition, RequisitionAction::ApproveInvoice)?;
        let invoice = requisition
            .invoice
            .as_ref()
            .ok_or_else(|| CoreError::InvalidOperation("No invoice to approve".into()))?;
        if let (Some(expected), Some(given)) = (invoice.id, request.invoice_id) {
            if expected != given {
                return Err(CoreError::validation(
                    "invoiceId",
                    format!("Invoice {} does not belong to this requisition", given),
                ));
            }
        }
        Ok(())
    }

    /// Invoice amount (or PO amount before invoicing) less advances already paid.
    pub fn payable_amount(requisition: &PaymentRequisition) -> Decimal {
        let gross = requisition
            .invoice
            .as_ref()
            .map(|invoice| invoice.amount)
            .unwrap_or(requisition.purchase_order.amount);
        (gross - requisition.advanced_total()).max(Decimal::ZERO)
    }

    pub fn by_status(
        requisitions: &[PaymentRequisition],
        status: RequisitionStatus,
    ) -> Vec<&PaymentRequisition> {
        requisitions
            .iter()
            .filter(|requisition| requisition.status == status)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerdesk_domain::{Advance, Invoice, PurchaseOrder};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    fn requisition(status: RequisitionStatus) -> PaymentRequisition {
        PaymentRequisition {
            id: 1,
            company_id: 1,
            purchase_order: PurchaseOrder {
                id: 11,
                po_number: "PO-11".into(),
                vendor_id: 5,
                vendor_name: "Globex".into(),
                amount: Decimal::new(1000, 0),
                date: date(1),
            },
            advances: Vec::new(),
            invoice: None,
            status,
        }
    }

    fn advance(amount: i64) -> AdvanceRequest {
        AdvanceRequest {
            requisition_id: 1,
            amount: Decimal::new(amount, 0),
            date: date(3),
            notes: None,
        }
    }

    #[test]
    fn advances_are_capped_at_po_amount() {
        let mut req = requisition(RequisitionStatus::PurchaseOrder);
        req.advances.push(Advance {
            id: Some(1),
            amount: Decimal::new(600, 0),
            date: date(2),
            notes: None,
        });
        assert!(RequisitionService::validate_advance(&req, &advance(400)).is_ok());
        assert!(RequisitionService::validate_advance(&req, &advance(401)).is_err());
    }

    #[test]
    fn advance_not_allowed_after_invoice() {
        let req = requisition(RequisitionStatus::InvoiceCreated);
        let err = RequisitionService::validate_advance(&req, &advance(10)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn invoice_only_after_grn() {
        let request = CreateInvoiceRequest {
            requisition_id: 1,
            invoice_number: "INV-1".into(),
            invoice_date: date(10),
            amount: Decimal::new(1000, 0),
        };
        assert!(RequisitionService::validate_invoice(
            &requisition(RequisitionStatus::PurchaseOrder),
            &request
        )
        .is_err());
        assert!(RequisitionService::validate_invoice(
            &requisition(RequisitionStatus::GrnCompleted),
            &request
        )
        .is_ok());
    }

    #[test]
    fn approval_needs_an_invoice() {
        let mut req = requisition(RequisitionStatus::InvoiceCreated);
        let request = ApproveInvoiceRequest {
            requisition_id: 1,
            invoice_id: Some(4),
            approved_by: 2,
            remarks: None,
        };
        assert!(RequisitionService::validate_approval(&req, &request).is_err());
        req.invoice = Some(Invoice {
            id: Some(4),
            invoice_number: "INV-1".into(),
            invoice_date: date(10),
            amount: Decimal::new(900, 0),
            approved_by: None,
            approved_on: None,
        });
        assert!(RequisitionService::validate_approval(&req, &request).is_ok());
    }

    #[test]
    fn payable_subtracts_advances() {
        let mut req = requisition(RequisitionStatus::InvoiceApproved);
        req.advances.push(Advance {
            id: None,
            amount: Decimal::new(250, 0),
            date: date(2),
            notes: None,
        });
        req.invoice = Some(Invoice {
            id: Some(4),
            invoice_number: "INV-1".into(),
            invoice_date: date(10),
            amount: Decimal::new(900, 0),
            approved_by: Some(2),
            approved_on: Some(date(11)),
        });
        assert_eq!(RequisitionService::payable_amount(&req), Decimal::new(650, 0));
        assert_eq!(
            RequisitionService::available_actions(&req),
            vec![RequisitionAction::MakePayment]
        );
    }

    #[test]
    fn actions_advance_status() {
        assert_eq!(
            RequisitionAction::CreateInvoice.resulting_status(RequisitionStatus::GrnCompleted),
            RequisitionStatus::InvoiceCreated
        );
        assert_eq!(
            RequisitionAction::CreateAdvance.resulting_status(RequisitionStatus::PurchaseOrder),
            RequisitionStatus::PurchaseOrder
        );
    }
}
