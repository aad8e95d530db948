//! Vendor payment workflow: purchase orders, invoices, advances, requisitions.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// Lifecycle of a vendor payment, in workflow order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequisitionStatus {
    #[serde(rename = "PURCHASE_ORDER", alias = "Purchase Order")]
    PurchaseOrder,
    #[serde(rename = "GRN_COMPLETED", alias = "GRN Completed")]
    GrnCompleted,
    #[serde(rename = "INVOICE_CREATED", alias = "Invoice Created")]
    InvoiceCreated,
    #[serde(rename = "INVOICE_APPROVED", alias = "Invoice Approved")]
    InvoiceApproved,
    #[serde(rename = "PAYMENT_MADE", alias = "Payment Made")]
    PaymentMade,
}

impl RequisitionStatus {
    pub const ORDER: [RequisitionStatus; 5] = [
        RequisitionStatus::PurchaseOrder,
        RequisitionStatus::GrnCompleted,
        RequisitionStatus::InvoiceCreated,
        RequisitionStatus::InvoiceApproved,
        RequisitionStatus::PaymentMade,
    ];

    /// The status that follows this one, `None` once payment is made.
    pub fn next(self) -> Option<Self> {
        match self {
            RequisitionStatus::PurchaseOrder => Some(RequisitionStatus::GrnCompleted),
            RequisitionStatus::GrnCompleted => Some(RequisitionStatus::InvoiceCreated),
            RequisitionStatus::InvoiceCreated => Some(RequisitionStatus::InvoiceApproved),
            RequisitionStatus::InvoiceApproved => Some(RequisitionStatus::PaymentMade),
            RequisitionStatus::PaymentMade => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "purchaseorder" | "po" => Some(RequisitionStatus::PurchaseOrder),
            "grncompleted" | "grn" => Some(RequisitionStatus::GrnCompleted),
            "invoicecreated" => Some(RequisitionStatus::InvoiceCreated),
            "invoiceapproved" | "approved" => Some(RequisitionStatus::InvoiceApproved),
            "paymentmade" | "paid" => Some(RequisitionStatus::PaymentMade),
            _ => None,
        }
    }
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequisitionStatus::PurchaseOrder => "Purchase Order",
            RequisitionStatus::GrnCompleted => "GRN Completed",
            RequisitionStatus::InvoiceCreated => "Invoice Created",
            RequisitionStatus::InvoiceApproved => "Invoice Approved",
            RequisitionStatus::PaymentMade => "Payment Made",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: EntityId,
    pub po_number: String,
    pub vendor_id: EntityId,
    #[serde(default)]
    pub vendor_name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Amounted for Advance {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequisition {
    pub id: EntityId,
    pub company_id: EntityId,
    pub purchase_order: PurchaseOrder,
    #[serde(default)]
    pub advances: Vec<Advance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
    pub status: RequisitionStatus,
}

impl PaymentRequisition {
    pub fn advanced_total(&self) -> Decimal {
        total_of(&self.advances)
    }
}

impl Identifiable for PaymentRequisition {
    fn id(&self) -> Option<EntityId> {
        Some(self.id)
    }
}

impl Displayable for PaymentRequisition {
    fn display_label(&self) -> String {
        format!(
            "{} / {} [{}]",
            self.purchase_order.po_number, self.purchase_order.vendor_name, self.status
        )
    }
}

/// Payload for `createAdvance`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    pub requisition_id: EntityId,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `createInvoice`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub requisition_id: EntityId,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub amount: Decimal,
}

/// Payload for `approveInvoice`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApproveInvoiceRequest {
    pub requisition_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<EntityId>,
    pub approved_by: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_display_and_wire_names() {
        let wire: RequisitionStatus = serde_json::from_str("\"GRN_COMPLETED\"").unwrap();
        let label: RequisitionStatus = serde_json::from_str("\"GRN Completed\"").unwrap();
        assert_eq!(wire, RequisitionStatus::GrnCompleted);
        assert_eq!(label, RequisitionStatus::GrnCompleted);
    }

    #[test]
    fn status_walks_in_workflow_order() {
        let mut status = RequisitionStatus::PurchaseOrder;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            seen.push(next);
            status = next;
        }
        assert_eq!(seen, RequisitionStatus::ORDER.to_vec());
        assert!(status.is_terminal());
    }

    #[test]
    fn parse_is_lenient_about_spacing() {
        assert_eq!(
            RequisitionStatus::parse("invoice-approved"),
            Some(RequisitionStatus::InvoiceApproved)
        );
        assert_eq!(RequisitionStatus::parse("grn"), Some(RequisitionStatus::GrnCompleted));
    }
}
