use ledgerdesk_domain::{
    AdvanceRequest, ApproveInvoiceRequest, CreateInvoiceRequest, EntityId, PaymentRequisition,
};

use super::ErpApi;
use crate::error::{CoreError, CoreResult};
use crate::requisition_service::RequisitionService;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

const VENDOR_PATH: &str = "/api/vendor-payment";

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn payment_requisitions(&self, company_id: EntityId) -> CoreResult<Vec<PaymentRequisition>> {
        let request = self.scoped_query(
            ApiRequest::get(format!("{}/getAllPaymentRequisition", VENDOR_PATH)),
            company_id,
            None,
        )?;
        self.fetch(request)
    }

    pub fn requisition(&self, company_id: EntityId, id: EntityId) -> CoreResult<PaymentRequisition> {
        self.payment_requisitions(company_id)?
            .into_iter()
            .find(|requisition| requisition.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("requisition {}", id)))
    }

    pub fn create_advance(
        &self,
        requisition: &PaymentRequisition,
        request: &AdvanceRequest,
    ) -> CoreResult<()> {
        RequisitionService::validate_advance(requisition, request)?;
        self.fetch_unit(
            ApiRequest::post(format!("{}/createAdvance", VENDOR_PATH)).with_json(request)?,
        )
    }

    pub fn create_invoice(
        &self,
        requisition: &PaymentRequisition,
        request: &CreateInvoiceRequest,
    ) -> CoreResult<()> {
        RequisitionService::validate_invoice(requisition, request)?;
        self.fetch_unit(
            ApiRequest::post(format!("{}/createInvoice", VENDOR_PATH)).with_json(request)?,
        )
    }

    pub fn approve_invoice(
        &self,
        requisition: &PaymentRequisition,
        request: &ApproveInvoiceRequest,
    ) -> CoreResult<()> {
        RequisitionService::validate_approval(requisition, request)?;
        self.fetch_unit(
            ApiRequest::post(format!("{}/approveInvoice", VENDOR_PATH)).with_json(request)?,
        )?;
        tracing::info!(requisition_id = requisition.id, "invoice approved");
        Ok(())
    }
}
