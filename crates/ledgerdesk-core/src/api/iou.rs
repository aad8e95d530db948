use ledgerdesk_domain::{EntityId, IouAdjustment, IouRecord};

use super::ErpApi;
use crate::error::CoreResult;
use crate::iou_service::IouService;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    /// IOUs with their status recomputed from the adjustments.
    pub fn ious(&self, company_id: EntityId) -> CoreResult<Vec<IouRecord>> {
        let request = self.scoped_query(ApiRequest::get("/api/iou/get-all-iou"), company_id, None)?;
        let mut ious: Vec<IouRecord> = self.fetch(request)?;
        for iou in &mut ious {
            iou.status = IouService::derive_status(iou);
        }
        Ok(ious)
    }

    pub fn create_iou(&self, iou: &IouRecord) -> CoreResult<IouRecord> {
        self.scope_company(iou.company_id)?;
        IouService::validate_new(iou)?;
        self.fetch(ApiRequest::post("/api/iou/create-iou").with_json(iou)?)
    }

    pub fn adjust_iou(&self, iou: &IouRecord, adjustment: &IouAdjustment) -> CoreResult<()> {
        IouService::validate_adjustment(iou, adjustment)?;
        self.fetch_unit(ApiRequest::post("/api/iou/create-adjustment").with_json(adjustment)?)
    }
}
