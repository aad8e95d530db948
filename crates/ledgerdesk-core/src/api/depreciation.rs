use ledgerdesk_domain::{
    DepreciationLine, DepreciationReportRow, DepreciationScheduleRequest, EntityId,
};

use super::ErpApi;
use crate::depreciation_service::DepreciationService;
use crate::error::CoreResult;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

const DEPRECIATION_PATH: &str = "/api/depreciation-schedules";

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn preview_depreciation(
        &self,
        request: &DepreciationScheduleRequest,
    ) -> CoreResult<Vec<DepreciationLine>> {
        self.scope_company(request.company_id)?;
        DepreciationService::validate(request)?;
        let lines: Vec<DepreciationLine> = self.fetch(
            ApiRequest::post(format!("{}/preview-depreciation-schedule", DEPRECIATION_PATH))
                .with_json(request)?,
        )?;
        DepreciationService::check_schedule(request, &lines)?;
        Ok(lines)
    }

    pub fn create_depreciation(&self, request: &DepreciationScheduleRequest) -> CoreResult<()> {
        self.scope_company(request.company_id)?;
        DepreciationService::validate(request)?;
        self.fetch_unit(
            ApiRequest::post(format!("{}/create-depreciation-schedule", DEPRECIATION_PATH))
                .with_json(request)?,
        )?;
        tracing::info!(asset = %request.asset_name, "depreciation schedule created");
        Ok(())
    }

    pub fn depreciation_report(&self, company_id: EntityId) -> CoreResult<Vec<DepreciationReportRow>> {
        let request = self.scoped_query(
            ApiRequest::get(format!("{}/getDepReport", DEPRECIATION_PATH)),
            company_id,
            None,
        )?;
        self.fetch(request)
    }
}
