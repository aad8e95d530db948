use ledgerdesk_domain::{EntityId, ResPartner};

use super::ErpApi;
use crate::error::{CoreError, CoreResult};
use crate::partner_service::PartnerService;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn partners(&self, company_id: EntityId) -> CoreResult<Vec<ResPartner>> {
        let request =
            self.scoped_query(ApiRequest::get("/api/res-partner/get-all-partners"), company_id, None)?;
        self.fetch(request)
    }

    pub fn create_partner(&self, company_id: EntityId, mut partner: ResPartner) -> CoreResult<ResPartner> {
        partner.company_id = Some(company_id);
        let existing = self.partners(company_id)?;
        PartnerService::validate(&partner, &existing)?;
        self.fetch(ApiRequest::post("/api/res-partner/create-partner").with_json(&partner)?)
    }

    pub fn update_partner(&self, company_id: EntityId, partner: &ResPartner) -> CoreResult<ResPartner> {
        let id = partner
            .id
            .ok_or_else(|| CoreError::InvalidOperation("Partner has no id".into()))?;
        let existing = self.partners(company_id)?;
        PartnerService::validate(partner, &existing)?;
        self.fetch(
            ApiRequest::patch(format!("/api/res-partner/update-partner/{}", id)).with_json(partner)?,
        )
    }
}
