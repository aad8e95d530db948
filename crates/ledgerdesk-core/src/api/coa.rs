use ledgerdesk_domain::{ChartOfAccount, EntityId};

use super::ErpApi;
use crate::coa_service::CoaService;
use crate::error::{CoreError, CoreResult};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn chart_of_accounts(&self, company_id: EntityId) -> CoreResult<Vec<ChartOfAccount>> {
        let request =
            self.scoped_query(ApiRequest::get("/api/chart-of-accounts/get-all-coa"), company_id, None)?;
        self.fetch(request)
    }

    /// Generates the code under `parent_code` and creates the account.
    pub fn create_account(
        &self,
        company_id: EntityId,
        mut draft: ChartOfAccount,
        parent_code: Option<&str>,
    ) -> CoreResult<ChartOfAccount> {
        let existing = self.chart_of_accounts(company_id)?;
        draft.company_id = Some(company_id);
        let account = CoaService::prepare_child(draft, parent_code, &existing)?;
        let created: ChartOfAccount = self.fetch(
            ApiRequest::post("/api/chart-of-accounts/create-coa").with_json(&account)?,
        )?;
        tracing::info!(code = %created.code, "account created");
        Ok(created)
    }

    pub fn update_account(
        &self,
        company_id: EntityId,
        account: &ChartOfAccount,
    ) -> CoreResult<ChartOfAccount> {
        let id = account
            .id
            .ok_or_else(|| CoreError::InvalidOperation("Account has no id".into()))?;
        let existing = self.chart_of_accounts(company_id)?;
        if CoaService::find(&existing, id).is_none() {
            return Err(CoreError::NotFound(format!("account {}", id)));
        }
        CoaService::validate(account, &existing)?;
        self.fetch(
            ApiRequest::patch(format!("/api/chart-of-accounts/update-coa/{}", id)).with_json(account)?,
        )
    }
}
