use ledgerdesk_domain::{BankAccount, BankAccountPatch, EntityId};

use super::ErpApi;
use crate::bank_service::BankService;
use crate::error::{CoreError, CoreResult};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn bank_accounts(&self, company_id: EntityId) -> CoreResult<Vec<BankAccount>> {
        let request = self.scoped_query(
            ApiRequest::get("/api/bank-accounts/get-all-bank-accounts"),
            company_id,
            None,
        )?;
        self.fetch(request)
    }

    pub fn create_bank_account(&self, account: &BankAccount) -> CoreResult<BankAccount> {
        let existing = self.bank_accounts(account.company_id)?;
        let chart = self.chart_of_accounts(account.company_id)?;
        BankService::validate(account, &existing, &chart)?;
        let created: BankAccount = self.fetch(
            ApiRequest::post("/api/bank-accounts/create-bank-account").with_json(account)?,
        )?;
        tracing::info!(account_number = %created.account_number, "bank account created");
        Ok(created)
    }

    /// Applies `patch` to the stored account and re-validates the result.
    pub fn update_bank_account(
        &self,
        company_id: EntityId,
        id: EntityId,
        patch: &BankAccountPatch,
    ) -> CoreResult<BankAccount> {
        BankService::validate_patch(patch)?;
        let existing = self.bank_accounts(company_id)?;
        let current = existing
            .iter()
            .find(|account| account.id == Some(id))
            .ok_or_else(|| CoreError::NotFound(format!("bank account {}", id)))?;
        self.scope_company(current.company_id)?;

        let updated = patch.apply_to(current);
        let chart = self.chart_of_accounts(company_id)?;
        BankService::validate(&updated, &existing, &chart)?;
        let saved: BankAccount = self.fetch(
            ApiRequest::patch(format!("/api/bank-accounts/update-bank-account/{}", id)).with_json(patch)?,
        )?;
        tracing::info!(bank_account_id = id, "bank account updated");
        Ok(saved)
    }
}
