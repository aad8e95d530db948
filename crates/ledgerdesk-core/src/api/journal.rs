use chrono::NaiveDate;

use ledgerdesk_domain::{EntityId, JournalEntry, JournalQuery};

use super::ErpApi;
use crate::error::{CoreError, CoreResult};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};
use crate::voucher_service::VoucherService;

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    /// Validates a draft voucher against the chart and saves it.
    pub fn create_voucher(&self, entry: &JournalEntry) -> CoreResult<JournalEntry> {
        self.with_scope(|scope| scope.ensure_voucher(entry))?;
        let accounts = self.chart_of_accounts(entry.company_id)?;
        VoucherService::validate(entry, &accounts)?;

        let mut payload = entry.clone();
        if payload.created_by.is_none() {
            payload.created_by = Some(self.current_user()?.id);
        }
        let saved: JournalEntry =
            self.fetch(ApiRequest::post("/api/journal/entry").with_json(&payload)?)?;
        tracing::info!(
            voucher_type = %saved.voucher_type,
            voucher_no = saved.voucher_no.as_deref().unwrap_or("-"),
            "voucher saved"
        );
        Ok(saved)
    }

    pub fn journal_details(
        &self,
        company_id: EntityId,
        location_id: Option<EntityId>,
        query: &JournalQuery,
    ) -> CoreResult<Vec<JournalEntry>> {
        let request = self
            .scoped_query(ApiRequest::get("/api/journal/getJournalDetails"), company_id, location_id)?
            .with_optional_query("voucherType", query.voucher_type.map(wire_name))
            .with_optional_query("state", query.state.map(wire_name))
            .with_optional_query("from", query.from)
            .with_optional_query("to", query.to)
            .with_optional_query("voucherId", query.voucher_id);
        self.fetch(request)
    }

    pub fn voucher(&self, company_id: EntityId, voucher_id: EntityId) -> CoreResult<JournalEntry> {
        let query = JournalQuery {
            voucher_id: Some(voucher_id),
            ..JournalQuery::default()
        };
        self.journal_details(company_id, None, &query)?
            .into_iter()
            .find(|entry| entry.id == Some(voucher_id))
            .ok_or_else(|| CoreError::NotFound(format!("voucher {}", voucher_id)))
    }

    /// Posts a draft voucher as the signed-in user.
    pub fn post_voucher(&self, entry: &JournalEntry) -> CoreResult<()> {
        let voucher_id = VoucherService::ensure_postable(entry)?;
        self.with_scope(|scope| scope.ensure_voucher(entry))?;
        let user_id = self.current_user()?.id;
        self.fetch_unit(ApiRequest::post(format!(
            "/api/journal/postJournal/{}/{}",
            voucher_id, user_id
        )))?;
        tracing::info!(voucher_id, user_id, "voucher posted");
        Ok(())
    }

    pub fn reverse_voucher(
        &self,
        entry: &JournalEntry,
        reversal_date: NaiveDate,
        reason: &str,
    ) -> CoreResult<()> {
        let user_id = self.current_user()?.id;
        let request = VoucherService::reversal_request(entry, reversal_date, reason, Some(user_id))?;
        self.with_scope(|scope| scope.ensure_voucher(entry))?;
        self.fetch_unit(ApiRequest::post("/api/journal/reverseEntry").with_json(&request)?)?;
        tracing::info!(voucher_id = request.voucher_id, "voucher reversed");
        Ok(())
    }
}

/// The enum's JSON spelling, used as a query value.
fn wire_name<E: serde::Serialize>(value: E) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|json| json.as_str().map(str::to_string))
        .unwrap_or_default()
}
