use ledgerdesk_domain::{EntityId, NumberSeries, NumberSeriesPatch};

use super::ErpApi;
use crate::error::{CoreError, CoreResult};
use crate::number_series_service::NumberSeriesService;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

const SERIES_PATH: &str = "/api/number-series";

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn number_series(
        &self,
        company_id: EntityId,
        location_id: Option<EntityId>,
    ) -> CoreResult<Vec<NumberSeries>> {
        let request = self.scoped_query(ApiRequest::get(SERIES_PATH), company_id, location_id)?;
        self.fetch(request)
    }

    pub fn create_series(&self, series: &NumberSeries) -> CoreResult<NumberSeries> {
        self.with_scope(|scope| {
            scope.ensure_location(series.company_id, series.location_id)?;
            scope.ensure_voucher_type(series.voucher_type)
        })?;
        NumberSeriesService::validate(series)?;
        let existing = self.number_series(series.company_id, Some(series.location_id))?;
        NumberSeriesService::ensure_no_conflict(series, &existing)?;
        let created: NumberSeries = self.fetch(ApiRequest::post(SERIES_PATH).with_json(series)?)?;
        tracing::info!(prefix = %created.prefix, "number series created");
        Ok(created)
    }

    /// Applies `patch` to the stored series and re-validates the result.
    pub fn update_series(
        &self,
        company_id: EntityId,
        id: EntityId,
        patch: &NumberSeriesPatch,
    ) -> CoreResult<NumberSeries> {
        let existing = self.number_series(company_id, None)?;
        let current = self.stored_series(&existing, id)?;
        let updated = patch.apply_to(current);
        NumberSeriesService::validate(&updated)?;
        NumberSeriesService::ensure_no_conflict(&updated, &existing)?;
        self.fetch(ApiRequest::patch(format!("{}/{}", SERIES_PATH, id)).with_json(patch)?)
    }

    pub fn delete_series(&self, company_id: EntityId, id: EntityId) -> CoreResult<()> {
        let existing = self.number_series(company_id, None)?;
        self.stored_series(&existing, id)?;
        self.fetch_unit(ApiRequest::delete(format!("{}/{}", SERIES_PATH, id)))?;
        tracing::info!(series_id = id, "number series deleted");
        Ok(())
    }

    /// The series with `id`, provided its location and voucher type are the user's.
    fn stored_series<'a>(
        &self,
        existing: &'a [NumberSeries],
        id: EntityId,
    ) -> CoreResult<&'a NumberSeries> {
        let current = existing
            .iter()
            .find(|series| series.id == Some(id))
            .ok_or_else(|| CoreError::NotFound(format!("number series {}", id)))?;
        self.with_scope(|scope| {
            scope.ensure_location(current.company_id, current.location_id)?;
            scope.ensure_voucher_type(current.voucher_type)
        })?;
        Ok(current)
    }
}
