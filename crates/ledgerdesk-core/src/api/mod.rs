//! Typed client for the accounting API.
//!
//! Every call goes through [`ErpApi::fetch`]: it attaches the bearer token
//! from the session, sends through the [`ApiTransport`], and turns the
//! `{ data, error }` outcome into a [`CoreResult`]. Endpoint groups live in
//! the submodules as further `impl` blocks.

mod auth;
mod bank;
mod coa;
mod company;
mod dashboard;
mod depreciation;
mod iou;
mod journal;
mod number_series;
mod partner;
mod vendor;

pub use dashboard::DashboardOverview;

use serde::de::DeserializeOwned;
use serde_json::Value;

use ledgerdesk_domain::{CurrentUser, EntityId};

use crate::error::{ApiError, CoreError, CoreResult};
use crate::scope::Scope;
use crate::session::{Session, SessionStore};
use crate::transport::{ApiRequest, ApiTransport, FetchResult};

pub struct ErpApi<T: ApiTransport, S: SessionStore> {
    transport: T,
    session: Session<S>,
}

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn new(transport: T, store: S) -> Self {
        Self {
            transport,
            session: Session::new(store),
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Result-object form of a call: transport failures become the generic
    /// message instead of an error.
    pub fn fetch_api<R: DeserializeOwned>(&self, request: ApiRequest) -> FetchResult<R> {
        match self.execute(request) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "request failed before a response arrived");
                FetchResult::failure(ApiError::generic(None))
            }
        }
    }

    /// Authenticated call decoded into `R`.
    pub fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> CoreResult<R> {
        let token = self.session.require_token()?;
        let result = self.execute(request.with_bearer(token))?.into_result();
        if matches!(result, Err(CoreError::Unauthenticated)) {
            tracing::info!("token rejected; clearing session");
            self.session.sign_out()?;
        }
        result
    }

    /// Authenticated call whose response body is ignored.
    pub fn fetch_unit(&self, request: ApiRequest) -> CoreResult<()> {
        let _: Value = self.fetch(request)?;
        Ok(())
    }

    fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> CoreResult<FetchResult<R>> {
        tracing::debug!(method = %request.method, path = %request.path, "api request");
        let response = self.transport.execute(&request)?;
        let status = response.status;
        let result = FetchResult::from_response(response);
        match &result.error {
            Some(error) => tracing::warn!(
                method = %request.method,
                path = %request.path,
                status,
                message = %error.message,
                "api call failed"
            ),
            None => tracing::debug!(status, "api response"),
        }
        Ok(result)
    }

    pub fn current_user(&self) -> CoreResult<CurrentUser> {
        self.session.require_user()
    }

    fn with_scope<R>(&self, check: impl FnOnce(&Scope<'_>) -> CoreResult<R>) -> CoreResult<R> {
        let user = self.current_user()?;
        check(&Scope::new(&user))
    }

    fn scope_company(&self, company_id: EntityId) -> CoreResult<()> {
        self.with_scope(|scope| scope.ensure_company(company_id).map(|_| ()))
    }

    /// `companyId`/`locationId` query pairs checked against the user's permissions.
    fn scoped_query(
        &self,
        request: ApiRequest,
        company_id: EntityId,
        location_id: Option<EntityId>,
    ) -> CoreResult<ApiRequest> {
        let user = self.current_user()?;
        let pairs = Scope::new(&user).query_pairs(company_id, location_id)?;
        Ok(pairs
            .into_iter()
            .fold(request, |request, (key, value)| request.with_query(key, value)))
    }
}
