use ledgerdesk_domain::{CurrentUser, LoginRequest, LoginResponse};

use super::ErpApi;
use crate::error::{CoreError, CoreResult, ValidationErrors};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport, FetchResult};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    /// Signs in and caches the token and user record in the session.
    pub fn login(&self, email: &str, password: &str) -> CoreResult<CurrentUser> {
        let mut errors = ValidationErrors::default();
        errors.check(email.trim().is_empty(), "email", "Email is required");
        errors.check(password.is_empty(), "password", "Password is required");
        errors.into_result()?;

        let request = ApiRequest::post("/api/auth/login").with_json(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        // No token was sent, so a 401 here means rejected credentials.
        let login: LoginResponse = match self.fetch_api(request) {
            FetchResult {
                error: Some(error), ..
            } if error.status == Some(401) => return Err(CoreError::Api(error)),
            result => result.into_result()?,
        };
        self.session.sign_in(&login)?;
        Ok(login.user)
    }

    pub fn logout(&self) -> CoreResult<()> {
        self.session.sign_out()
    }
}
