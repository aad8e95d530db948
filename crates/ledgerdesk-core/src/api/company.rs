use std::collections::HashSet;

use ledgerdesk_domain::{Company, CreateCompanyLocation};

use super::ErpApi;
use crate::error::{CoreResult, ValidationErrors};
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiTransport};

impl<T: ApiTransport, S: SessionStore> ErpApi<T, S> {
    pub fn companies(&self) -> CoreResult<Vec<Company>> {
        self.fetch(ApiRequest::get("/api/company/get-all-companies"))
    }

    /// Companies the signed-in user is assigned to.
    pub fn permitted_companies(&self) -> CoreResult<Vec<Company>> {
        let user = self.current_user()?;
        Ok(self
            .companies()?
            .into_iter()
            .filter(|company| user.company(company.id).is_some())
            .collect())
    }

    pub fn create_company_location(&self, payload: &CreateCompanyLocation) -> CoreResult<Company> {
        let mut errors = ValidationErrors::default();
        errors.check(
            payload.company.name.trim().is_empty(),
            "company.name",
            "Company name is required",
        );
        errors.check(
            payload.locations.is_empty(),
            "locations",
            "Add at least one location",
        );
        let mut seen = HashSet::new();
        for (index, location) in payload.locations.iter().enumerate() {
            let name = location.name.trim().to_ascii_lowercase();
            if name.is_empty() {
                errors.push(format!("locations[{}].name", index), "Location name is required");
            } else if !seen.insert(name) {
                errors.push(
                    format!("locations[{}].name", index),
                    format!("Location `{}` is listed twice", location.name.trim()),
                );
            }
        }
        errors.into_result()?;

        let company = self.fetch::<Company>(
            ApiRequest::post("/api/company/create-company-location").with_json(payload)?,
        )?;
        tracing::info!(company_id = company.id, "company created");
        Ok(company)
    }
}
