//! Company/location/voucher-type permissions derived from the current user.

use ledgerdesk_domain::{
    CurrentUser, EntityId, JournalEntry, PermittedCompany, PermittedLocation, VoucherType,
};

use crate::error::{CoreError, CoreResult};

/// Read-only view over what the signed-in user may touch.
pub struct Scope<'a> {
    user: &'a CurrentUser,
}

impl<'a> Scope<'a> {
    pub fn new(user: &'a CurrentUser) -> Self {
        Self { user }
    }

    pub fn companies(&self) -> &'a [PermittedCompany] {
        &self.user.companies
    }

    /// The first permitted company, used when nothing else is configured.
    pub fn default_company(&self) -> Option<&'a PermittedCompany> {
        self.user.companies.first()
    }

    pub fn voucher_types(&self) -> &'a [VoucherType] {
        &self.user.voucher_types
    }

    pub fn ensure_company(&self, company_id: EntityId) -> CoreResult<&'a PermittedCompany> {
        self.user.company(company_id).ok_or_else(|| {
            CoreError::Forbidden(format!("company {} is not assigned to you", company_id))
        })
    }

    pub fn locations(&self, company_id: EntityId) -> CoreResult<&'a [PermittedLocation]> {
        Ok(&self.ensure_company(company_id)?.locations)
    }

    pub fn ensure_location(
        &self,
        company_id: EntityId,
        location_id: EntityId,
    ) -> CoreResult<&'a PermittedLocation> {
        let company = self.ensure_company(company_id)?;
        company.location(location_id).ok_or_else(|| {
            CoreError::Forbidden(format!(
                "location {} of {} is not assigned to you",
                location_id, company.name
            ))
        })
    }

    pub fn ensure_voucher_type(&self, voucher_type: VoucherType) -> CoreResult<()> {
        if self.user.voucher_types.contains(&voucher_type) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "{} vouchers are not assigned to you",
                voucher_type
            )))
        }
    }

    pub fn ensure_voucher(&self, entry: &JournalEntry) -> CoreResult<()> {
        self.ensure_location(entry.company_id, entry.location_id)?;
        self.ensure_voucher_type(entry.voucher_type)
    }

    /// Resolves the company to query: the requested one if permitted, else the default.
    pub fn resolve_company(&self, requested: Option<EntityId>) -> CoreResult<EntityId> {
        match requested {
            Some(id) => self.ensure_company(id).map(|company| company.id),
            None => self
                .default_company()
                .map(|company| company.id)
                .ok_or_else(|| CoreError::Forbidden("no company is assigned to you".into())),
        }
    }

    /// `companyId`/`locationId` query parameters for a scoped list request.
    pub fn query_pairs(
        &self,
        company_id: EntityId,
        location_id: Option<EntityId>,
    ) -> CoreResult<Vec<(String, String)>> {
        let mut pairs = vec![("companyId".to_string(), company_id.to_string())];
        match location_id {
            Some(location) => {
                self.ensure_location(company_id, location)?;
                pairs.push(("locationId".to_string(), location.to_string()));
            }
            None => {
                self.ensure_company(company_id)?;
            }
        }
        Ok(pairs)
    }
}
