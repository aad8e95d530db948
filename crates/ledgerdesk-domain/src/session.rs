//! Logged-in user and the companies, locations and voucher types it may use.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::voucher::VoucherType;

/// Record cached under the `currentUser` session key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub companies: Vec<PermittedCompany>,
    #[serde(default)]
    pub voucher_types: Vec<VoucherType>,
}

impl CurrentUser {
    pub fn company(&self, id: EntityId) -> Option<&PermittedCompany> {
        self.companies.iter().find(|company| company.id == id)
    }
}

impl NamedEntity for CurrentUser {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermittedCompany {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub locations: Vec<PermittedLocation>,
}

impl PermittedCompany {
    pub fn location(&self, id: EntityId) -> Option<&PermittedLocation> {
        self.locations.iter().find(|location| location.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermittedLocation {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_user_round_trips_permissions() {
        let json = r#"{
            "id": 4,
            "name": "Ana",
            "companies": [{"id": 1, "name": "Acme", "locations": [{"id": 10, "name": "HQ"}]}],
            "voucherTypes": ["CASH", "JOURNAL"]
        }"#;
        let user: CurrentUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.voucher_types, vec![VoucherType::Cash, VoucherType::Journal]);
        let company = user.company(1).expect("company");
        assert_eq!(company.location(10).map(|l| l.name.as_str()), Some("HQ"));
        assert!(user.company(2).is_none());
    }
}
