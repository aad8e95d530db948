//! Business partners (customers, vendors, employees).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResPartner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub partner_type: PartnerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coa_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<EntityId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ResPartner {
    pub fn new(name: impl Into<String>, partner_type: PartnerType) -> Self {
        Self {
            id: None,
            name: name.into(),
            partner_type,
            email: None,
            phone: None,
            address: None,
            tax_id: None,
            coa_id: None,
            company_id: None,
            is_active: true,
        }
    }
}

impl Identifiable for ResPartner {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl NamedEntity for ResPartner {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for ResPartner {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.partner_type)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartnerType {
    Customer,
    Vendor,
    Employee,
    #[default]
    Other,
}

impl PartnerType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(PartnerType::Customer),
            "vendor" | "supplier" => Some(PartnerType::Vendor),
            "employee" => Some(PartnerType::Employee),
            "other" => Some(PartnerType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PartnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PartnerType::Customer => "Customer",
            PartnerType::Vendor => "Vendor",
            PartnerType::Employee => "Employee",
            PartnerType::Other => "Other",
        };
        f.write_str(label)
    }
}
