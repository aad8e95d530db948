//! Document numbering windows per company, location and voucher type.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::voucher::VoucherType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumberSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub company_id: EntityId,
    pub location_id: EntityId,
    pub voucher_type: VoucherType,
    pub prefix: String,
    pub starting_number: u64,
    pub ending_number: u64,
    #[serde(default)]
    pub current_number: u64,
    #[serde(default = "NumberSeries::default_padding")]
    pub padding: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NumberSeries {
    pub fn new(
        company_id: EntityId,
        location_id: EntityId,
        voucher_type: VoucherType,
        starting_number: u64,
        ending_number: u64,
    ) -> Self {
        Self {
            id: None,
            company_id,
            location_id,
            voucher_type,
            prefix: voucher_type.code().to_string(),
            starting_number,
            ending_number,
            current_number: starting_number.saturating_sub(1),
            padding: Self::default_padding(),
            fiscal_year: None,
            is_active: true,
        }
    }

    pub fn default_padding() -> u8 {
        5
    }

    /// Whether this series numbers the same documents as `other`.
    pub fn same_scope(&self, other: &NumberSeries) -> bool {
        self.company_id == other.company_id
            && self.location_id == other.location_id
            && self.voucher_type == other.voucher_type
            && self.fiscal_year == other.fiscal_year
    }
}

impl Identifiable for NumberSeries {
    fn id(&self) -> Option<EntityId> {
        self.id
    }
}

impl Displayable for NumberSeries {
    fn display_label(&self) -> String {
        format!(
            "{} {}..{}",
            self.prefix, self.starting_number, self.ending_number
        )
    }
}

/// Partial update for `PATCH /api/number-series/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumberSeriesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl NumberSeriesPatch {
    /// Applies the patch to a copy of `series`, used to validate before sending.
    pub fn apply_to(&self, series: &NumberSeries) -> NumberSeries {
        let mut updated = series.clone();
        if let Some(prefix) = &self.prefix {
            updated.prefix = prefix.clone();
        }
        if let Some(start) = self.starting_number {
            updated.starting_number = start;
        }
        if let Some(end) = self.ending_number {
            updated.ending_number = end;
        }
        if let Some(padding) = self.padding {
            updated.padding = padding;
        }
        if let Some(active) = self.is_active {
            updated.is_active = active;
        }
        updated
    }
}
