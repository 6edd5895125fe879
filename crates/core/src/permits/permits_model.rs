//! Permit domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A government septic permit for one property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub id: String,
    pub permit_number: String,
    pub property_address: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub system_type: Option<String>,
    pub lot: Option<String>,
    pub block: Option<String>,
    pub construction_permit_for: Option<String>,
    pub excavation_required: Option<bool>,
    pub drainfield_depth: Option<String>,
    pub gpd_capacity: Option<String>,
    pub pump: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub is_pbts: bool,
    pub notes: Option<String>,
    /// Stored file name of the attached PDF, relative to the permits directory.
    pub pdf_file: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload for creating or replacing a permit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermitInput {
    #[serde(default)]
    pub permit_number: String,
    #[serde(default)]
    pub property_address: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_phone: Option<String>,
    pub system_type: Option<String>,
    pub lot: Option<String>,
    pub block: Option<String>,
    pub construction_permit_for: Option<String>,
    pub excavation_required: Option<bool>,
    pub drainfield_depth: Option<String>,
    pub gpd_capacity: Option<String>,
    pub pump: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_pbts: bool,
    pub notes: Option<String>,
}

/// Answer to "is there already a permit for this number or address?".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermitCheck {
    pub exists: bool,
    pub permit_id: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PermitInput {
    pub fn validate(&self) -> Result<()> {
        if self.permit_number.trim().is_empty() {
            return Err(Error::invalid("Permit number is required"));
        }
        if self.property_address.trim().is_empty() {
            return Err(Error::invalid("Property address is required"));
        }
        Ok(())
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            permit_number: self.permit_number.trim().to_string(),
            property_address: self.property_address.trim().to_string(),
            applicant_name: trimmed(self.applicant_name),
            applicant_email: trimmed(self.applicant_email).map(|e| e.to_lowercase()),
            applicant_phone: trimmed(self.applicant_phone),
            system_type: trimmed(self.system_type),
            lot: trimmed(self.lot),
            block: trimmed(self.block),
            construction_permit_for: trimmed(self.construction_permit_for),
            excavation_required: self.excavation_required,
            drainfield_depth: trimmed(self.drainfield_depth),
            gpd_capacity: trimmed(self.gpd_capacity),
            pump: trimmed(self.pump),
            expiration_date: self.expiration_date,
            is_pbts: self.is_pbts,
            notes: trimmed(self.notes),
        }
    }
}
