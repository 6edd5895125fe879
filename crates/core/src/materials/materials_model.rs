use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::validate_positive;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub work_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub comment: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Payload for adding or replacing a material. The work comes from the route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMaterial {
    #[serde(default)]
    pub name: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub comment: Option<String>,
    pub purchase_date: Option<NaiveDate>,
}

impl NewMaterial {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("Material name is required"));
        }
        validate_positive("quantity", self.quantity)
    }

    pub(crate) fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: self.name.trim().to_string(),
            unit: trim(self.unit),
            comment: trim(self.comment),
            ..self
        }
    }
}
