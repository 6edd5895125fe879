use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::{round_money, validate_non_negative};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemType {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSystemType {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTypeUpdate {
    pub name: String,
    pub price: Decimal,
}

fn validate(name: &str, price: Decimal) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid("System type name is required"));
    }
    validate_non_negative("price", price)
}

impl NewSystemType {
    pub fn validate(&self) -> Result<()> {
        validate(&self.name, self.price)
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            price: round_money(self.price),
        }
    }
}

impl SystemTypeUpdate {
    pub fn validate(&self) -> Result<()> {
        validate(&self.name, self.price)
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            price: round_money(self.price),
        }
    }
}
