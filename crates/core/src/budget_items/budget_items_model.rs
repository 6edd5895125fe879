//! Catalog item models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::{round_money, validate_non_negative};

/// A catalog entry: tank, pump, pipe, labour and so on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request payload for creating or replacing a catalog item.
///
/// The required fields are optional here so a missing one produces a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated catalog item, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetItem {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItemFilter {
    /// `Some(true)` only active items, `Some(false)` only inactive, `None` all.
    pub active: Option<bool>,
    pub category: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BudgetItemInput {
    pub fn into_new_item(self) -> Result<NewBudgetItem> {
        let name = non_blank(self.name);
        let category = non_blank(self.category);
        let (Some(name), Some(category), Some(unit_price)) = (name, category, self.unit_price)
        else {
            return Err(Error::invalid("name, category, unitPrice required"));
        };
        validate_non_negative("unitPrice", unit_price)?;

        Ok(NewBudgetItem {
            name,
            category,
            brand: non_blank(self.brand),
            capacity: non_blank(self.capacity),
            description: non_blank(self.description),
            unit_price: round_money(unit_price),
            unit: non_blank(self.unit),
            supplier_name: non_blank(self.supplier_name),
            supplier_location: non_blank(self.supplier_location),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}
