use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::parse_decimal;
use septic_core::budget_items::BudgetItem;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetItemDB {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub unit_price: String,
    pub unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset used when a catalog item is replaced.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::budget_items)]
#[diesel(treat_none_as_null = true)]
pub struct BudgetItemChangeset {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub capacity: Option<String>,
    pub description: Option<String>,
    pub unit_price: String,
    pub unit: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_location: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<BudgetItemDB> for BudgetItem {
    fn from(db: BudgetItemDB) -> Self {
        Self {
            unit_price: parse_decimal(&db.unit_price, "budget item unit price"),
            id: db.id,
            name: db.name,
            category: db.category,
            brand: db.brand,
            capacity: db.capacity,
            description: db.description,
            unit: db.unit,
            supplier_name: db.supplier_name,
            supplier_location: db.supplier_location,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
