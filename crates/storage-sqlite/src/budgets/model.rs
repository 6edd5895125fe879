//! Database models for budgets.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::{decimal_to_text, parse_decimal, parse_enum};
use septic_core::budgets::{Budget, BudgetLineItem, BudgetStatus, NewBudget, NewBudgetLineItem};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub permit_id: Option<String>,
    pub property_address: String,
    pub applicant_name: String,
    pub date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub status: String,
    pub discount_description: Option<String>,
    pub discount_amount: String,
    pub initial_payment_percentage: String,
    pub subtotal: String,
    pub total: String,
    pub initial_payment: String,
    pub general_notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_line_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetLineItemDB {
    pub id: String,
    pub budget_id: String,
    pub budget_item_id: Option<String>,
    pub position: i32,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
    pub notes: Option<String>,
}

/// Budget columns rewritten on update. Status is left alone.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(treat_none_as_null = true)]
pub struct BudgetChangeset {
    pub permit_id: Option<String>,
    pub property_address: String,
    pub applicant_name: String,
    pub date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub discount_description: Option<String>,
    pub discount_amount: String,
    pub initial_payment_percentage: String,
    pub subtotal: String,
    pub total: String,
    pub initial_payment: String,
    pub general_notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl BudgetDB {
    pub fn from_new(budget: &NewBudget, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            permit_id: budget.permit_id.clone(),
            property_address: budget.property_address.clone(),
            applicant_name: budget.applicant_name.clone(),
            date: budget.date,
            expiration_date: budget.expiration_date,
            status: budget.status.as_str().to_string(),
            discount_description: budget.discount_description.clone(),
            discount_amount: decimal_to_text(budget.discount_amount),
            initial_payment_percentage: decimal_to_text(budget.initial_payment_percentage),
            subtotal: decimal_to_text(budget.subtotal),
            total: decimal_to_text(budget.total),
            initial_payment: decimal_to_text(budget.initial_payment),
            general_notes: budget.general_notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_domain(self, line_items: Vec<BudgetLineItemDB>) -> Budget {
        Budget {
            status: parse_enum(&self.status, "budget status", BudgetStatus::Draft),
            discount_amount: parse_decimal(&self.discount_amount, "discount amount"),
            initial_payment_percentage: parse_decimal(
                &self.initial_payment_percentage,
                "initial payment percentage",
            ),
            subtotal: parse_decimal(&self.subtotal, "budget subtotal"),
            total: parse_decimal(&self.total, "budget total"),
            initial_payment: parse_decimal(&self.initial_payment, "initial payment"),
            line_items: line_items.into_iter().map(BudgetLineItem::from).collect(),
            id: self.id,
            permit_id: self.permit_id,
            property_address: self.property_address,
            applicant_name: self.applicant_name,
            date: self.date,
            expiration_date: self.expiration_date,
            discount_description: self.discount_description,
            general_notes: self.general_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl BudgetChangeset {
    pub fn from_new(budget: &NewBudget, now: NaiveDateTime) -> Self {
        Self {
            permit_id: budget.permit_id.clone(),
            property_address: budget.property_address.clone(),
            applicant_name: budget.applicant_name.clone(),
            date: budget.date,
            expiration_date: budget.expiration_date,
            discount_description: budget.discount_description.clone(),
            discount_amount: decimal_to_text(budget.discount_amount),
            initial_payment_percentage: decimal_to_text(budget.initial_payment_percentage),
            subtotal: decimal_to_text(budget.subtotal),
            total: decimal_to_text(budget.total),
            initial_payment: decimal_to_text(budget.initial_payment),
            general_notes: budget.general_notes.clone(),
            updated_at: now,
        }
    }
}

impl BudgetLineItemDB {
    pub fn from_new(budget_id: &str, position: i32, item: NewBudgetLineItem) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            budget_item_id: item.budget_item_id,
            position,
            name: item.name,
            category: item.category,
            description: item.description,
            quantity: decimal_to_text(item.quantity),
            unit_price: decimal_to_text(item.unit_price),
            line_total: decimal_to_text(item.line_total),
            notes: item.notes,
        }
    }
}

impl From<BudgetLineItemDB> for BudgetLineItem {
    fn from(db: BudgetLineItemDB) -> Self {
        Self {
            quantity: parse_decimal(&db.quantity, "line quantity"),
            unit_price: parse_decimal(&db.unit_price, "line unit price"),
            line_total: parse_decimal(&db.line_total, "line total"),
            id: db.id,
            budget_id: db.budget_id,
            budget_item_id: db.budget_item_id,
            name: db.name,
            category: db.category,
            description: db.description,
            notes: db.notes,
        }
    }
}
