use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::{decimal_to_text, parse_decimal, parse_enum};
use septic_core::finance::ExpenseType;
use septic_core::fixed_expenses::{FixedExpense, Frequency, NewFixedExpense};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::fixed_expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FixedExpenseDB {
    pub id: String,
    pub name: String,
    pub amount: String,
    pub expense_type: String,
    pub frequency: String,
    pub next_due_date: NaiveDate,
    pub anchor_date: NaiveDate,
    pub periods_generated: i32,
    pub is_active: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::fixed_expenses)]
#[diesel(treat_none_as_null = true)]
pub struct FixedExpenseChangeset {
    pub name: String,
    pub amount: String,
    pub expense_type: String,
    pub frequency: String,
    pub next_due_date: NaiveDate,
    pub is_active: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl FixedExpenseDB {
    pub fn from_new(fixed: NewFixedExpense, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: fixed.name,
            amount: decimal_to_text(fixed.amount),
            expense_type: fixed.expense_type.as_str().to_string(),
            frequency: fixed.frequency.as_str().to_string(),
            next_due_date: fixed.next_due_date,
            anchor_date: fixed.next_due_date,
            periods_generated: 0,
            is_active: fixed.is_active,
            payment_method: fixed.payment_method,
            notes: fixed.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl FixedExpenseChangeset {
    pub fn from_new(fixed: NewFixedExpense, now: NaiveDateTime) -> Self {
        Self {
            name: fixed.name,
            amount: decimal_to_text(fixed.amount),
            expense_type: fixed.expense_type.as_str().to_string(),
            frequency: fixed.frequency.as_str().to_string(),
            next_due_date: fixed.next_due_date,
            is_active: fixed.is_active,
            payment_method: fixed.payment_method,
            notes: fixed.notes,
            updated_at: now,
        }
    }
}

impl From<FixedExpenseDB> for FixedExpense {
    fn from(db: FixedExpenseDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "fixed expense amount"),
            expense_type: parse_enum(&db.expense_type, "expense type", ExpenseType::Fixed),
            frequency: parse_enum(&db.frequency, "frequency", Frequency::Monthly),
            id: db.id,
            name: db.name,
            next_due_date: db.next_due_date,
            anchor_date: db.anchor_date,
            periods_generated: u32::try_from(db.periods_generated).unwrap_or_default(),
            is_active: db.is_active,
            payment_method: db.payment_method,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
