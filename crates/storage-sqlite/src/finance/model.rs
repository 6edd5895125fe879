//! Database models for incomes and expenses.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::{decimal_to_text, parse_decimal, parse_enum};
use septic_core::finance::{Expense, ExpenseType, Income, IncomeType, NewExpense, NewIncome};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::incomes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncomeDB {
    pub id: String,
    pub date: NaiveDate,
    pub amount: String,
    pub income_type: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: String,
    pub date: NaiveDate,
    pub amount: String,
    pub expense_type: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    pub fixed_expense_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::incomes)]
#[diesel(treat_none_as_null = true)]
pub struct IncomeChangeset {
    pub date: NaiveDate,
    pub amount: String,
    pub income_type: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(treat_none_as_null = true)]
pub struct ExpenseChangeset {
    pub date: NaiveDate,
    pub amount: String,
    pub expense_type: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    pub fixed_expense_id: Option<String>,
}

impl IncomeDB {
    pub fn from_new(income: NewIncome, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: income.date,
            amount: decimal_to_text(income.amount),
            income_type: income.income_type.as_str().to_string(),
            payment_method: income.payment_method,
            notes: income.notes,
            work_id: income.work_id,
            staff_id: income.staff_id,
            created_at: now,
        }
    }
}

impl ExpenseDB {
    pub fn from_new(expense: NewExpense, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: expense.date,
            amount: decimal_to_text(expense.amount),
            expense_type: expense.expense_type.as_str().to_string(),
            payment_method: expense.payment_method,
            notes: expense.notes,
            work_id: expense.work_id,
            staff_id: expense.staff_id,
            fixed_expense_id: expense.fixed_expense_id,
            created_at: now,
        }
    }
}

impl From<NewIncome> for IncomeChangeset {
    fn from(income: NewIncome) -> Self {
        Self {
            date: income.date,
            amount: decimal_to_text(income.amount),
            income_type: income.income_type.as_str().to_string(),
            payment_method: income.payment_method,
            notes: income.notes,
            work_id: income.work_id,
            staff_id: income.staff_id,
        }
    }
}

impl From<NewExpense> for ExpenseChangeset {
    fn from(expense: NewExpense) -> Self {
        Self {
            date: expense.date,
            amount: decimal_to_text(expense.amount),
            expense_type: expense.expense_type.as_str().to_string(),
            payment_method: expense.payment_method,
            notes: expense.notes,
            work_id: expense.work_id,
            staff_id: expense.staff_id,
            fixed_expense_id: expense.fixed_expense_id,
        }
    }
}

impl From<IncomeDB> for Income {
    fn from(db: IncomeDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "income amount"),
            income_type: parse_enum(&db.income_type, "income type", IncomeType::Other),
            id: db.id,
            date: db.date,
            payment_method: db.payment_method,
            notes: db.notes,
            work_id: db.work_id,
            staff_id: db.staff_id,
            created_at: db.created_at,
        }
    }
}

impl From<ExpenseDB> for Expense {
    fn from(db: ExpenseDB) -> Self {
        Self {
            amount: parse_decimal(&db.amount, "expense amount"),
            expense_type: parse_enum(&db.expense_type, "expense type", ExpenseType::Other),
            id: db.id,
            date: db.date,
            payment_method: db.payment_method,
            notes: db.notes,
            work_id: db.work_id,
            staff_id: db.staff_id,
            fixed_expense_id: db.fixed_expense_id,
            created_at: db.created_at,
        }
    }
}
