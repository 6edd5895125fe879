//! SQLite storage for incomes and expenses.

mod model;
mod repository;

pub(crate) use repository::{insert_expense, insert_income};

pub use model::{ExpenseDB, IncomeDB};
pub use repository::{ExpenseRepository, IncomeRepository};
