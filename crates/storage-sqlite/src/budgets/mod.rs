//! SQLite storage implementation for budgets and their line items.

mod model;
mod repository;

pub use model::{BudgetDB, BudgetLineItemDB};
pub use repository::BudgetRepository;
