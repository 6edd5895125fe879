//! SQLite storage for the budget item catalog.

mod model;
mod repository;

pub use model::BudgetItemDB;
pub use repository::BudgetItemRepository;
