//! Budget item catalog - priced components that budget lines are built from.

mod budget_items_model;
mod budget_items_service;
mod budget_items_traits;


pub use budget_items_model::{BudgetItem, BudgetItemFilter, BudgetItemInput, NewBudgetItem};
pub use budget_items_service::BudgetItemService;
pub use budget_items_traits::{BudgetItemRepositoryTrait, BudgetItemServiceTrait};
