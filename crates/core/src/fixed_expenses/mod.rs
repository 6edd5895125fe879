//! Fixed expenses - recurring costs that generate expenses when they fall due.

mod fixed_expenses_model;
mod fixed_expenses_service;
mod fixed_expenses_traits;

#[cfg(test)]
mod fixed_expenses_service_tests;

pub use fixed_expenses_model::{FixedExpense, Frequency, GeneratedPeriods, NewFixedExpense};
pub use fixed_expenses_service::FixedExpenseService;
pub use fixed_expenses_traits::{FixedExpenseRepositoryTrait, FixedExpenseServiceTrait};
