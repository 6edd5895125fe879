//! Budgets module - quotes sent to clients, their line items and totals.

mod budgets_model;
mod budgets_service;
mod budgets_totals;
mod budgets_traits;


pub use budgets_model::{
    Budget, BudgetFilter, BudgetInput, BudgetLineItem, BudgetLineItemInput, BudgetStatus,
    BudgetStatusUpdate, InitialPaymentInput, InitialPaymentResult, NewBudget, NewBudgetLineItem,
    NewInitialPayment,
};
pub use budgets_service::BudgetService;
pub use budgets_totals::{compute_totals, line_total, BudgetTotals};
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
