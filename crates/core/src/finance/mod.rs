//! Finance module - incomes and expenses.

mod finance_model;
mod finance_service;
mod finance_traits;


pub use finance_model::{
    Expense, ExpenseFilter, ExpenseType, Income, IncomeFilter, IncomeType, NewExpense, NewIncome,
};
pub use finance_service::FinanceService;
pub use finance_traits::{ExpenseRepositoryTrait, FinanceServiceTrait, IncomeRepositoryTrait};
