//! Balance module - income and expense totals, per work and overall, and the
//! CSV export of the same report.

mod balance_model;
mod balance_service;
mod balance_traits;
mod export;


pub use balance_model::{
    BalanceFilter, BalanceReport, ExpenseWithReceipts, IncomeWithReceipts, TypeTotal, WorkBalance,
};
pub use balance_service::BalanceService;
pub use balance_traits::{BalanceRepositoryTrait, BalanceServiceTrait};
pub use export::{write_balance_csv, BALANCE_CSV_HEADERS};
