use super::balance_model::{BalanceFilter, BalanceReport, TypeTotal, WorkBalance};
use crate::errors::Result;

/// Aggregate queries over incomes and expenses.
pub trait BalanceRepositoryTrait: Send + Sync {
    /// `COUNT`/`SUM` of incomes grouped by type.
    fn income_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>>;
    /// `COUNT`/`SUM` of expenses grouped by type.
    fn expense_totals(&self, filter: &BalanceFilter) -> Result<Vec<TypeTotal>>;
}

pub trait BalanceServiceTrait: Send + Sync {
    fn get_balance(&self, filter: BalanceFilter) -> Result<BalanceReport>;
    fn get_work_balance(&self, work_id: &str) -> Result<WorkBalance>;
    /// The balance report as CSV bytes.
    fn export_balance_csv(&self, filter: BalanceFilter) -> Result<Vec<u8>>;
}
