use async_trait::async_trait;
use chrono::NaiveDate;

use super::fixed_expenses_model::{FixedExpense, GeneratedPeriods, NewFixedExpense};
use crate::errors::Result;
use crate::finance::Expense;

#[async_trait]
pub trait FixedExpenseRepositoryTrait: Send + Sync {
    async fn create(&self, fixed: NewFixedExpense) -> Result<FixedExpense>;
    async fn update(&self, id: &str, fixed: NewFixedExpense) -> Result<FixedExpense>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<FixedExpense>;
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<FixedExpense>>;
    /// Active fixed expenses with `next_due_date <= today`.
    fn list_due(&self, today: NaiveDate) -> Result<Vec<FixedExpense>>;
    /// Advances the schedule and inserts the generated expenses atomically.
    ///
    /// Only applies when the stored `next_due_date` still equals
    /// `run.planned_from`; otherwise another run got there first and no
    /// expenses are returned.
    async fn record_generated(&self, run: GeneratedPeriods) -> Result<Vec<Expense>>;
}

#[async_trait]
pub trait FixedExpenseServiceTrait: Send + Sync {
    fn list_fixed_expenses(&self, is_active_filter: Option<bool>) -> Result<Vec<FixedExpense>>;
    fn get_fixed_expense(&self, id: &str) -> Result<FixedExpense>;
    async fn create_fixed_expense(&self, fixed: NewFixedExpense) -> Result<FixedExpense>;
    async fn update_fixed_expense(&self, id: &str, fixed: NewFixedExpense)
        -> Result<FixedExpense>;
    async fn delete_fixed_expense(&self, id: &str) -> Result<()>;
    /// Creates one expense for every period elapsed up to `today` and returns
    /// them.
    async fn generate_due(&self, today: NaiveDate) -> Result<Vec<Expense>>;
}
