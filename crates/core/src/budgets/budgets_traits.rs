use async_trait::async_trait;

use super::budgets_model::{
    Budget, BudgetFilter, BudgetInput, BudgetStatus, InitialPaymentInput, InitialPaymentResult,
    NewBudget, NewInitialPayment,
};
use crate::errors::Result;

#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Inserts the budget and its line items in one transaction.
    async fn create(&self, budget: NewBudget) -> Result<Budget>;
    /// Replaces the budget fields and all of its line items. Fails when the
    /// stored status is no longer editable at write time.
    async fn update(&self, id: &str, budget: NewBudget) -> Result<Budget>;
    /// Applies `status` when the transition is allowed from the stored status.
    async fn update_status(&self, id: &str, status: BudgetStatus) -> Result<Budget>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Budget>;
    /// Budgets with their line items, newest first.
    fn list(&self, filter: &BudgetFilter) -> Result<Vec<Budget>>;

    /// Marks the budget paid and inserts the initial-payment income and the
    /// work, all in one transaction. The budget must still be approved.
    async fn record_initial_payment(&self, payment: NewInitialPayment)
        -> Result<InitialPaymentResult>;
}

#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn list_budgets(&self, filter: BudgetFilter) -> Result<Vec<Budget>>;
    fn get_budget(&self, id: &str) -> Result<Budget>;
    async fn create_budget(&self, input: BudgetInput) -> Result<Budget>;
    async fn update_budget(&self, id: &str, input: BudgetInput) -> Result<Budget>;
    async fn delete_budget(&self, id: &str) -> Result<()>;
    async fn update_status(&self, id: &str, status: BudgetStatus) -> Result<Budget>;
    async fn record_initial_payment(
        &self,
        id: &str,
        input: InitialPaymentInput,
        staff_id: Option<String>,
    ) -> Result<InitialPaymentResult>;
}
