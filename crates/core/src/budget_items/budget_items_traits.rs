use async_trait::async_trait;

use super::budget_items_model::{BudgetItem, BudgetItemFilter, BudgetItemInput, NewBudgetItem};
use crate::errors::Result;

#[async_trait]
pub trait BudgetItemRepositoryTrait: Send + Sync {
    async fn create(&self, item: NewBudgetItem) -> Result<BudgetItem>;
    async fn update(&self, id: &str, item: NewBudgetItem) -> Result<BudgetItem>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<BudgetItem>;
    /// Items matching the filter, ordered by category then name.
    fn list(&self, filter: &BudgetItemFilter) -> Result<Vec<BudgetItem>>;
    fn list_categories(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait BudgetItemServiceTrait: Send + Sync {
    fn list_items(&self, filter: BudgetItemFilter) -> Result<Vec<BudgetItem>>;
    fn get_item(&self, id: &str) -> Result<BudgetItem>;
    fn list_categories(&self) -> Result<Vec<String>>;
    async fn create_item(&self, input: BudgetItemInput) -> Result<BudgetItem>;
    async fn update_item(&self, id: &str, input: BudgetItemInput) -> Result<BudgetItem>;
    async fn delete_item(&self, id: &str) -> Result<()>;
}
