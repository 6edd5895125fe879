use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::budget_items_model::{BudgetItem, BudgetItemFilter, BudgetItemInput};
use super::budget_items_traits::{BudgetItemRepositoryTrait, BudgetItemServiceTrait};
use crate::errors::{Error, Result};

pub struct BudgetItemService {
    repository: Arc<dyn BudgetItemRepositoryTrait>,
}

impl BudgetItemService {
    pub fn new(repository: Arc<dyn BudgetItemRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BudgetItemServiceTrait for BudgetItemService {
    fn list_items(&self, mut filter: BudgetItemFilter) -> Result<Vec<BudgetItem>> {
        filter.category = filter
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.repository.list(&filter)
    }

    fn get_item(&self, id: &str) -> Result<BudgetItem> {
        self.repository.get_by_id(id)
    }

    fn list_categories(&self) -> Result<Vec<String>> {
        let mut categories = self.repository.list_categories()?;
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn create_item(&self, input: BudgetItemInput) -> Result<BudgetItem> {
        let item = input.into_new_item()?;
        debug!("Creating catalog item '{}' in {}", item.name, item.category);
        self.repository.create(item).await
    }

    async fn update_item(&self, id: &str, input: BudgetItemInput) -> Result<BudgetItem> {
        let item = input.into_new_item()?;
        self.repository.update(id, item).await
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        if self.repository.delete(id).await? == 0 {
            return Err(Error::not_found("Budget item", id));
        }
        Ok(())
    }
}
