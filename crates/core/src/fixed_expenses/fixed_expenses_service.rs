use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::Arc;

use super::fixed_expenses_model::{FixedExpense, NewFixedExpense};
use super::fixed_expenses_traits::{FixedExpenseRepositoryTrait, FixedExpenseServiceTrait};
use crate::errors::{Error, Result};
use crate::finance::Expense;

/// Upper bound of periods generated in one run for a single fixed expense.
const MAX_PERIODS_PER_RUN: u32 = 520;

pub struct FixedExpenseService {
    repository: Arc<dyn FixedExpenseRepositoryTrait>,
}

impl FixedExpenseService {
    pub fn new(repository: Arc<dyn FixedExpenseRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FixedExpenseServiceTrait for FixedExpenseService {
    fn list_fixed_expenses(&self, is_active_filter: Option<bool>) -> Result<Vec<FixedExpense>> {
        self.repository.list(is_active_filter)
    }

    fn get_fixed_expense(&self, id: &str) -> Result<FixedExpense> {
        self.repository.get_by_id(id)
    }

    async fn create_fixed_expense(&self, fixed: NewFixedExpense) -> Result<FixedExpense> {
        fixed.validate()?;
        self.repository.create(fixed.normalized()).await
    }

    async fn update_fixed_expense(
        &self,
        id: &str,
        fixed: NewFixedExpense,
    ) -> Result<FixedExpense> {
        fixed.validate()?;
        self.repository.get_by_id(id)?;
        self.repository.update(id, fixed.normalized()).await
    }

    async fn delete_fixed_expense(&self, id: &str) -> Result<()> {
        if self.repository.delete(id).await? == 0 {
            return Err(Error::not_found("Fixed expense", id));
        }
        Ok(())
    }

    async fn generate_due(&self, today: NaiveDate) -> Result<Vec<Expense>> {
        let mut generated = Vec::new();
        for fixed in self.repository.list_due(today)? {
            let run = fixed.periods_due(today, MAX_PERIODS_PER_RUN);
            if run.expenses.is_empty() {
                continue;
            }
            if run.next_due_date <= today {
                warn!(
                    "Fixed expense {} is more than {} periods behind; the rest is generated next run",
                    fixed.id, MAX_PERIODS_PER_RUN
                );
            }
            let next_due_date = run.next_due_date;
            let created = self.repository.record_generated(run).await?;
            if created.is_empty() {
                debug!("Fixed expense {} was already generated by another run", fixed.id);
                continue;
            }
            info!(
                "Generated {} expense(s) for fixed expense '{}', next due {}",
                created.len(),
                fixed.name,
                next_due_date
            );
            generated.extend(created);
        }
        Ok(generated)
    }
}
