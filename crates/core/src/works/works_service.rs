use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::works_model::{
    BudgetSummary, NewWork, Work, WorkDetail, WorkFilter, WorkStatus, WorkUpdate,
};
use super::works_traits::{WorkRepositoryTrait, WorkServiceTrait};
use crate::balance::WorkBalance;
use crate::budgets::BudgetRepositoryTrait;
use crate::errors::{Error, Result};
use crate::final_invoices::FinalInvoiceRepositoryTrait;
use crate::finance::{ExpenseFilter, ExpenseRepositoryTrait, IncomeFilter, IncomeRepositoryTrait};
use crate::materials::MaterialRepositoryTrait;
use crate::receipts::{ReceiptOwner, ReceiptServiceTrait};
use crate::utils::money_sum;

pub struct WorkService {
    works: Arc<dyn WorkRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    materials: Arc<dyn MaterialRepositoryTrait>,
    incomes: Arc<dyn IncomeRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    final_invoices: Arc<dyn FinalInvoiceRepositoryTrait>,
    receipts: Arc<dyn ReceiptServiceTrait>,
}

impl WorkService {
    pub fn new(
        works: Arc<dyn WorkRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        materials: Arc<dyn MaterialRepositoryTrait>,
        incomes: Arc<dyn IncomeRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        final_invoices: Arc<dyn FinalInvoiceRepositoryTrait>,
        receipts: Arc<dyn ReceiptServiceTrait>,
    ) -> Self {
        Self {
            works,
            budgets,
            materials,
            incomes,
            expenses,
            final_invoices,
            receipts,
        }
    }

    fn budget_summary(&self, budget_id: Option<&str>) -> Result<Option<BudgetSummary>> {
        let Some(budget_id) = budget_id else {
            return Ok(None);
        };
        match self.budgets.get_by_id(budget_id) {
            Ok(budget) => Ok(Some(BudgetSummary {
                id: budget.id,
                applicant_name: budget.applicant_name,
                status: budget.status,
                total: Some(budget.total),
                initial_payment: Some(budget.initial_payment),
            })),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl WorkServiceTrait for WorkService {
    fn list_works(&self, filter: WorkFilter) -> Result<Vec<Work>> {
        self.works.list(&filter)
    }

    fn get_work(&self, id: &str) -> Result<Work> {
        self.works.get_by_id(id)
    }

    fn get_work_detail(&self, id: &str) -> Result<WorkDetail> {
        let work = self.works.get_by_id(id)?;
        let budget = self.budget_summary(work.budget_id.as_deref())?;
        let materials = self.materials.list_for_work(id)?;
        let incomes = self.incomes.list(&IncomeFilter {
            work_id: Some(id.to_string()),
            ..Default::default()
        })?;
        let expenses = self.expenses.list(&ExpenseFilter {
            work_id: Some(id.to_string()),
            ..Default::default()
        })?;
        let final_invoice = self.final_invoices.get_for_work(id)?;
        let balance = WorkBalance::new(
            money_sum(incomes.iter().map(|i| i.amount))?,
            money_sum(expenses.iter().map(|e| e.amount))?,
        )?;

        Ok(WorkDetail {
            work,
            budget,
            materials,
            incomes: Some(incomes),
            expenses: Some(expenses),
            final_invoice,
            balance: Some(balance),
        })
    }

    async fn create_work(&self, work: NewWork) -> Result<Work> {
        work.validate()?;
        let mut work = work.normalized();
        if let Some(budget_id) = work.budget_id.as_deref() {
            self.budgets.get_by_id(budget_id)?;
            if self.works.find_by_budget(budget_id)?.is_some() {
                return Err(Error::ConstraintViolation(format!(
                    "Budget '{}' already has a work",
                    budget_id
                )));
            }
        }
        if work.staff_id.is_some() && work.status == WorkStatus::Pending {
            work.status = WorkStatus::Assigned;
        }
        debug!("Creating work for {}", work.property_address);
        self.works.create(work).await
    }

    async fn update_work(&self, id: &str, update: WorkUpdate) -> Result<Work> {
        let current = self.works.get_by_id(id)?;
        let update = update.normalized();
        let status = if current.status == WorkStatus::Pending && update.staff_id.is_some() {
            WorkStatus::Assigned
        } else {
            current.status
        };
        self.works.update(id, update, status).await
    }

    async fn update_status(&self, id: &str, status: WorkStatus) -> Result<Work> {
        let current = self.works.get_by_id(id)?;
        if current.status == status {
            return Ok(current);
        }
        if !current.status.can_transition_to(status) {
            return Err(Error::InvalidTransition(format!(
                "Work cannot move from {} to {}",
                current.status, status
            )));
        }
        info!("Work {} moved from {} to {}", id, current.status, status);
        self.works.update_status(id, status).await
    }

    async fn delete_work(&self, id: &str) -> Result<()> {
        self.works.get_by_id(id)?;
        if let Some(invoice) = self.final_invoices.get_for_work(id)? {
            self.receipts
                .delete_for_owner(ReceiptOwner::FinalInvoice, &invoice.id)
                .await?;
        }
        self.works.delete(id).await?;
        Ok(())
    }
}
