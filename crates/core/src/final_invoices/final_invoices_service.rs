use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::final_invoices_model::{
    final_amount_due, ExtraItemInput, FinalInvoice, FinalInvoiceStatus, FinalInvoiceUpdate,
    FinalPaymentInput, FinalPaymentResult, NewFinalInvoice, NewFinalPayment,
};
use super::final_invoices_traits::{FinalInvoiceRepositoryTrait, FinalInvoiceServiceTrait};
use crate::budgets::BudgetRepositoryTrait;
use crate::errors::{Error, Result};
use crate::finance::{IncomeFilter, IncomeRepositoryTrait, IncomeType};
use crate::utils::{money_sum, round_money, today, validate_positive};
use crate::works::WorkRepositoryTrait;

pub struct FinalInvoiceService {
    repository: Arc<dyn FinalInvoiceRepositoryTrait>,
    works: Arc<dyn WorkRepositoryTrait>,
    budgets: Arc<dyn BudgetRepositoryTrait>,
    incomes: Arc<dyn IncomeRepositoryTrait>,
}

impl FinalInvoiceService {
    pub fn new(
        repository: Arc<dyn FinalInvoiceRepositoryTrait>,
        works: Arc<dyn WorkRepositoryTrait>,
        budgets: Arc<dyn BudgetRepositoryTrait>,
        incomes: Arc<dyn IncomeRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            works,
            budgets,
            incomes,
        }
    }
}

#[async_trait]
impl FinalInvoiceServiceTrait for FinalInvoiceService {
    fn get_invoice(&self, id: &str) -> Result<FinalInvoice> {
        self.repository.get_by_id(id)
    }

    fn get_for_work(&self, work_id: &str) -> Result<FinalInvoice> {
        self.works.get_by_id(work_id)?;
        self.repository
            .get_for_work(work_id)?
            .ok_or_else(|| Error::NotFound(format!("Final invoice for work '{}'", work_id)))
    }

    async fn generate_for_work(&self, work_id: &str) -> Result<FinalInvoice> {
        let work = self.works.get_by_id(work_id)?;
        let budget_id = work
            .budget_id
            .clone()
            .ok_or_else(|| Error::invalid("Work has no budget to invoice against"))?;
        if self.repository.get_for_work(work_id)?.is_some() {
            return Err(Error::ConstraintViolation(format!(
                "Work '{}' already has a final invoice",
                work_id
            )));
        }
        let budget = self.budgets.get_by_id(&budget_id)?;

        let initial_payments = self.incomes.list(&IncomeFilter {
            work_id: Some(work_id.to_string()),
            income_type: Some(IncomeType::InitialPayment),
            ..Default::default()
        })?;
        let initial_payment_made = if initial_payments.is_empty() {
            budget.initial_payment
        } else {
            round_money(money_sum(initial_payments.iter().map(|i| i.amount))?)
        };
        let due = final_amount_due(
            budget.total,
            Decimal::ZERO,
            Decimal::ZERO,
            initial_payment_made,
        )?;

        let invoice = NewFinalInvoice {
            work_id: work_id.to_string(),
            budget_id: Some(budget_id),
            invoice_date: today(),
            original_budget_total: budget.total,
            initial_payment_made,
            subtotal_extras: Decimal::ZERO,
            discount: Decimal::ZERO,
            final_amount_due: due,
            status: FinalInvoiceStatus::for_payment(due, Decimal::ZERO),
            notes: None,
        };

        let created = self.repository.create(invoice).await?;
        info!(
            "Generated final invoice {} for work {}: {} due, {}",
            created.id, work_id, created.final_amount_due, created.status
        );
        Ok(created)
    }

    async fn update_invoice(&self, id: &str, update: FinalInvoiceUpdate) -> Result<FinalInvoice> {
        self.repository.update(id, update).await
    }

    async fn cancel_invoice(&self, id: &str) -> Result<FinalInvoice> {
        info!("Cancelling final invoice {}", id);
        self.repository.cancel(id).await
    }

    async fn add_extra_item(&self, id: &str, item: ExtraItemInput) -> Result<FinalInvoice> {
        let item = item.into_new_item()?;
        debug!("Adding extra '{}' to final invoice {}", item.description, id);
        self.repository.add_extra_item(id, item).await
    }

    async fn remove_extra_item(&self, id: &str, item_id: &str) -> Result<FinalInvoice> {
        self.repository.remove_extra_item(id, item_id).await
    }

    async fn register_payment(
        &self,
        id: &str,
        payment: FinalPaymentInput,
        staff_id: Option<String>,
    ) -> Result<FinalPaymentResult> {
        let amount = round_money(payment.amount);
        validate_positive("amount", amount)?;
        let record = NewFinalPayment {
            amount,
            payment_date: payment.payment_date.unwrap_or_else(today),
            payment_method: payment
                .payment_method
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            notes: payment
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            staff_id,
        };
        let result = self.repository.register_payment(id, record).await?;
        info!(
            "Final invoice {} received {}, now {}",
            id, amount, result.invoice.status
        );
        Ok(result)
    }
}
