use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::budgets_model::{
    blank_to_none, Budget, BudgetFilter, BudgetInput, BudgetLineItemInput, BudgetStatus,
    InitialPaymentInput, InitialPaymentResult, NewBudget, NewBudgetLineItem, NewInitialPayment,
};
use super::budgets_totals::{compute_totals, line_total};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::budget_items::BudgetItemRepositoryTrait;
use crate::constants::DEFAULT_INITIAL_PAYMENT_PERCENTAGE;
use crate::errors::{Error, Result};
use crate::permits::PermitRepositoryTrait;
use crate::receipts::{ReceiptOwner, ReceiptServiceTrait};
use crate::utils::{round_money, today, validate_positive};
use crate::works::{NewWork, WorkStatus};

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    catalog: Arc<dyn BudgetItemRepositoryTrait>,
    permits: Arc<dyn PermitRepositoryTrait>,
    receipts: Arc<dyn ReceiptServiceTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        catalog: Arc<dyn BudgetItemRepositoryTrait>,
        permits: Arc<dyn PermitRepositoryTrait>,
        receipts: Arc<dyn ReceiptServiceTrait>,
    ) -> Self {
        Self {
            repository,
            catalog,
            permits,
            receipts,
        }
    }

    /// Fills omitted line fields from the referenced catalog item.
    fn resolve_line(&self, line: BudgetLineItemInput) -> Result<NewBudgetLineItem> {
        let budget_item_id = blank_to_none(line.budget_item_id);
        let catalog_item = match budget_item_id.as_deref() {
            Some(item_id) => Some(self.catalog.get_by_id(item_id)?),
            None => None,
        };

        let name = blank_to_none(line.name)
            .or_else(|| catalog_item.as_ref().map(|i| i.name.clone()))
            .ok_or_else(|| Error::invalid("Line item name is required"))?;
        let unit_price = line
            .unit_price
            .or_else(|| catalog_item.as_ref().map(|i| i.unit_price))
            .ok_or_else(|| Error::invalid(format!("Unit price is required for '{}'", name)))?;
        let category = blank_to_none(line.category)
            .or_else(|| catalog_item.as_ref().map(|i| i.category.clone()));
        let description = blank_to_none(line.description)
            .or_else(|| catalog_item.as_ref().and_then(|i| i.description.clone()));
        let unit_price = round_money(unit_price);

        Ok(NewBudgetLineItem {
            budget_item_id,
            name,
            category,
            description,
            quantity: line.quantity,
            unit_price,
            line_total: line_total(line.quantity, unit_price)?,
            notes: blank_to_none(line.notes),
        })
    }

    /// Validates the input, resolves line items and computes totals.
    fn build_budget(&self, input: BudgetInput, status: BudgetStatus) -> Result<NewBudget> {
        input.validate()?;

        let line_items = input
            .line_items
            .into_iter()
            .map(|line| self.resolve_line(line))
            .collect::<Result<Vec<_>>>()?;
        let percentage = input
            .initial_payment_percentage
            .unwrap_or_else(|| Decimal::from(DEFAULT_INITIAL_PAYMENT_PERCENTAGE));
        let totals = compute_totals(
            line_items.iter().map(|l| (l.quantity, l.unit_price)),
            input.discount_amount.unwrap_or(Decimal::ZERO),
            percentage,
        )?;

        let property_address = input.property_address.trim().to_string();
        let permit_id = match blank_to_none(input.permit_id) {
            Some(permit_id) => Some(self.permits.get_by_id(&permit_id)?.id),
            None => self
                .permits
                .find_by_address(&property_address)?
                .map(|permit| permit.id),
        };

        Ok(NewBudget {
            permit_id,
            property_address,
            applicant_name: input.applicant_name.trim().to_string(),
            date: input.date.unwrap_or_else(today),
            expiration_date: input.expiration_date,
            status,
            discount_description: blank_to_none(input.discount_description),
            discount_amount: totals.discount_amount,
            initial_payment_percentage: percentage,
            subtotal: totals.subtotal,
            total: totals.total,
            initial_payment: totals.initial_payment,
            general_notes: blank_to_none(input.general_notes),
            line_items,
        })
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(&self, mut filter: BudgetFilter) -> Result<Vec<Budget>> {
        filter.search = blank_to_none(filter.search);
        self.repository.list(&filter)
    }

    fn get_budget(&self, id: &str) -> Result<Budget> {
        self.repository.get_by_id(id)
    }

    async fn create_budget(&self, input: BudgetInput) -> Result<Budget> {
        let budget = self.build_budget(input, BudgetStatus::Draft)?;
        debug!(
            "Creating budget for {} with {} line items, total {}",
            budget.property_address,
            budget.line_items.len(),
            budget.total
        );
        self.repository.create(budget).await
    }

    async fn update_budget(&self, id: &str, input: BudgetInput) -> Result<Budget> {
        let current = self.repository.get_by_id(id)?;
        current.status.ensure_editable()?;
        let budget = self.build_budget(input, current.status)?;
        self.repository.update(id, budget).await
    }

    async fn delete_budget(&self, id: &str) -> Result<()> {
        self.repository.get_by_id(id)?;
        self.receipts
            .delete_for_owner(ReceiptOwner::Budget, id)
            .await?;
        self.repository.delete(id).await?;
        Ok(())
    }

    async fn update_status(&self, id: &str, status: BudgetStatus) -> Result<Budget> {
        let current = self.repository.get_by_id(id)?;
        current.status.ensure_transition(status)?;
        info!("Budget {} moved from {} to {}", id, current.status, status);
        self.repository.update_status(id, status).await
    }

    async fn record_initial_payment(
        &self,
        id: &str,
        input: InitialPaymentInput,
        staff_id: Option<String>,
    ) -> Result<InitialPaymentResult> {
        let budget = self.repository.get_by_id(id)?;
        budget.status.ensure_payable()?;
        let amount = round_money(input.amount.unwrap_or(budget.initial_payment));
        validate_positive("amount", amount)?;

        let payment = NewInitialPayment {
            budget_id: budget.id.clone(),
            amount,
            payment_date: input.payment_date.unwrap_or_else(today),
            payment_method: blank_to_none(input.payment_method),
            notes: blank_to_none(input.notes),
            staff_id,
            work: NewWork {
                budget_id: Some(budget.id.clone()),
                property_address: budget.property_address.clone(),
                status: WorkStatus::Pending,
                staff_id: None,
                start_date: None,
                notes: None,
            },
        };
        let result = self.repository.record_initial_payment(payment).await?;
        info!(
            "Recorded initial payment of {} for budget {}, work {} created",
            amount, id, result.work.id
        );
        Ok(result)
    }
}
