use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::finance_model::{
    Expense, ExpenseFilter, Income, IncomeFilter, NewExpense, NewIncome,
};
use super::finance_traits::{ExpenseRepositoryTrait, FinanceServiceTrait, IncomeRepositoryTrait};
use crate::errors::Result;
use crate::receipts::{ReceiptOwner, ReceiptServiceTrait};

pub struct FinanceService {
    incomes: Arc<dyn IncomeRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    receipts: Arc<dyn ReceiptServiceTrait>,
}

impl FinanceService {
    pub fn new(
        incomes: Arc<dyn IncomeRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        receipts: Arc<dyn ReceiptServiceTrait>,
    ) -> Self {
        Self {
            incomes,
            expenses,
            receipts,
        }
    }
}

#[async_trait]
impl FinanceServiceTrait for FinanceService {
    fn list_incomes(&self, filter: IncomeFilter) -> Result<Vec<Income>> {
        filter.validate()?;
        self.incomes.list(&filter)
    }

    fn get_income(&self, id: &str) -> Result<Income> {
        self.incomes.get_by_id(id)
    }

    async fn create_income(&self, income: NewIncome) -> Result<Income> {
        income.validate()?;
        let income = income.normalized();
        debug!("Recording {} income of {}", income.income_type, income.amount);
        self.incomes.create(income).await
    }

    async fn update_income(&self, id: &str, income: NewIncome) -> Result<Income> {
        income.validate()?;
        self.incomes.get_by_id(id)?;
        self.incomes.update(id, income.normalized()).await
    }

    async fn delete_income(&self, id: &str) -> Result<()> {
        self.incomes.get_by_id(id)?;
        self.receipts.delete_for_owner(ReceiptOwner::Income, id).await?;
        self.incomes.delete(id).await?;
        Ok(())
    }

    fn list_expenses(&self, filter: ExpenseFilter) -> Result<Vec<Expense>> {
        filter.validate()?;
        self.expenses.list(&filter)
    }

    fn get_expense(&self, id: &str) -> Result<Expense> {
        self.expenses.get_by_id(id)
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<Expense> {
        expense.validate()?;
        let expense = expense.normalized();
        debug!("Recording {} expense of {}", expense.expense_type, expense.amount);
        self.expenses.create(expense).await
    }

    async fn update_expense(&self, id: &str, expense: NewExpense) -> Result<Expense> {
        expense.validate()?;
        self.expenses.get_by_id(id)?;
        self.expenses.update(id, expense.normalized()).await
    }

    async fn delete_expense(&self, id: &str) -> Result<()> {
        self.expenses.get_by_id(id)?;
        self.receipts.delete_for_owner(ReceiptOwner::Expense, id).await?;
        self.expenses.delete(id).await?;
        Ok(())
    }
}
