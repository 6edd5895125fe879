use async_trait::async_trait;

use super::finance_model::{
    Expense, ExpenseFilter, Income, IncomeFilter, NewExpense, NewIncome,
};
use crate::errors::Result;

#[async_trait]
pub trait IncomeRepositoryTrait: Send + Sync {
    async fn create(&self, income: NewIncome) -> Result<Income>;
    async fn update(&self, id: &str, income: NewIncome) -> Result<Income>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Income>;
    /// Incomes matching the filter, newest first.
    fn list(&self, filter: &IncomeFilter) -> Result<Vec<Income>>;
}

#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    async fn create(&self, expense: NewExpense) -> Result<Expense>;
    async fn update(&self, id: &str, expense: NewExpense) -> Result<Expense>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Expense>;
    /// Expenses matching the filter, newest first.
    fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>>;
}

#[async_trait]
pub trait FinanceServiceTrait: Send + Sync {
    fn list_incomes(&self, filter: IncomeFilter) -> Result<Vec<Income>>;
    fn get_income(&self, id: &str) -> Result<Income>;
    async fn create_income(&self, income: NewIncome) -> Result<Income>;
    async fn update_income(&self, id: &str, income: NewIncome) -> Result<Income>;
    /// Deletes the income together with its receipts.
    async fn delete_income(&self, id: &str) -> Result<()>;

    fn list_expenses(&self, filter: ExpenseFilter) -> Result<Vec<Expense>>;
    fn get_expense(&self, id: &str) -> Result<Expense>;
    async fn create_expense(&self, expense: NewExpense) -> Result<Expense>;
    async fn update_expense(&self, id: &str, expense: NewExpense) -> Result<Expense>;
    /// Deletes the expense together with its receipts.
    async fn delete_expense(&self, id: &str) -> Result<()>;
}
