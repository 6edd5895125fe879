use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::balance_model::{
    BalanceFilter, BalanceReport, ExpenseWithReceipts, IncomeWithReceipts, TypeTotal, WorkBalance,
};
use super::balance_traits::{BalanceRepositoryTrait, BalanceServiceTrait};
use super::export::write_balance_csv;
use crate::errors::Result;
use crate::finance::{ExpenseRepositoryTrait, IncomeRepositoryTrait};
use crate::receipts::{Receipt, ReceiptOwner, ReceiptRepositoryTrait};
use crate::utils::{money_add, money_sub, round_money};
use crate::works::WorkRepositoryTrait;

pub struct BalanceService {
    repository: Arc<dyn BalanceRepositoryTrait>,
    incomes: Arc<dyn IncomeRepositoryTrait>,
    expenses: Arc<dyn ExpenseRepositoryTrait>,
    receipts: Arc<dyn ReceiptRepositoryTrait>,
    works: Arc<dyn WorkRepositoryTrait>,
}

fn sum_totals(totals: &[TypeTotal]) -> Result<(Decimal, i64)> {
    totals
        .iter()
        .try_fold((Decimal::ZERO, 0), |(sum, count), t| {
            Ok((money_add(sum, t.total)?, count + t.count))
        })
}

/// Groups receipts by the id of the record they belong to.
fn index_receipts(receipts: Vec<Receipt>) -> HashMap<String, Vec<Receipt>> {
    let mut by_owner: HashMap<String, Vec<Receipt>> = HashMap::new();
    for receipt in receipts {
        by_owner
            .entry(receipt.related_id.clone())
            .or_default()
            .push(receipt);
    }
    by_owner
}

impl BalanceService {
    pub fn new(
        repository: Arc<dyn BalanceRepositoryTrait>,
        incomes: Arc<dyn IncomeRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        receipts: Arc<dyn ReceiptRepositoryTrait>,
        works: Arc<dyn WorkRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            incomes,
            expenses,
            receipts,
            works,
        }
    }
}

impl BalanceServiceTrait for BalanceService {
    fn get_balance(&self, filter: BalanceFilter) -> Result<BalanceReport> {
        filter.validate()?;

        let incomes_by_type = self.repository.income_totals(&filter)?;
        let expenses_by_type = self.repository.expense_totals(&filter)?;
        let (total_income, income_count) = sum_totals(&incomes_by_type)?;
        let (total_expense, expense_count) = sum_totals(&expenses_by_type)?;

        let incomes = self.incomes.list(&filter.income_filter())?;
        let expenses = self.expenses.list(&filter.expense_filter())?;

        let income_ids: Vec<String> = incomes.iter().map(|i| i.id.clone()).collect();
        let expense_ids: Vec<String> = expenses.iter().map(|e| e.id.clone()).collect();
        let mut income_receipts =
            index_receipts(self.receipts.list_for_many(ReceiptOwner::Income, &income_ids)?);
        let mut expense_receipts =
            index_receipts(self.receipts.list_for_many(ReceiptOwner::Expense, &expense_ids)?);

        let incomes = incomes
            .into_iter()
            .map(|income| IncomeWithReceipts {
                receipts: income_receipts.remove(&income.id).unwrap_or_default(),
                income,
            })
            .collect();
        let expenses = expenses
            .into_iter()
            .map(|expense| ExpenseWithReceipts {
                receipts: expense_receipts.remove(&expense.id).unwrap_or_default(),
                expense,
            })
            .collect();

        Ok(BalanceReport {
            total_income: round_money(total_income),
            total_expense: round_money(total_expense),
            balance: round_money(money_sub(total_income, total_expense)?),
            income_count,
            expense_count,
            incomes_by_type,
            expenses_by_type,
            incomes,
            expenses,
        })
    }

    fn get_work_balance(&self, work_id: &str) -> Result<WorkBalance> {
        self.works.get_by_id(work_id)?;
        let filter = BalanceFilter {
            work_id: Some(work_id.to_string()),
            ..Default::default()
        };
        let (income, _) = sum_totals(&self.repository.income_totals(&filter)?)?;
        let (expense, _) = sum_totals(&self.repository.expense_totals(&filter)?)?;
        WorkBalance::new(round_money(income), round_money(expense))
    }

    fn export_balance_csv(&self, filter: BalanceFilter) -> Result<Vec<u8>> {
        let report = self.get_balance(filter)?;

        let mut work_labels = HashMap::new();
        let work_ids = report
            .incomes
            .iter()
            .filter_map(|i| i.income.work_id.as_ref())
            .chain(report.expenses.iter().filter_map(|e| e.expense.work_id.as_ref()));
        for work_id in work_ids {
            if work_labels.contains_key(work_id) {
                continue;
            }
            match self.works.get_by_id(work_id) {
                Ok(work) => {
                    work_labels.insert(work_id.clone(), work.property_address);
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let mut out = Vec::new();
        write_balance_csv(&report, &work_labels, &mut out)?;
        Ok(out)
    }
}
