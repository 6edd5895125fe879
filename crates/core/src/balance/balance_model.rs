use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::finance::{Expense, ExpenseFilter, Income, IncomeFilter};
use crate::receipts::Receipt;
use crate::utils::money_sub;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
}

impl BalanceFilter {
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::invalid("startDate must not be after endDate"));
            }
        }
        Ok(())
    }

    pub fn income_filter(&self) -> IncomeFilter {
        IncomeFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            income_type: None,
            work_id: self.work_id.clone(),
            staff_id: self.staff_id.clone(),
        }
    }

    pub fn expense_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            expense_type: None,
            work_id: self.work_id.clone(),
            staff_id: self.staff_id.clone(),
        }
    }
}

/// Count and sum for one income or expense type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotal {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeWithReceipts {
    #[serde(flatten)]
    pub income: Income,
    pub receipts: Vec<Receipt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWithReceipts {
    #[serde(flatten)]
    pub expense: Expense,
    pub receipts: Vec<Receipt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_count: i64,
    pub expense_count: i64,
    pub incomes_by_type: Vec<TypeTotal>,
    pub expenses_by_type: Vec<TypeTotal>,
    pub incomes: Vec<IncomeWithReceipts>,
    pub expenses: Vec<ExpenseWithReceipts>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkBalance {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub profit: Decimal,
}

impl WorkBalance {
    pub fn new(total_income: Decimal, total_expense: Decimal) -> Result<Self> {
        Ok(Self {
            total_income,
            total_expense,
            profit: money_sub(total_income, total_expense)?,
        })
    }
}
