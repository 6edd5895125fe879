//! Income and expense models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::utils::{round_money, validate_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeType {
    InitialPayment,
    FinalPayment,
    DesignDifference,
    Maintenance,
    Other,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::InitialPayment => "INITIAL_PAYMENT",
            IncomeType::FinalPayment => "FINAL_PAYMENT",
            IncomeType::DesignDifference => "DESIGN_DIFFERENCE",
            IncomeType::Maintenance => "MAINTENANCE",
            IncomeType::Other => "OTHER",
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INITIAL_PAYMENT" => Ok(IncomeType::InitialPayment),
            "FINAL_PAYMENT" => Ok(IncomeType::FinalPayment),
            "DESIGN_DIFFERENCE" => Ok(IncomeType::DesignDifference),
            "MAINTENANCE" => Ok(IncomeType::Maintenance),
            "OTHER" => Ok(IncomeType::Other),
            other => Err(Error::invalid(format!("Unknown income type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Materials,
    Workers,
    Fuel,
    Inspection,
    PermitFee,
    Equipment,
    Office,
    Fixed,
    Other,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Materials => "MATERIALS",
            ExpenseType::Workers => "WORKERS",
            ExpenseType::Fuel => "FUEL",
            ExpenseType::Inspection => "INSPECTION",
            ExpenseType::PermitFee => "PERMIT_FEE",
            ExpenseType::Equipment => "EQUIPMENT",
            ExpenseType::Office => "OFFICE",
            ExpenseType::Fixed => "FIXED",
            ExpenseType::Other => "OTHER",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MATERIALS" => Ok(ExpenseType::Materials),
            "WORKERS" => Ok(ExpenseType::Workers),
            "FUEL" => Ok(ExpenseType::Fuel),
            "INSPECTION" => Ok(ExpenseType::Inspection),
            "PERMIT_FEE" => Ok(ExpenseType::PermitFee),
            "EQUIPMENT" => Ok(ExpenseType::Equipment),
            "OFFICE" => Ok(ExpenseType::Office),
            "FIXED" => Ok(ExpenseType::Fixed),
            "OTHER" => Ok(ExpenseType::Other),
            other => Err(Error::invalid(format!("Unknown expense type '{}'", other))),
        }
    }
}

/// Money received, optionally tied to a work and the staff member who took it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub income_type: IncomeType,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Payload for creating or replacing an income.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub income_type: IncomeType,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub expense_type: ExpenseType,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    /// Set when the expense was generated from a recurring fixed expense.
    pub fixed_expense_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub expense_type: ExpenseType,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
    #[serde(default)]
    pub fixed_expense_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub income_type: Option<IncomeType>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub expense_type: Option<ExpenseType>,
    pub work_id: Option<String>,
    pub staff_id: Option<String>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::invalid("startDate must not be after endDate"));
        }
    }
    Ok(())
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        validate_positive("amount", self.amount)
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            amount: round_money(self.amount),
            payment_method: blank_to_none(self.payment_method),
            notes: blank_to_none(self.notes),
            work_id: blank_to_none(self.work_id),
            staff_id: blank_to_none(self.staff_id),
            ..self
        }
    }
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        validate_positive("amount", self.amount)
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            amount: round_money(self.amount),
            payment_method: blank_to_none(self.payment_method),
            notes: blank_to_none(self.notes),
            work_id: blank_to_none(self.work_id),
            staff_id: blank_to_none(self.staff_id),
            fixed_expense_id: blank_to_none(self.fixed_expense_id),
            ..self
        }
    }
}

impl IncomeFilter {
    pub fn validate(&self) -> Result<()> {
        validate_range(self.start_date, self.end_date)
    }
}

impl ExpenseFilter {
    pub fn validate(&self) -> Result<()> {
        validate_range(self.start_date, self.end_date)
    }
}
