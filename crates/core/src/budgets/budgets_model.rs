//! Budget domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::finance::Income;
use crate::works::{NewWork, Work};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Paid,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Draft => "DRAFT",
            BudgetStatus::Sent => "SENT",
            BudgetStatus::Approved => "APPROVED",
            BudgetStatus::Rejected => "REJECTED",
            BudgetStatus::Paid => "PAID",
        }
    }

    /// Manual status changes. `Paid` is only reached by recording the initial
    /// payment.
    pub fn can_transition_to(&self, next: BudgetStatus) -> bool {
        use BudgetStatus::*;
        matches!(
            (self, next),
            (Draft, Sent)
                | (Draft, Approved)
                | (Sent, Approved)
                | (Draft, Rejected)
                | (Sent, Rejected)
                | (Rejected, Draft)
        )
    }

    /// Approved and paid budgets are frozen.
    pub fn is_editable(&self) -> bool {
        !matches!(self, BudgetStatus::Approved | BudgetStatus::Paid)
    }

    pub fn ensure_editable(&self) -> Result<()> {
        if !self.is_editable() {
            return Err(Error::InvalidTransition(format!(
                "Budget in status {} can no longer be edited",
                self
            )));
        }
        Ok(())
    }

    pub fn ensure_transition(&self, next: BudgetStatus) -> Result<()> {
        if !self.can_transition_to(next) {
            let hint = if next == BudgetStatus::Paid {
                " (record the initial payment instead)"
            } else {
                ""
            };
            return Err(Error::InvalidTransition(format!(
                "Budget cannot move from {} to {}{}",
                self, next, hint
            )));
        }
        Ok(())
    }

    /// Only approved budgets take the initial payment.
    pub fn ensure_payable(&self) -> Result<()> {
        if *self != BudgetStatus::Approved {
            return Err(Error::InvalidTransition(format!(
                "Initial payment requires an approved budget, budget is {}",
                self
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(BudgetStatus::Draft),
            "SENT" => Ok(BudgetStatus::Sent),
            "APPROVED" => Ok(BudgetStatus::Approved),
            "REJECTED" => Ok(BudgetStatus::Rejected),
            "PAID" => Ok(BudgetStatus::Paid),
            other => Err(Error::invalid(format!("Unknown budget status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub permit_id: Option<String>,
    pub property_address: String,
    pub applicant_name: String,
    pub date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub status: BudgetStatus,
    pub discount_description: Option<String>,
    pub discount_amount: Decimal,
    pub initial_payment_percentage: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub initial_payment: Decimal,
    pub general_notes: Option<String>,
    pub line_items: Vec<BudgetLineItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItem {
    pub id: String,
    pub budget_id: String,
    /// Catalog item the line was built from, if any.
    pub budget_item_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// Line item as sent by clients. Name, category and unit price may be left
/// out when a catalog item is referenced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLineItemInput {
    pub budget_item_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub notes: Option<String>,
}

/// Budget payload for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub permit_id: Option<String>,
    #[serde(default)]
    pub property_address: String,
    #[serde(default)]
    pub applicant_name: String,
    pub date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub discount_description: Option<String>,
    pub discount_amount: Option<Decimal>,
    pub initial_payment_percentage: Option<Decimal>,
    pub general_notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<BudgetLineItemInput>,
}

/// A resolved line item with its total computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetLineItem {
    pub budget_item_id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// A validated budget with computed totals, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub permit_id: Option<String>,
    pub property_address: String,
    pub applicant_name: String,
    pub date: NaiveDate,
    pub expiration_date: Option<NaiveDate>,
    pub status: BudgetStatus,
    pub discount_description: Option<String>,
    pub discount_amount: Decimal,
    pub initial_payment_percentage: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub initial_payment: Decimal,
    pub general_notes: Option<String>,
    pub line_items: Vec<NewBudgetLineItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetFilter {
    pub status: Option<BudgetStatus>,
    /// Substring of the address or applicant name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusUpdate {
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPaymentInput {
    /// Defaults to the budget's computed initial payment.
    pub amount: Option<Decimal>,
    /// Defaults to today.
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Everything written when a budget's initial payment is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInitialPayment {
    pub budget_id: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub staff_id: Option<String>,
    pub work: NewWork,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitialPaymentResult {
    pub budget: Budget,
    pub work: Work,
    pub income: Income,
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BudgetInput {
    pub fn validate(&self) -> Result<()> {
        if self.property_address.trim().is_empty() {
            return Err(Error::invalid("Property address is required"));
        }
        if self.applicant_name.trim().is_empty() {
            return Err(Error::invalid("Applicant name is required"));
        }
        if self.line_items.is_empty() {
            return Err(Error::invalid("A budget needs at least one line item"));
        }
        if let (Some(date), Some(expiration)) = (self.date, self.expiration_date) {
            if expiration < date {
                return Err(Error::invalid("expirationDate must not be before date"));
            }
        }
        Ok(())
    }
}
