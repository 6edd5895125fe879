//! Work domain models and the installation status sequence.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::WorkBalance;
use crate::budgets::BudgetStatus;
use crate::errors::{Error, Result};
use crate::final_invoices::FinalInvoice;
use crate::finance::{Expense, Income};
use crate::materials::Material;

/// Installation progress of a work, in the order a job normally goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    Pending,
    Assigned,
    InProgress,
    Installed,
    FirstInspectionPending,
    RejectedInspection,
    ApprovedInspection,
    CoverPending,
    Covered,
    InvoiceFinal,
    PaymentReceived,
    Maintenance,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 12] = [
        WorkStatus::Pending,
        WorkStatus::Assigned,
        WorkStatus::InProgress,
        WorkStatus::Installed,
        WorkStatus::FirstInspectionPending,
        WorkStatus::RejectedInspection,
        WorkStatus::ApprovedInspection,
        WorkStatus::CoverPending,
        WorkStatus::Covered,
        WorkStatus::InvoiceFinal,
        WorkStatus::PaymentReceived,
        WorkStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "PENDING",
            WorkStatus::Assigned => "ASSIGNED",
            WorkStatus::InProgress => "IN_PROGRESS",
            WorkStatus::Installed => "INSTALLED",
            WorkStatus::FirstInspectionPending => "FIRST_INSPECTION_PENDING",
            WorkStatus::RejectedInspection => "REJECTED_INSPECTION",
            WorkStatus::ApprovedInspection => "APPROVED_INSPECTION",
            WorkStatus::CoverPending => "COVER_PENDING",
            WorkStatus::Covered => "COVERED",
            WorkStatus::InvoiceFinal => "INVOICE_FINAL",
            WorkStatus::PaymentReceived => "PAYMENT_RECEIVED",
            WorkStatus::Maintenance => "MAINTENANCE",
        }
    }

    /// Position in the installation sequence.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Statuses only move forward, except that a rejected inspection can be
    /// scheduled again.
    pub fn can_transition_to(&self, next: WorkStatus) -> bool {
        if *self == WorkStatus::RejectedInspection && next == WorkStatus::FirstInspectionPending {
            return true;
        }
        next.rank() > self.rank()
    }

    /// `target` when it lies ahead of this status. Automatic moves use this so
    /// they never take a work backwards.
    pub fn advanced_to(&self, target: WorkStatus) -> Option<WorkStatus> {
        (self.rank() < target.rank()).then_some(target)
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        WorkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| Error::invalid(format!("Unknown work status '{}'", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: String,
    pub budget_id: Option<String>,
    pub property_address: String,
    pub status: WorkStatus,
    /// Staff member in charge of the installation.
    pub staff_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub budget_id: Option<String>,
    #[serde(default)]
    pub property_address: String,
    #[serde(default = "default_status")]
    pub status: WorkStatus,
    pub staff_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

fn default_status() -> WorkStatus {
    WorkStatus::Pending
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkUpdate {
    pub staff_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatusUpdate {
    pub status: WorkStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkFilter {
    pub status: Option<WorkStatus>,
    pub staff_id: Option<String>,
}

/// The parts of the originating budget shown alongside a work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub id: String,
    pub applicant_name: String,
    pub status: BudgetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_payment: Option<Decimal>,
}

/// A work with everything recorded against it. The money fields are absent
/// in the view given to staff without finance access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetail {
    #[serde(flatten)]
    pub work: Work,
    pub budget: Option<BudgetSummary>,
    pub materials: Vec<Material>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomes: Option<Vec<Income>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Vec<Expense>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_invoice: Option<FinalInvoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<WorkBalance>,
}

impl WorkDetail {
    /// The work, its budget reference and materials, without any amounts.
    pub fn without_finances(self) -> Self {
        Self {
            budget: self.budget.map(|budget| BudgetSummary {
                total: None,
                initial_payment: None,
                ..budget
            }),
            incomes: None,
            expenses: None,
            final_invoice: None,
            balance: None,
            ..self
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewWork {
    pub fn validate(&self) -> Result<()> {
        if self.property_address.trim().is_empty() {
            return Err(Error::invalid("Property address is required"));
        }
        Ok(())
    }

    pub(crate) fn normalized(self) -> Self {
        Self {
            property_address: self.property_address.trim().to_string(),
            budget_id: blank_to_none(self.budget_id),
            staff_id: blank_to_none(self.staff_id),
            notes: blank_to_none(self.notes),
            ..self
        }
    }
}

impl WorkUpdate {
    pub(crate) fn normalized(self) -> Self {
        Self {
            staff_id: blank_to_none(self.staff_id),
            notes: blank_to_none(self.notes),
            ..self
        }
    }
}
