use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::finance::{ExpenseType, NewExpense};
use crate::utils::{add_months_clamped, round_money, validate_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "WEEKLY",
            Frequency::Biweekly => "BIWEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// The `n`-th due date counted from `anchor`.
    ///
    /// Month-based periods are computed from the anchor, not chained, so a
    /// schedule anchored on the 31st returns to the 31st after short months.
    pub fn nth_due_date(&self, anchor: NaiveDate, n: u32) -> NaiveDate {
        match self {
            Frequency::Weekly => anchor + Days::new(7 * u64::from(n)),
            Frequency::Biweekly => anchor + Days::new(14 * u64::from(n)),
            Frequency::Monthly => add_months_clamped(anchor, n),
            Frequency::Quarterly => add_months_clamped(anchor, 3 * n),
            Frequency::Yearly => add_months_clamped(anchor, 12 * n),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEEKLY" => Ok(Frequency::Weekly),
            "BIWEEKLY" => Ok(Frequency::Biweekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "QUARTERLY" => Ok(Frequency::Quarterly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(Error::invalid(format!("Unknown frequency '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    /// Type given to the generated expenses.
    pub expense_type: ExpenseType,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
    /// First due date of the current schedule. Reset when `next_due_date`
    /// is edited by hand.
    pub anchor_date: NaiveDate,
    /// Periods generated since `anchor_date`.
    pub periods_generated: u32,
    pub is_active: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FixedExpense {
    /// Due date of the given period of the current schedule.
    pub fn due_date(&self, period: u32) -> NaiveDate {
        self.frequency.nth_due_date(self.anchor_date, period)
    }

    fn expense_for(&self, date: NaiveDate) -> NewExpense {
        let notes = match &self.notes {
            Some(notes) => format!("{} - {}", self.name, notes),
            None => self.name.clone(),
        };
        NewExpense {
            date,
            amount: self.amount,
            expense_type: self.expense_type,
            payment_method: self.payment_method.clone(),
            notes: Some(notes),
            work_id: None,
            staff_id: None,
            fixed_expense_id: Some(self.id.clone()),
        }
    }

    /// Expenses for the periods due up to `today`, at most `max_periods` of
    /// them, and where the schedule stands afterwards.
    pub fn periods_due(&self, today: NaiveDate, max_periods: u32) -> GeneratedPeriods {
        let mut expenses = Vec::new();
        let mut period = self.periods_generated;
        let mut due = self.next_due_date;
        while due <= today && expenses.len() < max_periods as usize {
            expenses.push(self.expense_for(due));
            period += 1;
            due = self.due_date(period);
        }
        GeneratedPeriods {
            fixed_expense_id: self.id.clone(),
            planned_from: self.next_due_date,
            expenses,
            next_due_date: due,
            periods_generated: period,
        }
    }
}

/// The outcome of one generation run for a fixed expense.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPeriods {
    pub fixed_expense_id: String,
    /// Stored due date the run was planned from. Nothing is written when the
    /// schedule has moved on since.
    pub planned_from: NaiveDate,
    pub expenses: Vec<NewExpense>,
    pub next_due_date: NaiveDate,
    pub periods_generated: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFixedExpense {
    #[serde(default)]
    pub name: String,
    pub amount: Decimal,
    #[serde(default = "default_expense_type")]
    pub expense_type: ExpenseType,
    pub frequency: Frequency,
    pub next_due_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

fn default_expense_type() -> ExpenseType {
    ExpenseType::Fixed
}

fn default_active() -> bool {
    true
}

impl NewFixedExpense {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("Fixed expense name is required"));
        }
        validate_positive("amount", self.amount)
    }

    pub(crate) fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: self.name.trim().to_string(),
            amount: round_money(self.amount),
            payment_method: trim(self.payment_method),
            notes: trim(self.notes),
            ..self
        }
    }
}
