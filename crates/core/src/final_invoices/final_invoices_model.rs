//! Final invoice models and amount arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::finance::{Income, IncomeType, NewIncome};
use crate::utils::{
    money_add, money_mul, money_sub, money_sum, round_money, validate_non_negative,
    validate_positive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalInvoiceStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Cancelled,
}

impl FinalInvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalInvoiceStatus::Pending => "PENDING",
            FinalInvoiceStatus::PartiallyPaid => "PARTIALLY_PAID",
            FinalInvoiceStatus::Paid => "PAID",
            FinalInvoiceStatus::Cancelled => "CANCELLED",
        }
    }

    /// Paid and cancelled invoices are closed.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            FinalInvoiceStatus::Pending | FinalInvoiceStatus::PartiallyPaid
        )
    }

    /// Status implied by the amount paid so far. Nothing left to pay means
    /// paid, including an invoice whose amount due is zero.
    pub fn for_payment(amount_due: Decimal, amount_paid: Decimal) -> Self {
        if amount_paid >= amount_due {
            FinalInvoiceStatus::Paid
        } else if amount_paid <= Decimal::ZERO {
            FinalInvoiceStatus::Pending
        } else {
            FinalInvoiceStatus::PartiallyPaid
        }
    }
}

impl fmt::Display for FinalInvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinalInvoiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(FinalInvoiceStatus::Pending),
            "PARTIALLY_PAID" => Ok(FinalInvoiceStatus::PartiallyPaid),
            "PAID" => Ok(FinalInvoiceStatus::Paid),
            "CANCELLED" => Ok(FinalInvoiceStatus::Cancelled),
            other => Err(Error::invalid(format!(
                "Unknown final invoice status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalInvoice {
    pub id: String,
    pub work_id: String,
    pub budget_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub original_budget_total: Decimal,
    pub initial_payment_made: Decimal,
    pub extra_items: Vec<FinalInvoiceExtraItem>,
    pub subtotal_extras: Decimal,
    pub discount: Decimal,
    pub final_amount_due: Decimal,
    pub amount_paid: Decimal,
    pub status: FinalInvoiceStatus,
    pub payment_date: Option<NaiveDate>,
    pub payment_notes: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FinalInvoice {
    pub fn balance_remaining(&self) -> Decimal {
        (self.final_amount_due - self.amount_paid).max(Decimal::ZERO)
    }

    pub fn ensure_open(&self) -> Result<()> {
        if !self.status.is_open() {
            return Err(Error::InvalidTransition(format!(
                "Final invoice is {} and can no longer be changed",
                self.status
            )));
        }
        Ok(())
    }

    /// Header values after a change to the extras, discount, date or notes.
    ///
    /// Once something has been paid the amount due must stay above it, so an
    /// edit never settles the invoice on its own.
    fn revise(
        &self,
        subtotal_extras: Decimal,
        discount: Decimal,
        invoice_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<FinalInvoiceChanges> {
        self.ensure_open()?;
        let due = final_amount_due(
            self.original_budget_total,
            subtotal_extras,
            discount,
            self.initial_payment_made,
        )?;
        if self.amount_paid > Decimal::ZERO && due <= self.amount_paid {
            return Err(Error::invalid(format!(
                "Final amount due {} cannot drop to or below the {} already paid",
                due, self.amount_paid
            )));
        }
        Ok(FinalInvoiceChanges {
            invoice_date,
            discount,
            notes,
            subtotal_extras,
            final_amount_due: due,
            status: FinalInvoiceStatus::for_payment(due, self.amount_paid),
        })
    }

    pub fn edit(&self, update: &FinalInvoiceUpdate) -> Result<FinalInvoiceChanges> {
        let discount = round_money(update.discount.unwrap_or(self.discount));
        validate_non_negative("discount", discount)?;
        let notes = match update.notes.as_deref().map(str::trim) {
            Some("") => None,
            Some(notes) => Some(notes.to_string()),
            None => self.notes.clone(),
        };
        self.revise(
            self.subtotal_extras,
            discount,
            update.invoice_date.unwrap_or(self.invoice_date),
            notes,
        )
    }

    pub fn with_extra_item(&self, item: &NewFinalInvoiceExtraItem) -> Result<FinalInvoiceChanges> {
        let extras = money_add(
            money_sum(self.extra_items.iter().map(|i| i.line_total))?,
            item.line_total,
        )?;
        self.revise(extras, self.discount, self.invoice_date, self.notes.clone())
    }

    pub fn without_extra_item(&self, item_id: &str) -> Result<FinalInvoiceChanges> {
        self.ensure_open()?;
        if !self.extra_items.iter().any(|i| i.id == item_id) {
            return Err(Error::not_found("Extra item", item_id));
        }
        let extras = money_sum(
            self.extra_items
                .iter()
                .filter(|i| i.id != item_id)
                .map(|i| i.line_total),
        )?;
        self.revise(extras, self.discount, self.invoice_date, self.notes.clone())
    }

    /// An open invoice without payments can be cancelled.
    pub fn cancellation(&self) -> Result<FinalInvoiceChanges> {
        self.ensure_open()?;
        if self.amount_paid > Decimal::ZERO {
            return Err(Error::InvalidTransition(
                "A final invoice with payments cannot be cancelled".to_string(),
            ));
        }
        Ok(FinalInvoiceChanges {
            invoice_date: self.invoice_date,
            discount: self.discount,
            notes: self.notes.clone(),
            subtotal_extras: self.subtotal_extras,
            final_amount_due: self.final_amount_due,
            status: FinalInvoiceStatus::Cancelled,
        })
    }

    /// Amount paid and status after taking `amount`. Overpayment is refused.
    pub fn settle(&self, amount: Decimal) -> Result<(Decimal, FinalInvoiceStatus)> {
        self.ensure_open()?;
        let amount_paid = money_add(self.amount_paid, amount)?;
        if amount_paid > self.final_amount_due {
            return Err(Error::invalid(format!(
                "Payment of {} exceeds the remaining balance of {}",
                amount,
                self.balance_remaining()
            )));
        }
        Ok((
            amount_paid,
            FinalInvoiceStatus::for_payment(self.final_amount_due, amount_paid),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalInvoiceExtraItem {
    pub id: String,
    pub final_invoice_id: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraItemInput {
    #[serde(default)]
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFinalInvoiceExtraItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFinalInvoice {
    pub work_id: String,
    pub budget_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub original_budget_total: Decimal,
    pub initial_payment_made: Decimal,
    pub subtotal_extras: Decimal,
    pub discount: Decimal,
    pub final_amount_due: Decimal,
    /// `Paid` when the initial payments already cover everything.
    pub status: FinalInvoiceStatus,
    pub notes: Option<String>,
}

/// Editable header fields. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalInvoiceUpdate {
    pub discount: Option<Decimal>,
    pub invoice_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Header values written back after any change to the invoice amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalInvoiceChanges {
    pub invoice_date: NaiveDate,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub subtotal_extras: Decimal,
    pub final_amount_due: Decimal,
    pub status: FinalInvoiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalPaymentInput {
    pub amount: Decimal,
    /// Defaults to today.
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// A validated payment against a final invoice. The invoice totals it
/// changes are worked out when it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFinalPayment {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub staff_id: Option<String>,
}

impl NewFinalPayment {
    /// The `FinalPayment` income booked against the invoice's work.
    pub fn income_for(&self, work_id: &str) -> NewIncome {
        NewIncome {
            date: self.payment_date,
            amount: self.amount,
            income_type: IncomeType::FinalPayment,
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
            work_id: Some(work_id.to_string()),
            staff_id: self.staff_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalPaymentResult {
    pub invoice: FinalInvoice,
    pub income: Income,
}

/// `original + extras - discount - initial payment`, never below zero.
pub fn final_amount_due(
    original_budget_total: Decimal,
    subtotal_extras: Decimal,
    discount: Decimal,
    initial_payment_made: Decimal,
) -> Result<Decimal> {
    let gross = money_add(original_budget_total, subtotal_extras)?;
    let credits = money_add(discount, initial_payment_made)?;
    Ok(round_money(money_sub(gross, credits)?.max(Decimal::ZERO)))
}

impl ExtraItemInput {
    pub fn into_new_item(self) -> Result<NewFinalInvoiceExtraItem> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(Error::invalid("Extra item description is required"));
        }
        validate_positive("quantity", self.quantity)?;
        validate_non_negative("unitPrice", self.unit_price)?;
        let unit_price = round_money(self.unit_price);
        Ok(NewFinalInvoiceExtraItem {
            description,
            quantity: self.quantity,
            unit_price,
            line_total: round_money(money_mul(self.quantity, unit_price)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_due_formula() {
        assert_eq!(
            final_amount_due(dec!(10000), dec!(850), dec!(350), dec!(6000)).unwrap(),
            dec!(4500)
        );
        assert_eq!(
            final_amount_due(dec!(1000), dec!(0), dec!(200), dec!(900)).unwrap(),
            Decimal::ZERO
        );
        assert!(final_amount_due(Decimal::MAX, Decimal::MAX, dec!(0), dec!(0)).is_err());
    }

    #[test]
    fn status_follows_amount_paid() {
        use FinalInvoiceStatus::*;
        assert_eq!(FinalInvoiceStatus::for_payment(dec!(100), dec!(0)), Pending);
        assert_eq!(FinalInvoiceStatus::for_payment(dec!(100), dec!(40)), PartiallyPaid);
        assert_eq!(FinalInvoiceStatus::for_payment(dec!(100), dec!(100)), Paid);
        assert_eq!(FinalInvoiceStatus::for_payment(dec!(0), dec!(0)), Paid);
        assert!(!Paid.is_open());
        assert!(!Cancelled.is_open());
    }

    #[test]
    fn extra_item_line_total() {
        let item = ExtraItemInput {
            description: " Extra 20ft of pipe ".into(),
            quantity: dec!(20),
            unit_price: dec!(4.125),
        }
        .into_new_item()
        .unwrap();
        assert_eq!(item.description, "Extra 20ft of pipe");
        assert_eq!(item.unit_price, dec!(4.13));
        assert_eq!(item.line_total, dec!(82.60));

        let huge = ExtraItemInput {
            description: "Everything".into(),
            quantity: Decimal::from(i64::MAX),
            unit_price: Decimal::from(i64::MAX),
        };
        assert!(huge.into_new_item().is_err());
    }

    fn open_invoice(due: Decimal, paid: Decimal) -> FinalInvoice {
        let now = chrono::Utc::now().naive_utc();
        FinalInvoice {
            id: "inv-1".into(),
            work_id: "work-1".into(),
            budget_id: None,
            invoice_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            original_budget_total: due,
            initial_payment_made: dec!(0),
            extra_items: Vec::new(),
            subtotal_extras: dec!(0),
            discount: dec!(0),
            final_amount_due: due,
            amount_paid: paid,
            status: FinalInvoiceStatus::for_payment(due, paid),
            payment_date: None,
            payment_notes: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn settle_counts_from_the_current_amount_paid() {
        let invoice = open_invoice(dec!(100), dec!(60));
        assert_eq!(
            invoice.settle(dec!(40)).unwrap(),
            (dec!(100), FinalInvoiceStatus::Paid)
        );
        let err = invoice.settle(dec!(60)).unwrap_err();
        assert!(err.to_string().contains("exceeds the remaining balance of 40"));
    }

    #[test]
    fn closed_invoices_refuse_every_change() {
        let mut invoice = open_invoice(dec!(100), dec!(0));
        invoice.status = FinalInvoiceStatus::Cancelled;
        assert!(matches!(invoice.settle(dec!(10)), Err(Error::InvalidTransition(_))));
        assert!(matches!(invoice.cancellation(), Err(Error::InvalidTransition(_))));
        assert!(matches!(
            invoice.edit(&FinalInvoiceUpdate::default()),
            Err(Error::InvalidTransition(_))
        ));
    }
}
