use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::{decimal_to_text, parse_decimal, parse_enum};
use septic_core::final_invoices::{
    FinalInvoice, FinalInvoiceChanges, FinalInvoiceExtraItem, FinalInvoiceStatus,
    NewFinalInvoice, NewFinalInvoiceExtraItem,
};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::final_invoices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FinalInvoiceDB {
    pub id: String,
    pub work_id: String,
    pub budget_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub original_budget_total: String,
    pub initial_payment_made: String,
    pub subtotal_extras: String,
    pub discount: String,
    pub final_amount_due: String,
    pub amount_paid: String,
    pub status: String,
    pub payment_date: Option<NaiveDate>,
    pub payment_notes: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::final_invoice_extra_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FinalInvoiceExtraItemDB {
    pub id: String,
    pub final_invoice_id: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::final_invoices)]
#[diesel(treat_none_as_null = true)]
pub struct FinalInvoiceChangeset {
    pub invoice_date: NaiveDate,
    pub discount: String,
    pub notes: Option<String>,
    pub subtotal_extras: String,
    pub final_amount_due: String,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

impl FinalInvoiceDB {
    pub fn from_new(invoice: NewFinalInvoice, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            work_id: invoice.work_id,
            budget_id: invoice.budget_id,
            invoice_date: invoice.invoice_date,
            original_budget_total: decimal_to_text(invoice.original_budget_total),
            initial_payment_made: decimal_to_text(invoice.initial_payment_made),
            subtotal_extras: decimal_to_text(invoice.subtotal_extras),
            discount: decimal_to_text(invoice.discount),
            final_amount_due: decimal_to_text(invoice.final_amount_due),
            amount_paid: "0".to_string(),
            status: invoice.status.as_str().to_string(),
            payment_date: None,
            payment_notes: None,
            notes: invoice.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_domain(self, extra_items: Vec<FinalInvoiceExtraItemDB>) -> FinalInvoice {
        FinalInvoice {
            original_budget_total: parse_decimal(&self.original_budget_total, "budget total"),
            initial_payment_made: parse_decimal(&self.initial_payment_made, "initial payment"),
            subtotal_extras: parse_decimal(&self.subtotal_extras, "extras subtotal"),
            discount: parse_decimal(&self.discount, "discount"),
            final_amount_due: parse_decimal(&self.final_amount_due, "final amount due"),
            amount_paid: parse_decimal(&self.amount_paid, "amount paid"),
            status: parse_enum(&self.status, "invoice status", FinalInvoiceStatus::Pending),
            extra_items: extra_items
                .into_iter()
                .map(FinalInvoiceExtraItem::from)
                .collect(),
            id: self.id,
            work_id: self.work_id,
            budget_id: self.budget_id,
            invoice_date: self.invoice_date,
            payment_date: self.payment_date,
            payment_notes: self.payment_notes,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl FinalInvoiceExtraItemDB {
    pub fn from_new(invoice_id: &str, item: NewFinalInvoiceExtraItem, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            final_invoice_id: invoice_id.to_string(),
            description: item.description,
            quantity: decimal_to_text(item.quantity),
            unit_price: decimal_to_text(item.unit_price),
            line_total: decimal_to_text(item.line_total),
            created_at: now,
        }
    }
}

impl FinalInvoiceChangeset {
    pub fn new(changes: FinalInvoiceChanges, now: NaiveDateTime) -> Self {
        Self {
            invoice_date: changes.invoice_date,
            discount: decimal_to_text(changes.discount),
            notes: changes.notes,
            subtotal_extras: decimal_to_text(changes.subtotal_extras),
            final_amount_due: decimal_to_text(changes.final_amount_due),
            status: changes.status.as_str().to_string(),
            updated_at: now,
        }
    }
}

impl From<FinalInvoiceExtraItemDB> for FinalInvoiceExtraItem {
    fn from(db: FinalInvoiceExtraItemDB) -> Self {
        Self {
            quantity: parse_decimal(&db.quantity, "extra quantity"),
            unit_price: parse_decimal(&db.unit_price, "extra unit price"),
            line_total: parse_decimal(&db.line_total, "extra line total"),
            id: db.id,
            final_invoice_id: db.final_invoice_id,
            description: db.description,
        }
    }
}
