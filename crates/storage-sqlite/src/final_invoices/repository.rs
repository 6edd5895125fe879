use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::{FinalInvoiceChangeset, FinalInvoiceDB, FinalInvoiceExtraItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::finance::insert_income;
use crate::schema::{final_invoice_extra_items, final_invoices};
use crate::utils::decimal_to_text;
use crate::works::advance_work_status;
use septic_core::final_invoices::{
    FinalInvoice, FinalInvoiceChanges, FinalInvoiceRepositoryTrait, FinalInvoiceStatus,
    FinalInvoiceUpdate, FinalPaymentResult, NewFinalInvoice, NewFinalInvoiceExtraItem,
    NewFinalPayment,
};
use septic_core::works::WorkStatus;
use septic_core::Result;

pub struct FinalInvoiceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FinalInvoiceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_invoice(conn: &mut SqliteConnection, id: &str) -> Result<FinalInvoice> {
    let row = final_invoices::table
        .find(id)
        .select(FinalInvoiceDB::as_select())
        .first(conn)
        .or_not_found("Final invoice", id)?;
    let items = final_invoice_extra_items::table
        .filter(final_invoice_extra_items::final_invoice_id.eq(id))
        .order(final_invoice_extra_items::created_at.asc())
        .select(FinalInvoiceExtraItemDB::as_select())
        .load(conn)
        .into_core()?;
    Ok(row.into_domain(items))
}

fn apply_changes(
    conn: &mut SqliteConnection,
    id: &str,
    changes: FinalInvoiceChanges,
) -> Result<FinalInvoice> {
    diesel::update(final_invoices::table.find(id))
        .set(&FinalInvoiceChangeset::new(changes, Utc::now().naive_utc()))
        .execute(conn)
        .into_core()?;
    load_invoice(conn, id)
}

/// A settled invoice means the work has been paid for.
fn advance_work(conn: &mut SqliteConnection, invoice: &FinalInvoice) -> Result<()> {
    let target = match invoice.status {
        FinalInvoiceStatus::Paid => WorkStatus::PaymentReceived,
        _ => WorkStatus::InvoiceFinal,
    };
    advance_work_status(conn, &invoice.work_id, target)
}

#[async_trait]
impl FinalInvoiceRepositoryTrait for FinalInvoiceRepository {
    async fn create(&self, invoice: NewFinalInvoice) -> Result<FinalInvoice> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalInvoice> {
                let row = FinalInvoiceDB::from_new(invoice, Utc::now().naive_utc());
                let id = row.id.clone();
                diesel::insert_into(final_invoices::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                let created = load_invoice(conn, &id)?;
                advance_work(conn, &created)?;
                Ok(created)
            })
            .await
    }

    async fn update(&self, id: &str, update: FinalInvoiceUpdate) -> Result<FinalInvoice> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalInvoice> {
                let changes = load_invoice(conn, &id)?.edit(&update)?;
                apply_changes(conn, &id, changes)
            })
            .await
    }

    async fn cancel(&self, id: &str) -> Result<FinalInvoice> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalInvoice> {
                let changes = load_invoice(conn, &id)?.cancellation()?;
                apply_changes(conn, &id, changes)
            })
            .await
    }

    async fn add_extra_item(
        &self,
        id: &str,
        item: NewFinalInvoiceExtraItem,
    ) -> Result<FinalInvoice> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalInvoice> {
                let changes = load_invoice(conn, &id)?.with_extra_item(&item)?;
                let row = FinalInvoiceExtraItemDB::from_new(&id, item, Utc::now().naive_utc());
                diesel::insert_into(final_invoice_extra_items::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                apply_changes(conn, &id, changes)
            })
            .await
    }

    async fn remove_extra_item(&self, id: &str, item_id: &str) -> Result<FinalInvoice> {
        let id = id.to_string();
        let item_id = item_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalInvoice> {
                let changes = load_invoice(conn, &id)?.without_extra_item(&item_id)?;
                diesel::delete(
                    final_invoice_extra_items::table
                        .filter(final_invoice_extra_items::id.eq(&item_id))
                        .filter(final_invoice_extra_items::final_invoice_id.eq(&id)),
                )
                .execute(conn)
                .into_core()?;
                apply_changes(conn, &id, changes)
            })
            .await
    }

    async fn register_payment(
        &self,
        id: &str,
        payment: NewFinalPayment,
    ) -> Result<FinalPaymentResult> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FinalPaymentResult> {
                let current = load_invoice(conn, &id)?;
                let (amount_paid, status) = current.settle(payment.amount)?;
                diesel::update(final_invoices::table.find(&id))
                    .set((
                        final_invoices::amount_paid.eq(decimal_to_text(amount_paid)),
                        final_invoices::status.eq(status.as_str()),
                        final_invoices::payment_date.eq(Some(payment.payment_date)),
                        final_invoices::payment_notes.eq(payment.notes.clone()),
                        final_invoices::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;

                let income = insert_income(conn, payment.income_for(&current.work_id))?;
                let invoice = load_invoice(conn, &id)?;
                advance_work(conn, &invoice)?;
                Ok(FinalPaymentResult { invoice, income })
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<FinalInvoice> {
        let mut conn = get_connection(&self.pool)?;
        load_invoice(&mut conn, id)
    }

    fn get_for_work(&self, work_id: &str) -> Result<Option<FinalInvoice>> {
        let mut conn = get_connection(&self.pool)?;
        let id: Option<String> = final_invoices::table
            .filter(final_invoices::work_id.eq(work_id))
            .select(final_invoices::id)
            .first(&mut conn)
            .optional()
            .into_core()?;
        id.map(|id| load_invoice(&mut conn, &id)).transpose()
    }
}
