use async_trait::async_trait;

use super::final_invoices_model::{
    ExtraItemInput, FinalInvoice, FinalInvoiceUpdate, FinalPaymentInput, FinalPaymentResult,
    NewFinalInvoice, NewFinalInvoiceExtraItem, NewFinalPayment,
};
use crate::errors::Result;

/// Every write loads the stored invoice inside its transaction and derives the
/// new totals from it, so concurrent edits and payments never overwrite each
/// other.
#[async_trait]
pub trait FinalInvoiceRepositoryTrait: Send + Sync {
    /// Inserts the invoice and moves the work forward to `INVOICE_FINAL`, or
    /// to `PAYMENT_RECEIVED` when the invoice is created already paid.
    async fn create(&self, invoice: NewFinalInvoice) -> Result<FinalInvoice>;
    async fn update(&self, id: &str, update: FinalInvoiceUpdate) -> Result<FinalInvoice>;
    async fn cancel(&self, id: &str) -> Result<FinalInvoice>;
    async fn add_extra_item(&self, id: &str, item: NewFinalInvoiceExtraItem)
        -> Result<FinalInvoice>;
    async fn remove_extra_item(&self, id: &str, item_id: &str) -> Result<FinalInvoice>;
    /// Updates the invoice, inserts the income and moves the work, atomically.
    async fn register_payment(
        &self,
        id: &str,
        payment: NewFinalPayment,
    ) -> Result<FinalPaymentResult>;
    fn get_by_id(&self, id: &str) -> Result<FinalInvoice>;
    fn get_for_work(&self, work_id: &str) -> Result<Option<FinalInvoice>>;
}

#[async_trait]
pub trait FinalInvoiceServiceTrait: Send + Sync {
    fn get_invoice(&self, id: &str) -> Result<FinalInvoice>;
    fn get_for_work(&self, work_id: &str) -> Result<FinalInvoice>;
    async fn generate_for_work(&self, work_id: &str) -> Result<FinalInvoice>;
    async fn update_invoice(&self, id: &str, update: FinalInvoiceUpdate) -> Result<FinalInvoice>;
    async fn cancel_invoice(&self, id: &str) -> Result<FinalInvoice>;
    async fn add_extra_item(&self, id: &str, item: ExtraItemInput) -> Result<FinalInvoice>;
    async fn remove_extra_item(&self, id: &str, item_id: &str) -> Result<FinalInvoice>;
    async fn register_payment(
        &self,
        id: &str,
        payment: FinalPaymentInput,
        staff_id: Option<String>,
    ) -> Result<FinalPaymentResult>;
}
