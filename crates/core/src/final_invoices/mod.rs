//! Final invoices - the closing invoice of a work, after the initial payment.

mod final_invoices_model;
mod final_invoices_service;
mod final_invoices_traits;


pub use final_invoices_model::{
    final_amount_due, ExtraItemInput, FinalInvoice, FinalInvoiceChanges, FinalInvoiceExtraItem,
    FinalInvoiceStatus, FinalInvoiceUpdate, FinalPaymentInput, FinalPaymentResult,
    NewFinalInvoice, NewFinalInvoiceExtraItem, NewFinalPayment,
};
pub use final_invoices_service::FinalInvoiceService;
pub use final_invoices_traits::{FinalInvoiceRepositoryTrait, FinalInvoiceServiceTrait};
