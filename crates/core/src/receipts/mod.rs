//! Receipts module - files attached to incomes, expenses, budgets and final invoices.

mod receipts_model;
mod receipts_service;
mod receipts_traits;

#[cfg(test)]
mod receipts_service_tests;

pub use receipts_model::{NewReceipt, Receipt, ReceiptOwner, ReceiptUpload};
pub use receipts_service::ReceiptService;
pub use receipts_traits::{ReceiptRepositoryTrait, ReceiptServiceTrait};
