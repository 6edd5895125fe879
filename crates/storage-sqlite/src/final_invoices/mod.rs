//! SQLite storage implementation for final invoices.

mod model;
mod repository;

pub use model::{FinalInvoiceDB, FinalInvoiceExtraItemDB};
pub use repository::FinalInvoiceRepository;
