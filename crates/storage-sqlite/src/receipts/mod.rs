//! SQLite storage for receipt metadata. File bytes live on disk.

mod model;
mod repository;

pub use model::ReceiptDB;
pub use repository::ReceiptRepository;
