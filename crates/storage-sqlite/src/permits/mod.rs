//! SQLite storage implementation for permits.

mod model;
mod repository;

pub use model::{PermitChangeset, PermitDB};
pub use repository::PermitRepository;
