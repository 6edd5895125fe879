//! SQLite storage implementation for the septic back office.
//!
//! This crate is the only place in the application where Diesel is used. It
//! implements the repository traits defined in `septic-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Diesel migrations
//! - Repository implementations for every domain entity
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//!   septic-core (domain, traits)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Repository implementations
pub mod balance;
pub mod budget_items;
pub mod budgets;
pub mod final_invoices;
pub mod finance;
pub mod fixed_expenses;
pub mod materials;
pub mod permits;
pub mod receipts;
pub mod staff;
pub mod system_types;
pub mod works;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, OrNotFound, StorageError};

// Re-export from septic-core for convenience
pub use septic_core::errors::{DatabaseError, Error, Result};
