//! Septic Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the septic construction back
//! office. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod balance;
pub mod budget_items;
pub mod budgets;
pub mod constants;
pub mod errors;
pub mod final_invoices;
pub mod finance;
pub mod fixed_expenses;
pub mod materials;
pub mod permits;
pub mod receipts;
pub mod staff;
pub mod system_types;
pub mod utils;
pub mod works;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
