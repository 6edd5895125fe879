//! Aggregate balance queries.

mod repository;

pub use repository::BalanceRepository;
