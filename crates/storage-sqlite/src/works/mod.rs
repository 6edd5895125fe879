//! SQLite storage implementation for works.

mod model;
mod repository;

pub(crate) use repository::advance_status as advance_work_status;

pub use model::WorkDB;
pub use repository::WorkRepository;
