//! SQLite storage implementation for staff members.

mod model;
mod repository;

pub use model::StaffDB;
pub use repository::StaffRepository;
