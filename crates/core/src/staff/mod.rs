//! Staff module - office and field personnel, their roles and credentials.

mod staff_model;
mod staff_service;
mod staff_traits;

#[cfg(test)]
mod staff_service_tests;

pub use staff_model::{NewStaff, Staff, StaffRole, StaffUpdate};
pub use staff_service::StaffService;
pub use staff_traits::{StaffRepositoryTrait, StaffServiceTrait};
