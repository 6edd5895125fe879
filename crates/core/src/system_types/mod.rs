//! System types - the septic system designs offered, each with a base price.

mod system_types_model;
mod system_types_service;
mod system_types_traits;

#[cfg(test)]
mod system_types_service_tests;

pub use system_types_model::{NewSystemType, SystemType, SystemTypeUpdate};
pub use system_types_service::SystemTypeService;
pub use system_types_traits::{SystemTypeRepositoryTrait, SystemTypeServiceTrait};
