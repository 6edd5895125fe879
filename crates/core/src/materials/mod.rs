//! Materials used on a work.

mod materials_model;
mod materials_service;
mod materials_traits;

pub use materials_model::{Material, NewMaterial};
pub use materials_service::MaterialService;
pub use materials_traits::{MaterialRepositoryTrait, MaterialServiceTrait};
