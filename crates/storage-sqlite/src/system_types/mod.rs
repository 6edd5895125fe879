mod model;
mod repository;

pub use model::SystemTypeDB;
pub use repository::SystemTypeRepository;
