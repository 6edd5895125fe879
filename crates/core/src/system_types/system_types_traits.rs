use async_trait::async_trait;

use super::system_types_model::{NewSystemType, SystemType, SystemTypeUpdate};
use crate::errors::Result;

#[async_trait]
pub trait SystemTypeRepositoryTrait: Send + Sync {
    async fn create(&self, new_type: NewSystemType) -> Result<SystemType>;
    async fn update(&self, id: &str, update: SystemTypeUpdate) -> Result<SystemType>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<SystemType>;
    fn find_by_name(&self, name: &str) -> Result<Option<SystemType>>;
    fn list(&self) -> Result<Vec<SystemType>>;
}

#[async_trait]
pub trait SystemTypeServiceTrait: Send + Sync {
    fn list_system_types(&self) -> Result<Vec<SystemType>>;
    fn get_system_type(&self, id: &str) -> Result<SystemType>;
    async fn create_system_type(&self, new_type: NewSystemType) -> Result<SystemType>;
    async fn update_system_type(&self, id: &str, update: SystemTypeUpdate) -> Result<SystemType>;
    async fn delete_system_type(&self, id: &str) -> Result<()>;
}
