use async_trait::async_trait;

use super::materials_model::{Material, NewMaterial};
use crate::errors::Result;

#[async_trait]
pub trait MaterialRepositoryTrait: Send + Sync {
    async fn create(&self, work_id: &str, material: NewMaterial) -> Result<Material>;
    async fn update(&self, id: &str, material: NewMaterial) -> Result<Material>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Material>;
    fn list_for_work(&self, work_id: &str) -> Result<Vec<Material>>;
}

#[async_trait]
pub trait MaterialServiceTrait: Send + Sync {
    fn list_for_work(&self, work_id: &str) -> Result<Vec<Material>>;
    async fn add_material(&self, work_id: &str, material: NewMaterial) -> Result<Material>;
    async fn update_material(&self, id: &str, material: NewMaterial) -> Result<Material>;
    async fn delete_material(&self, id: &str) -> Result<()>;
}
