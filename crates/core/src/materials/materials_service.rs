use async_trait::async_trait;
use std::sync::Arc;

use super::materials_model::{Material, NewMaterial};
use super::materials_traits::{MaterialRepositoryTrait, MaterialServiceTrait};
use crate::errors::{Error, Result};
use crate::works::WorkRepositoryTrait;

pub struct MaterialService {
    repository: Arc<dyn MaterialRepositoryTrait>,
    works: Arc<dyn WorkRepositoryTrait>,
}

impl MaterialService {
    pub fn new(
        repository: Arc<dyn MaterialRepositoryTrait>,
        works: Arc<dyn WorkRepositoryTrait>,
    ) -> Self {
        Self { repository, works }
    }
}

#[async_trait]
impl MaterialServiceTrait for MaterialService {
    fn list_for_work(&self, work_id: &str) -> Result<Vec<Material>> {
        self.works.get_by_id(work_id)?;
        self.repository.list_for_work(work_id)
    }

    async fn add_material(&self, work_id: &str, material: NewMaterial) -> Result<Material> {
        material.validate()?;
        self.works.get_by_id(work_id)?;
        self.repository.create(work_id, material.normalized()).await
    }

    async fn update_material(&self, id: &str, material: NewMaterial) -> Result<Material> {
        material.validate()?;
        self.repository.get_by_id(id)?;
        self.repository.update(id, material.normalized()).await
    }

    async fn delete_material(&self, id: &str) -> Result<()> {
        if self.repository.delete(id).await? == 0 {
            return Err(Error::not_found("Material", id));
        }
        Ok(())
    }
}
