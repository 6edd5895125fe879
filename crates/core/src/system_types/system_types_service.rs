use async_trait::async_trait;
use std::sync::Arc;

use super::system_types_model::{NewSystemType, SystemType, SystemTypeUpdate};
use super::system_types_traits::{SystemTypeRepositoryTrait, SystemTypeServiceTrait};
use crate::errors::{Error, Result};

pub struct SystemTypeService {
    repository: Arc<dyn SystemTypeRepositoryTrait>,
}

impl SystemTypeService {
    pub fn new(repository: Arc<dyn SystemTypeRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_name_free(&self, name: &str, own_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_name(name)? {
            Some(existing) if Some(existing.id.as_str()) != own_id => Err(Error::invalid(
                format!("System type '{}' already exists", name),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SystemTypeServiceTrait for SystemTypeService {
    fn list_system_types(&self) -> Result<Vec<SystemType>> {
        self.repository.list()
    }

    fn get_system_type(&self, id: &str) -> Result<SystemType> {
        self.repository.get_by_id(id)
    }

    async fn create_system_type(&self, new_type: NewSystemType) -> Result<SystemType> {
        new_type.validate()?;
        let new_type = new_type.normalized();
        self.ensure_name_free(&new_type.name, None)?;
        self.repository.create(new_type).await
    }

    async fn update_system_type(&self, id: &str, update: SystemTypeUpdate) -> Result<SystemType> {
        update.validate()?;
        let update = update.normalized();
        self.ensure_name_free(&update.name, Some(id))?;
        self.repository.update(id, update).await
    }

    async fn delete_system_type(&self, id: &str) -> Result<()> {
        if self.repository.delete(id).await? == 0 {
            return Err(Error::not_found("System type", id));
        }
        Ok(())
    }
}
