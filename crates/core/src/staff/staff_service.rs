use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::staff_model::{normalize_email, NewStaff, Staff, StaffRole, StaffUpdate};
use super::staff_traits::{StaffRepositoryTrait, StaffServiceTrait};
use crate::errors::{Error, Result};

pub struct StaffService {
    repository: Arc<dyn StaffRepositoryTrait>,
}

impl StaffService {
    pub fn new(repository: Arc<dyn StaffRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl StaffServiceTrait for StaffService {
    fn list_staff(&self, is_active_filter: Option<bool>) -> Result<Vec<Staff>> {
        self.repository.list(is_active_filter)
    }

    fn get_staff(&self, staff_id: &str) -> Result<Staff> {
        self.repository.get_by_id(staff_id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Staff>> {
        self.repository.find_by_email(&normalize_email(email))
    }

    fn count_staff(&self) -> Result<i64> {
        self.repository.count()
    }

    async fn create_staff(&self, new_staff: NewStaff) -> Result<Staff> {
        new_staff.validate()?;
        let new_staff = new_staff.normalized();
        if self.repository.find_by_email(&new_staff.email)?.is_some() {
            return Err(Error::invalid(format!(
                "Email '{}' already exists",
                new_staff.email
            )));
        }
        debug!("Creating staff member {} ({})", new_staff.email, new_staff.role);
        self.repository.create(new_staff).await
    }

    async fn update_staff(&self, staff_id: &str, update: StaffUpdate) -> Result<Staff> {
        update.validate()?;
        let update = update.normalized();
        if let Some(existing) = self.repository.find_by_email(&update.email)? {
            if existing.id != staff_id {
                return Err(Error::invalid(format!(
                    "Email '{}' already exists",
                    update.email
                )));
            }
        }
        self.repository.update(staff_id, update).await
    }

    async fn set_password_hash(&self, staff_id: &str, password_hash: String) -> Result<()> {
        if password_hash.trim().is_empty() {
            return Err(Error::invalid("Password hash cannot be empty"));
        }
        // Surfaces a not-found error before the write.
        self.repository.get_by_id(staff_id)?;
        self.repository
            .set_password_hash(staff_id, password_hash)
            .await
    }

    async fn delete_staff(&self, staff_id: &str) -> Result<()> {
        let deleted = self.repository.delete(staff_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Staff", staff_id));
        }
        Ok(())
    }

    async fn ensure_bootstrap_owner(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<Option<Staff>> {
        if self.count_staff()? > 0 {
            return Ok(None);
        }
        let owner = NewStaff {
            name: "Owner".to_string(),
            email: email.to_string(),
            phone: None,
            role: StaffRole::Owner,
            is_active: true,
            password_hash: Some(password_hash),
        };
        let created = self.create_staff(owner).await?;
        info!("Seeded bootstrap owner account {}", created.email);
        Ok(Some(created))
    }
}
