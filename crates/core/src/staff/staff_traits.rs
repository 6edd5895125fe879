use async_trait::async_trait;

use super::staff_model::{NewStaff, Staff, StaffUpdate};
use crate::errors::Result;

/// Persistence contract for staff members.
#[async_trait]
pub trait StaffRepositoryTrait: Send + Sync {
    async fn create(&self, new_staff: NewStaff) -> Result<Staff>;
    async fn update(&self, staff_id: &str, update: StaffUpdate) -> Result<Staff>;
    async fn set_password_hash(&self, staff_id: &str, password_hash: String) -> Result<()>;
    async fn delete(&self, staff_id: &str) -> Result<usize>;
    fn get_by_id(&self, staff_id: &str) -> Result<Staff>;
    fn find_by_email(&self, email: &str) -> Result<Option<Staff>>;
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Staff>>;
    fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait StaffServiceTrait: Send + Sync {
    fn list_staff(&self, is_active_filter: Option<bool>) -> Result<Vec<Staff>>;
    fn get_staff(&self, staff_id: &str) -> Result<Staff>;
    fn find_by_email(&self, email: &str) -> Result<Option<Staff>>;
    fn count_staff(&self) -> Result<i64>;
    async fn create_staff(&self, new_staff: NewStaff) -> Result<Staff>;
    async fn update_staff(&self, staff_id: &str, update: StaffUpdate) -> Result<Staff>;
    async fn set_password_hash(&self, staff_id: &str, password_hash: String) -> Result<()>;
    async fn delete_staff(&self, staff_id: &str) -> Result<()>;

    /// Creates an owner account when no staff exists yet.
    ///
    /// Returns the created owner, or `None` when staff already existed.
    async fn ensure_bootstrap_owner(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<Option<Staff>>;
}
