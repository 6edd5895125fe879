use async_trait::async_trait;

use super::works_model::{NewWork, Work, WorkDetail, WorkFilter, WorkStatus, WorkUpdate};
use crate::errors::Result;

#[async_trait]
pub trait WorkRepositoryTrait: Send + Sync {
    async fn create(&self, work: NewWork) -> Result<Work>;
    async fn update(&self, id: &str, update: WorkUpdate, status: WorkStatus) -> Result<Work>;
    async fn update_status(&self, id: &str, status: WorkStatus) -> Result<Work>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Work>;
    fn find_by_budget(&self, budget_id: &str) -> Result<Option<Work>>;
    /// Works matching the filter, newest first.
    fn list(&self, filter: &WorkFilter) -> Result<Vec<Work>>;
}

#[async_trait]
pub trait WorkServiceTrait: Send + Sync {
    fn list_works(&self, filter: WorkFilter) -> Result<Vec<Work>>;
    fn get_work(&self, id: &str) -> Result<Work>;
    fn get_work_detail(&self, id: &str) -> Result<WorkDetail>;
    async fn create_work(&self, work: NewWork) -> Result<Work>;
    /// Updates staff, start date and notes. Assigning staff to a pending work
    /// moves it to `Assigned`.
    async fn update_work(&self, id: &str, update: WorkUpdate) -> Result<Work>;
    async fn update_status(&self, id: &str, status: WorkStatus) -> Result<Work>;
    async fn delete_work(&self, id: &str) -> Result<()>;
}
