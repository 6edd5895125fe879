use async_trait::async_trait;

use super::receipts_model::{NewReceipt, Receipt, ReceiptOwner, ReceiptUpload};
use crate::errors::Result;

#[async_trait]
pub trait ReceiptRepositoryTrait: Send + Sync {
    async fn create(&self, receipt: NewReceipt) -> Result<Receipt>;
    async fn delete(&self, id: &str) -> Result<usize>;
    /// Deletes every receipt of one owner and returns the removed rows.
    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>>;
    fn get_by_id(&self, id: &str) -> Result<Receipt>;
    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>>;
    fn list_for_many(&self, owner: ReceiptOwner, owner_ids: &[String]) -> Result<Vec<Receipt>>;
    /// True when the income, expense, budget or final invoice exists.
    fn owner_exists(&self, owner: ReceiptOwner, owner_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ReceiptServiceTrait: Send + Sync {
    async fn upload_receipt(&self, upload: ReceiptUpload) -> Result<Receipt>;
    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>>;
    fn get_receipt(&self, id: &str) -> Result<Receipt>;
    async fn read_file(&self, id: &str) -> Result<(Receipt, Vec<u8>)>;
    async fn delete_receipt(&self, id: &str) -> Result<()>;
    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<usize>;
}
