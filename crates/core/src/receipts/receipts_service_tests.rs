use super::*;
use crate::errors::{Error, Result};
use crate::utils::FileStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

struct MockReceiptRepository {
    receipts: RwLock<Vec<Receipt>>,
    known_owners: Vec<(ReceiptOwner, String)>,
}

impl MockReceiptRepository {
    fn with_owner(owner: ReceiptOwner, id: &str) -> Self {
        Self {
            receipts: RwLock::new(Vec::new()),
            known_owners: vec![(owner, id.to_string())],
        }
    }
}

#[async_trait]
impl ReceiptRepositoryTrait for MockReceiptRepository {
    async fn create(&self, receipt: NewReceipt) -> Result<Receipt> {
        let mut receipts = self.receipts.write().unwrap();
        let created = Receipt {
            id: format!("rcpt-{}", receipts.len() + 1),
            related_model: receipt.related_model,
            related_id: receipt.related_id,
            file_name: receipt.file_name,
            mime_type: receipt.mime_type,
            size: receipt.size,
            sha256: receipt.sha256,
            stored_name: receipt.stored_name,
            notes: receipt.notes,
            created_at: Utc::now().naive_utc(),
        };
        receipts.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut receipts = self.receipts.write().unwrap();
        let before = receipts.len();
        receipts.retain(|r| r.id != id);
        Ok(before - receipts.len())
    }

    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        let mut receipts = self.receipts.write().unwrap();
        let (removed, kept): (Vec<_>, Vec<_>) = receipts
            .drain(..)
            .partition(|r| r.related_model == owner && r.related_id == owner_id);
        *receipts = kept;
        Ok(removed)
    }

    fn get_by_id(&self, id: &str) -> Result<Receipt> {
        self.receipts
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Receipt", id))
    }

    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        Ok(self
            .receipts
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.related_model == owner && r.related_id == owner_id)
            .cloned()
            .collect())
    }

    fn list_for_many(&self, owner: ReceiptOwner, owner_ids: &[String]) -> Result<Vec<Receipt>> {
        Ok(self
            .receipts
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.related_model == owner && owner_ids.contains(&r.related_id))
            .cloned()
            .collect())
    }

    fn owner_exists(&self, owner: ReceiptOwner, owner_id: &str) -> Result<bool> {
        Ok(self
            .known_owners
            .iter()
            .any(|(o, id)| *o == owner && id == owner_id))
    }
}

fn upload(owner_id: &str, bytes: &[u8]) -> ReceiptUpload {
    ReceiptUpload {
        related_model: ReceiptOwner::Expense,
        related_id: owner_id.to_string(),
        file_name: "gravel.png".to_string(),
        mime_type: "image/png".to_string(),
        notes: Some("   ".to_string()),
        bytes: bytes.to_vec(),
    }
}

#[tokio::test]
async fn upload_stores_file_with_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let service = ReceiptService::new(
        Arc::new(MockReceiptRepository::with_owner(ReceiptOwner::Expense, "exp-1")),
        Arc::new(FileStore::new(dir.path())),
    );

    let receipt = service.upload_receipt(upload("exp-1", b"abc")).await.unwrap();
    assert_eq!(
        receipt.sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(receipt.size, 3);
    assert_eq!(receipt.notes, None);
    assert!(receipt.stored_name.ends_with(".png"));

    let (_, bytes) = service.read_file(&receipt.id).await.unwrap();
    assert_eq!(bytes, b"abc");
}

#[tokio::test]
async fn upload_for_unknown_owner_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let service = ReceiptService::new(
        Arc::new(MockReceiptRepository::with_owner(ReceiptOwner::Expense, "exp-1")),
        Arc::new(FileStore::new(dir.path())),
    );
    let err = service.upload_receipt(upload("exp-404", b"abc")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_for_owner_removes_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileStore::new(dir.path()));
    let service = ReceiptService::new(
        Arc::new(MockReceiptRepository::with_owner(ReceiptOwner::Expense, "exp-1")),
        files.clone(),
    );
    let first = service.upload_receipt(upload("exp-1", b"one")).await.unwrap();
    service.upload_receipt(upload("exp-1", b"two")).await.unwrap();

    assert_eq!(
        service
            .delete_for_owner(ReceiptOwner::Expense, "exp-1")
            .await
            .unwrap(),
        2
    );
    assert!(service.list_for(ReceiptOwner::Expense, "exp-1").unwrap().is_empty());
    assert!(files
        .read(crate::constants::RECEIPTS_DIR, &first.stored_name)
        .await
        .is_err());
}
