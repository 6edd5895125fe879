use async_trait::async_trait;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use super::receipts_model::{NewReceipt, Receipt, ReceiptOwner, ReceiptUpload};
use super::receipts_traits::{ReceiptRepositoryTrait, ReceiptServiceTrait};
use crate::constants::RECEIPTS_DIR;
use crate::errors::{Error, Result};
use crate::utils::FileStore;

pub struct ReceiptService {
    repository: Arc<dyn ReceiptRepositoryTrait>,
    files: Arc<FileStore>,
}

impl ReceiptService {
    pub fn new(repository: Arc<dyn ReceiptRepositoryTrait>, files: Arc<FileStore>) -> Self {
        Self { repository, files }
    }

    async fn remove_file(&self, receipt: &Receipt) {
        if let Err(e) = self.files.remove(RECEIPTS_DIR, &receipt.stored_name).await {
            warn!(
                "Failed to remove file {} of receipt {}: {}",
                receipt.stored_name, receipt.id, e
            );
        }
    }
}

#[async_trait]
impl ReceiptServiceTrait for ReceiptService {
    async fn upload_receipt(&self, upload: ReceiptUpload) -> Result<Receipt> {
        upload.validate()?;
        let owner_id = upload.related_id.trim().to_string();
        if !self.repository.owner_exists(upload.related_model, &owner_id)? {
            return Err(Error::not_found(upload.related_model.as_str(), &owner_id));
        }

        let sha256 = hex::encode(Sha256::digest(&upload.bytes));
        let stored_name = format!("{}.{}", Uuid::new_v4(), upload.extension());
        let file_name = match upload.file_name.trim() {
            "" => stored_name.clone(),
            name => name.to_string(),
        };
        self.files
            .save(RECEIPTS_DIR, &stored_name, &upload.bytes)
            .await?;

        let new_receipt = NewReceipt {
            related_model: upload.related_model,
            related_id: owner_id,
            file_name,
            mime_type: upload.mime_type.to_ascii_lowercase(),
            size: upload.bytes.len() as i64,
            sha256,
            stored_name: stored_name.clone(),
            notes: upload.notes.filter(|n| !n.trim().is_empty()),
        };
        match self.repository.create(new_receipt).await {
            Ok(receipt) => {
                debug!(
                    "Stored receipt {} for {} {}",
                    receipt.id, receipt.related_model, receipt.related_id
                );
                Ok(receipt)
            }
            Err(e) => {
                let _ = self.files.remove(RECEIPTS_DIR, &stored_name).await;
                Err(e)
            }
        }
    }

    fn list_for(&self, owner: ReceiptOwner, owner_id: &str) -> Result<Vec<Receipt>> {
        self.repository.list_for(owner, owner_id)
    }

    fn get_receipt(&self, id: &str) -> Result<Receipt> {
        self.repository.get_by_id(id)
    }

    async fn read_file(&self, id: &str) -> Result<(Receipt, Vec<u8>)> {
        let receipt = self.repository.get_by_id(id)?;
        let bytes = self.files.read(RECEIPTS_DIR, &receipt.stored_name).await?;
        Ok((receipt, bytes))
    }

    async fn delete_receipt(&self, id: &str) -> Result<()> {
        let receipt = self.repository.get_by_id(id)?;
        self.repository.delete(id).await?;
        self.remove_file(&receipt).await;
        Ok(())
    }

    async fn delete_for_owner(&self, owner: ReceiptOwner, owner_id: &str) -> Result<usize> {
        let removed = self.repository.delete_for_owner(owner, owner_id).await?;
        for receipt in &removed {
            self.remove_file(receipt).await;
        }
        Ok(removed.len())
    }
}
