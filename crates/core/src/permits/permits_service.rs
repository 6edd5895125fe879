use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

use super::extractor::{extract_permit_fields, ExtractedPermitFields};
use super::pdf_text::pdf_to_text;
use super::permits_model::{Permit, PermitCheck, PermitInput};
use super::permits_traits::{PermitRepositoryTrait, PermitServiceTrait};
use crate::constants::PERMITS_DIR;
use crate::errors::{Error, Result};
use crate::utils::FileStore;

pub struct PermitService {
    repository: Arc<dyn PermitRepositoryTrait>,
    files: Arc<FileStore>,
}

impl PermitService {
    pub fn new(repository: Arc<dyn PermitRepositoryTrait>, files: Arc<FileStore>) -> Self {
        Self { repository, files }
    }

    fn ensure_unique(&self, input: &PermitInput, own_id: Option<&str>) -> Result<()> {
        let is_other = |p: &Permit| Some(p.id.as_str()) != own_id;
        if let Some(existing) = self.repository.find_by_permit_number(&input.permit_number)? {
            if is_other(&existing) {
                return Err(Error::invalid(format!(
                    "Permit number '{}' already exists",
                    input.permit_number
                )));
            }
        }
        if let Some(existing) = self.repository.find_by_address(&input.property_address)? {
            if is_other(&existing) {
                return Err(Error::invalid(format!(
                    "A permit for '{}' already exists",
                    input.property_address
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PermitServiceTrait for PermitService {
    fn list_permits(&self, search: Option<String>) -> Result<Vec<Permit>> {
        let search = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        self.repository.list(search.as_deref())
    }

    fn get_permit(&self, id: &str) -> Result<Permit> {
        self.repository.get_by_id(id)
    }

    fn find_by_address(&self, property_address: &str) -> Result<Option<Permit>> {
        let address = property_address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        self.repository.find_by_address(address)
    }

    fn check_permit(
        &self,
        permit_number: Option<String>,
        property_address: Option<String>,
    ) -> Result<PermitCheck> {
        let number = permit_number.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let address = property_address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        if number.is_none() && address.is_none() {
            return Err(Error::invalid("permitNumber or propertyAddress is required"));
        }

        let mut found = None;
        if let Some(number) = number {
            found = self.repository.find_by_permit_number(&number)?;
        }
        if found.is_none() {
            if let Some(address) = address {
                found = self.repository.find_by_address(&address)?;
            }
        }
        Ok(PermitCheck {
            exists: found.is_some(),
            permit_id: found.map(|p| p.id),
        })
    }

    async fn create_permit(&self, input: PermitInput) -> Result<Permit> {
        input.validate()?;
        let input = input.normalized();
        self.ensure_unique(&input, None)?;
        debug!("Creating permit {}", input.permit_number);
        self.repository.create(input).await
    }

    async fn update_permit(&self, id: &str, input: PermitInput) -> Result<Permit> {
        input.validate()?;
        let input = input.normalized();
        self.repository.get_by_id(id)?;
        self.ensure_unique(&input, Some(id))?;
        self.repository.update(id, input).await
    }

    async fn delete_permit(&self, id: &str) -> Result<()> {
        let permit = self.repository.get_by_id(id)?;
        self.repository.delete(id).await?;
        if let Some(file_name) = permit.pdf_file {
            if let Err(e) = self.files.remove(PERMITS_DIR, &file_name).await {
                warn!("Failed to remove PDF {} of permit {}: {}", file_name, id, e);
            }
        }
        Ok(())
    }

    async fn attach_pdf(&self, id: &str, bytes: Vec<u8>) -> Result<Permit> {
        if bytes.is_empty() {
            return Err(Error::invalid("Uploaded file is empty"));
        }
        if !bytes.starts_with(b"%PDF") {
            return Err(Error::invalid("Permit document must be a PDF"));
        }
        let permit = self.repository.get_by_id(id)?;
        let file_name = format!("{}.pdf", uuid::Uuid::new_v4());
        self.files.save(PERMITS_DIR, &file_name, &bytes).await?;

        let updated = match self.repository.set_pdf_file(id, file_name.clone()).await {
            Ok(updated) => updated,
            Err(e) => {
                let _ = self.files.remove(PERMITS_DIR, &file_name).await;
                return Err(e);
            }
        };
        if let Some(previous) = permit.pdf_file {
            if let Err(e) = self.files.remove(PERMITS_DIR, &previous).await {
                warn!("Failed to remove replaced permit PDF {}: {}", previous, e);
            }
        }
        Ok(updated)
    }

    async fn read_pdf(&self, id: &str) -> Result<Vec<u8>> {
        let permit = self.repository.get_by_id(id)?;
        let file_name = permit
            .pdf_file
            .ok_or_else(|| Error::NotFound(format!("PDF of permit '{}'", id)))?;
        self.files.read(PERMITS_DIR, &file_name).await
    }

    fn extract_from_pdf(&self, bytes: &[u8]) -> Result<ExtractedPermitFields> {
        if bytes.is_empty() {
            return Err(Error::invalid("Uploaded file is empty"));
        }
        let text = pdf_to_text(bytes)?;
        Ok(extract_permit_fields(&text))
    }

    fn extract_from_text(&self, text: &str) -> ExtractedPermitFields {
        extract_permit_fields(text)
    }
}
