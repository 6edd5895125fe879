use async_trait::async_trait;

use super::extractor::ExtractedPermitFields;
use super::permits_model::{Permit, PermitCheck, PermitInput};
use crate::errors::Result;

#[async_trait]
pub trait PermitRepositoryTrait: Send + Sync {
    async fn create(&self, input: PermitInput) -> Result<Permit>;
    async fn update(&self, id: &str, input: PermitInput) -> Result<Permit>;
    async fn set_pdf_file(&self, id: &str, file_name: String) -> Result<Permit>;
    async fn delete(&self, id: &str) -> Result<usize>;
    fn get_by_id(&self, id: &str) -> Result<Permit>;
    fn find_by_permit_number(&self, permit_number: &str) -> Result<Option<Permit>>;
    /// Case-insensitive match on the full property address.
    fn find_by_address(&self, property_address: &str) -> Result<Option<Permit>>;
    /// Permits whose address, number or applicant contains `search`, newest first.
    fn list(&self, search: Option<&str>) -> Result<Vec<Permit>>;
}

#[async_trait]
pub trait PermitServiceTrait: Send + Sync {
    fn list_permits(&self, search: Option<String>) -> Result<Vec<Permit>>;
    fn get_permit(&self, id: &str) -> Result<Permit>;
    fn find_by_address(&self, property_address: &str) -> Result<Option<Permit>>;
    fn check_permit(
        &self,
        permit_number: Option<String>,
        property_address: Option<String>,
    ) -> Result<PermitCheck>;
    async fn create_permit(&self, input: PermitInput) -> Result<Permit>;
    async fn update_permit(&self, id: &str, input: PermitInput) -> Result<Permit>;
    async fn delete_permit(&self, id: &str) -> Result<()>;

    /// Stores the permit PDF and records its file name on the permit.
    async fn attach_pdf(&self, id: &str, bytes: Vec<u8>) -> Result<Permit>;
    async fn read_pdf(&self, id: &str) -> Result<Vec<u8>>;

    /// Extracts permit fields from a PDF without persisting anything.
    fn extract_from_pdf(&self, bytes: &[u8]) -> Result<ExtractedPermitFields>;
    fn extract_from_text(&self, text: &str) -> ExtractedPermitFields;
}
