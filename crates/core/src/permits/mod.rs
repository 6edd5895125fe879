//! Permits module - septic permits, their PDFs and field extraction.

mod extractor;
mod pdf_text;
mod permits_model;
mod permits_service;
mod permits_traits;


pub use extractor::{extract_permit_fields, parse_permit_date, ExtractedPermitFields};
pub use pdf_text::pdf_to_text;
pub use permits_model::{Permit, PermitCheck, PermitInput};
pub use permits_service::PermitService;
pub use permits_traits::{PermitRepositoryTrait, PermitServiceTrait};
