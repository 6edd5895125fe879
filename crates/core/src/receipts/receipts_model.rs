use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::ALLOWED_RECEIPT_MIME_TYPES;
use crate::errors::{Error, Result};

/// Kind of record a receipt belongs to. Receipts reference their owner by id
/// only, without a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptOwner {
    Income,
    Expense,
    Budget,
    FinalInvoice,
}

impl ReceiptOwner {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptOwner::Income => "INCOME",
            ReceiptOwner::Expense => "EXPENSE",
            ReceiptOwner::Budget => "BUDGET",
            ReceiptOwner::FinalInvoice => "FINAL_INVOICE",
        }
    }
}

impl fmt::Display for ReceiptOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceiptOwner {
    type Err = Error;

    /// Accepts `FINAL_INVOICE` as well as `FinalInvoice` / `finalinvoice`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match key.as_str() {
            "INCOME" => Ok(ReceiptOwner::Income),
            "EXPENSE" => Ok(ReceiptOwner::Expense),
            "BUDGET" => Ok(ReceiptOwner::Budget),
            "FINALINVOICE" => Ok(ReceiptOwner::FinalInvoice),
            _ => Err(Error::invalid(format!("Unknown receipt owner '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub related_model: ReceiptOwner,
    pub related_id: String,
    /// Original file name as uploaded.
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    /// Name of the file inside the receipts directory.
    #[serde(skip_serializing)]
    pub stored_name: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub related_model: ReceiptOwner,
    pub related_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    pub stored_name: String,
    pub notes: Option<String>,
}

/// An uploaded file waiting to be stored as a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub related_model: ReceiptOwner,
    pub related_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub notes: Option<String>,
    pub bytes: Vec<u8>,
}

impl ReceiptUpload {
    pub fn validate(&self) -> Result<()> {
        if self.related_id.trim().is_empty() {
            return Err(Error::invalid("relatedId is required"));
        }
        if self.bytes.is_empty() {
            return Err(Error::invalid("Uploaded file is empty"));
        }
        let mime = self.mime_type.to_ascii_lowercase();
        if !ALLOWED_RECEIPT_MIME_TYPES.contains(&mime.as_str()) {
            return Err(Error::invalid(format!(
                "Unsupported file type '{}'",
                self.mime_type
            )));
        }
        Ok(())
    }

    /// File extension used for the stored copy.
    pub(crate) fn extension(&self) -> &'static str {
        match self.mime_type.to_ascii_lowercase().as_str() {
            "application/pdf" => "pdf",
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}
