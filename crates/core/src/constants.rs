/// Default share of a budget total requested as the initial payment, in percent.
pub const DEFAULT_INITIAL_PAYMENT_PERCENTAGE: u32 = 60;

/// Decimal places used for every stored monetary amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Mime types accepted for receipts and attachments.
pub const ALLOWED_RECEIPT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/webp",
];

/// Mime type accepted for permit documents.
pub const PERMIT_DOCUMENT_MIME_TYPE: &str = "application/pdf";

/// Sub-directory of the upload root that holds receipts.
pub const RECEIPTS_DIR: &str = "receipts";

/// Sub-directory of the upload root that holds permit PDFs.
pub const PERMITS_DIR: &str = "permits";
