use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::parse_enum;
use septic_core::receipts::{NewReceipt, Receipt, ReceiptOwner};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::receipts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReceiptDB {
    pub id: String,
    pub related_model: String,
    pub related_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    pub stored_name: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ReceiptDB {
    pub fn from_new(receipt: NewReceipt, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            related_model: receipt.related_model.as_str().to_string(),
            related_id: receipt.related_id,
            file_name: receipt.file_name,
            mime_type: receipt.mime_type,
            size: receipt.size,
            sha256: receipt.sha256,
            stored_name: receipt.stored_name,
            notes: receipt.notes,
            created_at: now,
        }
    }
}

impl From<ReceiptDB> for Receipt {
    fn from(db: ReceiptDB) -> Self {
        Self {
            related_model: parse_enum(&db.related_model, "receipt owner", ReceiptOwner::Expense),
            id: db.id,
            related_id: db.related_id,
            file_name: db.file_name,
            mime_type: db.mime_type,
            size: db.size,
            sha256: db.sha256,
            stored_name: db.stored_name,
            notes: db.notes,
            created_at: db.created_at,
        }
    }
}
