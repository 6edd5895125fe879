use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::utils::parse_enum;
use septic_core::works::{NewWork, Work, WorkStatus};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::works)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkDB {
    pub id: String,
    pub budget_id: Option<String>,
    pub property_address: String,
    pub status: String,
    pub staff_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WorkDB {
    /// Row for a new work with a fresh id.
    pub fn from_new(work: NewWork, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            budget_id: work.budget_id,
            property_address: work.property_address,
            status: work.status.as_str().to_string(),
            staff_id: work.staff_id,
            start_date: work.start_date,
            notes: work.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<WorkDB> for Work {
    fn from(db: WorkDB) -> Self {
        Self {
            status: parse_enum(&db.status, "work status", WorkStatus::Pending),
            id: db.id,
            budget_id: db.budget_id,
            property_address: db.property_address,
            staff_id: db.staff_id,
            start_date: db.start_date,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
