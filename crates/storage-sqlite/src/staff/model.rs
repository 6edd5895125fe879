//! Database models for staff.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::parse_enum;
use septic_core::staff::{Staff, StaffRole};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::staff)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StaffDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub password_hash: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<StaffDB> for Staff {
    fn from(db: StaffDB) -> Self {
        Self {
            role: parse_enum(&db.role, "staff role", StaffRole::Worker),
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            is_active: db.is_active,
            password_hash: db.password_hash,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
