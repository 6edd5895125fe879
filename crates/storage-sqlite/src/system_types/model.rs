use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::parse_decimal;
use septic_core::system_types::SystemType;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::system_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SystemTypeDB {
    pub id: String,
    pub name: String,
    pub price: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SystemTypeDB> for SystemType {
    fn from(db: SystemTypeDB) -> Self {
        Self {
            price: parse_decimal(&db.price, "system type price"),
            id: db.id,
            name: db.name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
