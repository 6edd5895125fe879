use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::utils::parse_decimal;
use septic_core::materials::Material;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::materials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MaterialDB {
    pub id: String,
    pub work_id: String,
    pub name: String,
    pub quantity: String,
    pub unit: Option<String>,
    pub comment: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl From<MaterialDB> for Material {
    fn from(db: MaterialDB) -> Self {
        Self {
            quantity: parse_decimal(&db.quantity, "material quantity"),
            id: db.id,
            work_id: db.work_id,
            name: db.name,
            unit: db.unit,
            comment: db.comment,
            purchase_date: db.purchase_date,
            created_at: db.created_at,
        }
    }
}
