use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::MaterialDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::materials;
use crate::utils::decimal_to_text;
use septic_core::materials::{Material, MaterialRepositoryTrait, NewMaterial};
use septic_core::Result;

pub struct MaterialRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MaterialRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl MaterialRepositoryTrait for MaterialRepository {
    async fn create(&self, work_id: &str, material: NewMaterial) -> Result<Material> {
        let work_id = work_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Material> {
                let row = MaterialDB {
                    id: Uuid::new_v4().to_string(),
                    work_id,
                    name: material.name,
                    quantity: decimal_to_text(material.quantity),
                    unit: material.unit,
                    comment: material.comment,
                    purchase_date: material.purchase_date,
                    created_at: Utc::now().naive_utc(),
                };
                diesel::insert_into(materials::table)
                    .values(&row)
                    .returning(MaterialDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Material::from)
            })
            .await
    }

    async fn update(&self, id: &str, material: NewMaterial) -> Result<Material> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Material> {
                diesel::update(materials::table.find(&id))
                    .set((
                        materials::name.eq(material.name),
                        materials::quantity.eq(decimal_to_text(material.quantity)),
                        materials::unit.eq(material.unit),
                        materials::comment.eq(material.comment),
                        materials::purchase_date.eq(material.purchase_date),
                    ))
                    .returning(MaterialDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Material", &id)
                    .map(Material::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(materials::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Material> {
        let mut conn = get_connection(&self.pool)?;
        materials::table
            .find(id)
            .select(MaterialDB::as_select())
            .first(&mut conn)
            .or_not_found("Material", id)
            .map(Material::from)
    }

    fn list_for_work(&self, work_id: &str) -> Result<Vec<Material>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = materials::table
            .filter(materials::work_id.eq(work_id))
            .order(materials::created_at.asc())
            .select(MaterialDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Material::from).collect())
    }
}
