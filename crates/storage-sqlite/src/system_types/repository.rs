use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::SystemTypeDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::system_types;
use crate::utils::decimal_to_text;
use septic_core::system_types::{
    NewSystemType, SystemType, SystemTypeRepositoryTrait, SystemTypeUpdate,
};
use septic_core::Result;

pub struct SystemTypeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SystemTypeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SystemTypeRepositoryTrait for SystemTypeRepository {
    async fn create(&self, new_type: NewSystemType) -> Result<SystemType> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SystemType> {
                let now = Utc::now().naive_utc();
                let row = SystemTypeDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_type.name,
                    price: decimal_to_text(new_type.price),
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(system_types::table)
                    .values(&row)
                    .returning(SystemTypeDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(SystemType::from)
            })
            .await
    }

    async fn update(&self, id: &str, update: SystemTypeUpdate) -> Result<SystemType> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SystemType> {
                diesel::update(system_types::table.find(&id))
                    .set((
                        system_types::name.eq(update.name),
                        system_types::price.eq(decimal_to_text(update.price)),
                        system_types::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(SystemTypeDB::as_returning())
                    .get_result(conn)
                    .or_not_found("System type", &id)
                    .map(SystemType::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(system_types::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<SystemType> {
        let mut conn = get_connection(&self.pool)?;
        system_types::table
            .find(id)
            .select(SystemTypeDB::as_select())
            .first(&mut conn)
            .or_not_found("System type", id)
            .map(SystemType::from)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<SystemType>> {
        let mut conn = get_connection(&self.pool)?;
        let found = system_types::table
            .filter(system_types::name.eq(name))
            .select(SystemTypeDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(SystemType::from))
    }

    fn list(&self) -> Result<Vec<SystemType>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = system_types::table
            .order(system_types::name.asc())
            .select(SystemTypeDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(SystemType::from).collect())
    }
}
