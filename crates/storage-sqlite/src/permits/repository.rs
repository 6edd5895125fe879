use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{PermitChangeset, PermitDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::permits;
use septic_core::permits::{Permit, PermitInput, PermitRepositoryTrait};
use septic_core::Result;

pub struct PermitRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PermitRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PermitRepositoryTrait for PermitRepository {
    async fn create(&self, input: PermitInput) -> Result<Permit> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Permit> {
                let row =
                    PermitDB::from_input(Uuid::new_v4().to_string(), input, Utc::now().naive_utc());
                diesel::insert_into(permits::table)
                    .values(&row)
                    .returning(PermitDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Permit::from)
            })
            .await
    }

    async fn update(&self, id: &str, input: PermitInput) -> Result<Permit> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Permit> {
                let changes = PermitChangeset::from_input(input, Utc::now().naive_utc());
                diesel::update(permits::table.find(&id))
                    .set(&changes)
                    .returning(PermitDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Permit", &id)
                    .map(Permit::from)
            })
            .await
    }

    async fn set_pdf_file(&self, id: &str, file_name: String) -> Result<Permit> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Permit> {
                diesel::update(permits::table.find(&id))
                    .set((
                        permits::pdf_file.eq(Some(file_name)),
                        permits::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(PermitDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Permit", &id)
                    .map(Permit::from)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(permits::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Permit> {
        let mut conn = get_connection(&self.pool)?;
        permits::table
            .find(id)
            .select(PermitDB::as_select())
            .first(&mut conn)
            .or_not_found("Permit", id)
            .map(Permit::from)
    }

    fn find_by_permit_number(&self, permit_number: &str) -> Result<Option<Permit>> {
        let mut conn = get_connection(&self.pool)?;
        let found = permits::table
            .filter(permits::permit_number.eq(permit_number.trim()))
            .select(PermitDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(Permit::from))
    }

    fn find_by_address(&self, property_address: &str) -> Result<Option<Permit>> {
        let mut conn = get_connection(&self.pool)?;
        // The column is declared COLLATE NOCASE, so equality ignores case.
        let found = permits::table
            .filter(permits::property_address.eq(property_address.trim()))
            .select(PermitDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(Permit::from))
    }

    fn list(&self, search: Option<&str>) -> Result<Vec<Permit>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = permits::table.into_boxed();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(
                permits::property_address
                    .like(pattern.clone())
                    .or(permits::permit_number.like(pattern.clone()))
                    .or(permits::applicant_name.like(pattern)),
            );
        }
        let rows = query
            .order(permits::created_at.desc())
            .select(PermitDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Permit::from).collect())
    }
}
