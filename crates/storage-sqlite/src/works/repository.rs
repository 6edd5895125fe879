use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use super::model::WorkDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::works;
use septic_core::works::{NewWork, Work, WorkFilter, WorkRepositoryTrait, WorkStatus, WorkUpdate};
use septic_core::Result;

pub struct WorkRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WorkRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Sets a work's status inside an open write transaction.
pub(crate) fn set_status(
    conn: &mut SqliteConnection,
    work_id: &str,
    status: WorkStatus,
) -> Result<Work> {
    diesel::update(works::table.find(work_id))
        .set((
            works::status.eq(status.as_str()),
            works::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(WorkDB::as_returning())
        .get_result(conn)
        .or_not_found("Work", work_id)
        .map(Work::from)
}

/// Moves a work forward to `target` unless it is already there or beyond.
pub(crate) fn advance_status(
    conn: &mut SqliteConnection,
    work_id: &str,
    target: WorkStatus,
) -> Result<()> {
    let current: String = works::table
        .find(work_id)
        .select(works::status)
        .first(conn)
        .or_not_found("Work", work_id)?;
    if let Some(next) = current.parse::<WorkStatus>()?.advanced_to(target) {
        set_status(conn, work_id, next)?;
    }
    Ok(())
}

#[async_trait]
impl WorkRepositoryTrait for WorkRepository {
    async fn create(&self, work: NewWork) -> Result<Work> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Work> {
                let row = WorkDB::from_new(work, Utc::now().naive_utc());
                diesel::insert_into(works::table)
                    .values(&row)
                    .returning(WorkDB::as_returning())
                    .get_result(conn)
                    .into_core()
                    .map(Work::from)
            })
            .await
    }

    async fn update(&self, id: &str, update: WorkUpdate, status: WorkStatus) -> Result<Work> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Work> {
                diesel::update(works::table.find(&id))
                    .set((
                        works::staff_id.eq(update.staff_id),
                        works::start_date.eq(update.start_date),
                        works::notes.eq(update.notes),
                        works::status.eq(status.as_str()),
                        works::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(WorkDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Work", &id)
                    .map(Work::from)
            })
            .await
    }

    async fn update_status(&self, id: &str, status: WorkStatus) -> Result<Work> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| set_status(conn, &id, status))
            .await
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let id = id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(works::table.find(id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, id: &str) -> Result<Work> {
        let mut conn = get_connection(&self.pool)?;
        works::table
            .find(id)
            .select(WorkDB::as_select())
            .first(&mut conn)
            .or_not_found("Work", id)
            .map(Work::from)
    }

    fn find_by_budget(&self, budget_id: &str) -> Result<Option<Work>> {
        let mut conn = get_connection(&self.pool)?;
        let found = works::table
            .filter(works::budget_id.eq(budget_id))
            .select(WorkDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(Work::from))
    }

    fn list(&self, filter: &WorkFilter) -> Result<Vec<Work>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = works::table.into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(works::status.eq(status.as_str()));
        }
        if let Some(staff_id) = filter.staff_id.as_deref() {
            query = query.filter(works::staff_id.eq(staff_id.to_string()));
        }
        let rows = query
            .order(works::created_at.desc())
            .select(WorkDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Work::from).collect())
    }
}
