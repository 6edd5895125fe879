use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::StaffDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound, StorageError};
use crate::schema::staff;
use septic_core::staff::{NewStaff, Staff, StaffRepositoryTrait, StaffUpdate};
use septic_core::Result;

pub struct StaffRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StaffRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl StaffRepositoryTrait for StaffRepository {
    async fn create(&self, new_staff: NewStaff) -> Result<Staff> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Staff> {
                let now = Utc::now().naive_utc();
                let row = StaffDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_staff.name,
                    email: new_staff.email.to_lowercase(),
                    phone: new_staff.phone,
                    role: new_staff.role.as_str().to_string(),
                    is_active: new_staff.is_active,
                    password_hash: new_staff.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                let created = diesel::insert_into(staff::table)
                    .values(&row)
                    .returning(StaffDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(created.into())
            })
            .await
    }

    async fn update(&self, staff_id: &str, update: StaffUpdate) -> Result<Staff> {
        let staff_id = staff_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Staff> {
                let updated = diesel::update(staff::table.find(&staff_id))
                    .set((
                        staff::name.eq(update.name),
                        staff::email.eq(update.email.to_lowercase()),
                        staff::phone.eq(update.phone),
                        staff::role.eq(update.role.as_str()),
                        staff::is_active.eq(update.is_active),
                        staff::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(StaffDB::as_returning())
                    .get_result(conn)
                    .or_not_found("Staff", &staff_id)?;
                Ok(updated.into())
            })
            .await
    }

    async fn set_password_hash(&self, staff_id: &str, password_hash: String) -> Result<()> {
        let staff_id = staff_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(staff::table.find(&staff_id))
                    .set((
                        staff::password_hash.eq(Some(password_hash)),
                        staff::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(septic_core::Error::not_found("Staff", &staff_id));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, staff_id: &str) -> Result<usize> {
        let staff_id = staff_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(staff::table.find(staff_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, staff_id: &str) -> Result<Staff> {
        let mut conn = get_connection(&self.pool)?;
        staff::table
            .find(staff_id)
            .select(StaffDB::as_select())
            .first(&mut conn)
            .or_not_found("Staff", staff_id)
            .map(Staff::from)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Staff>> {
        let mut conn = get_connection(&self.pool)?;
        let found = staff::table
            .filter(staff::email.eq(email.trim().to_lowercase()))
            .select(StaffDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(found.map(Staff::from))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Staff>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = staff::table.into_boxed();
        if let Some(active) = is_active_filter {
            query = query.filter(staff::is_active.eq(active));
        }
        let rows = query
            .order(staff::name.asc())
            .select(StaffDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Staff::from).collect())
    }

    fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        staff::table.count().get_result(&mut conn).into_core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use septic_core::staff::StaffRole;

    #[tokio::test]
    async fn email_lookup_is_case_insensitive_and_hash_is_stored() {
        let db = test_db();
        let repo = StaffRepository::new(db.pool.clone(), db.writer.clone());
        assert_eq!(repo.count().unwrap(), 0);

        let created = repo
            .create(NewStaff {
                name: "Ana Ruiz".to_string(),
                email: "Ana@Example.com".to_string(),
                phone: None,
                role: StaffRole::Finance,
                is_active: true,
                password_hash: None,
            })
            .await
            .unwrap();
        assert_eq!(created.email, "ana@example.com");

        repo.set_password_hash(&created.id, "$argon2id$hash".to_string())
            .await
            .unwrap();
        let found = repo.find_by_email(" ANA@example.com ").unwrap().unwrap();
        assert_eq!(found.role, StaffRole::Finance);
        assert_eq!(found.password_hash.as_deref(), Some("$argon2id$hash"));

        assert_eq!(repo.list(Some(false)).unwrap().len(), 0);
        assert_eq!(repo.count().unwrap(), 1);
    }
}
