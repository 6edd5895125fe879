//! Unit tests for the staff service.

use super::*;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct MockStaffRepository {
    staff: RwLock<Vec<Staff>>,
}

#[async_trait]
impl StaffRepositoryTrait for MockStaffRepository {
    async fn create(&self, new_staff: NewStaff) -> Result<Staff> {
        let now = Utc::now().naive_utc();
        let mut staff = self.staff.write().unwrap();
        let created = Staff {
            id: format!("staff-{}", staff.len() + 1),
            name: new_staff.name,
            email: new_staff.email,
            phone: new_staff.phone,
            role: new_staff.role,
            is_active: new_staff.is_active,
            password_hash: new_staff.password_hash,
            created_at: now,
            updated_at: now,
        };
        staff.push(created.clone());
        Ok(created)
    }

    async fn update(&self, staff_id: &str, update: StaffUpdate) -> Result<Staff> {
        let mut staff = self.staff.write().unwrap();
        let existing = staff
            .iter_mut()
            .find(|s| s.id == staff_id)
            .ok_or_else(|| Error::not_found("Staff", staff_id))?;
        existing.name = update.name;
        existing.email = update.email;
        existing.phone = update.phone;
        existing.role = update.role;
        existing.is_active = update.is_active;
        Ok(existing.clone())
    }

    async fn set_password_hash(&self, staff_id: &str, password_hash: String) -> Result<()> {
        let mut staff = self.staff.write().unwrap();
        if let Some(existing) = staff.iter_mut().find(|s| s.id == staff_id) {
            existing.password_hash = Some(password_hash);
        }
        Ok(())
    }

    async fn delete(&self, staff_id: &str) -> Result<usize> {
        let mut staff = self.staff.write().unwrap();
        let before = staff.len();
        staff.retain(|s| s.id != staff_id);
        Ok(before - staff.len())
    }

    fn get_by_id(&self, staff_id: &str) -> Result<Staff> {
        self.staff
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == staff_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Staff", staff_id))
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Staff>> {
        Ok(self
            .staff
            .read()
            .unwrap()
            .iter()
            .find(|s| s.email == email)
            .cloned())
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Staff>> {
        let staff = self.staff.read().unwrap();
        Ok(match is_active_filter {
            Some(active) => staff.iter().filter(|s| s.is_active == active).cloned().collect(),
            None => staff.clone(),
        })
    }

    fn count(&self) -> Result<i64> {
        Ok(self.staff.read().unwrap().len() as i64)
    }
}

fn service() -> StaffService {
    StaffService::new(Arc::new(MockStaffRepository::default()))
}

fn new_staff(email: &str, role: StaffRole) -> NewStaff {
    NewStaff {
        name: "Marta Ruiz".to_string(),
        email: email.to_string(),
        phone: None,
        role,
        is_active: true,
        password_hash: None,
    }
}

#[tokio::test]
async fn create_staff_lowercases_email() {
    let service = service();
    let created = service
        .create_staff(new_staff("  Marta@Example.COM ", StaffRole::Recept))
        .await
        .unwrap();
    assert_eq!(created.email, "marta@example.com");
    assert!(service.find_by_email("MARTA@example.com").unwrap().is_some());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let service = service();
    service
        .create_staff(new_staff("crew@example.com", StaffRole::Worker))
        .await
        .unwrap();
    let err = service
        .create_staff(new_staff("Crew@example.com", StaffRole::Finance))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn update_keeps_own_email() {
    let service = service();
    let created = service
        .create_staff(new_staff("office@example.com", StaffRole::Recept))
        .await
        .unwrap();
    let updated = service
        .update_staff(
            &created.id,
            StaffUpdate {
                name: "Marta R.".to_string(),
                email: "office@example.com".to_string(),
                phone: Some("555-0100".to_string()),
                role: StaffRole::Admin,
                is_active: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, StaffRole::Admin);
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
}

#[tokio::test]
async fn bootstrap_owner_only_when_empty() {
    let service = service();
    let owner = service
        .ensure_bootstrap_owner("boss@example.com", "$argon2id$hash".to_string())
        .await
        .unwrap();
    assert_eq!(owner.map(|o| o.role), Some(StaffRole::Owner));

    let again = service
        .ensure_bootstrap_owner("other@example.com", "$argon2id$hash".to_string())
        .await
        .unwrap();
    assert!(again.is_none());
    assert_eq!(service.count_staff().unwrap(), 1);
}

#[tokio::test]
async fn delete_missing_staff_is_not_found() {
    let err = service().delete_staff("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn empty_password_hash_is_rejected() {
    let service = service();
    let created = service
        .create_staff(new_staff("field@example.com", StaffRole::Worker))
        .await
        .unwrap();
    assert!(service
        .set_password_hash(&created.id, "  ".to_string())
        .await
        .is_err());
}
