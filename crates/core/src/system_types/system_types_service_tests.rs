use super::*;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct MockSystemTypeRepository {
    types: RwLock<Vec<SystemType>>,
}

#[async_trait]
impl SystemTypeRepositoryTrait for MockSystemTypeRepository {
    async fn create(&self, new_type: NewSystemType) -> Result<SystemType> {
        let now = Utc::now().naive_utc();
        let mut types = self.types.write().unwrap();
        let created = SystemType {
            id: format!("type-{}", types.len() + 1),
            name: new_type.name,
            price: new_type.price,
            created_at: now,
            updated_at: now,
        };
        types.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, update: SystemTypeUpdate) -> Result<SystemType> {
        let mut types = self.types.write().unwrap();
        let existing = types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found("System type", id))?;
        existing.name = update.name;
        existing.price = update.price;
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut types = self.types.write().unwrap();
        let before = types.len();
        types.retain(|t| t.id != id);
        Ok(before - types.len())
    }

    fn get_by_id(&self, id: &str) -> Result<SystemType> {
        self.types
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("System type", id))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<SystemType>> {
        Ok(self
            .types
            .read()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    fn list(&self) -> Result<Vec<SystemType>> {
        Ok(self.types.read().unwrap().clone())
    }
}

fn service() -> SystemTypeService {
    SystemTypeService::new(Arc::new(MockSystemTypeRepository::default()))
}

#[tokio::test]
async fn rejects_negative_price() {
    let err = service()
        .create_system_type(NewSystemType {
            name: "ATU".into(),
            price: dec!(-1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn rejects_duplicate_name_but_allows_self_update() {
    let service = service();
    let conventional = service
        .create_system_type(NewSystemType {
            name: " Conventional ".into(),
            price: dec!(4500),
        })
        .await
        .unwrap();
    assert_eq!(conventional.name, "Conventional");

    assert!(service
        .create_system_type(NewSystemType {
            name: "Conventional".into(),
            price: dec!(1),
        })
        .await
        .is_err());

    let updated = service
        .update_system_type(
            &conventional.id,
            SystemTypeUpdate {
                name: "Conventional".into(),
                price: dec!(4750.555),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, dec!(4750.56));
}
