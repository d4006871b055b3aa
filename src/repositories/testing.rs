//! Test doubles and the behaviour every [`LinkRepository`] must show.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{LinkRepository, RecordClient};
use crate::errors::{RecordClientError, RepositoryError};
use crate::utils::short_code::ALPHABET;

/// In-memory record backend that assigns `Id`s the way a real one would
#[derive(Default)]
pub struct FakeRecordClient {
    records: Mutex<Vec<Value>>,
    next_id: Mutex<i64>,
}

impl FakeRecordClient {
    pub fn with_records(records: Vec<Value>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r["Id"].as_i64())
            .max()
            .unwrap_or(0);
        Self {
            records: Mutex::new(records),
            next_id: Mutex::new(next_id),
        }
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordClient for FakeRecordClient {
    async fn fetch_records(&self, _collection: &str) -> Result<Vec<Value>, RecordClientError> {
        Ok(self.records())
    }

    async fn get_record(
        &self,
        _collection: &str,
        id: i64,
    ) -> Result<Option<Value>, RecordClientError> {
        Ok(self
            .records()
            .into_iter()
            .find(|r| r["Id"].as_i64() == Some(id)))
    }

    async fn create_record(
        &self,
        _collection: &str,
        mut record: Value,
    ) -> Result<Value, RecordClientError> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        record["Id"] = json!(id);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        _collection: &str,
        id: i64,
        patch: Value,
    ) -> Result<Value, RecordClientError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r["Id"].as_i64() == Some(id))
            .ok_or_else(|| RecordClientError::NotFound(format!("Id {}", id)))?;

        if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete_record(&self, _collection: &str, id: i64) -> Result<(), RecordClientError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r["Id"].as_i64() != Some(id));
        if records.len() == before {
            return Err(RecordClientError::NotFound(format!("Id {}", id)));
        }
        Ok(())
    }
}

/// Runs the behaviour shared by every repository against an empty `repo`
pub async fn assert_repository_contract(repo: &dyn LinkRepository) {
    assert!(repo.list_all().await.is_empty());

    // Generated codes: six base62 symbols, unique
    let mut codes = HashSet::new();
    for n in 0..5 {
        let link = repo
            .create(&format!("https://example.com/page/{n}"), None)
            .await
            .unwrap();
        assert_eq!(link.short_code.len(), 6);
        assert!(link.short_code.bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(link.clicks, 0);
        assert!(link.is_active);
        assert!(link.last_clicked_at.is_none());
        assert!(codes.insert(link.short_code.clone()));
    }

    // Create then get round-trips
    let link = repo.create("https://example.com/path", None).await.unwrap();
    assert_eq!(repo.get_by_id(link.id).await, Some(link.clone()));

    // Click increments by exactly one and stamps a non-decreasing time
    let clicked = repo.increment_click(link.id).await.unwrap();
    assert_eq!(clicked.clicks, 1);
    let first_click = clicked.last_clicked_at.unwrap();
    assert!(first_click >= link.created_at);
    assert_eq!(clicked.created_at, link.created_at);

    let clicked = repo.increment_click(link.id).await.unwrap();
    assert_eq!(clicked.clicks, 2);
    assert!(clicked.last_clicked_at.unwrap() >= first_click);

    assert!(matches!(
        repo.increment_click(9_999).await,
        Err(RepositoryError::NotFound(_))
    ));

    // Delete, then the Id is gone; deleting again still succeeds
    repo.delete(link.id).await.unwrap();
    assert!(repo.get_by_id(link.id).await.is_none());
    repo.delete(link.id).await.unwrap();

    // Six created, one deleted, newest first
    let listed = repo.list_all().await;
    assert_eq!(listed.len(), 5);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    // Alias becomes the lower-cased code; any casing of it conflicts
    let promo = repo
        .create("https://example.com/sale", Some("Promo"))
        .await
        .unwrap();
    assert_eq!(promo.short_code, "promo");
    assert_eq!(promo.custom_alias.as_deref(), Some("Promo"));
    assert!(matches!(
        repo.create("https://example.com/other", Some("promo")).await,
        Err(RepositoryError::Conflict(_))
    ));

    // Malformed URL is rejected before anything is stored
    let before = repo.list_all().await.len();
    assert!(matches!(
        repo.create("not-a-url", None).await,
        Err(RepositoryError::Validation(_))
    ));
    assert_eq!(repo.list_all().await.len(), before);

    // Active flag toggles without touching anything else
    let inactive = repo.set_active(promo.id, false).await.unwrap();
    assert!(!inactive.is_active);
    assert_eq!(inactive.short_code, promo.short_code);
    assert!(matches!(
        repo.set_active(9_999, true).await,
        Err(RepositoryError::NotFound(_))
    ));
}
