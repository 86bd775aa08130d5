use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::entity::{Entity, OrderSpec};
use super::{Record, Store, StoreError};

/// One array of records per entity type, keyed by table name. This is the
/// exact on-disk layout of the JSON document.
type Dataset = BTreeMap<String, Vec<Record>>;

/// File-backed fallback store: the whole dataset lives in memory and is
/// rewritten wholesale to a single JSON file after every mutation. Dev-mode
/// semantics: no uniqueness constraints, and deletes leave dangling
/// references behind (only inserts validate foreign keys).
pub struct FileStore {
    path: PathBuf,
    state: Mutex<Option<Dataset>>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(None),
        }
    }

    /// Load the dataset from disk on first access.
    fn loaded<'a>(&self, state: &'a mut Option<Dataset>) -> Result<&'a mut Dataset, StoreError> {
        if state.is_none() {
            let mut dataset: Dataset = if self.path.exists() {
                let raw = std::fs::read_to_string(&self.path)?;
                serde_json::from_str(&raw)?
            } else {
                Dataset::new()
            };
            // Collections added after the file was written start empty
            for entity in Entity::ALL {
                dataset.entry(entity.table().to_string()).or_default();
            }
            *state = Some(dataset);
        }
        Ok(state.as_mut().expect("dataset loaded above"))
    }

    /// Rewrite the whole document synchronously after a mutation.
    fn persist(&self, dataset: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(dataset)?)?;
        Ok(())
    }

    fn check_references(
        dataset: &Dataset,
        entity: Entity,
        record: &Record,
    ) -> Result<(), StoreError> {
        for (column, target) in entity.foreign_keys() {
            let value = record.get(*column).unwrap_or(&Value::Null);
            let id = match value {
                Value::Null => continue,
                Value::String(id) => id,
                _ => {
                    return Err(StoreError::InvalidReference(format!(
                        "invalid value for column {column}"
                    )))
                }
            };
            let rows = dataset.get(target.table()).map(Vec::as_slice).unwrap_or(&[]);
            let exists = rows
                .iter()
                .any(|row| row.get(target.key()).and_then(Value::as_str) == Some(id));
            if !exists {
                return Err(StoreError::InvalidReference(
                    "referenced record does not exist".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FileStore {
    async fn init(&self) -> Result<(), StoreError> {
        let mut guard = self.state.lock().await;
        self.loaded(&mut guard)?;
        tracing::info!("file store loaded from {}", self.path.display());
        Ok(())
    }

    async fn list(
        &self,
        entity: Entity,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError> {
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        let mut rows = dataset[entity.table()].clone();
        sort_rows(&mut rows, order);
        Ok(rows)
    }

    async fn list_where(
        &self,
        entity: Entity,
        column: &str,
        value: &Value,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError> {
        if entity.column(column).is_none() {
            return Err(StoreError::InvalidReference(format!(
                "unknown column {} on {}",
                column,
                entity.table()
            )));
        }
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        let mut rows: Vec<Record> = dataset[entity.table()]
            .iter()
            .filter(|row| row.get(column).unwrap_or(&Value::Null) == value)
            .cloned()
            .collect();
        sort_rows(&mut rows, order);
        Ok(rows)
    }

    async fn find(&self, entity: Entity, id: &str) -> Result<Option<Record>, StoreError> {
        self.find_by(entity, entity.key(), &Value::String(id.to_string()))
            .await
    }

    async fn find_by(
        &self,
        entity: Entity,
        column: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError> {
        let mut rows = self.list_where(entity, column, value, None).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn insert(&self, entity: Entity, record: Record) -> Result<Record, StoreError> {
        let record = entity.prepare_insert(record);
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        Self::check_references(dataset, entity, &record)?;
        dataset
            .get_mut(entity.table())
            .expect("all collections present")
            .push(record.clone());
        self.persist(dataset)?;
        Ok(record)
    }

    async fn update(
        &self,
        entity: Entity,
        id: &str,
        patch: Record,
    ) -> Result<Record, StoreError> {
        let patch = entity.prepare_patch(patch);
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        let key = entity.key();
        let rows = dataset
            .get_mut(entity.table())
            .expect("all collections present");
        let row = rows
            .iter_mut()
            .find(|row| row.get(key).and_then(Value::as_str) == Some(id))
            .ok_or(StoreError::NotFound)?;
        for (name, value) in patch {
            row.insert(name, value);
        }
        let updated = row.clone();
        self.persist(dataset)?;
        Ok(updated)
    }

    async fn delete(&self, entity: Entity, id: &str) -> Result<(), StoreError> {
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        let key = entity.key();
        let rows = dataset
            .get_mut(entity.table())
            .expect("all collections present");
        let before = rows.len();
        rows.retain(|row| row.get(key).and_then(Value::as_str) != Some(id));
        if rows.len() == before {
            return Err(StoreError::NotFound);
        }
        self.persist(dataset)?;
        Ok(())
    }

    async fn count(&self, entity: Entity) -> Result<i64, StoreError> {
        let mut guard = self.state.lock().await;
        let dataset = self.loaded(&mut guard)?;
        Ok(dataset[entity.table()].len() as i64)
    }
}

fn sort_rows(rows: &mut [Record], order: Option<OrderSpec>) {
    let Some(order) = order else { return };
    rows.sort_by(|a, b| {
        let left = a.get(order.column).unwrap_or(&Value::Null);
        let right = b.get(order.column).unwrap_or(&Value::Null);
        let ordering = compare_values(left, right);
        if order.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Loose JSON comparison for ordering: numbers numerically, strings
/// lexically (ISO timestamps sort correctly), nulls last.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    struct Scratch(FileStore);

    impl Scratch {
        fn new() -> Self {
            let path = std::env::temp_dir().join(format!("tekoa-store-{}.json", uuid::Uuid::new_v4()));
            Self(FileStore::new(path))
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0.path);
        }
    }

    #[tokio::test]
    async fn insert_then_find_returns_equal_record() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        let created = store
            .insert(
                Entity::Tests,
                record(json!({"id": "test-x", "name": "Escala X", "category": "Saúde", "duration_minutes": 5})),
            )
            .await
            .unwrap();
        let found = store.find(Entity::Tests, "test-x").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        store
            .insert(
                Entity::BlogPosts,
                record(json!({"id": "blog-x", "title": "Original", "category": "Saúde", "summary": "S"})),
            )
            .await
            .unwrap();
        let updated = store
            .update(
                Entity::BlogPosts,
                "blog-x",
                record(json!({"title": "Edited"})),
            )
            .await
            .unwrap();
        assert_eq!(updated["title"], json!("Edited"));
        // Omitted fields keep their prior value
        assert_eq!(updated["summary"], json!("S"));
        assert_eq!(updated["category"], json!("Saúde"));
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        assert!(matches!(
            store.delete(Entity::Videos, "nope").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store
                .update(Entity::Videos, "nope", Record::new())
                .await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.find(Entity::Videos, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_validates_foreign_keys() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        let err = store
            .insert(
                Entity::EventSignups,
                record(json!({"id": "s1", "user_id": "ghost", "event_id": "ghost"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn delete_leaves_dangling_references() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        store
            .insert(
                Entity::Events,
                record(json!({"id": "ev1", "title": "Roda"})),
            )
            .await
            .unwrap();
        store
            .insert(
                Entity::Users,
                record(json!({"id": "u1", "name": "Ana", "email": "a@x", "password_hash": "h", "is_admin": false})),
            )
            .await
            .unwrap();
        store
            .insert(
                Entity::EventSignups,
                record(json!({"id": "s1", "user_id": "u1", "event_id": "ev1"})),
            )
            .await
            .unwrap();
        store.delete(Entity::Events, "ev1").await.unwrap();
        // The signup survives with a dangling event reference
        let signup = store.find(Entity::EventSignups, "s1").await.unwrap();
        assert!(signup.is_some());
    }

    #[tokio::test]
    async fn duplicate_emails_are_not_rejected_by_the_store() {
        // Known dev-fallback gap: uniqueness is only checked at the handler
        let scratch = Scratch::new();
        let store = &scratch.0;
        for id in ["u1", "u2"] {
            store
                .insert(
                    Entity::Users,
                    record(json!({"id": id, "name": "Ana", "email": "same@x", "password_hash": "h", "is_admin": false})),
                )
                .await
                .unwrap();
        }
        let rows = store
            .list_where(Entity::Users, "email", &json!("same@x"), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn list_applies_requested_ordering() {
        let scratch = Scratch::new();
        let store = &scratch.0;
        for (code, sessions) in [("pkg-b", 4), ("pkg-a", 1), ("pkg-c", 2)] {
            store
                .insert(
                    Entity::Packages,
                    record(json!({"code": code, "sessions": sessions, "price_cents": 1000})),
                )
                .await
                .unwrap();
        }
        let rows = store
            .list(Entity::Packages, Some(OrderSpec::asc("sessions")))
            .await
            .unwrap();
        let codes: Vec<&str> = rows.iter().map(|r| r["code"].as_str().unwrap()).collect();
        assert_eq!(codes, vec!["pkg-a", "pkg-c", "pkg-b"]);
    }

    #[tokio::test]
    async fn dataset_survives_reload_from_disk() {
        let scratch = Scratch::new();
        store_roundtrip(&scratch.0).await;
    }

    async fn store_roundtrip(store: &FileStore) {
        store
            .insert(
                Entity::Videos,
                record(json!({"id": "v1", "title": "Como lidar", "category": "Saúde"})),
            )
            .await
            .unwrap();
        // Fresh store instance reading the same file sees the row
        let reopened = FileStore::new(store.path.clone());
        let found = reopened.find(Entity::Videos, "v1").await.unwrap();
        assert_eq!(found.unwrap()["title"], json!("Como lidar"));
    }
}
