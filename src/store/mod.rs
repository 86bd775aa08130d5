use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::OnceCell;

pub mod entity;
pub mod file;
pub mod postgres;
pub mod seed;

pub use entity::{Entity, OrderSpec};

/// A stored row: dynamic JSON object keyed by column name.
pub type Record = Map<String, Value>;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidReference(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlx(sqlx::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Uniform record operations over one backing store. Implemented by the
/// relational backend and the file-backed fallback so handlers stay
/// backend-agnostic.
#[async_trait]
pub trait Store: Send + Sync {
    /// One-time backend initialization (schema creation or file load).
    /// Called through [`Adapter::ready`], never directly by handlers.
    async fn init(&self) -> Result<(), StoreError>;

    async fn list(&self, entity: Entity, order: Option<OrderSpec>)
        -> Result<Vec<Record>, StoreError>;

    /// Rows where `column = value`, e.g. appointments for one user.
    async fn list_where(
        &self,
        entity: Entity,
        column: &str,
        value: &Value,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError>;

    async fn find(&self, entity: Entity, id: &str) -> Result<Option<Record>, StoreError>;

    /// First row where `column = value`, e.g. a user by email.
    async fn find_by(
        &self,
        entity: Entity,
        column: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError>;

    /// Insert a prepared record and return it as stored.
    async fn insert(&self, entity: Entity, record: Record) -> Result<Record, StoreError>;

    /// Merge `patch` over the stored row; fields absent from the patch keep
    /// their prior value. Returns the updated row.
    async fn update(&self, entity: Entity, id: &str, patch: Record)
        -> Result<Record, StoreError>;

    async fn delete(&self, entity: Entity, id: &str) -> Result<(), StoreError>;

    async fn count(&self, entity: Entity) -> Result<i64, StoreError>;
}

/// Process-lifetime persistence handle: one backend selected at startup, one
/// memoized initialization (schema + seed) shared across concurrent first
/// callers.
pub struct Adapter {
    inner: Arc<dyn Store>,
    admin_password: String,
    ready: OnceCell<()>,
}

impl Adapter {
    pub fn new(inner: Arc<dyn Store>, admin_password: impl Into<String>) -> Self {
        Self {
            inner,
            admin_password: admin_password.into(),
            ready: OnceCell::new(),
        }
    }

    /// Await backend readiness, running initialization and idempotent seeding
    /// exactly once per process. A failed attempt is not memoized, so a later
    /// request can retry.
    pub async fn ready(&self) -> Result<&dyn Store, StoreError> {
        self.ready
            .get_or_try_init(|| async {
                self.inner.init().await?;
                seed::ensure_seeded(self.inner.as_ref(), &self.admin_password).await
            })
            .await?;
        Ok(self.inner.as_ref())
    }
}

/// Pick the backend from configuration: relational when a connection string
/// is present, file-backed otherwise.
pub fn select_backend(config: &crate::config::AppConfig) -> Arc<dyn Store> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("persistence backend: postgres");
            Arc::new(postgres::PgStore::connect_lazy(url))
        }
        None => {
            tracing::info!(
                "persistence backend: file ({})",
                config.data_file.display()
            );
            Arc::new(file::FileStore::new(config.data_file.clone()))
        }
    }
}
