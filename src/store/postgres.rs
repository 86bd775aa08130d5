use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use super::entity::{Column, ColumnType, Entity, OrderSpec};
use super::{Record, Store, StoreError};

/// Relational backend: one table per entity, parameterized statements only,
/// a pooled connection acquired and released per logical operation.
pub struct PgStore {
    pool: Option<PgPool>,
}

impl PgStore {
    /// Build a lazily-connecting pool; a bad connection string surfaces as a
    /// backend-unavailable error on first use rather than a startup panic.
    pub fn connect_lazy(url: &str) -> Self {
        let pool = match PgPoolOptions::new().max_connections(10).connect_lazy(url) {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::error!("invalid DATABASE_URL: {}", e);
                None
            }
        };
        Self { pool }
    }

    fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("invalid DATABASE_URL".to_string()))
    }

    async fn select(
        &self,
        entity: Entity,
        where_column: Option<(&str, &Value)>,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError> {
        let pool = self.pool()?;
        let sql = select_sql(entity, where_column.map(|(c, _)| c), order)?;

        let mut query = sqlx::query(&sql);
        if let Some((column_name, value)) = where_column {
            let column = entity
                .column(column_name)
                .ok_or_else(|| unknown_column(entity, column_name))?;
            query = bind_value(query, &column, value)?;
        }

        let rows = query.fetch_all(pool).await.map_err(map_db_err)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Value = row.try_get("row").map_err(map_db_err)?;
            match value {
                Value::Object(map) => records.push(map),
                other => {
                    return Err(StoreError::Serialization(serde::de::Error::custom(
                        format!("expected row object, got {}", other),
                    )))
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn init(&self) -> Result<(), StoreError> {
        let pool = self.pool()?;
        for entity in Entity::ALL {
            sqlx::query(&create_table_sql(entity))
                .execute(pool)
                .await
                .map_err(map_db_err)?;
        }
        tracing::info!("postgres schema ready");
        Ok(())
    }

    async fn list(
        &self,
        entity: Entity,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError> {
        self.select(entity, None, order).await
    }

    async fn list_where(
        &self,
        entity: Entity,
        column: &str,
        value: &Value,
        order: Option<OrderSpec>,
    ) -> Result<Vec<Record>, StoreError> {
        self.select(entity, Some((column, value)), order).await
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
        let mut rows = self.select(entity, Some((column, value)), None).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn insert(&self, entity: Entity, record: Record) -> Result<Record, StoreError> {
        let pool = self.pool()?;
        let record = entity.prepare_insert(record);

        let columns = entity.columns();
        let names: Vec<String> = columns.iter().map(|c| format!("\"{}\"", c.name)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            entity.table(),
            names.join(", "),
            placeholders.join(", ")
        );

        let mut query = sqlx::query(&sql);
        for column in columns {
            let value = record.get(column.name).unwrap_or(&Value::Null);
            query = bind_value(query, column, value)?;
        }
        query.execute(pool).await.map_err(map_db_err)?;
        Ok(record)
    }

    async fn update(
        &self,
        entity: Entity,
        id: &str,
        patch: Record,
    ) -> Result<Record, StoreError> {
        let pool = self.pool()?;
        let patch = entity.prepare_patch(patch);

        // Merge semantics: untouched fields keep their stored value.
        let existing = self.find(entity, id).await?.ok_or(StoreError::NotFound)?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let mut assignments = Vec::with_capacity(patch.len());
        for (i, name) in patch.keys().enumerate() {
            assignments.push(format!("\"{}\" = ${}", name, i + 1));
        }
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = ${}",
            entity.table(),
            assignments.join(", "),
            entity.key(),
            patch.len() + 1
        );

        let mut query = sqlx::query(&sql);
        for (name, value) in &patch {
            let column = entity
                .column(name)
                .ok_or_else(|| unknown_column(entity, name))?;
            query = bind_value(query, &column, value)?;
        }
        query = query.bind(id.to_string());
        query.execute(pool).await.map_err(map_db_err)?;

        self.find(entity, id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, entity: Entity, id: &str) -> Result<(), StoreError> {
        let pool = self.pool()?;
        let sql = format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = $1",
            entity.table(),
            entity.key()
        );
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn count(&self, entity: Entity) -> Result<i64, StoreError> {
        let pool = self.pool()?;
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", entity.table());
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(pool)
            .await
            .map_err(map_db_err)?;
        Ok(count)
    }
}

fn create_table_sql(entity: Entity) -> String {
    let mut columns = Vec::new();
    for column in entity.columns() {
        let mut sql = format!("\"{}\" {}", column.name, sql_type(column.ty));
        if column.name == entity.key() {
            sql.push_str(" PRIMARY KEY");
        }
        if entity.unique_columns().contains(&column.name) {
            sql.push_str(" UNIQUE");
        }
        if let Some((_, target)) = entity
            .foreign_keys()
            .iter()
            .find(|(name, _)| *name == column.name)
        {
            sql.push_str(&format!(
                " REFERENCES \"{}\"(\"{}\")",
                target.table(),
                target.key()
            ));
        }
        columns.push(sql);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        entity.table(),
        columns.join(", ")
    )
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Int => "BIGINT",
        ColumnType::Real => "DOUBLE PRECISION",
        ColumnType::Bool => "BOOLEAN",
        ColumnType::Timestamp => "TIMESTAMPTZ",
        ColumnType::Json => "JSONB",
    }
}

fn select_sql(
    entity: Entity,
    where_column: Option<&str>,
    order: Option<OrderSpec>,
) -> Result<String, StoreError> {
    let mut inner = format!("SELECT * FROM \"{}\"", entity.table());
    if let Some(column) = where_column {
        if entity.column(column).is_none() {
            return Err(unknown_column(entity, column));
        }
        inner.push_str(&format!(" WHERE \"{column}\" = $1"));
    }
    if let Some(order) = order {
        if entity.column(order.column).is_none() {
            return Err(unknown_column(entity, order.column));
        }
        let direction = if order.descending { "DESC" } else { "ASC" };
        inner.push_str(&format!(" ORDER BY \"{}\" {}", order.column, direction));
    }
    // row_to_json keeps the wire shape identical to the file backend
    Ok(format!("SELECT row_to_json(t) AS row FROM ({inner}) t"))
}

fn unknown_column(entity: Entity, column: &str) -> StoreError {
    StoreError::InvalidReference(format!("unknown column {} on {}", column, entity.table()))
}

/// Bind one JSON value with the Postgres type the column expects.
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    column: &Column,
    value: &Value,
) -> Result<Query<'q, Postgres, PgArguments>, StoreError> {
    let invalid = || {
        StoreError::InvalidReference(format!("invalid value for column {}", column.name))
    };
    let query = match column.ty {
        ColumnType::Text => match value {
            Value::Null => query.bind(Option::<String>::None),
            Value::String(s) => query.bind(Some(s.clone())),
            other => query.bind(Some(other.to_string())),
        },
        ColumnType::Int => match value {
            Value::Null => query.bind(Option::<i64>::None),
            v => query.bind(Some(v.as_i64().ok_or_else(invalid)?)),
        },
        ColumnType::Real => match value {
            Value::Null => query.bind(Option::<f64>::None),
            v => query.bind(Some(v.as_f64().ok_or_else(invalid)?)),
        },
        ColumnType::Bool => match value {
            Value::Null => query.bind(Option::<bool>::None),
            v => query.bind(Some(v.as_bool().ok_or_else(invalid)?)),
        },
        ColumnType::Timestamp => match value {
            Value::Null => query.bind(Option::<DateTime<Utc>>::None),
            Value::String(s) => {
                let parsed = DateTime::parse_from_rfc3339(s)
                    .map_err(|_| invalid())?
                    .with_timezone(&Utc);
                query.bind(Some(parsed))
            }
            _ => return Err(invalid()),
        },
        ColumnType::Json => match value {
            Value::Null => query.bind(Option::<Value>::None),
            v => query.bind(Some(v.clone())),
        },
    };
    Ok(query)
}

/// Map driver errors onto the store taxonomy. Unique and foreign-key
/// violations carry their own variants; connectivity problems surface as
/// backend-unavailable.
fn map_db_err(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if let Some(code) = db.code() {
            match code.as_ref() {
                "23505" => {
                    return StoreError::Conflict("duplicate value for unique column".to_string())
                }
                "23503" => {
                    return StoreError::InvalidReference(
                        "referenced record does not exist".to_string(),
                    )
                }
                _ => {}
            }
        }
    }
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Unavailable(e.to_string()),
        other => StoreError::Sqlx(other),
    }
}
