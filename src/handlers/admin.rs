// Admin namespace: generic catalog CRUD keyed by path segment, operator
// views, and application review. All routes sit behind the admin policy.
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::config::ADMIN_EMAIL;
use crate::error::ApiError;
use crate::middleware::AdminAccess;
use crate::state::AppState;
use crate::store::{Entity, Record};

use super::applications::APPLICATION_STATUSES;
use super::new_id;

/// Catalog collections exposed for admin CRUD, by URL segment.
fn catalog_entity(segment: &str) -> Result<Entity, ApiError> {
    match segment {
        "psychologists" => Ok(Entity::Psychologists),
        "packages" => Ok(Entity::Packages),
        "tests" => Ok(Entity::Tests),
        "blog" => Ok(Entity::BlogPosts),
        "news" => Ok(Entity::NewsItems),
        "videos" => Ok(Entity::Videos),
        "events" => Ok(Entity::Events),
        "support-orgs" => Ok(Entity::SupportOrgs),
        _ => Err(ApiError::not_found("Not found")),
    }
}

/// Admin clients send camelCase field names; columns are snake_case.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn normalize_keys(body: Value) -> Record {
    match body {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (snake_case(&key), value))
            .collect(),
        _ => Map::new(),
    }
}

/// POST /api/admin/:collection - create a catalog record; id generated when
/// the client does not supply one.
pub async fn create_record(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let entity = catalog_entity(&collection)?;
    let mut record = normalize_keys(body);

    let key = entity.key();
    let id = match record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let id = new_id();
            record.insert(key.to_string(), Value::String(id.clone()));
            id
        }
    };

    let store = state.adapter.ready().await?;
    store.insert(entity, record).await?;
    tracing::info!(collection = %collection, id = %id, "admin created record");
    Ok(Json(json!({"ok": true, "id": id})))
}

/// PUT /api/admin/:collection/:id - merge provided fields over stored values
pub async fn update_record(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let entity = catalog_entity(&collection)?;
    let store = state.adapter.ready().await?;
    let updated = store.update(entity, &id, normalize_keys(body)).await?;
    Ok(Json(json!({"ok": true, "record": Value::Object(updated)})))
}

/// DELETE /api/admin/:collection/:id
pub async fn delete_record(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let entity = catalog_entity(&collection)?;
    let store = state.adapter.ready().await?;
    store.delete(entity, &id).await?;
    tracing::info!(collection = %collection, id = %id, "admin deleted record");
    Ok(Json(json!({"ok": true})))
}

/// GET /api/admin/stats - row counts per collection
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let mut counts = Map::new();
    for entity in Entity::ALL {
        counts.insert(
            entity.table().to_string(),
            Value::from(store.count(entity).await?),
        );
    }
    Ok(Json(Value::Object(counts)))
}

/// GET /api/admin/users - account listing without credential material
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let rows = store
        .list(Entity::Users, Entity::Users.default_order())
        .await?;
    let users: Vec<Value> = rows
        .into_iter()
        .map(|mut row| {
            row.remove("password_hash");
            Value::Object(row)
        })
        .collect();
    Ok(Json(Value::Array(users)))
}

/// DELETE /api/admin/users/:id - the seeded operator account is protected
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let user = store
        .find(Entity::Users, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    if user.get("email").and_then(Value::as_str) == Some(ADMIN_EMAIL) {
        return Err(ApiError::forbidden(
            "A conta de administrador não pode ser removida.",
        ));
    }
    store.delete(Entity::Users, &id).await?;
    Ok(Json(json!({"ok": true})))
}

/// GET /api/admin/psychologist-applications - full review queue, newest first
pub async fn list_applications(
    State(state): State<AppState>,
    _admin: AdminAccess,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let rows = store
        .list(Entity::Applications, Entity::Applications.default_order())
        .await?;
    Ok(Json(Value::Array(
        rows.into_iter().map(Value::Object).collect(),
    )))
}

/// PUT /api/admin/psychologist-applications/:id - move an application through
/// the review pipeline. Membership in the allowed set is checked; transition
/// ordering is not.
pub async fn update_application(
    State(state): State<AppState>,
    _admin: AdminAccess,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| APPLICATION_STATUSES.contains(s))
        .ok_or_else(|| ApiError::validation("Status inválido"))?;

    let store = state.adapter.ready().await?;
    let mut patch = Record::new();
    patch.insert("status".to_string(), Value::String(status.to_string()));
    let updated = store.update(Entity::Applications, &id, patch).await?;
    tracing::info!(id = %id, status = %status, "application status updated");
    Ok(Json(json!({"ok": true, "record": Value::Object(updated)})))
}
