// Public catalog reads plus the authenticated event signup. All list
// endpoints return bare arrays; detail misses are a plain 404.
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::store::{Entity, Record};

use super::new_id;

fn rows_json(rows: Vec<Record>) -> Json<Value> {
    Json(Value::Array(rows.into_iter().map(Value::Object).collect()))
}

async fn list(state: &AppState, entity: Entity) -> Result<Vec<Record>, ApiError> {
    let store = state.adapter.ready().await?;
    Ok(store.list(entity, entity.default_order()).await?)
}

async fn detail(state: &AppState, entity: Entity, id: &str) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let record = store
        .find(entity, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;
    Ok(Json(Value::Object(record)))
}

/// GET /api/psychologists - card projection, full bios stay on the detail
pub async fn list_psychologists(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    const CARD_FIELDS: [&str; 7] = [
        "id",
        "name",
        "title",
        "price_cents",
        "rating",
        "tags",
        "image_url",
    ];
    let rows = list(&state, Entity::Psychologists).await?;
    let cards: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            let mut card = Record::new();
            for field in CARD_FIELDS {
                card.insert(
                    field.to_string(),
                    row.get(field).cloned().unwrap_or(Value::Null),
                );
            }
            Value::Object(card)
        })
        .collect();
    Ok(Json(Value::Array(cards)))
}

/// GET /api/psychologists/:id
pub async fn get_psychologist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    detail(&state, Entity::Psychologists, &id).await
}

/// GET /api/packages
pub async fn list_packages(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::Packages).await?))
}

/// GET /api/blog
pub async fn list_blog(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::BlogPosts).await?))
}

/// GET /api/blog/:id
pub async fn get_blog_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    detail(&state, Entity::BlogPosts, &id).await
}

/// GET /api/news
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::NewsItems).await?))
}

/// GET /api/videos
pub async fn list_videos(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::Videos).await?))
}

/// GET /api/events
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::Events).await?))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    detail(&state, Entity::Events, &id).await
}

/// POST /api/events/:id/signup - append-only join record
pub async fn event_signup(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let record = json!({
        "id": new_id(),
        "user_id": user.claims.user_id,
        "event_id": event_id,
    });
    store
        .insert(
            Entity::EventSignups,
            record.as_object().cloned().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({"ok": true})))
}

/// GET /api/support-orgs
pub async fn list_support_orgs(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(rows_json(list(&state, Entity::SupportOrgs).await?))
}

/// GET /api/support-orgs/:id
pub async fn get_support_org(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    detail(&state, Entity::SupportOrgs, &id).await
}
