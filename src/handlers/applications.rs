// Psychologist onboarding applications. Users submit and watch their own;
// review happens in the admin namespace.
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::store::Entity;

use super::new_id;

/// Review pipeline states an application may hold.
pub const APPLICATION_STATUSES: [&str; 4] = ["submitted", "training", "review", "approved"];

/// POST /api/psychologist-applications - the whole body is kept as an opaque
/// payload; only the review status is structured.
pub async fn submit_application(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let id = new_id();
    let record = json!({
        "id": id,
        "user_id": user.claims.user_id,
        "status": "submitted",
        "payload": body,
    });
    store
        .insert(
            Entity::Applications,
            record.as_object().cloned().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({"ok": true, "id": id})))
}

/// GET /api/psychologist-applications - the caller's own, newest first
pub async fn my_applications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let rows = store
        .list_where(
            Entity::Applications,
            "user_id",
            &Value::String(user.claims.user_id.clone()),
            Entity::Applications.default_order(),
        )
        .await?;
    Ok(Json(Value::Array(
        rows.into_iter().map(Value::Object).collect(),
    )))
}
