use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::store::Entity;

use super::{new_id, str_field};

/// GET /api/tests - self-assessment catalog, grouped by category
pub async fn list_tests(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.adapter.ready().await?;
    let rows = store
        .list(Entity::Tests, Entity::Tests.default_order())
        .await?;
    Ok(Json(Value::Array(
        rows.into_iter().map(Value::Object).collect(),
    )))
}

/// POST /api/test-results - append-only; score and free-text result optional
pub async fn submit_test_result(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let test_id = str_field(&body, "testId").ok_or_else(|| ApiError::validation("Teste inválido"))?;

    let store = state.adapter.ready().await?;
    let id = new_id();
    let record = json!({
        "id": id,
        "user_id": user.claims.user_id,
        "test_id": test_id,
        "score": body.get("score").cloned().unwrap_or(Value::Null),
        "result": body.get("result").cloned().unwrap_or(Value::Null),
    });
    store
        .insert(
            Entity::TestResults,
            record.as_object().cloned().unwrap_or_default(),
        )
        .await?;
    Ok(Json(json!({"ok": true, "id": id})))
}
