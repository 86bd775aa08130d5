use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::{cookie, Claims};
use crate::error::ApiError;
use crate::middleware::MaybeUser;
use crate::state::AppState;
use crate::store::Entity;

use super::{new_id, str_field};

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let (name, email, password) = match (
        str_field(&body, "name"),
        str_field(&body, "email"),
        str_field(&body, "password"),
    ) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => return Err(ApiError::validation("Preencha nome, e-mail e senha.")),
    };

    let store = state.adapter.ready().await?;
    let existing = store
        .find_by(Entity::Users, "email", &Value::String(email.to_string()))
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("E-mail já cadastrado."));
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let id = new_id();
    let record = json!({
        "id": id,
        "name": name,
        "email": email,
        "password_hash": hash,
        "is_admin": false,
    });
    // Unique constraint on the relational backend is the backstop for the
    // check-then-act race above; its violation also surfaces as 409.
    store
        .insert(Entity::Users, record.as_object().cloned().unwrap_or_default())
        .await?;

    let token = state.tokens.issue(&Claims::new(id.clone(), false));
    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            cookie::session_cookie(&token, state.cookie_secure),
        )]),
        Json(json!({"ok": true, "userId": id})),
    ))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = match (str_field(&body, "email"), str_field(&body, "password")) {
        (Some(e), Some(p)) => (e, p),
        _ => return Err(ApiError::validation("Informe e-mail e senha.")),
    };

    let store = state.adapter.ready().await?;
    let user = store
        .find_by(Entity::Users, "email", &Value::String(email.to_string()))
        .await?
        // Same message for unknown email and wrong password
        .ok_or_else(|| ApiError::unauthorized("Credenciais inválidas."))?;

    let hash = user
        .get("password_hash")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !bcrypt::verify(password, hash)? {
        return Err(ApiError::unauthorized("Credenciais inválidas."));
    }

    let id = user
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let admin = user.get("is_admin").and_then(Value::as_bool).unwrap_or(false);
    let token = state.tokens.issue(&Claims::new(id.clone(), admin));
    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            cookie::session_cookie(&token, state.cookie_secure),
        )]),
        Json(json!({"ok": true, "userId": id})),
    ))
}

/// POST /api/logout
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, cookie::clear_cookie())]),
        Json(json!({"ok": true})),
    )
}

/// GET /api/me - identity probe; anonymous gets 401 with its own body shape
/// rather than the standard error envelope.
pub async fn me(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
) -> Result<axum::response::Response, ApiError> {
    let anonymous =
        || (StatusCode::UNAUTHORIZED, Json(json!({"authenticated": false}))).into_response();

    let Some(claims) = claims else {
        return Ok(anonymous());
    };
    let store = state.adapter.ready().await?;
    let Some(user) = store.find(Entity::Users, &claims.user_id).await? else {
        // Token outlived its user record
        return Ok(anonymous());
    };
    Ok(Json(json!({
        "authenticated": true,
        "user": {
            "id": user.get("id"),
            "name": user.get("name"),
            "email": user.get("email"),
            "is_admin": user.get("is_admin").and_then(Value::as_bool).unwrap_or(false),
        },
    }))
    .into_response())
}
