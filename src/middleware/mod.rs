// Request-scoped identity extractors. No session store: identity lives
// entirely in the signed cookie, admin rights in the policy decision.
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::header;

use crate::auth::{authorize_admin, cookie, AdminGrant, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Verified claims from the session cookie, or `None` when the request is
/// anonymous or carries an invalid token.
fn claims_from_parts(parts: &Parts, state: &AppState) -> Option<Claims> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookie::token_from_cookie_header(raw)?;
    state.tokens.verify(token)
}

/// Authenticated caller. Rejects with 401 when no valid session cookie is
/// presented.
pub struct CurrentUser {
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts, state)
            .map(|claims| Self { claims })
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))
    }
}

/// Optional caller identity. Never rejects; handlers that render a different
/// body for anonymous requests (`/api/me`) use this instead of [`CurrentUser`].
pub struct MaybeUser(pub Option<Claims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(claims_from_parts(parts, state)))
    }
}

/// Admin-gated access. Grants via the x-admin-token header or an elevated
/// session claim; rejects with 403 otherwise.
pub struct AdminAccess {
    pub grant: AdminGrant,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-admin-token")
            .and_then(|v| v.to_str().ok());
        let claims = claims_from_parts(parts, state);
        match authorize_admin(&state.admin_token, header, claims.as_ref()) {
            Some(grant) => {
                tracing::debug!(?grant, "admin access granted");
                Ok(Self { grant })
            }
            None => Err(ApiError::forbidden("Admin token inválido")),
        }
    }
}
