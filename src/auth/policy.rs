use crate::auth::token::Claims;

/// How an admin-gated request was authorized. Two independent paths exist by
/// design: the static operator header and per-user elevation via the session
/// token. Either one is sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminGrant {
    /// x-admin-token header matched the configured shared secret.
    HeaderMatch,
    /// Session token claims carry admin = true.
    ClaimElevated,
}

/// Evaluate the admin policy for one request. `header` is the raw
/// x-admin-token value if present; `claims` are the verified session claims
/// if a valid cookie was presented.
pub fn authorize_admin(
    configured_token: &str,
    header: Option<&str>,
    claims: Option<&Claims>,
) -> Option<AdminGrant> {
    // An empty configured secret disables the header path rather than
    // matching an empty header.
    if !configured_token.is_empty() && header == Some(configured_token) {
        return Some(AdminGrant::HeaderMatch);
    }
    if claims.map(|c| c.admin).unwrap_or(false) {
        return Some(AdminGrant::ClaimElevated);
    }
    None
}
