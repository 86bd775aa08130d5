use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::store::{select_backend, Adapter};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<Adapter>,
    pub tokens: TokenCodec,
    pub admin_token: String,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let backend = select_backend(config);
        Self {
            adapter: Arc::new(Adapter::new(backend, config.admin_password.clone())),
            tokens: TokenCodec::new(config.token_secret.as_bytes().to_vec()),
            admin_token: config.admin_token.clone(),
            cookie_secure: config.cookie_secure(),
        }
    }
}
