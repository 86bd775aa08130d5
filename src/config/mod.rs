use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Name of the session cookie carrying the signed token.
pub const COOKIE_NAME: &str = "tc_auth";

/// Session cookie lifetime in seconds (7 days).
pub const COOKIE_MAX_AGE: u64 = 7 * 24 * 60 * 60;

/// Email of the seeded operator account. Cannot be deleted via the admin API.
pub const ADMIN_EMAIL: &str = "admin@tekoa.app";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// Secret for HMAC token signing.
    pub token_secret: String,
    /// Relational connection string. Absent => file-backed store.
    pub database_url: Option<String>,
    /// Static shared secret for the x-admin-token header. Empty disables the
    /// header path entirely.
    pub admin_token: String,
    /// Default password for the seeded admin account.
    pub admin_password: String,
    /// Location of the JSON document used by the file-backed store.
    pub data_file: PathBuf,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let data_file = env::var("TEKOA_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/tekoa.json"));

        let port = env::var("TEKOA_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        Self {
            environment,
            token_secret: env::var("TOKEN_SECRET").unwrap_or_else(|_| "change-me".to_string()),
            database_url,
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_default(),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            data_file,
            port,
        }
    }

    /// Whether the session cookie should carry the Secure attribute.
    pub fn cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
