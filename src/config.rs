use crate::shared::AppError;

/// Longest session lifetime accepted from configuration
pub const MAX_SESSION_EXPIRATION_DAYS: i64 = 365;

/// OAuth client settings for the Google provider
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Runtime configuration, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Falls back to in-memory stores when unset
    pub database_url: Option<String>,
    pub google: GoogleConfig,
    pub jwt_secret: String,
    pub session_expiration_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => 3000,
        };

        let session_expiration_days = match lookup("SESSION_EXPIRATION_DAYS") {
            Some(raw) => raw.parse().map_err(|_| {
                AppError::Config(format!("SESSION_EXPIRATION_DAYS is not a number: {}", raw))
            })?,
            None => 14,
        };
        if !(1..=MAX_SESSION_EXPIRATION_DAYS).contains(&session_expiration_days) {
            return Err(AppError::Config(format!(
                "SESSION_EXPIRATION_DAYS must be between 1 and {}, got {}",
                MAX_SESSION_EXPIRATION_DAYS, session_expiration_days
            )));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            google: GoogleConfig {
                client_id: required("GOOGLE_CLIENT_ID")?,
                client_secret: required("GOOGLE_CLIENT_SECRET")?,
                callback_url: lookup("GOOGLE_CALLBACK_URL")
                    .unwrap_or_else(|| format!("http://localhost:{}/auth/google/callback", port)),
            },
            jwt_secret: required("JWT_SECRET")?,
            session_expiration_days,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
