use super::*;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Deployment flavor. Only `Development` enables the fixture login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Self::Development,
            _ => Self::Production,
        }
    }
}

/// Process-wide configuration, read once at startup and handed to each service.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub processor_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub environment: Environment,
    pub fixture_email: String,
    pub fixture_password: String,
    pub password_cost: u32,
    pub password_memory_kib: u32,
    pub upload_timeout: Duration,
    pub chat_timeout: Duration,
    pub upload_requires_auth: bool,
    pub cors_origin: String,
    pub workers: Option<usize>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(SettingsError::Missing(key));
        Ok(Self {
            database_url: required("DB_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            processor_url: get("PROCESSOR_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| PROCESSOR_URL.to_string()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| BIND_ADDR.to_string()),
            port: parse("PORT", get("PORT"))?.unwrap_or(PORT),
            environment: get("APP_ENV")
                .map(|env| Environment::from(env.as_str()))
                .unwrap_or(Environment::Production),
            fixture_email: get("FIXTURE_EMAIL").unwrap_or_else(|| FIXTURE_EMAIL.to_string()),
            fixture_password: get("FIXTURE_PASSWORD")
                .unwrap_or_else(|| FIXTURE_PASSWORD.to_string()),
            password_cost: parse("PASSWORD_COST", get("PASSWORD_COST"))?.unwrap_or(PASSWORD_COST),
            password_memory_kib: parse("PASSWORD_MEMORY_KIB", get("PASSWORD_MEMORY_KIB"))?
                .unwrap_or(PASSWORD_MEMORY_KIB),
            upload_timeout: parse("UPLOAD_TIMEOUT_SECS", get("UPLOAD_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(UPLOAD_TIMEOUT),
            chat_timeout: parse("CHAT_TIMEOUT_SECS", get("CHAT_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(CHAT_TIMEOUT),
            upload_requires_auth: parse("UPLOAD_REQUIRES_AUTH", get("UPLOAD_REQUIRES_AUTH"))?
                .unwrap_or(false),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| CORS_ORIGIN.to_string()),
            workers: parse("WORKERS", get("WORKERS"))?,
        })
    }

    pub fn development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn listen(&self) -> (String, u16) {
        (self.bind_addr.clone(), self.port)
    }
}

fn parse<T>(key: &'static str, value: Option<String>) -> Result<Option<T>, SettingsError>
where
    T: std::str::FromStr,
{
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| SettingsError::Invalid { key, value: v })
        })
        .transpose()
}
