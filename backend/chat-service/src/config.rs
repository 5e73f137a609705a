use dotenvy::dotenv;
use std::env;
use std::fmt;

use crate::error::AppError;

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone)]
pub struct Config {
    pub store: StoreBackend,
    /// Required when `store` is `Postgres`
    pub database_url: Option<String>,
    pub port: u16,
    pub jwt_private_key_pem: String,
    pub jwt_public_key_pem: String,
    pub run_migrations: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("store", &self.store)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("port", &self.port)
            .field("jwt_private_key_pem", &"[REDACTED]")
            .field("jwt_public_key_pem", &"[REDACTED]")
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("STORE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(AppError::Config(format!("STORE must be postgres or memory, got {other}")))
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(AppError::Config("DATABASE_URL missing".into()));
        }

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("PORT invalid: {value}")))?,
            None => 8080,
        };

        let jwt_private_key_pem = read_pem(&lookup, "JWT_PRIVATE_KEY_PEM", "JWT_PRIVATE_KEY_FILE")?;
        let jwt_public_key_pem = read_pem(&lookup, "JWT_PUBLIC_KEY_PEM", "JWT_PUBLIC_KEY_FILE")?;

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Ok(Self {
            store,
            database_url,
            port,
            jwt_private_key_pem,
            jwt_public_key_pem,
            run_migrations,
        })
    }
}

/// Inline PEM wins over the file variant
fn read_pem<F>(lookup: &F, pem_key: &str, file_key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(pem) = lookup(pem_key).filter(|v| !v.trim().is_empty()) {
        return Ok(pem);
    }
    let path = lookup(file_key)
        .ok_or_else(|| AppError::Config(format!("{pem_key} or {file_key} missing")))?;
    tracing::info!(key_file = %path, "reading {} from file", pem_key);
    std::fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("read {file_key} ({path}): {e}")))
}
