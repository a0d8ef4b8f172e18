use std::{env, str::FromStr};

use anyhow::{Context, Result};

use crate::auth::credentials::DEFAULT_TOKEN_TTL_SECS;

#[derive(Clone, Debug)]
pub struct Config {
    /// `memory` selects the in-process store instead of MySQL
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub server_addr: String,
    pub token_ttl: i64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
    pub log_level: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl: parsed("TOKEN_TTL", DEFAULT_TOKEN_TTL_SECS)?, // default 24h

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", 60)?,
            rate_register_per_min: parsed("RATE_REGISTER_PER_MIN", 30)?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every env-touching assertion lives in this one test so parallel test
    // threads never race on the process environment.
    #[test]
    fn test_from_env() {
        for key in ["SERVER_ADDR", "DATABASE_URL", "JWT_SECRET", "TOKEN_TTL", "API_PREFIX"] {
            unsafe { env::remove_var(key) };
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::set_var("SERVER_ADDR", "127.0.0.1:8080");
            env::set_var("DATABASE_URL", "memory");
            env::set_var("JWT_SECRET", "s3cret");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.token_ttl, 86_400);
        assert_eq!(config.api_prefix, "/api");
        assert!(config.uses_memory_store());

        unsafe { env::set_var("TOKEN_TTL", "soon") };
        assert!(Config::from_env().is_err());
        unsafe { env::remove_var("TOKEN_TTL") };
    }
}
