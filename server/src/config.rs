//! Server configuration, read from the environment.
//!
//! Environment variables:
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `MAX_UPLOAD_BYTES`: upload size limit (default 5MB)
//! - `SESSION_TTL_DAYS`: bearer token lifetime (default 30)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: bootstrap an admin account on startup

use std::env;

use ladle_core::MAX_FILE_SIZE;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub session_ttl_days: i64,
    pub admin: Option<AdminBootstrap>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let max_upload_bytes = parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(MAX_FILE_SIZE);
        let session_ttl_days = parse_var("SESSION_TTL_DAYS")?.unwrap_or(30);
        if session_ttl_days < 1 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_DAYS",
                value: session_ttl_days.to_string(),
            });
        }

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_upload_bytes,
            session_ttl_days,
            admin,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_missing_is_none() {
        let v: Option<usize> = parse_var("LADLE_TEST_SURELY_UNSET_VAR").unwrap();
        assert!(v.is_none());
    }
}
