//! Connection settings from the environment and an optional `.env` file.

use crate::error::ConfigError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Full `DATABASE_URL`.
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub target: Target,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Read from process environment after loading `.env` if present. `DATABASE_URL` wins over the `PG*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let target = match get("DATABASE_URL").filter(|u| !u.is_empty()) {
            Some(url) => Target::Url(url),
            None => Target::Parts {
                host: get("PGHOST").unwrap_or_else(|| "localhost".into()),
                port: parse_or(&get, "PGPORT", 5432)?,
                user: get("PGUSER").unwrap_or_else(|| "vagrant".into()),
                password: get("PGPASSWORD").unwrap_or_else(|| "123".into()),
                database: get("PGDATABASE").unwrap_or_else(|| "lightbnb".into()),
            },
        };
        let max_connections = parse_or(&get, "LIGHTBNB_MAX_CONNECTIONS", 5)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "LIGHTBNB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        let acquire_timeout = Duration::from_secs(parse_or(&get, "LIGHTBNB_ACQUIRE_TIMEOUT_SECS", 5)?);
        Ok(DbConfig {
            target,
            max_connections,
            acquire_timeout,
        })
    }

    /// URL form of the target, for tools that take a connection string.
    pub fn database_url(&self) -> String {
        match &self.target {
            Target::Url(url) => url.clone(),
            Target::Parts {
                host,
                port,
                user,
                password,
                database,
            } => format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, database),
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.target {
            Target::Url(url) => PgConnectOptions::from_str(url).map_err(|_| ConfigError::Invalid {
                key: "DATABASE_URL",
                value: redact(url),
            }),
            Target::Parts {
                host,
                port,
                user,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database)),
        }
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

/// Drops the password from a connection string before it reaches an error message.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let creds = &url[scheme_end + 3..at];
            let user = creds.split(':').next().unwrap_or("");
            format!("{}{}:***{}", &url[..scheme_end + 3], user, &url[at..])
        }
        _ => url.to_string(),
    }
}
