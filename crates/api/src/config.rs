use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub skip_migrations: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", 30)?,
            skip_migrations: flag("SKIP_MIGRATIONS"),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub gql_introspection: bool,
    pub expiry_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            gql_introspection: false,
            expiry_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        Ok(Self {
            port: var_or("PORT", defaults.port)?,
            allowed_origins,
            gql_introspection: flag("GQL_INTROSPECTION"),
            expiry_interval: Duration::from_secs(var_or(
                "EXPIRY_INTERVAL_SECONDS",
                defaults.expiry_interval.as_secs(),
            )?),
        })
    }
}
