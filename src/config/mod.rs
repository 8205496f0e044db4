/// Application configuration module
use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where launch records are read from
#[derive(Clone, Debug, PartialEq)]
pub enum StoreSource {
    Postgres {
        database_url: String,
        table: String,
        max_connections: u32,
    },
    File(PathBuf),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreSource,
    pub store_timeout: Duration,
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let store = match (get("LAUNCHES_FILE"), get("DATABASE_URL")) {
            (Some(path), _) => StoreSource::File(PathBuf::from(path)),
            (None, Some(database_url)) => {
                let table = get("LAUNCHES_TABLE").unwrap_or_else(|| "launches".to_string());
                if !is_identifier(&table) {
                    bail!("LAUNCHES_TABLE must be a plain SQL identifier, got '{}'", table);
                }
                StoreSource::Postgres {
                    database_url,
                    table,
                    max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
                }
            }
            (None, None) => bail!("either DATABASE_URL or LAUNCHES_FILE is required"),
        };

        let store_timeout = Duration::from_millis(parse_or(&get, "STORE_TIMEOUT_MS", 5000)?);
        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        Ok(Self {
            store,
            store_timeout,
            bind_addr,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
