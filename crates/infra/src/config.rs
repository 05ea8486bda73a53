//! Process configuration, read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `USE_PERSISTENT_STORES` | `false` | Postgres instead of the in-memory store |
//! | `DATABASE_URL` | composed from `DB_*` | Postgres connection string |
//! | `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT` | `DB_PORT=5432` | parts used when `DATABASE_URL` is unset |
//! | `SEED_OPERATION_TYPES` | `true` | upsert the default operation types at startup |

use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("persistent stores requested but neither DATABASE_URL nor {0} is set")]
    MissingDatabase(&'static str),
}

/// Which backing store the application runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub seed_operation_types: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let use_persistent = parse_bool(&lookup, "USE_PERSISTENT_STORES", false)?;
        let seed_operation_types = parse_bool(&lookup, "SEED_OPERATION_TYPES", true)?;

        let store = if use_persistent {
            StoreConfig::Postgres {
                database_url: database_url(&lookup)?,
            }
        } else {
            StoreConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            store,
            seed_operation_types,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreConfig::InMemory,
            seed_operation_types: true,
        }
    }
}

fn parse_bool<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value: raw,
                reason: "expected a boolean".to_string(),
            }),
        },
    }
}

fn database_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL") {
        return Ok(url);
    }

    let require = |name: &'static str| lookup(name).ok_or(ConfigError::MissingDatabase(name));
    let host = require("DB_HOST")?;
    let user = require("DB_USER")?;
    let password = require("DB_PASSWORD")?;
    let db_name = require("DB_NAME")?;
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{db_name}"))
}
