use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

use crate::error::ConfigError;

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store kind '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub redis_prefix: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let origins: String = try_load("ALLOWED_ORIGINS", "http://localhost:5173")?;

        Ok(Self {
            port: try_load("PORT", "3000")?,
            store: try_load("STORE", "redis")?,
            redis_url: read_secret_or("REDIS_URL", "redis://127.0.0.1:6379"),
            redis_prefix: try_load("REDIS_PREFIX", "todo")?,
            allowed_origins: split_origins(&origins),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            store: StoreKind::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_prefix: "todo".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");

        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

fn read_secret_or(secret_name: &str, default: &str) -> String {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => secret.trim().to_string(),
        Err(_) => var(secret_name).unwrap_or_else(|| {
            info!("{secret_name} not set, using default: {default}");
            default.to_string()
        }),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
