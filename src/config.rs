use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &str = "http://127.0.0.1:5501,http://localhost:5501";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,
    /// Browser origins allowed to call the API; `*` allows any.
    pub cors_origins: Vec<String>,

    // Database
    pub db_max_connections: u32,
    pub db_connect_retries: u32,
    pub db_connect_retry_delay_secs: u64,
    /// Drop and recreate all tables on startup. Discards every record.
    pub reset_schema: bool,
    pub seed_employees: bool,

    // Rate limiting
    pub rate_punch_per_min: u32,
    pub rate_api_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            server_addr: var_or("SERVER_ADDR", "0.0.0.0:3019"),
            api_prefix: var_or("API_PREFIX", "/api"),
            cors_origins: parse_origins(&var_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS))?,

            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            db_connect_retries: parse_or("DB_CONNECT_RETRIES", 5)?,
            db_connect_retry_delay_secs: parse_or("DB_CONNECT_RETRY_DELAY_SECS", 5)?,
            reset_schema: parse_or("RESET_SCHEMA", true)?,
            seed_employees: parse_or("SEED_EMPLOYEES", true)?,

            rate_punch_per_min: parse_or("RATE_PUNCH_PER_MIN", 60)?,
            rate_api_per_min: parse_or("RATE_API_PER_MIN", 1000)?,

            log_dir: var_or("LOG_DIR", "logs"),
            log_level: var_or("LOG_LEVEL", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            server_addr: "0.0.0.0:3019".to_string(),
            api_prefix: "/api".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.split(',').map(str::to_string).collect(),
            db_max_connections: 10,
            db_connect_retries: 5,
            db_connect_retry_delay_secs: 5,
            reset_schema: true,
            seed_employees: true,
            rate_punch_per_min: 60,
            rate_api_per_min: 1000,
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Comma separated origins. Each must be `*` or a valid URI.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if origin != "*" {
                origin
                    .parse::<actix_web::http::Uri>()
                    .with_context(|| format!("invalid CORS_ORIGINS entry {origin:?}"))?;
            }
            Ok(origin.to_string())
        })
        .collect()
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}
