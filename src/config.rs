use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use dotenvy::dotenv;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_scan_per_min: u32,
    pub rate_report_per_min: u32,

    // Scan sessions
    pub session_ttl: Duration,
    pub session_capacity: u64,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing optional keys fall
    /// back to defaults; present but malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let rate_scan_per_min = parse_or(&lookup, "RATE_SCAN_PER_MIN", 600)?;
        let rate_report_per_min = parse_or(&lookup, "RATE_REPORT_PER_MIN", 60)?;
        if rate_scan_per_min == 0 || rate_report_per_min == 0 {
            bail!("rate limits must be at least 1 request per minute");
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            rate_scan_per_min,
            rate_report_per_min,

            session_ttl: Duration::from_secs(parse_or(&lookup, "SCAN_SESSION_TTL_SECS", 28_800)?), // 8h
            session_capacity: parse_or(&lookup, "SCAN_SESSION_CAPACITY", 10_000)?,

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parse_or(&lookup, "LOG_LEVEL", Level::DEBUG)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
