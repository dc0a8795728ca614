//! Environment-driven server configuration.

use std::{str::FromStr, time::Duration};

use crate::server::error::config::ConfigError;

const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
const DEFAULT_ESI_DATASOURCE: &str = "tranquility";
const DEFAULT_ZKILL_URL: &str = "https://zkillboard.com/api";

pub struct Config {
    pub contact_email: String,
    pub user_agent: String,
    pub esi_url: String,
    pub esi_datasource: String,
    pub zkill_url: String,
    pub host: String,
    pub port: u16,
    pub lookup: LookupConfig,
}

/// Tuning for the lookup core, separate from process-level settings so tests can build
/// it directly.
#[derive(Clone, Debug)]
pub struct LookupConfig {
    /// Maximum number of names accepted per lookup request
    pub max_characters: usize,
    /// Lifetime of directory, corporation and alliance entries
    pub long_ttl: Duration,
    /// Lifetime of statistics entries when the provider does not suggest one
    pub default_ttl: Duration,
    /// Per-attempt timeout for outbound calls
    pub request_timeout: Duration,
    /// Maximum number of concurrent outbound calls per batch
    pub concurrency: usize,
    /// Initial delay between retry attempts, doubled on each retry
    pub retry_backoff: Duration,
    pub kill_history_enabled: bool,
    /// Window used for the recent kill count
    pub recent_kill_window: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_characters: 30,
            long_ttl: Duration::from_secs(24 * 60 * 60),
            default_ttl: Duration::from_secs(60 * 60),
            request_timeout: Duration::from_secs(10),
            concurrency: 10,
            retry_backoff: Duration::from_millis(500),
            kill_history_enabled: false,
            recent_kill_window: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LookupConfig::default();

        let contact_email = required(&source, "CONTACT_EMAIL")?;
        let user_agent = format!(
            "sclh/{} ({}; +https://github.com/kat1248/sclh)",
            env!("CARGO_PKG_VERSION"),
            contact_email
        );

        let lookup = LookupConfig {
            max_characters: parsed(&source, "MAX_CHARACTERS", defaults.max_characters)?,
            long_ttl: seconds(&source, "CACHE_LONG_TTL_SECS", defaults.long_ttl)?,
            default_ttl: seconds(&source, "CACHE_DEFAULT_TTL_SECS", defaults.default_ttl)?,
            request_timeout: seconds(&source, "REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            concurrency: parsed(&source, "LOOKUP_CONCURRENCY", defaults.concurrency)?,
            retry_backoff: Duration::from_millis(parsed(
                &source,
                "RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )?),
            kill_history_enabled: parsed(
                &source,
                "KILL_HISTORY_ENABLED",
                defaults.kill_history_enabled,
            )?,
            recent_kill_window: seconds(
                &source,
                "RECENT_KILL_WINDOW_SECS",
                defaults.recent_kill_window,
            )?,
        };

        if lookup.concurrency == 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "LOOKUP_CONCURRENCY".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            contact_email,
            user_agent,
            esi_url: source("ESI_URL").unwrap_or_else(|| DEFAULT_ESI_URL.to_string()),
            esi_datasource: source("ESI_DATASOURCE")
                .unwrap_or_else(|| DEFAULT_ESI_DATASOURCE.to_string()),
            zkill_url: source("ZKILL_URL").unwrap_or_else(|| DEFAULT_ZKILL_URL.to_string()),
            host: source("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&source, "PORT", 5015)?,
            lookup,
        })
    }
}

fn required<F>(source: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    source(var)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn parsed<F, T>(source: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match source(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

fn seconds<F>(source: &F, var: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parsed(source, var, default.as_secs()).map(Duration::from_secs)
}
