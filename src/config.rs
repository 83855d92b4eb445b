use std::net::SocketAddr;
use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Iex,
    AlphaVantage,
    Multi,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub alphavantage_api_key: String,
    pub provider: ProviderKind,
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub starting_cash_cents: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get("API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let session_secret = get("SESSION_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        let provider = match get("PRICE_PROVIDER")
            .unwrap_or_else(|| "iex".to_string())
            .to_lowercase()
            .as_str()
        {
            "iex" => ProviderKind::Iex,
            "alphavantage" => ProviderKind::AlphaVantage,
            "multi" => ProviderKind::Multi,
            other => {
                return Err(ConfigError::Invalid {
                    name: "PRICE_PROVIDER",
                    value: other.to_string(),
                })
            }
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        Ok(Self {
            alphavantage_api_key: get("ALPHAVANTAGE_API_KEY").unwrap_or_else(|| api_key.clone()),
            api_key,
            provider,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://finance.db?mode=rwc".to_string()),
            bind_addr,
            session_secret,
            session_ttl_hours: parse_or(&get, "SESSION_TTL_HOURS", 12, 1..=MAX_SESSION_TTL_HOURS)?,
            starting_cash_cents: parse_or(&get, "STARTING_CASH_CENTS", 1_000_000, 0..=i64::MAX)?,
        })
    }
}

fn parse_or<F>(
    get: &F,
    name: &'static str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) if range.contains(&v) => Ok(v),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}
