// config.rs
use crate::domain::DedupPolicy;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_LISTINGS_URL: &str = "https://www.ss.com/en/real-estate/flats/riga/all/hand_over/";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: cannot parse '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("RENTALS_DELAY_MS_MIN ({min}) is larger than RENTALS_DELAY_MS_MAX ({max})")]
    DelayRange { min: u64, max: u64 },
}

/// How the listing scraper talks to the site.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    pub listings_url: String,
    pub user_agents: Vec<String>,
    /// Pause between detail page requests, picked uniformly per request.
    pub delay_ms: RangeInclusive<u64>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoConfig {
    pub geocoder_url: String,
    /// When false, only the district table and the default are used.
    pub online: bool,
    pub user_agent: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scrape: ScrapeConfig,
    pub geo: GeoConfig,
    pub max_price: f64,
    pub db_path: String,
    pub dedup: DedupPolicy,
}

impl AppConfig {
    /// Reads `RENTALS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listings_url = lookup("RENTALS_LISTINGS_URL").unwrap_or_else(|| DEFAULT_LISTINGS_URL.to_string());
        let max_price: f64 = parse_or(&lookup, "RENTALS_MAX_PRICE", 1500.0)?;
        let db_path = lookup("RENTALS_DB_PATH").unwrap_or_else(|| "rentals.sqlite3".to_string());
        let geocoder_url = lookup("RENTALS_GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());
        let online: bool = parse_or(&lookup, "RENTALS_GEOCODE_ONLINE", true)?;
        let delay_min: u64 = parse_or(&lookup, "RENTALS_DELAY_MS_MIN", 300)?;
        let delay_max: u64 = parse_or(&lookup, "RENTALS_DELAY_MS_MAX", 500)?;
        let dedup: DedupPolicy = parse_or(&lookup, "RENTALS_DEDUP", DedupPolicy::default())?;

        if delay_min > delay_max {
            return Err(ConfigError::DelayRange {
                min: delay_min,
                max: delay_max,
            });
        }

        let user_agents = match lookup("RENTALS_USER_AGENTS") {
            Some(list) => list
                .split('|')
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        };

        Ok(AppConfig {
            scrape: ScrapeConfig {
                listings_url,
                user_agents,
                delay_ms: delay_min..=delay_max,
                timeout_secs: 30,
            },
            geo: GeoConfig {
                geocoder_url,
                online,
                user_agent: "PropertySearchProject".to_string(),
                timeout_secs: 10,
            },
            max_price,
            db_path,
            dedup,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
