//! Runtime settings read from the environment (and `.env`, loaded by the
//! binary before this runs).
//!
//! | Variable            | Default                            |
//! |---------------------|------------------------------------|
//! | `MBTA_API_URL`      | `https://api-v3.mbta.com/vehicles` |
//! | `MBTA_DB_PATH`      | `mbta_vehicles.db`                 |
//! | `MBTA_API_KEY`      | unset                              |
//! | `MBTA_TIMEOUT_SECS` | `10`                               |

use anyhow::{Context, Result};
use std::time::Duration;

use crate::infra::mbta::DEFAULT_API_URL;

pub const DEFAULT_DB_PATH: &str = "mbta_vehicles.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub db_path: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: DEFAULT_DB_PATH.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match get("MBTA_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("MBTA_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))?,
            ),
            None => defaults.timeout,
        };

        Ok(Self {
            api_url: get("MBTA_API_URL").unwrap_or(defaults.api_url),
            db_path: get("MBTA_DB_PATH").unwrap_or(defaults.db_path),
            api_key: get("MBTA_API_KEY"),
            timeout,
        })
    }
}
