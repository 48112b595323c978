//! Runtime settings read from the environment.
//!
//! A `.env` file in the working directory (or a parent) is loaded first if
//! present. Unset or empty variables fall back to the defaults below.
//!
//! | Variable         | Default                   |
//! |------------------|---------------------------|
//! | `API_URL`        | `https://httpbin.org/put` |
//! | `CUSTOMERS_FILE` | `static/customers.csv`    |
//! | `PURCHASES_FILE` | `static/purchases.csv`    |
//! | `LOG_DIR`        | `logs`                    |

use std::env;
use std::path::PathBuf;

/// Remote endpoint used when `API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://httpbin.org/put";

pub const DEFAULT_CUSTOMERS_FILE: &str = "static/customers.csv";

pub const DEFAULT_PURCHASES_FILE: &str = "static/purchases.csv";

pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub customers_file: PathBuf,
    pub purchases_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            customers_file: PathBuf::from(DEFAULT_CUSTOMERS_FILE),
            purchases_file: PathBuf::from(DEFAULT_PURCHASES_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: var("API_URL").unwrap_or(defaults.api_url),
            customers_file: var("CUSTOMERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.customers_file),
            purchases_file: var("PURCHASES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.purchases_file),
            log_dir: var("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
        }
    }
}
