//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use checkout::DEFAULT_SUCCESS_RATE;
use common::UserId;
use domain::DEFAULT_ADMIN_ID;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default `0.0.0.0`)
/// - `PORT`: listen port (default `3000`)
/// - `RUST_LOG`: tracing filter directive (default `info`)
/// - `STOREFRONT_DATA_DIR`: directory for the JSON mirror; unset keeps it in memory
/// - `PAYMENT_SUCCESS_RATE`: approval probability (default `0.95`)
/// - `PAYMENT_DELAY_MS`: simulated payment delay (default `1500`)
/// - `AUTH_DELAY_MS`: simulated login/registration delay (default `500`)
/// - `ADMIN_USER_ID`: account notified of every order (default `admin1`)
///
/// Unparseable values fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub data_dir: Option<PathBuf>,
    pub payment_success_rate: f64,
    pub payment_delay: Duration,
    pub auth_delay: Duration,
    pub admin_id: UserId,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            data_dir: lookup("STOREFRONT_DATA_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            payment_success_rate: parsed(&lookup, "PAYMENT_SUCCESS_RATE")
                .unwrap_or(defaults.payment_success_rate),
            payment_delay: parsed(&lookup, "PAYMENT_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.payment_delay),
            auth_delay: parsed(&lookup, "AUTH_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.auth_delay),
            admin_id: lookup("ADMIN_USER_ID")
                .filter(|id| !id.trim().is_empty())
                .and_then(|id| storable_user_id(id.trim()))
                .unwrap_or(defaults.admin_id),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Config for tests: in-memory storage, no simulated delays.
    pub fn instant() -> Self {
        Self {
            payment_delay: Duration::ZERO,
            auth_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, %value, "ignoring unparseable config value");
            None
        }
    }
}

/// Accepts a user id only if its notification key is a valid file name, so
/// the admin fan-out works with either storage backend.
fn storable_user_id(id: &str) -> Option<UserId> {
    match storage::validate_key(&storage::keys::notifications(id)) {
        Ok(()) => Some(UserId::new(id)),
        Err(_) => {
            tracing::warn!(
                key = "ADMIN_USER_ID",
                value = id,
                "ignoring admin id unusable as a storage key"
            );
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            data_dir: None,
            payment_success_rate: DEFAULT_SUCCESS_RATE,
            payment_delay: Duration::from_millis(1500),
            auth_delay: Duration::from_millis(500),
            admin_id: UserId::new(DEFAULT_ADMIN_ID),
        }
    }
}
