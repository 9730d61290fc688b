//! Application configuration loaded from environment variables.
//!
//! Every variable is optional:
//! - `DEPTHDESK_WEBSOCKET_URL`: market feed endpoint
//! - `DEPTHDESK_MARKETS_URL`: REST endpoint returning the market list
//! - `DEPTHDESK_USER_URL`: REST base for per-address user data
//! - `DEPTHDESK_ADDRESS`: connected account address (requires a user URL)
//! - `DEPTHDESK_SETTINGS_PATH`: where the settings blob is persisted
//! - `DEPTHDESK_THEME_PATH`: optional JSON map of depth chart colours
//! - `DEPTHDESK_POLL_SECS`: REST polling interval
//! - `DEPTHDESK_BOOK_DEPTH`: number of ladder levels kept per side

use std::path::PathBuf;
use std::time::Duration;

/// Default public WebSocket endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://ws.kraken.com/v2";

/// Default market list endpoint.
const DEFAULT_MARKETS_URL: &str = "http://127.0.0.1:8080/markets";

/// Default settings file, relative to the working directory.
const DEFAULT_SETTINGS_PATH: &str = "depthdesk-settings.json";

const DEFAULT_POLL_SECS: u64 = 10;

const DEFAULT_BOOK_DEPTH: usize = 25;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub data: DataConfig,
    pub settings_path: PathBuf,
    pub theme_path: Option<PathBuf>,
}

/// Streaming market feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub websocket_url: String,
    /// Maximum ladder levels kept per side.
    pub book_depth: usize,
}

/// Polled data service configuration.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub markets_url: String,
    pub user_url: Option<String>,
    pub address: Option<String>,
    pub poll_interval: Duration,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`DeskError::Config`](crate::DeskError::Config) if a numeric
/// variable does not parse, if the book depth is zero, or if an address is
/// configured without a user data URL.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url = non_empty_var("DEPTHDESK_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
    let markets_url = non_empty_var("DEPTHDESK_MARKETS_URL")
        .unwrap_or_else(|| DEFAULT_MARKETS_URL.to_string());
    let user_url = non_empty_var("DEPTHDESK_USER_URL");
    let address = non_empty_var("DEPTHDESK_ADDRESS");

    if address.is_some() && user_url.is_none() {
        return Err(crate::DeskError::Config(
            "DEPTHDESK_ADDRESS is set but DEPTHDESK_USER_URL is missing".to_string(),
        ));
    }

    let poll_secs = parse_var("DEPTHDESK_POLL_SECS", DEFAULT_POLL_SECS)?;
    let book_depth = parse_var("DEPTHDESK_BOOK_DEPTH", DEFAULT_BOOK_DEPTH)?;
    if book_depth == 0 {
        return Err(crate::DeskError::Config(
            "DEPTHDESK_BOOK_DEPTH must be at least 1".to_string(),
        ));
    }

    let settings_path = non_empty_var("DEPTHDESK_SETTINGS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let theme_path = non_empty_var("DEPTHDESK_THEME_PATH").map(PathBuf::from);

    Ok(AppConfig {
        feed: FeedConfig {
            websocket_url,
            book_depth,
        },
        data: DataConfig {
            markets_url,
            user_url,
            address,
            poll_interval: Duration::from_secs(poll_secs.max(1)),
        },
        settings_path,
        theme_path,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Parses a numeric environment variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> crate::Result<T> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| crate::DeskError::Config(format!("{name} is not a valid number: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every variable the loader reads, so each test starts from a clean slate.
    const ALL_VARS: [&str; 8] = [
        "DEPTHDESK_WEBSOCKET_URL",
        "DEPTHDESK_MARKETS_URL",
        "DEPTHDESK_USER_URL",
        "DEPTHDESK_ADDRESS",
        "DEPTHDESK_SETTINGS_PATH",
        "DEPTHDESK_THEME_PATH",
        "DEPTHDESK_POLL_SECS",
        "DEPTHDESK_BOOK_DEPTH",
    ];

    /// Helper that temporarily sets env vars, runs `f`, then restores originals.
    ///
    /// Variables not listed in `vars` are cleared for the duration of `f`.
    /// A process-wide lock serializes callers because the environment is
    /// shared between test threads.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        let _guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        for k in ALL_VARS {
            let value = vars.iter().find(|(name, _)| *name == k).and_then(|(_, v)| *v);
            // SAFETY: guarded by LOCK; no other test touches these variables.
            unsafe {
                match value {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values under the same lock.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.feed.websocket_url, DEFAULT_WEBSOCKET_URL);
            assert_eq!(config.feed.book_depth, DEFAULT_BOOK_DEPTH);
            assert_eq!(config.data.markets_url, DEFAULT_MARKETS_URL);
            assert!(config.data.user_url.is_none());
            assert!(config.data.address.is_none());
            assert_eq!(config.data.poll_interval, Duration::from_secs(DEFAULT_POLL_SECS));
            assert_eq!(config.settings_path, PathBuf::from(DEFAULT_SETTINGS_PATH));
            assert!(config.theme_path.is_none());
        });
    }

    #[test]
    fn loads_user_feed_from_env() {
        with_env(
            &[
                ("DEPTHDESK_USER_URL", Some("http://localhost/user")),
                ("DEPTHDESK_ADDRESS", Some("0xabc")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.data.user_url.as_deref(), Some("http://localhost/user"));
                assert_eq!(config.data.address.as_deref(), Some("0xabc"));
            },
        );
    }

    #[test]
    fn rejects_address_without_user_url() {
        with_env(&[("DEPTHDESK_ADDRESS", Some("0xabc"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("DEPTHDESK_USER_URL is missing"));
        });
    }

    #[test]
    fn rejects_non_numeric_poll_interval() {
        with_env(&[("DEPTHDESK_POLL_SECS", Some("soon"))], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("DEPTHDESK_POLL_SECS"));
        });
    }

    #[test]
    fn rejects_zero_book_depth() {
        with_env(&[("DEPTHDESK_BOOK_DEPTH", Some("0"))], || {
            assert!(fetch_config().is_err());
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("DEPTHDESK_WEBSOCKET_URL", Some("")),
                ("DEPTHDESK_ADDRESS", Some("")),
                ("DEPTHDESK_POLL_SECS", Some("")),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.feed.websocket_url, DEFAULT_WEBSOCKET_URL);
                assert!(config.data.address.is_none());
                assert_eq!(config.data.poll_interval, Duration::from_secs(DEFAULT_POLL_SECS));
            },
        );
    }
}
