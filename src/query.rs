//! Keyed cache of results from the polled data services.
//!
//! Entries are keyed by query name plus parameter (for example the user
//! data of one address). Only the poller writes; widgets read. The last
//! result to arrive for a key wins.
//!
//! A failed fetch is surfaced according to whether the key already holds
//! data: background-refresh failures keep the stale data and raise a toast,
//! while a key with nothing cached falls back to an error panel that the
//! user clears manually.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

/// Registered query names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    Markets,
    UserData,
}

impl QueryName {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryName::Markets => "markets",
            QueryName::UserData => "user-data",
        }
    }
}

/// Composite cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: QueryName,
    pub param: Option<String>,
}

impl QueryKey {
    pub fn markets() -> Self {
        Self {
            name: QueryName::Markets,
            param: None,
        }
    }

    pub fn user_data(address: impl Into<String>) -> Self {
        Self {
            name: QueryName::UserData,
            param: Some(address.into()),
        }
    }
}

/// How a fetch failure should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSurface {
    /// Data was already cached; show a transient notification.
    Toast(String),
    /// Nothing cached; the widget renders its error panel.
    Fallback(String),
}

/// One cached query result.
#[derive(Debug, Clone)]
pub struct QueryEntry<V> {
    pub data: Option<V>,
    pub error: Option<String>,
    pub updated_at: Option<Instant>,
}

impl<V> Default for QueryEntry<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
        }
    }
}

/// Observable state of a key, as a widget sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus<'a, V> {
    /// No result has arrived yet.
    Loading,
    Ready(&'a V),
    /// The fetch failed and nothing is cached.
    Failed(&'a str),
}

/// Process-wide cache of query results of one value type.
#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, QueryEntry<V>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a fetch for `key`.
    ///
    /// Returns how to surface the failure, or `None` on success.
    pub fn resolve(
        &mut self,
        key: QueryKey,
        outcome: std::result::Result<V, String>,
    ) -> Option<ErrorSurface> {
        let name = key.name.as_str();
        let entry = self.entries.entry(key).or_default();
        match outcome {
            Ok(value) => {
                debug!(query = name, "Query resolved");
                entry.data = Some(value);
                entry.error = None;
                entry.updated_at = Some(Instant::now());
                None
            }
            Err(message) => {
                warn!(query = name, error = %message, "Query failed");
                if entry.data.is_some() {
                    Some(ErrorSurface::Toast(message))
                } else {
                    entry.error = Some(message.clone());
                    Some(ErrorSurface::Fallback(message))
                }
            }
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key)?.data.as_ref()
    }

    pub fn entry(&self, key: &QueryKey) -> Option<&QueryEntry<V>> {
        self.entries.get(key)
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus<'_, V> {
        match self.entries.get(key) {
            Some(QueryEntry {
                data: Some(value), ..
            }) => QueryStatus::Ready(value),
            Some(QueryEntry {
                error: Some(message),
                ..
            }) => QueryStatus::Failed(message),
            _ => QueryStatus::Loading,
        }
    }

    /// Clears the error for `key` so the widget shows its loading state
    /// until the next fetch arrives.
    pub fn reset(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_falls_back() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        let surface = cache.resolve(QueryKey::markets(), Err("timeout".to_string()));
        assert_eq!(surface, Some(ErrorSurface::Fallback("timeout".to_string())));
        assert_eq!(cache.status(&QueryKey::markets()), QueryStatus::Failed("timeout"));
    }

    #[test]
    fn refresh_failure_keeps_stale_data() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        assert!(cache.resolve(QueryKey::markets(), Ok(7)).is_none());

        let surface = cache.resolve(QueryKey::markets(), Err("502".to_string()));
        assert_eq!(surface, Some(ErrorSurface::Toast("502".to_string())));
        assert_eq!(cache.status(&QueryKey::markets()), QueryStatus::Ready(&7));
    }

    #[test]
    fn keys_are_isolated_by_param() {
        let mut cache: QueryCache<&str> = QueryCache::new();
        cache.resolve(QueryKey::user_data("0xa"), Ok("a"));
        cache.resolve(QueryKey::user_data("0xb"), Err("down".to_string()));

        assert_eq!(cache.get(&QueryKey::user_data("0xa")), Some(&"a"));
        assert_eq!(
            cache.status(&QueryKey::user_data("0xb")),
            QueryStatus::Failed("down")
        );
        assert_eq!(cache.status(&QueryKey::markets()), QueryStatus::Loading);
    }

    #[test]
    fn last_write_wins() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        cache.resolve(QueryKey::markets(), Ok(1));
        cache.resolve(QueryKey::markets(), Ok(2));
        assert_eq!(cache.get(&QueryKey::markets()), Some(&2));
    }

    #[test]
    fn reset_returns_to_loading() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        cache.resolve(QueryKey::markets(), Err("boom".to_string()));
        cache.reset(&QueryKey::markets());
        assert_eq!(cache.status(&QueryKey::markets()), QueryStatus::Loading);
        assert!(cache.entry(&QueryKey::markets()).is_some());
    }
}
