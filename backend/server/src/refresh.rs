//! # Refresh policy
//!
//! Cache-aside read for one region:
//!
//! 1. Live key present: deserialize and return, no fetch
//! 2. Otherwise fetch, write with the region TTL, return
//! 3. Fetch rate limited: return whatever copy the store still has (if the
//!    region allows it), else empty
//! 4. Any other fetch failure: empty, cache untouched
//!
//! A dropped store connection reconnects and reruns the whole read once.
//! A second drop in the same call degrades to empty. A drop while writing a
//! fetched value only retries the write, and the value is returned even if
//! it could not be cached.
//!
//! Concurrent misses on one key both fetch and both write. Last writer wins,
//! which is harmless since both wrote the same upstream data.
use std::{future::Future, sync::Arc, time::Duration};

use feeds::FetchError;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, info, warn};

use crate::store::{CacheStore, StoreError};

pub const MAX_RECONNECTS: usize = 1;

/// One independently cached dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub key: &'static str,
    pub ttl: Duration,
    pub stale_on_rate_limit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degraded {
    RateLimited,
    Unavailable,
    Malformed,
    StoreUnavailable,
}

impl From<&FetchError> for Degraded {
    fn from(e: &FetchError) -> Self {
        match e {
            FetchError::RateLimited { .. } => Degraded::RateLimited,
            FetchError::Status { .. } | FetchError::Unavailable(_) => Degraded::Unavailable,
            FetchError::Malformed(_) => Degraded::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Refreshed<T> {
    Hit(T),
    Fetched(T),
    Stale { value: T, minutes_left: Option<u64> },
    Empty(Degraded),
}

impl<T: Default> Refreshed<T> {
    pub fn into_value(self) -> T {
        match self {
            Refreshed::Hit(value) | Refreshed::Fetched(value) => value,
            Refreshed::Stale { value, .. } => value,
            Refreshed::Empty(_) => T::default(),
        }
    }
}

impl<T> Refreshed<T> {
    pub fn source(&self) -> &'static str {
        match self {
            Refreshed::Hit(_) => "cache",
            Refreshed::Fetched(_) => "upstream",
            Refreshed::Stale { .. } => "stale",
            Refreshed::Empty(_) => "empty",
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Refreshed::Hit(value) | Refreshed::Fetched(value) => Some(value),
            Refreshed::Stale { value, .. } => Some(value),
            Refreshed::Empty(_) => None,
        }
    }

    pub fn degraded(&self) -> Option<Degraded> {
        match self {
            Refreshed::Empty(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub struct RefreshPolicy {
    store: Arc<dyn CacheStore>,
}

impl RefreshPolicy {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get_or_refresh<T, F, Fut>(&self, region: &Region, fetcher: F) -> Refreshed<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut reconnects = 0;

        loop {
            match self.attempt(region, &fetcher).await {
                Ok(refreshed) => return refreshed,
                Err(StoreError::Disconnected(e)) if reconnects < MAX_RECONNECTS => {
                    reconnects += 1;
                    warn!(key = region.key, "Store connection closed ({e}), reconnecting");

                    if let Err(e) = self.store.reconnect().await {
                        error!(key = region.key, "Reconnect failed: {e}");
                        return Refreshed::Empty(Degraded::StoreUnavailable);
                    }
                }
                Err(e) => {
                    error!(key = region.key, "Giving up on store: {e}");
                    return Refreshed::Empty(Degraded::StoreUnavailable);
                }
            }
        }
    }

    /// Deletes the live key, then reads through to upstream.
    ///
    /// Regions that allow stale reads fall back to the last-good copy when
    /// upstream fails or returns a malformed payload, since the live key is
    /// already gone.
    pub async fn refresh<T, F, Fut>(
        &self,
        region: &Region,
        fetcher: F,
    ) -> Result<Refreshed<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        self.invalidate(region).await?;

        let refreshed = match self.get_or_refresh(region, fetcher).await {
            Refreshed::Empty(reason @ (Degraded::Unavailable | Degraded::Malformed))
                if region.stale_on_rate_limit =>
            {
                match self.stale_copy(region).await {
                    Ok(Some(value)) => {
                        warn!(key = region.key, ?reason, "Refresh failed, serving last good copy");
                        Refreshed::Stale {
                            value,
                            minutes_left: None,
                        }
                    }
                    Ok(None) => Refreshed::Empty(reason),
                    Err(e) => {
                        error!(key = region.key, "Last good copy unreachable: {e}");
                        Refreshed::Empty(reason)
                    }
                }
            }
            other => other,
        };

        Ok(refreshed)
    }

    pub async fn invalidate(&self, region: &Region) -> Result<bool, StoreError> {
        let mut reconnects = 0;

        loop {
            match self.store.del(region.key).await {
                Ok(removed) => {
                    info!(key = region.key, removed, "Invalidated cache key");
                    return Ok(removed);
                }
                Err(StoreError::Disconnected(e)) if reconnects < MAX_RECONNECTS => {
                    reconnects += 1;
                    warn!(key = region.key, "Store connection closed ({e}), reconnecting");
                    self.store.reconnect().await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt<T, F, Fut>(&self, region: &Region, fetcher: &F) -> Result<Refreshed<T>, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        match self.store.get(region.key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    info!(key = region.key, source = "cache", "Serving from cache");
                    return Ok(Refreshed::Hit(value));
                }
                Err(e) => warn!(key = region.key, "Discarding unreadable cache entry: {e}"),
            },
            Ok(None) => {}
            Err(StoreError::Disconnected(e)) => return Err(StoreError::Disconnected(e)),
            Err(e) => warn!(key = region.key, "Cache read failed, fetching: {e}"),
        }

        match fetcher().await {
            Ok(value) => {
                self.write(region, &value).await;
                info!(key = region.key, source = "upstream", "Fetched and cached");

                Ok(Refreshed::Fetched(value))
            }
            Err(e) if e.is_rate_limited() && region.stale_on_rate_limit => {
                self.serve_stale(region, &e).await
            }
            Err(e) => {
                error!(key = region.key, "Fetch failed: {e}");
                Ok(Refreshed::Empty(Degraded::from(&e)))
            }
        }
    }

    /// Stores a fetched value. Failures are logged and never discard the value.
    async fn write<T: Serialize>(&self, region: &Region, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                error!(key = region.key, "Not caching unserializable value: {e}");
                return;
            }
        };

        let mut reconnects = 0;

        loop {
            match self.store.set_ex(region.key, &payload, region.ttl).await {
                Ok(()) => return,
                Err(StoreError::Disconnected(e)) if reconnects < MAX_RECONNECTS => {
                    reconnects += 1;
                    warn!(key = region.key, "Store connection closed on write ({e}), reconnecting");

                    if let Err(e) = self.store.reconnect().await {
                        error!(key = region.key, "Reconnect failed, value not cached: {e}");
                        return;
                    }
                }
                Err(e) => {
                    error!(key = region.key, "Cache write failed: {e}");
                    return;
                }
            }
        }
    }

    async fn serve_stale<T>(&self, region: &Region, cause: &FetchError) -> Result<Refreshed<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let minutes_left = self.store.ttl(region.key).await?.minutes_left();
        error!(
            key = region.key,
            minutes_left, "{cause}, serving cached data"
        );

        let refreshed = match self.stale_copy(region).await? {
            Some(value) => Refreshed::Stale {
                value,
                minutes_left,
            },
            None => Refreshed::Empty(Degraded::RateLimited),
        };

        Ok(refreshed)
    }

    /// Live value if present, else the last-good copy.
    async fn stale_copy<T: DeserializeOwned>(&self, region: &Region) -> Result<Option<T>, StoreError> {
        let Some(payload) = self.store.get_stale(region.key).await? else {
            error!(key = region.key, "No cached data available");
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                error!(key = region.key, "Cached data unreadable: {e}");
                Ok(None)
            }
        }
    }
}
