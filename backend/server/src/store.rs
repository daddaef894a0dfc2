//! # Cache store
//!
//! Key-value store with per-key expiry, as seen by the refresh policy.
//!
//! ## Layout
//! - `<key>`: JSON payload, expires after the region TTL
//! - `<key>:last-good`: same payload, never expires
//!
//! The live key decides hits. The last-good copy only backs the
//! rate-limit fallback, so a region can be served stale after its live key
//! has expired or been invalidated.
//!
//! Two implementations: [`crate::database::RedisStore`] and the in-process
//! [`MemoryStore`].
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store disconnected: {0}")]
    Disconnected(String),

    #[error("Store error: {0}")]
    Backend(String),
}

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    Expires(Duration),
    Persistent,
    Missing,
}

impl KeyTtl {
    /// Maps a Redis `TTL` reply: `-2` missing, `-1` no expiry.
    pub fn from_seconds(seconds: i64) -> Self {
        match seconds {
            -1 => KeyTtl::Persistent,
            s if s < 0 => KeyTtl::Missing,
            s => KeyTtl::Expires(Duration::from_secs(s as u64)),
        }
    }

    pub fn minutes_left(&self) -> Option<u64> {
        match self {
            KeyTtl::Expires(remaining) => Some(remaining.as_secs() / 60),
            _ => None,
        }
    }
}

pub fn last_good_key(key: &str) -> String {
    format!("{key}:last-good")
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Live value, `None` once expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Any retrievable value, expired or not.
    async fn get_stale(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes the live key with `ttl` and refreshes the last-good copy.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError>;

    /// Deletes the live key only.
    async fn del(&self, key: &str) -> Result<bool, StoreError>;

    async fn reconnect(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-process store.
///
/// Expired entries stay readable through [`CacheStore::get_stale`] until
/// overwritten or deleted. Connection drops can be injected with
/// [`MemoryStore::drop_connection`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    last_good: Mutex<HashMap<String, String>>,
    pending_drops: AtomicUsize,
    reconnects: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a live entry without touching the last-good copy.
    pub fn insert(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };

        self.lock_entries().insert(key.to_string(), entry);
    }

    /// Marks `key` as expired while keeping its value.
    pub fn expire(&self, key: &str) {
        if let Some(entry) = self.lock_entries().get_mut(key) {
            entry.expires_at = Some(Instant::now());
        }
    }

    /// Fails the next `count` operations with [`StoreError::Disconnected`].
    pub fn drop_connection(&self, count: usize) {
        self.pending_drops.store(count, Ordering::SeqCst);
    }

    pub fn reconnects(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock_entries().get(key).map(|entry| entry.value.clone())
    }

    fn check_connection(&self) -> Result<(), StoreError> {
        let dropped = self
            .pending_drops
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if dropped {
            return Err(StoreError::Disconnected("connection closed".to_string()));
        }

        Ok(())
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_last_good(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.last_good
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_connection()?;

        let now = Instant::now();
        Ok(self
            .lock_entries()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn get_stale(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_connection()?;

        if let Some(entry) = self.lock_entries().get(key) {
            return Ok(Some(entry.value.clone()));
        }

        Ok(self.lock_last_good().get(key).cloned())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.check_connection()?;

        self.insert(key, value, Some(ttl));
        self.lock_last_good()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError> {
        self.check_connection()?;

        let now = Instant::now();
        let ttl = match self.lock_entries().get(key) {
            Some(entry) if !entry.is_live(now) => KeyTtl::Missing,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => KeyTtl::Expires(at.saturating_duration_since(now)),
            Some(_) => KeyTtl::Persistent,
            None => KeyTtl::Missing,
        };

        Ok(ttl)
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        self.check_connection()?;

        Ok(self.lock_entries().remove(key).is_some())
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
