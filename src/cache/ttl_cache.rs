// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::Error;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

/// A string key-value store whose entries expire.
#[async_trait]
pub trait TtlCache: Send + Sync {
    /// Returns the value under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error>;

    /// Removes `key`, if present.
    async fn delete(&self, key: &str) -> Result<(), Error>;
}

#[derive(Clone)]
struct Expiring {
    value: String,
    ttl: Duration,
}

/// Each entry lives for the TTL it was last set with.
struct PerEntryTtl;

impl Expiry<String, Expiring> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Expiring,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Expiring,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Process-local `TtlCache`, bounded in entries. Expired entries are evicted
/// in the background, and the least recently used ones once full.
pub struct InMemoryTtlCache {
    entries: Cache<String, Expiring>,
}

impl InMemoryTtlCache {
    /// Entries kept by `new`.
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    /// Creates an empty cache of `DEFAULT_CAPACITY` entries.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty cache holding at most `max_capacity` entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Number of entries, after evicting what has expired.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether there are no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryTtlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtlCache for InMemoryTtlCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), Error> {
        self.entries
            .insert(key.to_string(), Expiring { value, ttl })
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}
