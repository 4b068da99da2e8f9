// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::TtlCache;
use crate::common::{Error, UploaderId, VideoName};
use crate::log::StringLogger;
use crate::store::CurrentRecord;
use crate::time_id::UnixMillis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Cached projection of a `CurrentRecord`. Never authoritative.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CacheEntry {
    /// URL on the provider's site.
    pub url: String,
    /// Provider name as stored.
    pub provider: String,
    /// Who made this version.
    pub uploader: UploaderId,
    /// When this version was made.
    pub timestamp: UnixMillis,
}

impl CacheEntry {
    /// Rebuilds the record this entry was projected from.
    pub fn into_record(self, name: VideoName) -> CurrentRecord {
        CurrentRecord {
            name,
            url: self.url,
            provider: self.provider,
            uploader: self.uploader,
            timestamp: self.timestamp,
        }
    }
}

impl From<&CurrentRecord> for CacheEntry {
    fn from(record: &CurrentRecord) -> Self {
        Self {
            url: record.url.clone(),
            provider: record.provider.clone(),
            uploader: record.uploader.clone(),
            timestamp: record.timestamp,
        }
    }
}

/// Get/set/invalidate of `CacheEntry` by video name. Never reads the store
/// itself; the caller decides what to do on a miss.
#[derive(Clone)]
pub struct VideoCache {
    backend: Arc<dyn TtlCache>,
    ttl: Duration,
    logger: StringLogger,
}

impl VideoCache {
    const KEY_PREFIX: &'static str = "video:page:";

    /// Wraps a backend, using `ttl` for `set_default`.
    pub fn new(backend: Arc<dyn TtlCache>, ttl: Duration, logger: &StringLogger) -> Self {
        Self {
            backend,
            ttl,
            logger: logger.child("cache"),
        }
    }

    /// The same cache, logging to `logger`.
    pub fn with_logger(&self, logger: &StringLogger) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            ttl: self.ttl,
            logger: logger.child("cache"),
        }
    }

    /// Cache key of a name; spaces and underscores give the same key.
    pub fn key(name: &str) -> String {
        format!("{}{}", Self::KEY_PREFIX, name.replace(' ', "_"))
    }

    /// TTL applied by `set_default`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached entry, or `None` on a miss. An unreadable entry is
    /// dropped and reported as a miss.
    pub async fn get(&self, name: &str) -> Result<Option<CacheEntry>, Error> {
        let key = Self::key(name);
        let Some(json) = self.backend.get(&key).await? else {
            self.logger.trace(format!("miss {key}"));
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(entry) => {
                self.logger.trace(format!("hit {key}"));
                Ok(Some(entry))
            }
            Err(e) => {
                self.logger.warn(format!("dropping unreadable {key}: {e}"));
                self.backend.delete(&key).await?;
                Ok(None)
            }
        }
    }

    /// Stores an entry for `ttl`.
    pub async fn set(&self, name: &str, entry: &CacheEntry, ttl: Duration) -> Result<(), Error> {
        let json = serde_json::to_string(entry)?;
        self.backend.set(&Self::key(name), json, ttl).await
    }

    /// Stores an entry for the configured TTL.
    pub async fn set_default(&self, name: &str, entry: &CacheEntry) -> Result<(), Error> {
        self.set(name, entry, self.ttl).await
    }

    /// Removes any entry for `name`.
    pub async fn invalidate(&self, name: &str) -> Result<(), Error> {
        let key = Self::key(name);
        self.logger.trace(format!("invalidate {key}"));
        self.backend.delete(&key).await
    }
}
