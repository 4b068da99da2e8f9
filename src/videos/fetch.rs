// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::ProviderId;
use crate::cache::TtlCache;
use crate::common::Error;
use crate::log::StringLogger;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Outbound GET used by providers that must ask their own API for an embed ID.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Returns the body at `url`.
    async fn get(&self, url: &str) -> Result<String, Error>;
}

#[cfg(feature = "http")]
pub use self::reqwest_fetcher::ReqwestFetcher;

#[cfg(feature = "http")]
mod reqwest_fetcher {
    use super::MetadataFetcher;
    use crate::common::{Error, VidSettings};
    use async_trait::async_trait;
    use hyper::StatusCode;
    use reqwest::Client;

    /// `MetadataFetcher` over HTTP with a short timeout.
    pub struct ReqwestFetcher {
        client: Client,
    }

    impl ReqwestFetcher {
        /// Creates a fetcher using `settings.fetch_timeout`.
        pub fn new(settings: &VidSettings) -> Result<Self, Error> {
            Ok(Self {
                client: Client::builder()
                    .timeout(settings.fetch_timeout)
                    .http1_only()
                    .build()
                    .map_err(Self::map_error)?,
            })
        }

        fn map_error(e: reqwest::Error) -> Error {
            Error::Http(StatusCode::FAILED_DEPENDENCY, format!("{}", e))
        }
    }

    #[async_trait]
    impl MetadataFetcher for ReqwestFetcher {
        async fn get(&self, url: &str) -> Result<String, Error> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(Self::map_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::Http(
                    StatusCode::FAILED_DEPENDENCY,
                    format!("{url}: provider answered {status}"),
                ));
            }
            response.text().await.map_err(Self::map_error)
        }
    }
}

/// `MetadataFetcher` that answers from a fixed table, for offline use and tests.
/// Every requested URL is recorded.
#[derive(Default)]
pub struct CannedFetcher {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl CannedFetcher {
    /// Creates a fetcher with no responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a response body for `url`.
    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetadataFetcher for CannedFetcher {
    async fn get(&self, url: &str) -> Result<String, Error> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::String(format!("{url}: no canned response")))
    }
}

/// What a provider needs to exchange a public URL for an embed ID: the
/// fetcher, and a cache of previous answers keyed by provider and ID.
#[derive(Clone)]
pub struct MetadataLookup {
    fetcher: Arc<dyn MetadataFetcher>,
    cache: Arc<dyn TtlCache>,
    ttl: Duration,
    logger: StringLogger,
}

impl MetadataLookup {
    /// Creates a lookup whose answers are cached for `ttl`.
    pub fn new(
        fetcher: Arc<dyn MetadataFetcher>,
        cache: Arc<dyn TtlCache>,
        ttl: Duration,
        logger: &StringLogger,
    ) -> Self {
        Self {
            fetcher,
            cache,
            ttl,
            logger: logger.child("videos"),
        }
    }

    /// The same lookup, logging to `logger`.
    pub fn with_logger(&self, logger: &StringLogger) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            logger: logger.child("videos"),
        }
    }

    /// Cache key of a provider's answer about `id`.
    pub fn key(provider: ProviderId, id: &str) -> String {
        format!("video:{provider}:{id}")
    }

    /// Returns a previously remembered embed ID.
    pub async fn cached(&self, provider: ProviderId, id: &str) -> Option<String> {
        let key = Self::key(provider, id);
        match self.cache.get(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                self.logger.warn(format!("{key}: metadata cache read failed: {e}"));
                None
            }
        }
    }

    /// Remembers an embed ID.
    pub async fn remember(&self, provider: ProviderId, id: &str, embed_id: &str) {
        let key = Self::key(provider, id);
        if let Err(e) = self.cache.set(&key, embed_id.to_string(), self.ttl).await {
            self.logger.warn(format!("{key}: metadata cache write failed: {e}"));
        }
    }

    /// Fetches `url`; a failure is logged as a warning and yields `None`.
    pub async fn fetch(&self, provider: ProviderId, url: &str) -> Option<String> {
        match self.fetcher.get(url).await {
            Ok(body) => {
                self.logger.trace(format!("{provider} metadata from {url}"));
                Some(body)
            }
            Err(e) => {
                self.logger.warn(format!("{provider} metadata from {url} failed: {e}"));
                None
            }
        }
    }

    /// Logs a provider answer that couldn't be understood.
    pub fn unreadable(&self, provider: ProviderId, url: &str) {
        self.logger
            .warn(format!("{provider} metadata from {url} is unreadable"));
    }
}
