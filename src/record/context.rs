// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::cache::{InMemoryTtlCache, TtlCache, VideoCache};
use crate::common::VidSettings;
use crate::log::StringLogger;
use crate::store::{InMemoryTables, VersionStore, VideoTables};
use crate::videos::{MetadataFetcher, MetadataLookup, ProviderRegistry};
use std::sync::Arc;

#[cfg(all(feature = "aws", feature = "http"))]
use crate::common::{Error, VidConfig};

/// Everything a [`Video`](super::Video) needs: storage, caches, the provider
/// registry and settings. Cheap to clone, and meant to live as long as the
/// process. It keeps no log; each operation logs to the logger it is given.
#[derive(Clone)]
pub struct VideoContext {
    store: VersionStore,
    lookup: MetadataLookup,
    registry: &'static ProviderRegistry,
    settings: VidSettings,
    debug: bool,
}

impl VideoContext {
    /// Creates a context over `tables`. Records and provider metadata share
    /// the `cache` backend, under different keys.
    pub fn new(
        tables: Arc<dyn VideoTables>,
        cache: Arc<dyn TtlCache>,
        fetcher: Arc<dyn MetadataFetcher>,
        settings: VidSettings,
        debug: bool,
    ) -> Self {
        // Only ever used through `with_logger`.
        let unbound = StringLogger::new(debug);
        let video_cache = VideoCache::new(Arc::clone(&cache), settings.record_ttl, &unbound);
        Self {
            store: VersionStore::new(tables, video_cache, &unbound),
            lookup: MetadataLookup::new(fetcher, cache, settings.metadata_ttl, &unbound),
            registry: ProviderRegistry::global(),
            settings,
            debug,
        }
    }

    /// Creates a context whose tables and cache live in process memory.
    pub fn in_memory(fetcher: Arc<dyn MetadataFetcher>, settings: VidSettings, debug: bool) -> Self {
        let cache = InMemoryTtlCache::with_capacity(settings.cache_capacity);
        Self::new(
            Arc::new(InMemoryTables::new()),
            Arc::new(cache),
            fetcher,
            settings,
            debug,
        )
    }

    /// Creates a context over DynamoDB tables, fetching provider metadata
    /// over HTTP. The cache lives in process memory.
    #[cfg(all(feature = "aws", feature = "http"))]
    pub async fn from_config(vid_config: &VidConfig) -> Result<Self, Error> {
        use crate::store::DynamoTables;
        use crate::videos::ReqwestFetcher;

        let settings = vid_config.settings()?;
        let tables = DynamoTables::from_config(vid_config).await?;
        let fetcher = ReqwestFetcher::new(&settings)?;
        let cache = InMemoryTtlCache::with_capacity(settings.cache_capacity);
        Ok(Self::new(
            Arc::new(tables),
            Arc::new(cache),
            Arc::new(fetcher),
            settings,
            vid_config.debug(),
        ))
    }

    /// A new logger for one request, echoing to stdout if debug is enabled.
    pub fn logger(&self) -> StringLogger {
        StringLogger::new(self.debug)
    }

    /// The version store, logging to `logger`.
    pub fn store(&self, logger: &StringLogger) -> VersionStore {
        self.store.with_logger(logger)
    }

    /// The provider metadata lookup, logging to `logger`.
    pub fn lookup(&self, logger: &StringLogger) -> MetadataLookup {
        self.lookup.with_logger(logger)
    }

    /// The provider registry.
    pub fn registry(&self) -> &'static ProviderRegistry {
        self.registry
    }

    /// Settings
    pub fn settings(&self) -> &VidSettings {
        &self.settings
    }
}
