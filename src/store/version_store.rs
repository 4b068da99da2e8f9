// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{
    AddMode, AddOutcome, ArchiveName, ArchivedRecord, CurrentRecord, HistoryCursor, RecentFilter,
    UndeleteOutcome, VideoTables,
};
use crate::cache::{CacheEntry, VideoCache};
use crate::common::{Error, UploaderId, VideoName};
use crate::log::StringLogger;
use crate::time_id::{UnixMillis, UnixTime};
use std::sync::Arc;

/// Owns the current and archive tables and moves records between them,
/// keeping the record cache coherent.
#[derive(Clone)]
pub struct VersionStore {
    tables: Arc<dyn VideoTables>,
    cache: VideoCache,
    logger: StringLogger,
}

impl VersionStore {
    /// Attempts before a contended write gives up.
    pub const MAX_ATTEMPTS: usize = 8;

    /// Creates a store over `tables`, caching through `cache`.
    pub fn new(tables: Arc<dyn VideoTables>, cache: VideoCache, logger: &StringLogger) -> Self {
        Self {
            tables,
            cache,
            logger: logger.child("store"),
        }
    }

    /// The same store, logging to `logger`.
    pub fn with_logger(&self, logger: &StringLogger) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            cache: self.cache.with_logger(logger),
            logger: logger.child("store"),
        }
    }

    /// The underlying tables.
    pub fn tables(&self) -> &Arc<dyn VideoTables> {
        &self.tables
    }

    /// The live record of `name`, through the cache. Absence is not cached.
    pub async fn load(&self, name: &VideoName) -> Result<Option<CurrentRecord>, Error> {
        match self.cache.get(name).await {
            Ok(Some(entry)) => return Ok(Some(entry.into_record(name.clone()))),
            Ok(None) => {}
            Err(e) => self.logger.warn(format!("{name}: cache read failed: {e}")),
        }
        let record = self.tables.get_current(name).await?;
        let cached = match &record {
            Some(record) => self.cache.set_default(name, &CacheEntry::from(record)).await,
            None => self.cache.invalidate(name).await,
        };
        if let Err(e) = cached {
            self.logger.warn(format!("{name}: cache write failed: {e}"));
        }
        Ok(record)
    }

    /// Whether `name` has a live record (loading it).
    pub async fn exists(&self, name: &VideoName) -> Result<bool, Error> {
        Ok(self.load(name).await?.is_some())
    }

    /// Makes a new live version of `name`, archiving the present one if any.
    /// Concurrent adds all succeed; the last to write stays live and every
    /// replaced version is archived.
    pub async fn add_or_update(
        &self,
        name: &VideoName,
        url: &str,
        provider: &str,
        uploader: &UploaderId,
        now: UnixMillis,
        mode: AddMode,
    ) -> Result<AddOutcome, Error> {
        let record = CurrentRecord {
            name: name.clone(),
            url: url.to_string(),
            provider: provider.to_string(),
            uploader: uploader.clone(),
            timestamp: now,
        };
        let result = self.add_inner(&record, now, mode).await;
        let verb = match &result {
            Ok(AddOutcome::Updated { .. }) => "update",
            _ => "add",
        };
        self.logger
            .call(format!("{verb} {name} -> {provider} {url}"), result)
    }

    async fn add_inner(
        &self,
        record: &CurrentRecord,
        now: UnixMillis,
        mode: AddMode,
    ) -> Result<AddOutcome, Error> {
        let name = &record.name;
        let mut archived_at = now;
        for _ in 0..Self::MAX_ATTEMPTS {
            if self.tables.insert_current(record).await? {
                self.cache.invalidate(name).await?;
                return Ok(AddOutcome::Created);
            }
            if mode == AddMode::CreateOnly {
                return Err(Error::TitleInUse(name.clone()));
            }
            self.cache.invalidate(name).await?;
            let Some(existing) = self.tables.get_current(name).await? else {
                // Deleted meanwhile; try inserting again.
                continue;
            };
            let archive_name = ArchiveName::new(archived_at, name);
            match self
                .tables
                .supersede_current(&existing, &archive_name, record)
                .await
            {
                Ok(true) => {
                    // A reader may have refilled the entry since.
                    self.cache.invalidate(name).await?;
                    return Ok(AddOutcome::Updated {
                        archived: ArchivedRecord::archive(&existing, archive_name),
                    });
                }
                Ok(false) => {}
                Err(Error::ArchiveCollision(taken)) => {
                    self.logger.trace(format!("{taken} taken"));
                    archived_at = archived_at.add_millis(1);
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::String(format!(
            "{name}: gave up after {} contended writes",
            Self::MAX_ATTEMPTS
        )))
    }

    /// Archives the live record of `name` and removes it. When
    /// `expected_timestamp` is given, only a live record made at that time is
    /// archived. Returns the archived row; `None` if nothing was archived.
    pub async fn delete_video(
        &self,
        name: &VideoName,
        now: UnixMillis,
        expected_timestamp: Option<UnixMillis>,
    ) -> Result<Option<ArchivedRecord>, Error> {
        let result = self.delete_inner(name, now, expected_timestamp).await;
        let invalidated = self.cache.invalidate(name).await;
        let result = result.and_then(|archived| invalidated.map(|_| archived));
        self.logger.call(format!("delete {name}"), result)
    }

    async fn delete_inner(
        &self,
        name: &VideoName,
        now: UnixMillis,
        expected_timestamp: Option<UnixMillis>,
    ) -> Result<Option<ArchivedRecord>, Error> {
        let mut archived_at = now;
        for _ in 0..Self::MAX_ATTEMPTS {
            let Some(existing) = self.tables.get_current(name).await? else {
                return Ok(None);
            };
            if expected_timestamp.is_some_and(|expected| expected != existing.timestamp) {
                self.logger
                    .trace(format!("{name}: live version is not the one to delete"));
                return Ok(None);
            }
            let archive_name = ArchiveName::new(archived_at, name);
            match self.tables.archive_current(&existing, &archive_name).await {
                Ok(true) => return Ok(Some(ArchivedRecord::archive(&existing, archive_name))),
                Ok(false) => {}
                Err(Error::ArchiveCollision(_)) => archived_at = archived_at.add_millis(1),
                Err(e) => return Err(e),
            }
        }
        Err(Error::String(format!(
            "{name}: gave up after {} contended deletes",
            Self::MAX_ATTEMPTS
        )))
    }

    /// Makes the newest archived version of `name` live again. The older
    /// versions stay archived as its history.
    pub async fn undelete_video(&self, name: &VideoName) -> Result<UndeleteOutcome, Error> {
        let result = self.undelete_inner(name).await;
        self.logger.call(format!("undelete {name}"), result)
    }

    async fn undelete_inner(&self, name: &VideoName) -> Result<UndeleteOutcome, Error> {
        if self.tables.get_current(name).await?.is_some() {
            return Err(Error::UndeleteConflict(name.clone()));
        }
        let archived = self.tables.list_archived(name).await?;
        let Some(newest) = archived.first() else {
            return Err(Error::NothingToRestore(name.clone()));
        };
        if !self.tables.restore_archived(newest).await? {
            return Err(Error::UndeleteConflict(name.clone()));
        }
        self.cache.invalidate(name).await?;
        Ok(UndeleteOutcome {
            restored: newest.to_current(),
            restored_count: archived.len(),
        })
    }

    /// Makes the url and provider of an archived version of `name` live again,
    /// as a new version by `uploader`.
    pub async fn revert(
        &self,
        name: &VideoName,
        archive_name: &ArchiveName,
        uploader: &UploaderId,
        now: UnixMillis,
    ) -> Result<AddOutcome, Error> {
        let archived = self
            .tables
            .get_archived(archive_name)
            .await?
            .filter(|archived| &archived.name == name);
        let Some(archived) = archived else {
            return self.logger.call(
                format!("revert {name} to {archive_name}"),
                Err(Error::UnknownVersion(archive_name.clone())),
            );
        };
        self.logger.trace(format!("revert {name} to {archive_name}"));
        self.add_or_update(
            name,
            &archived.url,
            &archived.provider,
            uploader,
            now,
            AddMode::Overwrite,
        )
        .await
    }

    /// Versions of `name`, live first.
    pub fn history(&self, name: &VideoName) -> HistoryCursor {
        HistoryCursor::new(Arc::clone(&self.tables), name.clone())
    }

    /// Archived versions of `name`, newest first.
    pub async fn archived(&self, name: &VideoName) -> Result<Vec<ArchivedRecord>, Error> {
        self.tables.list_archived(name).await
    }

    /// Live records passing `filter`, newest first.
    pub async fn recent(&self, filter: &RecentFilter) -> Result<Vec<CurrentRecord>, Error> {
        let mut records: Vec<_> = self
            .tables
            .list_current()
            .await?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });
        if let Some(limit) = filter.limit {
            records.truncate(limit);
        }
        Ok(records)
    }
}
