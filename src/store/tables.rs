// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ArchiveName, ArchivedRecord, CurrentRecord};
use crate::common::{Error, VideoName};
use async_trait::async_trait;

/// The two tables: current records keyed by name, archived records keyed by
/// archive name. Every method that touches both tables is atomic.
#[async_trait]
pub trait VideoTables: Send + Sync {
    /// The live record of `name`.
    async fn get_current(&self, name: &VideoName) -> Result<Option<CurrentRecord>, Error>;

    /// Inserts `record` unless its name has a live record; `Ok(false)` if it does.
    async fn insert_current(&self, record: &CurrentRecord) -> Result<bool, Error>;

    /// Archives `expected` under `archive_name` and replaces it with
    /// `replacement`. `Ok(false)` if the live record is no longer `expected`;
    /// `Err(Error::ArchiveCollision)` if `archive_name` is taken.
    async fn supersede_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
        replacement: &CurrentRecord,
    ) -> Result<bool, Error>;

    /// Archives `expected` under `archive_name` and removes the live record.
    /// Same outcomes as `supersede_current`.
    async fn archive_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
    ) -> Result<bool, Error>;

    /// Makes `archived` the live record and removes its archive row.
    /// `Ok(false)` if the name has a live record; `Err(Error::UnknownVersion)`
    /// if the archive row is gone.
    async fn restore_archived(&self, archived: &ArchivedRecord) -> Result<bool, Error>;

    /// Archived versions of `name`, newest first.
    async fn list_archived(&self, name: &VideoName) -> Result<Vec<ArchivedRecord>, Error>;

    /// One archived version.
    async fn get_archived(
        &self,
        archive_name: &ArchiveName,
    ) -> Result<Option<ArchivedRecord>, Error>;

    /// Every live record, in no particular order.
    async fn list_current(&self) -> Result<Vec<CurrentRecord>, Error>;
}
