// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ArchiveName, ArchivedRecord, CurrentRecord, VideoTables};
use crate::common::{Error, VideoName};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    current: BTreeMap<VideoName, CurrentRecord>,
    archive: BTreeMap<ArchiveName, ArchivedRecord>,
}

/// Both tables in process memory, under one lock.
#[derive(Default)]
pub struct InMemoryTables {
    tables: RwLock<Tables>,
}

impl InMemoryTables {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (live, archived) rows.
    pub fn row_counts(&self) -> (usize, usize) {
        self.tables
            .read()
            .map(|tables| (tables.current.len(), tables.archive.len()))
            .unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, Error> {
        self.tables
            .read()
            .map_err(|_| Error::String("video tables lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, Error> {
        self.tables
            .write()
            .map_err(|_| Error::String("video tables lock poisoned".to_string()))
    }
}

impl Tables {
    /// Checks shared by `supersede_current` and `archive_current`.
    fn may_archive(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
    ) -> Result<bool, Error> {
        if self.current.get(&expected.name) != Some(expected) {
            return Ok(false);
        }
        if self.archive.contains_key(archive_name) {
            return Err(Error::ArchiveCollision(archive_name.clone()));
        }
        Ok(true)
    }
}

#[async_trait]
impl VideoTables for InMemoryTables {
    async fn get_current(&self, name: &VideoName) -> Result<Option<CurrentRecord>, Error> {
        Ok(self.read()?.current.get(name).cloned())
    }

    async fn insert_current(&self, record: &CurrentRecord) -> Result<bool, Error> {
        let mut tables = self.write()?;
        if tables.current.contains_key(&record.name) {
            return Ok(false);
        }
        tables.current.insert(record.name.clone(), record.clone());
        Ok(true)
    }

    async fn supersede_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
        replacement: &CurrentRecord,
    ) -> Result<bool, Error> {
        let mut tables = self.write()?;
        if !tables.may_archive(expected, archive_name)? {
            return Ok(false);
        }
        tables.archive.insert(
            archive_name.clone(),
            ArchivedRecord::archive(expected, archive_name.clone()),
        );
        tables
            .current
            .insert(replacement.name.clone(), replacement.clone());
        Ok(true)
    }

    async fn archive_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
    ) -> Result<bool, Error> {
        let mut tables = self.write()?;
        if !tables.may_archive(expected, archive_name)? {
            return Ok(false);
        }
        tables.archive.insert(
            archive_name.clone(),
            ArchivedRecord::archive(expected, archive_name.clone()),
        );
        tables.current.remove(&expected.name);
        Ok(true)
    }

    async fn restore_archived(&self, archived: &ArchivedRecord) -> Result<bool, Error> {
        let mut tables = self.write()?;
        if tables.current.contains_key(&archived.name) {
            return Ok(false);
        }
        if tables.archive.remove(&archived.archive_name).is_none() {
            return Err(Error::UnknownVersion(archived.archive_name.clone()));
        }
        tables
            .current
            .insert(archived.name.clone(), archived.to_current());
        Ok(true)
    }

    async fn list_archived(&self, name: &VideoName) -> Result<Vec<ArchivedRecord>, Error> {
        let mut archived: Vec<_> = self
            .read()?
            .archive
            .values()
            .filter(|record| &record.name == name)
            .cloned()
            .collect();
        ArchivedRecord::sort_newest_first(&mut archived);
        Ok(archived)
    }

    async fn get_archived(
        &self,
        archive_name: &ArchiveName,
    ) -> Result<Option<ArchivedRecord>, Error> {
        Ok(self.read()?.archive.get(archive_name).cloned())
    }

    async fn list_current(&self) -> Result<Vec<CurrentRecord>, Error> {
        Ok(self.read()?.current.values().cloned().collect())
    }
}
