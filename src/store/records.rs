// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::{UploaderId, VideoName};
use crate::time_id::UnixMillis;
use serde::{Deserialize, Serialize};

/// Key of an archived version: a sortable timestamp, `!`, and the video name,
/// e.g. `20240131235959042!Funny_cat`. The live version has an empty one.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct ArchiveName(pub String);
crate::impl_wrapper_str!(ArchiveName);

impl ArchiveName {
    /// Separates the time stamp from the name.
    pub const SEPARATOR: char = '!';

    /// Archive name of `name` archived at `when`.
    pub fn new(when: UnixMillis, name: &VideoName) -> Self {
        Self(format!("{}{}{name}", when.to_sortable_stamp(), Self::SEPARATOR))
    }

    /// The name of the video this archive name belongs to.
    pub fn video_name(&self) -> Option<VideoName> {
        let (_, name) = self.0.split_once(Self::SEPARATOR)?;
        name.parse().ok()
    }
}

/// The live version of a named video.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct CurrentRecord {
    /// Unique key.
    pub name: VideoName,
    /// URL on the provider's site.
    pub url: String,
    /// Provider name, see `ProviderId::as_str`.
    pub provider: String,
    /// Who made this version.
    pub uploader: UploaderId,
    /// When this version was made.
    pub timestamp: UnixMillis,
}

/// A superseded or deleted version. Never mutated.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct ArchivedRecord {
    /// Unique key (empty for the live version in a history listing).
    pub archive_name: ArchiveName,
    /// Name of the video.
    pub name: VideoName,
    /// URL on the provider's site.
    pub url: String,
    /// Provider name.
    pub provider: String,
    /// Who made this version.
    pub uploader: UploaderId,
    /// When this version was made (not when it was archived).
    pub timestamp: UnixMillis,
}

impl ArchivedRecord {
    /// Copies `record` verbatim under `archive_name`.
    pub fn archive(record: &CurrentRecord, archive_name: ArchiveName) -> Self {
        Self {
            archive_name,
            name: record.name.clone(),
            url: record.url.clone(),
            provider: record.provider.clone(),
            uploader: record.uploader.clone(),
            timestamp: record.timestamp,
        }
    }

    /// The live version, as the first entry of a history listing.
    pub fn live(record: &CurrentRecord) -> Self {
        Self::archive(record, ArchiveName::default())
    }

    /// Whether this is the live version rather than an archived one.
    pub fn is_live(&self) -> bool {
        self.archive_name.is_empty()
    }

    /// The version as a current record, dropping the archive name.
    pub fn to_current(&self) -> CurrentRecord {
        CurrentRecord {
            name: self.name.clone(),
            url: self.url.clone(),
            provider: self.provider.clone(),
            uploader: self.uploader.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Newest first; ties broken by the later archive name.
    pub fn sort_newest_first(records: &mut [ArchivedRecord]) {
        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.archive_name.cmp(&a.archive_name))
        });
    }
}

/// Whether adding under a name that already has a live record is allowed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AddMode {
    /// Archive the live record and replace it.
    #[default]
    Overwrite,
    /// Fail with `Error::TitleInUse`.
    CreateOnly,
}

/// Result of a successful add.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddOutcome {
    /// There was no live record.
    Created,
    /// The live record was archived and replaced.
    Updated {
        /// The archived copy of the replaced record.
        archived: ArchivedRecord,
    },
}

/// Result of a successful undelete.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UndeleteOutcome {
    /// The promoted version, now live.
    pub restored: CurrentRecord,
    /// Versions visible again: the live one plus the history beneath it.
    pub restored_count: usize,
}

/// Filter of `VersionStore::recent`.
#[derive(Clone, Debug, Default)]
pub struct RecentFilter {
    /// Only records by this uploader.
    pub uploader: Option<UploaderId>,
    /// Only names containing this, ignoring case (spaces match underscores).
    pub name_contains: Option<String>,
    /// At most this many records.
    pub limit: Option<usize>,
}

impl RecentFilter {
    /// Whether `record` passes the uploader and name conditions.
    pub fn matches(&self, record: &CurrentRecord) -> bool {
        if let Some(uploader) = &self.uploader {
            if &record.uploader != uploader {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let needle = needle.trim().replace(' ', "_").to_lowercase();
            if !record.name.as_str().to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
