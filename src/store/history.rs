// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ArchivedRecord, VideoTables};
use crate::common::{Error, VideoName};
use std::sync::Arc;

enum Phase {
    Live,
    ArchivePending,
    Archive(std::vec::IntoIter<ArchivedRecord>),
    Done,
}

/// Single pass over the versions of a video: the live version first (with an
/// empty archive name), then the archived versions, newest first. Nothing is
/// yielded when there is no live version. Cannot be restarted; ask the store
/// for a new cursor instead.
pub struct HistoryCursor {
    tables: Arc<dyn VideoTables>,
    name: VideoName,
    phase: Phase,
}

impl HistoryCursor {
    pub(crate) fn new(tables: Arc<dyn VideoTables>, name: VideoName) -> Self {
        Self {
            tables,
            name,
            phase: Phase::Live,
        }
    }

    /// Name of the video.
    pub fn name(&self) -> &VideoName {
        &self.name
    }

    /// The next version, or `None` once exhausted.
    pub async fn next(&mut self) -> Result<Option<ArchivedRecord>, Error> {
        loop {
            match &mut self.phase {
                Phase::Live => {
                    let live = self.tables.get_current(&self.name).await?;
                    self.phase = if live.is_some() {
                        Phase::ArchivePending
                    } else {
                        Phase::Done
                    };
                    return Ok(live.as_ref().map(ArchivedRecord::live));
                }
                Phase::ArchivePending => {
                    let archived = self.tables.list_archived(&self.name).await?;
                    self.phase = Phase::Archive(archived.into_iter());
                }
                Phase::Archive(archived) => {
                    let next = archived.next();
                    if next.is_none() {
                        self.phase = Phase::Done;
                    }
                    return Ok(next);
                }
                Phase::Done => return Ok(None),
            }
        }
    }

    /// Drains the cursor.
    pub async fn collect(mut self) -> Result<Vec<ArchivedRecord>, Error> {
        let mut ret = Vec::new();
        while let Some(version) = self.next().await? {
            ret.push(version);
        }
        Ok(ret)
    }
}
