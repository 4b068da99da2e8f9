// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#[cfg(feature = "aws")]
/// Dynamo DB tables.
mod dynamo;
/// Versions of a video, live first.
mod history;
/// Process-local tables.
mod in_memory;
mod records;
/// The storage interface.
mod tables;
/// Unit tests.
mod tests;
/// Add, delete, undelete and revert.
mod version_store;

#[cfg(feature = "aws")]
pub use self::dynamo::DynamoTables;
pub use self::history::HistoryCursor;
pub use self::in_memory::InMemoryTables;
pub use self::records::{
    AddMode, AddOutcome, ArchiveName, ArchivedRecord, CurrentRecord, RecentFilter,
    UndeleteOutcome,
};
pub use self::tables::VideoTables;
pub use self::version_store::VersionStore;
