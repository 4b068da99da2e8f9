// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ArchiveName, ArchivedRecord, CurrentRecord, VideoTables};
use crate::aws::{
    create_ddb_item, get_ddb_item, get_ddb_ranged_item, new_ddb_client, query_ddb, scan_ddb,
    to_dynamo_av, to_dynamo_item, transact_ddb_items, DynamoDbClient,
};
use crate::common::{Error, VidConfig, VidSettings, VideoName};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{Delete, Put, TransactWriteItem};
use std::collections::HashMap;

/// `VideoTables` in two Dynamo DB tables. The current table is keyed by
/// `name`; the archive table by `name` (hash) and `archive_name` (range).
/// Each move between tables is one transaction.
pub struct DynamoTables {
    client: DynamoDbClient,
    current_table: String,
    archive_table: String,
}

impl DynamoTables {
    const ARCHIVE_NAME: &'static str = "archive_name";
    const NAME: &'static str = "name";
    const TIMESTAMP: &'static str = "timestamp";

    /// Uses the table names of `settings`.
    pub fn new(client: DynamoDbClient, settings: &VidSettings) -> Self {
        Self {
            client,
            current_table: settings.current_table.clone(),
            archive_table: settings.archive_table.clone(),
        }
    }

    /// Connects with the `[aws]` profile and `[dynamo]` table names of `vid_config`.
    pub async fn from_config(vid_config: &VidConfig) -> Result<Self, Error> {
        let settings = vid_config.settings()?;
        Ok(Self::new(new_ddb_client(vid_config).await, &settings))
    }

    fn build_error(e: BuildError) -> Error {
        Error::String(format!("dynamo request: {e}"))
    }

    /// Put of a new archive row.
    fn put_archived(&self, archived: &ArchivedRecord) -> Result<TransactWriteItem, Error> {
        let put = Put::builder()
            .table_name(&self.archive_table)
            .set_item(Some(to_dynamo_item(archived)?))
            .condition_expression("attribute_not_exists(#an)")
            .expression_attribute_names("#an", Self::ARCHIVE_NAME)
            .build()
            .map_err(Self::build_error)?;
        Ok(TransactWriteItem::builder().put(put).build())
    }

    /// Put of `replacement` over the live record, if that is still `expected`.
    fn replace_current(
        &self,
        expected: &CurrentRecord,
        replacement: &CurrentRecord,
    ) -> Result<TransactWriteItem, Error> {
        let put = Put::builder()
            .table_name(&self.current_table)
            .set_item(Some(to_dynamo_item(replacement)?))
            .condition_expression("#ts = :ts")
            .expression_attribute_names("#ts", Self::TIMESTAMP)
            .expression_attribute_values(":ts", to_dynamo_av(expected.timestamp)?)
            .build()
            .map_err(Self::build_error)?;
        Ok(TransactWriteItem::builder().put(put).build())
    }

    /// Delete of the live record, if that is still `expected`.
    fn delete_current(&self, expected: &CurrentRecord) -> Result<TransactWriteItem, Error> {
        let delete = Delete::builder()
            .table_name(&self.current_table)
            .set_key(Some(HashMap::from([(
                Self::NAME.to_string(),
                to_dynamo_av(&expected.name)?,
            )])))
            .condition_expression("#ts = :ts")
            .expression_attribute_names("#ts", Self::TIMESTAMP)
            .expression_attribute_values(":ts", to_dynamo_av(expected.timestamp)?)
            .build()
            .map_err(Self::build_error)?;
        Ok(TransactWriteItem::builder().delete(delete).build())
    }

    /// Interprets `[archive put, current write]` condition failures.
    fn archive_outcome(failed: &[bool], archive_name: &ArchiveName) -> Result<bool, Error> {
        match failed {
            [_, true] => Ok(false),
            [true, _] => Err(Error::ArchiveCollision(archive_name.clone())),
            _ => Ok(true),
        }
    }
}

#[async_trait]
impl VideoTables for DynamoTables {
    async fn get_current(&self, name: &VideoName) -> Result<Option<CurrentRecord>, Error> {
        get_ddb_item(&self.client, &self.current_table, Self::NAME, name).await
    }

    async fn insert_current(&self, record: &CurrentRecord) -> Result<bool, Error> {
        create_ddb_item(&self.client, record, &self.current_table, Self::NAME).await
    }

    async fn supersede_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
        replacement: &CurrentRecord,
    ) -> Result<bool, Error> {
        let items = vec![
            self.put_archived(&ArchivedRecord::archive(expected, archive_name.clone()))?,
            self.replace_current(expected, replacement)?,
        ];
        let failed = transact_ddb_items(&self.client, items, "supersede").await?;
        Self::archive_outcome(&failed, archive_name)
    }

    async fn archive_current(
        &self,
        expected: &CurrentRecord,
        archive_name: &ArchiveName,
    ) -> Result<bool, Error> {
        let items = vec![
            self.put_archived(&ArchivedRecord::archive(expected, archive_name.clone()))?,
            self.delete_current(expected)?,
        ];
        let failed = transact_ddb_items(&self.client, items, "archive").await?;
        Self::archive_outcome(&failed, archive_name)
    }

    async fn restore_archived(&self, archived: &ArchivedRecord) -> Result<bool, Error> {
        let put = Put::builder()
            .table_name(&self.current_table)
            .set_item(Some(to_dynamo_item(archived.to_current())?))
            .condition_expression("attribute_not_exists(#n)")
            .expression_attribute_names("#n", Self::NAME)
            .build()
            .map_err(Self::build_error)?;
        let delete = Delete::builder()
            .table_name(&self.archive_table)
            .set_key(Some(HashMap::from([
                (Self::NAME.to_string(), to_dynamo_av(&archived.name)?),
                (
                    Self::ARCHIVE_NAME.to_string(),
                    to_dynamo_av(&archived.archive_name)?,
                ),
            ])))
            .condition_expression("attribute_exists(#an)")
            .expression_attribute_names("#an", Self::ARCHIVE_NAME)
            .build()
            .map_err(Self::build_error)?;
        let items = vec![
            TransactWriteItem::builder().put(put).build(),
            TransactWriteItem::builder().delete(delete).build(),
        ];
        let failed = transact_ddb_items(&self.client, items, "restore").await?;
        match failed[..] {
            [true, _] => Ok(false),
            [_, true] => Err(Error::UnknownVersion(archived.archive_name.clone())),
            _ => Ok(true),
        }
    }

    async fn list_archived(&self, name: &VideoName) -> Result<Vec<ArchivedRecord>, Error> {
        let mut archived = query_ddb(&self.client, &self.archive_table, Self::NAME, name).await?;
        ArchivedRecord::sort_newest_first(&mut archived);
        Ok(archived)
    }

    async fn get_archived(
        &self,
        archive_name: &ArchiveName,
    ) -> Result<Option<ArchivedRecord>, Error> {
        let Some(name) = archive_name.video_name() else {
            return Ok(None);
        };
        get_ddb_ranged_item(
            &self.client,
            &self.archive_table,
            Self::NAME,
            &name,
            Self::ARCHIVE_NAME,
            archive_name,
        )
        .await
    }

    async fn list_current(&self) -> Result<Vec<CurrentRecord>, Error> {
        scan_ddb(&self.client, &self.current_table).await
    }
}
