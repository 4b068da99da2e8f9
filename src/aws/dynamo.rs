// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::{DynamoError, Error, VidConfig};
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::{BehaviorVersion, ConfigLoader, SdkConfig};
use aws_sdk_dynamodb::types::{AttributeValue, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_dynamo::Item;
use std::collections::HashMap;
use std::mem;

/// A convenient alias for Dynamo DB client so consuming code doesn't need to add it to `Cargo.toml`
pub type DynamoDbClient = aws_sdk_dynamodb::Client;

/// Create an AWS config loader with profile and region.
pub fn create_aws_config_loader(vid_config: &VidConfig) -> ConfigLoader {
    #[derive(Deserialize)]
    struct AwsConfig {
        profile: Option<String>,
    }
    #[derive(Deserialize)]
    struct ConfigToml {
        aws: AwsConfig,
    }
    let mut config_loader = aws_config::defaults(BehaviorVersion::v2023_11_09());
    if let Ok(ConfigToml {
        aws: AwsConfig {
            profile: Some(profile_name),
        },
    }) = vid_config.get()
    {
        if vid_config.debug() {
            println!("AWS using profile name {profile_name}");
        }
        let region = ProfileFileRegionProvider::builder()
            .profile_name(&profile_name)
            .build();
        config_loader = config_loader.profile_name(&profile_name).region(region)
    };
    config_loader
}

/// Load AWS configuration with profile and region.
pub async fn load_aws_config(vid_config: &VidConfig) -> SdkConfig {
    let config_loader = create_aws_config_loader(vid_config);
    config_loader.load().await
}

/// Creates a Dynamo DB client.
pub async fn new_ddb_client(vid_config: &VidConfig) -> DynamoDbClient {
    let config = load_aws_config(vid_config).await;
    Client::new(&config)
}

/// Whether the error is a failed condition expression of a single item write.
pub fn is_condition_failure(e: &DynamoError) -> bool {
    matches!(e, DynamoError::ConditionalCheckFailedException(_))
}

/// For a cancelled transaction, which of its items failed their condition,
/// in item order. `None` for any other error.
pub fn failed_conditions(e: &DynamoError) -> Option<Vec<bool>> {
    if let DynamoError::TransactionCanceledException(cancelled) = e {
        Some(
            cancelled
                .cancellation_reasons()
                .iter()
                .map(|reason| reason.code() == Some("ConditionalCheckFailed"))
                .collect(),
        )
    } else {
        None
    }
}

/// Creates an item in the specified Dynamo DB table only if its hash key (aka partition
/// key) does not exist.  Returns `false` if it does.
pub async fn create_ddb_item<I: Serialize>(
    client: &DynamoDbClient,
    item: I,
    table: &str,
    hash_name: &str,
) -> Result<bool, Error> {
    let ser = to_dynamo_item(item)?;

    let req = client
        .put_item()
        .table_name(table)
        .expression_attribute_names("#hn", hash_name)
        .condition_expression("attribute_not_exists(#hn)")
        .set_item(Some(ser));

    match req.send().await.map_err(DynamoError::from) {
        Err(e) if is_condition_failure(&e) => Ok(false),
        Err(e) => Err(Error::Dynamo(
            e,
            format!("create_item(t={table}, h={hash_name})"),
        )),
        Ok(_) => Ok(true),
    }
}

/// Gets an item with the specified hash key, if any, from the specified Dynamo DB table.
pub async fn get_ddb_item<HK: Serialize, O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    hash_name: &str,
    hash_value: HK,
) -> Result<Option<O>, Error> {
    let hash_ser = to_dynamo_av(hash_value)?;

    let mut get_item_output = match client
        .get_item()
        .consistent_read(true)
        .table_name(table)
        .key(hash_name, hash_ser)
        .send()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            return Err(Error::Dynamo(
                e.into(),
                format!("get_item(t={table}, h={hash_name})"),
            ))
        }
    };

    if let Some(item) = mem::take(&mut get_item_output.item) {
        match serde_dynamo::from_item(item) {
            Err(e) => Err(Error::Serde(e)),
            Ok(de) => Ok(Some(de)),
        }
    } else {
        Ok(None)
    }
}

/// Gets an item with specified hash and range keys, if any, from the specified Dynamo DB table.
pub async fn get_ddb_ranged_item<HK: Serialize, RK: Serialize, O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    hash_name: &str,
    hash_value: HK,
    range_name: &str,
    range_value: RK,
) -> Result<Option<O>, Error> {
    let hash_ser = to_dynamo_av(hash_value)?;
    let range_ser = to_dynamo_av(range_value)?;

    let mut get_item_output = match client
        .get_item()
        .consistent_read(true)
        .table_name(table)
        .key(hash_name, hash_ser)
        .key(range_name, range_ser)
        .send()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            return Err(Error::Dynamo(
                e.into(),
                format!("get_ranged_item(t={table}, h={hash_name}, r={range_name})"),
            ))
        }
    };

    if let Some(item) = mem::take(&mut get_item_output.item) {
        match serde_dynamo::from_item(item) {
            Err(e) => Err(Error::Serde(e)),
            Ok(de) => Ok(Some(de)),
        }
    } else {
        Ok(None)
    }
}

async fn query_inner<O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    hash_name: &str,
    hash_value: AttributeValue,
    last_evaluated_key: Option<HashMap<String, AttributeValue>>,
) -> Result<(Vec<O>, Option<HashMap<String, AttributeValue>>), Error> {
    let query_output = match client
        .query()
        .consistent_read(true)
        .table_name(table)
        .key_condition_expression("#h = :hv")
        .expression_attribute_names("#h", hash_name)
        .expression_attribute_values(":hv", hash_value)
        .set_exclusive_start_key(last_evaluated_key)
        .send()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            return Err(Error::Dynamo(
                e.into(),
                format!("query_inner(t={table}, h={hash_name})"),
            ))
        }
    };

    let mut ret = Vec::new();
    for item in query_output.items.unwrap_or_default() {
        match serde_dynamo::from_item(item) {
            Err(e) => return Err(Error::Serde(e)),
            Ok(de) => ret.push(de),
        }
    }
    Ok((ret, query_output.last_evaluated_key))
}

/// Query and return all items with a hash key from the specified Dynamo DB table.
pub async fn query_ddb<HK: Serialize, O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    hash_name: &str,
    hash_value: HK,
) -> Result<Vec<O>, Error> {
    let hash_ser = to_dynamo_av(hash_value)?;

    let mut ret = Vec::new();
    let mut last_evaluated_key = None;
    loop {
        let (mut items, lek) = query_inner(
            client,
            table,
            hash_name,
            hash_ser.clone(),
            last_evaluated_key,
        )
        .await?;
        ret.append(&mut items);
        last_evaluated_key = lek;

        if last_evaluated_key.is_none() {
            break;
        }
    }

    Ok(ret)
}

async fn scan_inner<O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
    last_evaluated_key: Option<HashMap<String, AttributeValue>>,
) -> Result<(Vec<O>, Option<HashMap<String, AttributeValue>>), Error> {
    let scan_output = match client
        .scan()
        .consistent_read(true)
        .table_name(table)
        .set_exclusive_start_key(last_evaluated_key)
        .send()
        .await
    {
        Ok(output) => output,
        Err(e) => return Err(Error::Dynamo(e.into(), format!("scan_inner(t={table})"))),
    };

    let mut ret = Vec::new();
    for item in scan_output.items.unwrap_or_default() {
        match serde_dynamo::from_item(item) {
            Err(e) => return Err(Error::Serde(e)),
            Ok(de) => ret.push(de),
        }
    }
    Ok((ret, scan_output.last_evaluated_key))
}

/// Scan and return items from the specified Dynamo DB table.
pub async fn scan_ddb<O: DeserializeOwned>(
    client: &DynamoDbClient,
    table: &str,
) -> Result<Vec<O>, Error> {
    let mut ret = Vec::new();
    let mut last_evaluated_key = None;
    loop {
        let (mut items, lek) = scan_inner(client, table, last_evaluated_key).await?;
        ret.append(&mut items);
        last_evaluated_key = lek;

        if last_evaluated_key.is_none() {
            break;
        }
    }

    Ok(ret)
}

/// Writes all items or none.  Returns, per item, whether its condition
/// failed (all `false` on success).
pub async fn transact_ddb_items(
    client: &DynamoDbClient,
    items: Vec<TransactWriteItem>,
    source: &str,
) -> Result<Vec<bool>, Error> {
    let len = items.len();
    match client
        .transact_write_items()
        .set_transact_items(Some(items))
        .send()
        .await
        .map_err(DynamoError::from)
    {
        Ok(_) => Ok(vec![false; len]),
        Err(e) => match failed_conditions(&e) {
            Some(failed) if failed.iter().any(|f| *f) => Ok(failed),
            _ => Err(Error::Dynamo(e, format!("transact_write_items({source})"))),
        },
    }
}

/// Packs a Dynamo DB `AttributeValue`.
pub fn to_dynamo_av<T: Serialize>(value: T) -> Result<AttributeValue, Error> {
    serde_dynamo::to_attribute_value(value).map_err(Error::Serde)
}

/// Packs a Dynamo DB item.
pub fn to_dynamo_item<T: Serialize, I: From<Item>>(value: T) -> Result<I, Error> {
    serde_dynamo::to_item(value).map_err(Error::Serde)
}
