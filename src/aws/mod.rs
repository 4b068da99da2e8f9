// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// A wrapper around Dynamo DB client.
mod dynamo;

pub use crate::aws::dynamo::{
    create_aws_config_loader, create_ddb_item, failed_conditions, get_ddb_item,
    get_ddb_ranged_item, is_condition_failure, load_aws_config, new_ddb_client, query_ddb,
    scan_ddb, to_dynamo_av, to_dynamo_item, transact_ddb_items, DynamoDbClient,
};
