// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! A versioned store of named video records, with a cache in front of it and
//! a registry of video hosting providers to turn pasted URLs or embed markup
//! into players.

#[cfg(feature = "aws")]
/// A wrapper which provides access to AWS Dynamo DB.
pub mod aws;
#[cfg(feature = "aws")]
pub use aws::*;

/// Cache-aside layer over a TTL cache.
pub mod cache;
pub use cache::*;

/// Types common to multiple wrappers.
pub mod common;
pub use common::*;

/// Thread-safe logging.
pub mod log;
pub use log::*;

/// Per-video handles over the store and provider registry.
pub mod record;
pub use record::*;

/// Macros used with `serde` serialization and serialization.
pub mod serde_utils;
pub use serde_utils::*;

/// Current and archived video records, and the moves between them.
pub mod store;
pub use store::*;

/// Unix timestamps in milliseconds.
pub mod time_id;
pub use time_id::*;

/// Video providers, the registry of them, and input resolution.
pub mod videos;
pub use videos::*;
