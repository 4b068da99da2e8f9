// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Identity of the acting user.
mod auth;
/// TOML configuration.
mod config;
/// An enum that encapsulates a variety of error types.
mod error;
/// Canonical video names.
mod name;

pub use self::auth::UploaderId;
pub use self::config::{VidConfig, VidConfigBuilder, VidSettings};
pub use self::error::Error;
#[cfg(feature = "aws")]
pub use self::error::{DynamoError, SerdeError};
pub use self::name::{canonicalize_name, NameError, VideoName, MAX_NAME_BYTES};
