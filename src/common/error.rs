// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{NameError, VideoName};
use crate::store::ArchiveName;
use crate::videos::ProviderId;
use std::fmt::{Display, Formatter};

#[cfg(feature = "aws")]
/// A convenient alias for Dynamo DB error so consuming code doesn't need to add to `Cargo.toml`
pub type DynamoError = aws_sdk_dynamodb::Error;

#[cfg(feature = "aws")]
/// A convenient alias for Serde Dynamo error so consuming code doesn't need to add to `Cargo.toml`
pub type SerdeError = serde_dynamo::Error;

#[derive(Debug)]
/// An enum that encapsulates a variety of error types.
///
/// The first group of variants are validation outcomes meant to be shown to
/// whoever supplied the input (see [`Error::is_user_actionable`]).  The rest
/// are internal failures of a storage, cache or fetch backend.
///
/// # Example
///
/// Error::Resolution(format!("{input}: could not determine video provider"))
pub enum Error {
    /// Raw input could not be mapped to a known provider.
    Resolution(String),
    /// The provider matched by host, but the URL carries no extractable ID.
    Extraction {
        /// Provider that matched the URL's host.
        provider: ProviderId,
        /// URL that was rejected.
        url: String,
    },
    /// The video name cannot be normalized.
    InvalidName(NameError),
    /// A create-only add found a live record under the name.
    TitleInUse(VideoName),
    /// Undelete requested while a live record exists.
    UndeleteConflict(VideoName),
    /// Undelete requested but there is no archived version.
    NothingToRestore(VideoName),
    /// Revert requested to an archived version that does not exist.
    UnknownVersion(ArchiveName),
    /// Storage refused an archive row because its key is taken.
    ArchiveCollision(ArchiveName),
    #[cfg(feature = "aws")]
    /// Dynamo (database) error
    Dynamo(DynamoError, String),
    #[cfg(feature = "aws")]
    /// Serde (serialization or deserialization) error
    Serde(SerdeError),
    /// HTTP (or miscellaneous fetch) error
    #[cfg(feature = "http")]
    Http(hyper::StatusCode, String),
    /// JSON error while packing or unpacking a cached value.
    Json(String),
    /// String error.
    String(String),
}

impl Error {
    /// Returns `true` if the error is a validation outcome that the caller can
    /// act on (fix the input, pick another name, ...), as opposed to an
    /// internal failure.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Error::Resolution(_)
                | Error::Extraction { .. }
                | Error::InvalidName(_)
                | Error::TitleInUse(_)
                | Error::UndeleteConflict(_)
                | Error::NothingToRestore(_)
                | Error::UnknownVersion(_)
        )
    }

    /// Map `Error` to the status a presentation layer should answer with.
    #[cfg(feature = "http")]
    pub fn status_code(&self) -> hyper::StatusCode {
        use hyper::StatusCode;
        match self {
            Error::Resolution(_) | Error::Extraction { .. } | Error::InvalidName(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::TitleInUse(_) | Error::UndeleteConflict(_) | Error::ArchiveCollision(_) => {
                StatusCode::CONFLICT
            }
            Error::NothingToRestore(_) | Error::UnknownVersion(_) => StatusCode::NOT_FOUND,
            #[cfg(feature = "aws")]
            Error::Dynamo(..) | Error::Serde(_) => StatusCode::FAILED_DEPENDENCY,
            Error::Http(status_code, _) => *status_code,
            Error::Json(_) | Error::String(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::Resolution(mesg) => Display::fmt(mesg, f),
            Error::Extraction { provider, url } => Display::fmt(
                &format!("{url}: could not determine {provider} video ID"),
                f,
            ),
            Error::InvalidName(e) => Display::fmt(&format!("invalid video name: {e}"), f),
            Error::TitleInUse(name) => {
                Display::fmt(&format!("{name}: a video with this title already exists"), f)
            }
            Error::UndeleteConflict(name) => Display::fmt(
                &format!("{name}: cannot restore over a video that exists"),
                f,
            ),
            Error::NothingToRestore(name) => {
                Display::fmt(&format!("{name}: no prior version to restore"), f)
            }
            Error::UnknownVersion(archive_name) => {
                Display::fmt(&format!("{archive_name}: no such video version"), f)
            }
            Error::ArchiveCollision(archive_name) => {
                Display::fmt(&format!("{archive_name}: archive name already taken"), f)
            }
            #[cfg(feature = "aws")]
            Error::Dynamo(DynamoError::ConditionalCheckFailedException(_), source) => {
                Display::fmt(&format!("DynamoDb condition not met by {source}"), f)
            }
            #[cfg(feature = "http")]
            Error::Http(status_code, mesg) => Display::fmt(&format!("{status_code}: {mesg}"), f),
            Error::Json(mesg) => Display::fmt(&format!("json: {mesg}"), f),
            Error::String(s) => Display::fmt(&s, f),
            #[cfg(feature = "aws")]
            _ => Display::fmt(&format!("{self:?}"), f),
        }
    }
}

impl std::error::Error for Error {}

impl From<NameError> for Error {
    fn from(e: NameError) -> Self {
        Error::InvalidName(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
