// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
/// Opaque identity of whoever added or changed a video version.  This crate
/// never authenticates it; it only stores what the caller supplies.
pub struct UploaderId(pub String);
crate::impl_wrapper_str!(UploaderId);

impl From<&str> for UploaderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
