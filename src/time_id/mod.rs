// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Thin wrappers around Unix timestamp (non leap milliseconds since 1970).
mod time;

pub use self::time::{UnixMillis, UnixTime};
