// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Cache-aside access to video records.
mod cache_aside;
/// Unit tests.
mod tests;
/// Expiring key-value backends.
mod ttl_cache;

pub use self::cache_aside::{CacheEntry, VideoCache};
pub use self::ttl_cache::{InMemoryTtlCache, TtlCache};
