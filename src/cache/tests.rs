// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod cache_tests {
    use crate::cache::{CacheEntry, InMemoryTtlCache, TtlCache, VideoCache};
    use crate::common::{UploaderId, VideoName};
    use crate::log::StringLogger;
    use crate::time_id::UnixMillis;
    use std::sync::Arc;
    use std::time::Duration;

    fn entry() -> CacheEntry {
        CacheEntry {
            url: "https://www.youtube.com/watch?v=abc12345678".to_string(),
            provider: "youtube".to_string(),
            uploader: UploaderId::from("alice"),
            timestamp: UnixMillis(1_700_000_000_000),
        }
    }

    #[test]
    fn keys_ignore_spaces() {
        assert_eq!(VideoCache::key("Funny cat"), "video:page:Funny_cat");
        assert_eq!(VideoCache::key("Funny_cat"), VideoCache::key("Funny cat"));
    }

    #[tokio::test]
    async fn ttl_cache_expires() {
        let cache = InMemoryTtlCache::new();
        cache
            .set("a", "1".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.set("b", "2".to_string(), Duration::ZERO).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(cache.get("b").await.unwrap(), None);
        assert_eq!(cache.len().await, 1);
        cache
            .set("a", "3".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("a").await.unwrap().as_deref(), Some("3"));
        cache.delete("a").await.unwrap();
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() {
        let cache = InMemoryTtlCache::new();
        for i in 0..10_000 {
            cache
                .set(&format!("video:page:{i}"), i.to_string(), Duration::ZERO)
                .await
                .unwrap();
        }
        assert_eq!(cache.get("video:page:0").await.unwrap(), None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let cache = InMemoryTtlCache::with_capacity(10);
        for i in 0..100 {
            cache
                .set(&i.to_string(), i.to_string(), Duration::from_secs(60))
                .await
                .unwrap();
        }
        assert!(cache.len().await <= 10);
    }

    #[tokio::test]
    async fn get_set_invalidate() {
        let backend = Arc::new(InMemoryTtlCache::new());
        let logger = StringLogger::default();
        let cache = VideoCache::new(backend.clone(), Duration::from_secs(3600), &logger);
        assert_eq!(cache.ttl(), Duration::from_secs(3600));

        assert_eq!(cache.get("Funny cat").await.unwrap(), None);
        cache.set_default("Funny_cat", &entry()).await.unwrap();
        assert_eq!(cache.get("Funny cat").await.unwrap(), Some(entry()));
        cache.invalidate("Funny cat").await.unwrap();
        assert_eq!(cache.get("Funny_cat").await.unwrap(), None);
        assert!(logger.to_string().contains("[cache] hit video:page:Funny_cat"));
    }

    #[tokio::test]
    async fn unreadable_entry_is_a_miss() {
        let backend = Arc::new(InMemoryTtlCache::new());
        let logger = StringLogger::default();
        let cache = VideoCache::new(backend.clone(), Duration::from_secs(3600), &logger);
        backend
            .set("video:page:Broken", "{".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("Broken").await.unwrap(), None);
        assert!(logger.contains_warnings());
        assert!(backend.is_empty().await);
    }

    #[test]
    fn entry_round_trips_record() {
        let name = VideoName("Funny_cat".to_string());
        let record = entry().into_record(name.clone());
        assert_eq!(record.name, name);
        assert_eq!(CacheEntry::from(&record), entry());
    }
}
