// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#[cfg(test)]
mod store_tests {
    use crate::cache::{InMemoryTtlCache, TtlCache, VideoCache};
    use crate::common::{Error, UploaderId, VideoName};
    use crate::log::StringLogger;
    use crate::store::{
        AddMode, AddOutcome, ArchiveName, ArchivedRecord, CurrentRecord, InMemoryTables,
        RecentFilter, VersionStore, VideoTables,
    };
    use crate::time_id::{UnixMillis, UnixTime};
    use std::sync::Arc;
    use std::time::Duration;

    const T0: UnixMillis = UnixMillis(1_700_000_000_000);

    struct Harness {
        store: VersionStore,
        tables: Arc<InMemoryTables>,
        cache: Arc<InMemoryTtlCache>,
        logger: StringLogger,
    }

    fn harness() -> Harness {
        let logger = StringLogger::default();
        let tables = Arc::new(InMemoryTables::new());
        let cache = Arc::new(InMemoryTtlCache::new());
        let video_cache = VideoCache::new(cache.clone(), Duration::from_secs(3600), &logger);
        Harness {
            store: VersionStore::new(tables.clone(), video_cache, &logger),
            tables,
            cache,
            logger,
        }
    }

    fn name(s: &str) -> VideoName {
        s.parse().unwrap()
    }

    fn url(n: u64) -> String {
        format!("https://vimeo.com/{n}")
    }

    async fn add(h: &Harness, video: &VideoName, n: u64, now: UnixMillis) -> AddOutcome {
        h.store
            .add_or_update(
                video,
                &url(n),
                "vimeo",
                &UploaderId::from("alice"),
                now,
                AddMode::Overwrite,
            )
            .await
            .unwrap()
    }

    #[test]
    fn archive_names() {
        let video = name("Funny cat");
        let archive_name = ArchiveName::new(T0, &video);
        assert_eq!(archive_name.as_str(), "20231114221320000!Funny_cat");
        assert_eq!(archive_name.video_name(), Some(video));
        assert_eq!(ArchiveName("garbage".to_string()).video_name(), None);
        assert!(ArchiveName::new(T0, &name("B")) < ArchiveName::new(T0.add_millis(1), &name("A")));
    }

    #[tokio::test]
    async fn updates_archive_every_prior_version() {
        let h = harness();
        let video = name("Funny cat");
        assert_eq!(add(&h, &video, 0, T0).await, AddOutcome::Created);

        let mut expected_archive = Vec::new();
        for n in 1..=4u64 {
            let before = h.tables.get_current(&video).await.unwrap().unwrap();
            let now = T0.add_millis(n * 1000);
            let AddOutcome::Updated { archived } = add(&h, &video, n, now).await else {
                panic!("expected update");
            };
            assert_eq!(archived.to_current(), before);
            assert_eq!(archived.archive_name, ArchiveName::new(now, &video));
            expected_archive.push(archived);
        }
        assert_eq!(h.tables.row_counts(), (1, 4));

        let current = h.store.load(&video).await.unwrap().unwrap();
        assert_eq!(current.url, url(4));
        expected_archive.reverse();
        assert_eq!(h.store.archived(&video).await.unwrap(), expected_archive);
    }

    #[tokio::test]
    async fn create_only_refuses_taken_title() {
        let h = harness();
        let video = name("Taken");
        add(&h, &video, 1, T0).await;
        let result = h
            .store
            .add_or_update(
                &video,
                &url(2),
                "vimeo",
                &UploaderId::from("bob"),
                T0.add_millis(1),
                AddMode::CreateOnly,
            )
            .await;
        assert!(matches!(result, Err(Error::TitleInUse(n)) if n == video));
        assert_eq!(h.tables.row_counts(), (1, 0));
        assert!(!h.logger.contains_warnings());
    }

    #[tokio::test]
    async fn same_millisecond_updates_get_distinct_archive_names() {
        let h = harness();
        let video = name("Busy");
        add(&h, &video, 0, T0).await;
        add(&h, &video, 1, T0).await;
        add(&h, &video, 2, T0).await;
        let archived = h.store.archived(&video).await.unwrap();
        assert_eq!(archived.len(), 2);
        assert_ne!(archived[0].archive_name, archived[1].archive_name);
        assert!(h.logger.to_string().contains("taken"));
    }

    #[tokio::test]
    async fn history_is_live_then_newest_first() {
        let h = harness();
        let video = name("Story");
        for n in 0..3u64 {
            add(&h, &video, n, T0.add_millis(n * 1000)).await;
        }
        let mut cursor = h.store.history(&video);
        assert_eq!(cursor.name(), &video);
        let live = cursor.next().await.unwrap().unwrap();
        assert!(live.is_live());
        assert_eq!(live.url, url(2));
        let second = cursor.next().await.unwrap().unwrap();
        let third = cursor.next().await.unwrap().unwrap();
        assert!(!second.is_live());
        assert_eq!((second.url.as_str(), third.url.as_str()), (url(1).as_str(), url(0).as_str()));
        assert!(second.timestamp > third.timestamp);
        assert_eq!(cursor.next().await.unwrap(), None);
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn history_of_deleted_video_is_empty() {
        let h = harness();
        let video = name("Gone");
        add(&h, &video, 0, T0).await;
        h.store
            .delete_video(&video, T0.add_millis(5), None)
            .await
            .unwrap();
        assert!(h.store.history(&video).collect().await.unwrap().is_empty());
        assert!(h.store.history(&name("Never")).collect().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_then_undelete_round_trips() {
        let h = harness();
        let video = name("Round trip");
        add(&h, &video, 0, T0).await;
        add(&h, &video, 1, T0.add_millis(1000)).await;
        let before = h.store.load(&video).await.unwrap().unwrap();
        let older = h.store.archived(&video).await.unwrap();

        let archived = h
            .store
            .delete_video(&video, T0.add_millis(2000), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(archived.to_current(), before);
        assert!(!h.store.exists(&video).await.unwrap());
        assert_eq!(h.tables.row_counts(), (0, 2));

        let outcome = h.store.undelete_video(&video).await.unwrap();
        assert_eq!(outcome.restored, before);
        assert_eq!(outcome.restored_count, 2);
        assert_eq!(h.store.load(&video).await.unwrap(), Some(before));
        assert_eq!(h.store.archived(&video).await.unwrap(), older);

        let history = h.store.history(&video).collect().await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_live());
        assert_eq!(history[1], older[0]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let h = harness();
        let video = name("Nothing here");
        assert_eq!(h.store.delete_video(&video, T0, None).await.unwrap(), None);
        assert_eq!(h.tables.row_counts(), (0, 0));

        add(&h, &video, 0, T0).await;
        h.store.delete_video(&video, T0.add_millis(1), None).await.unwrap();
        assert_eq!(h.store.delete_video(&video, T0.add_millis(2), None).await.unwrap(), None);
        assert_eq!(h.tables.row_counts(), (0, 1));
    }

    #[tokio::test]
    async fn delete_checks_expected_version() {
        let h = harness();
        let video = name("Versioned");
        add(&h, &video, 0, T0).await;
        assert_eq!(
            h.store
                .delete_video(&video, T0.add_millis(5), Some(UnixMillis(1)))
                .await
                .unwrap(),
            None
        );
        assert!(h.store.exists(&video).await.unwrap());
        assert!(h
            .store
            .delete_video(&video, T0.add_millis(5), Some(T0))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn undelete_refusals_leave_storage_unchanged() {
        let h = harness();
        let video = name("Refused");
        assert!(matches!(
            h.store.undelete_video(&video).await,
            Err(Error::NothingToRestore(_))
        ));

        add(&h, &video, 0, T0).await;
        add(&h, &video, 1, T0.add_millis(1000)).await;
        let archived = h.store.archived(&video).await.unwrap();
        let current = h.tables.get_current(&video).await.unwrap();
        let err = h.store.undelete_video(&video).await.unwrap_err();
        assert!(matches!(err, Error::UndeleteConflict(_)));
        assert!(err.is_user_actionable());
        assert_eq!(h.store.archived(&video).await.unwrap(), archived);
        assert_eq!(h.tables.get_current(&video).await.unwrap(), current);
    }

    #[tokio::test]
    async fn undelete_promotes_newest() {
        let h = harness();
        let video = name("Twice");
        add(&h, &video, 0, T0).await;
        h.store.delete_video(&video, T0.add_millis(1000), None).await.unwrap();
        add(&h, &video, 1, T0.add_millis(2000)).await;
        h.store.delete_video(&video, T0.add_millis(3000), None).await.unwrap();

        let outcome = h.store.undelete_video(&video).await.unwrap();
        assert_eq!(outcome.restored.url, url(1));
        assert_eq!(h.store.archived(&video).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cache_is_coherent() {
        let h = harness();
        let video = name("Cached");
        assert_eq!(h.store.load(&video).await.unwrap(), None);
        assert!(h.cache.is_empty().await);

        add(&h, &video, 0, T0).await;
        assert_eq!(h.store.load(&video).await.unwrap().unwrap().url, url(0));
        assert_eq!(h.cache.len().await, 1);

        add(&h, &video, 1, T0.add_millis(1000)).await;
        assert!(h.cache.is_empty().await);
        assert_eq!(h.store.load(&video).await.unwrap().unwrap().url, url(1));

        h.store.delete_video(&video, T0.add_millis(2000), None).await.unwrap();
        assert_eq!(h.store.load(&video).await.unwrap(), None);

        h.store.undelete_video(&video).await.unwrap();
        assert_eq!(h.store.load(&video).await.unwrap().unwrap().url, url(1));
    }

    #[tokio::test]
    async fn load_prefers_cache() {
        let h = harness();
        let video = name("Stale");
        add(&h, &video, 0, T0).await;
        h.store.load(&video).await.unwrap();
        // Written behind the store's back; the cache still answers.
        h.cache
            .set(
                &VideoCache::key(&video),
                serde_json::json!({
                    "url": url(9),
                    "provider": "vimeo",
                    "uploader": "mallory",
                    "timestamp": 1,
                })
                .to_string(),
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        let loaded = h.store.load(&video).await.unwrap().unwrap();
        assert_eq!(loaded.url, url(9));
        assert_eq!(loaded.name, video);
    }

    #[tokio::test]
    async fn revert_readds_archived_version() {
        let h = harness();
        let video = name("Revertible");
        add(&h, &video, 0, T0).await;
        let AddOutcome::Updated { archived } = add(&h, &video, 1, T0.add_millis(1000)).await
        else {
            panic!("expected update");
        };
        let bob = UploaderId::from("bob");
        h.store
            .revert(&video, &archived.archive_name, &bob, T0.add_millis(2000))
            .await
            .unwrap();
        let current = h.store.load(&video).await.unwrap().unwrap();
        assert_eq!(current.url, url(0));
        assert_eq!(current.uploader, bob);
        assert_eq!(h.tables.row_counts(), (1, 2));

        let other = name("Other");
        add(&h, &other, 5, T0).await;
        assert!(matches!(
            h.store
                .revert(&other, &archived.archive_name, &bob, T0.add_millis(3000))
                .await,
            Err(Error::UnknownVersion(_))
        ));
        assert!(matches!(
            h.store
                .revert(&video, &ArchiveName::new(T0, &video), &bob, T0.add_millis(3000))
                .await,
            Err(Error::UnknownVersion(_))
        ));
    }

    #[tokio::test]
    async fn recent_filters_and_orders() {
        let h = harness();
        let records = [
            ("Cat one", "alice", 1),
            ("Dog", "bob", 2),
            ("Another cat", "alice", 3),
            ("cat two", "bob", 4),
        ];
        for (title, uploader, n) in records {
            h.store
                .add_or_update(
                    &name(title),
                    &url(n),
                    "vimeo",
                    &UploaderId::from(uploader),
                    T0.add_millis(n * 1000),
                    AddMode::CreateOnly,
                )
                .await
                .unwrap();
        }
        let names = |records: Vec<CurrentRecord>| {
            records
                .into_iter()
                .map(|r| r.name.0)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(h.store.recent(&RecentFilter::default()).await.unwrap()),
            ["Cat_two", "Another_cat", "Dog", "Cat_one"]
        );
        assert_eq!(
            names(
                h.store
                    .recent(&RecentFilter {
                        name_contains: Some("CAT".to_string()),
                        limit: Some(2),
                        ..Default::default()
                    })
                    .await
                    .unwrap()
            ),
            ["Cat_two", "Another_cat"]
        );
        assert_eq!(
            names(
                h.store
                    .recent(&RecentFilter {
                        uploader: Some(UploaderId::from("alice")),
                        name_contains: Some("cat one".to_string()),
                        ..Default::default()
                    })
                    .await
                    .unwrap()
            ),
            ["Cat_one"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_lose_no_version() {
        let h = harness();
        let video = name("Contended");
        let writers = 5u64;
        let handles: Vec<_> = (0..writers)
            .map(|n| {
                let store = h.store.clone();
                let video = video.clone();
                tokio::spawn(async move {
                    store
                        .add_or_update(
                            &video,
                            &url(n),
                            "vimeo",
                            &UploaderId::from("racer"),
                            T0.add_millis(n * 1000),
                            AddMode::Overwrite,
                        )
                        .await
                })
            })
            .collect();
        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == AddOutcome::Created {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(h.tables.row_counts(), (1, writers as usize - 1));

        let mut urls: Vec<_> = h
            .store
            .history(&video)
            .collect()
            .await
            .unwrap()
            .into_iter()
            .map(|version: ArchivedRecord| version.url)
            .collect();
        urls.sort();
        let mut expected: Vec<_> = (0..writers).map(url).collect();
        expected.sort();
        assert_eq!(urls, expected);
    }
}
