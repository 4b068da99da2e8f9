// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod videos_test {
    use crate::cache::{InMemoryTtlCache, TtlCache};
    use crate::log::StringLogger;
    use crate::videos::{
        is_url, resolve, url_from_embed_code, BlipTvProvider, CannedFetcher, EmbedSize,
        HuluProvider, MetadataLookup, ProviderId, ProviderRegistry, RegexProvider, Resolution,
        VideoProvider, ViddlerProvider,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn lookup(fetcher: CannedFetcher) -> (MetadataLookup, Arc<CannedFetcher>, StringLogger) {
        let fetcher = Arc::new(fetcher);
        let logger = StringLogger::default();
        let lookup = MetadataLookup::new(
            fetcher.clone(),
            Arc::new(InMemoryTtlCache::new()),
            Duration::from_secs(86400),
            &logger,
        );
        (lookup, fetcher, logger)
    }

    #[test]
    fn provider_names() {
        for id in ProviderId::ALL {
            assert_eq!(id.as_str().parse::<ProviderId>(), Ok(id));
        }
        assert!("unknown".parse::<ProviderId>().is_err());
        assert_eq!(
            serde_json::to_string(&ProviderId::SouthParkStudios).unwrap(),
            "\"southparkstudios\""
        );
    }

    #[test]
    fn registry_is_complete() {
        let registry = ProviderRegistry::global();
        for id in ProviderId::ALL {
            let provider = registry.get(id).unwrap();
            assert_eq!(provider.id(), id);
            assert!(!provider.domains().is_empty());
            assert!(provider.aspect_ratio() > 0.0);
            assert!(provider.embed_template().contains("$video_id"));
        }
        assert!(std::ptr::eq(registry, ProviderRegistry::global()));
        for provider in [
            RegexProvider::dailymotion(),
            RegexProvider::gametrailers(),
            RegexProvider::metacafe(),
            RegexProvider::movieclips(),
            RegexProvider::myvideo(),
            RegexProvider::southparkstudios(),
            RegexProvider::vimeo(),
            RegexProvider::wegame(),
        ] {
            assert!(provider.is_valid(), "{}", provider.id());
        }
    }

    #[test]
    fn provider_by_host() {
        let registry = ProviderRegistry::global();
        assert_eq!(
            registry.provider_by_host("www.youtube.com"),
            Some(ProviderId::Youtube)
        );
        assert_eq!(registry.provider_by_host("youtu.be"), Some(ProviderId::Youtube));
        assert_eq!(
            registry.provider_by_host("WWW.Hulu.COM"),
            Some(ProviderId::Hulu)
        );
        assert_eq!(registry.provider_by_host("notyoutube.com"), None);
        assert_eq!(
            registry.provider_by_host("m.youtube.com."),
            Some(ProviderId::Youtube)
        );
        assert_eq!(registry.provider_by_host("youtube.com.evil.test"), None);
        assert_eq!(registry.provider_by_host("example.test"), None);
        assert_eq!(registry.get_by_name("vimeo").map(|p| p.id()), Some(ProviderId::Vimeo));
        assert!(registry.get_by_name("googlevideo").is_none());
    }

    #[test]
    fn url_detection() {
        assert!(is_url("https://www.youtube.com/watch?v=abc12345678"));
        assert!(is_url("FTP://example.com/clip"));
        assert!(!is_url("youtube.com/watch?v=abc12345678"));
        assert!(!is_url("<iframe src=\"https://x\">"));
    }

    #[test]
    fn embed_code() {
        assert_eq!(
            url_from_embed_code(
                r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/cBOE1aUNZVo" frameborder="0" allowfullscreen></iframe>"#
            ),
            "https://www.youtube.com/embed/cBOE1aUNZVo"
        );
        assert_eq!(
            url_from_embed_code(
                r#"<object><embed src='http://www.example.com/player.swf' flashvars="m=123&v=2" type="application/x-shockwave-flash"></embed></object>"#
            ),
            "http://www.example.com/player.swf?m=123&v=2"
        );
        assert_eq!(
            url_from_embed_code(r#"<EMBED FlashVars="id=7" SRC="http://a.test/p.swf?x=1">"#),
            "http://a.test/p.swf?x=1&id=7"
        );
        assert_eq!(url_from_embed_code("just some words"), "");
    }

    #[test]
    fn resolve_examples() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=abc12345678"),
            Resolution {
                url: "https://www.youtube.com/watch?v=abc12345678".to_string(),
                provider: Some(ProviderId::Youtube),
            }
        );
        assert_eq!(
            resolve(r#"<iframe src="https://www.youtube.com/embed/abc12345678"></iframe>"#),
            Resolution {
                url: "https://www.youtube.com/embed/abc12345678".to_string(),
                provider: Some(ProviderId::Youtube),
            }
        );
        assert_eq!(
            resolve("https://example-random-host.test/video/1").provider,
            None
        );
        assert_eq!(
            resolve(""),
            Resolution {
                url: String::new(),
                provider: None,
            }
        );
    }

    #[tokio::test]
    async fn pattern_providers() {
        let (lookup, fetcher, _) = lookup(CannedFetcher::new());
        let cases = [
            (
                RegexProvider::dailymotion(),
                "http://www.dailymotion.com/video/x7tgad0",
                Some("x7tgad0"),
            ),
            (
                RegexProvider::gametrailers(),
                "http://www.gametrailers.com/video/play/12345?type=flv",
                Some("12345"),
            ),
            (
                RegexProvider::metacafe(),
                "http://www.metacafe.com/watch/1234567/funny_cat/",
                Some("1234567/funny_cat"),
            ),
            (
                RegexProvider::movieclips(),
                "http://movieclips.com/Jc4R-some-clip/",
                Some("Jc4R-some-clip"),
            ),
            (
                RegexProvider::myvideo(),
                "http://www.myvideo.de/watch/7654321/Title",
                Some("7654321"),
            ),
            (
                RegexProvider::southparkstudios(),
                "http://www.southparkstudios.com/clips/104437/bat-dad",
                Some("mgid:cms:item:southparkstudios.com:104437"),
            ),
            (RegexProvider::vimeo(), "https://vimeo.com/76979871", Some("76979871")),
            (RegexProvider::vimeo(), "https://vimeo.com/channels/staffpicks", None),
            (
                RegexProvider::wegame(),
                "http://www.wegame.com/watch/epic_jump/",
                Some("epic_jump"),
            ),
        ];
        for (provider, url, expected) in cases {
            assert_eq!(
                provider.extract_id(url, &lookup).await.as_deref(),
                expected,
                "{url}"
            );
        }
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn hulu_asks_oembed_once() {
        let url = "http://www.hulu.com/watch/20807/late-night";
        let api_url = HuluProvider::oembed_url(url);
        assert!(api_url.ends_with("url=http%3A%2F%2Fwww.hulu.com%2Fwatch%2F20807%2Flate-night"));
        let (lookup, fetcher, _) = lookup(
            CannedFetcher::new().with(api_url, r#"{"embed_url":"http://www.hulu.com/embed/abc"}"#),
        );
        let hulu = HuluProvider::new();
        for _ in 0..2 {
            assert_eq!(
                hulu.extract_id(url, &lookup).await.as_deref(),
                Some("http://www.hulu.com/embed/abc")
            );
        }
        assert_eq!(fetcher.requests().len(), 1);
        assert_eq!(hulu.extract_id("http://www.hulu.com/", &lookup).await, None);
    }

    #[tokio::test]
    async fn viddler_reads_player_id_from_html() {
        let url = "http://www.viddler.com/explore/someone/videos/3/";
        let (lookup, _, _) = lookup(CannedFetcher::new().with(
            ViddlerProvider::oembed_url(url),
            r#"{"html":"<object><param name=\"movie\" value=\"x\"/><embed src=\"http://www.viddler.com/player/e5398221/\"></embed></object>"}"#,
        ));
        assert_eq!(
            ViddlerProvider::new().extract_id(url, &lookup).await.as_deref(),
            Some("e5398221")
        );
    }

    #[tokio::test]
    async fn bliptv_reads_embed_lookup() {
        let url = "http://blip.tv/some-show/episode-one-4869623?utm=x";
        assert_eq!(
            BlipTvProvider::api_url(url),
            "http://blip.tv/some-show/episode-one-4869623?skin=api"
        );
        let (lookup, _, _) = lookup(CannedFetcher::new().with(
            BlipTvProvider::api_url(url),
            "<response><blip:embedLookup>AYLJvkwC</blip:embedLookup></response>",
        ));
        let bliptv = BlipTvProvider::new();
        assert_eq!(
            bliptv.extract_id(url, &lookup).await.as_deref(),
            Some("AYLJvkwC")
        );
        let html = bliptv.render_embed("AYLJvkwC", EmbedSize::from_width(480, bliptv.aspect_ratio()));
        assert!(html.contains("http://blip.tv/play/AYLJvkwC.html"));
        assert!(html.contains("width=\"480\" height=\"350\""));
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_none() {
        let (lookup, _, logger) = lookup(CannedFetcher::new());
        assert_eq!(
            HuluProvider::new()
                .extract_id("http://www.hulu.com/watch/1/x", &lookup)
                .await,
            None
        );
        assert!(logger.contains_warnings());
    }

    #[tokio::test]
    async fn cached_answers_skip_the_fetch() {
        let cache = Arc::new(InMemoryTtlCache::new());
        cache
            .set(
                &MetadataLookup::key(ProviderId::BlipTv, "99"),
                "CACHED".to_string(),
                Duration::from_secs(60),
            )
            .await
            .unwrap();
        let fetcher = Arc::new(CannedFetcher::new());
        let lookup = MetadataLookup::new(
            fetcher.clone(),
            cache,
            Duration::from_secs(60),
            &StringLogger::default(),
        );
        assert_eq!(
            BlipTvProvider::new()
                .extract_id("http://blip.tv/show/ep-99", &lookup)
                .await
                .as_deref(),
            Some("CACHED")
        );
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn embed_sizes() {
        assert_eq!(
            EmbedSize::from_width(400, 560.0 / 315.0),
            EmbedSize {
                width: 400,
                height: 225
            }
        );
        assert_eq!(EmbedSize::from_width(300, 0.0).height, 300);
        assert_eq!(
            EmbedSize::clamped(1000, 200, EmbedSize::MAX),
            EmbedSize {
                width: 425,
                height: 200
            }
        );
        assert_eq!(EmbedSize::clamped(0, 0, EmbedSize::MAX), EmbedSize::MAX);
    }
}
