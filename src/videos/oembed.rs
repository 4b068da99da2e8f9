// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{MetadataLookup, ProviderId, VideoProvider};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

fn first_group(regex: &Option<Regex>, text: &str) -> Option<String> {
    Some(regex.as_ref()?.captures(text)?.get(1)?.as_str().to_string())
}

/// Hulu. The public watch URL carries a numeric ID, but the player needs the
/// `embed_url` returned by Hulu's oEmbed endpoint.
pub struct HuluProvider {
    watch_id: Option<Regex>,
}

impl HuluProvider {
    const OEMBED_URL: &'static str = "http://www.hulu.com/api/oembed.json?url=";

    /// Create the Hulu provider.
    pub fn new() -> Self {
        Self {
            watch_id: Regex::new(r"/watch/(\d+)/").ok(),
        }
    }

    /// Where to ask for the embed URL of `url`.
    pub fn oembed_url(url: &str) -> String {
        format!("{}{}", Self::OEMBED_URL, urlencoding::encode(url))
    }
}

#[async_trait]
impl VideoProvider for HuluProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Hulu
    }

    fn domains(&self) -> &'static [&'static str] {
        &["hulu.com"]
    }

    fn aspect_ratio(&self) -> f64 {
        512.0 / 296.0
    }

    fn embed_template(&self) -> &'static str {
        r#"<object width="$width" height="$height"><param name="movie" value="$video_id"></param><param name="allowFullScreen" value="true"></param><embed src="$video_id" type="application/x-shockwave-flash"  width="$width" height="$height" allowFullScreen="true"></embed></object>"#
    }

    async fn extract_id(&self, url: &str, lookup: &MetadataLookup) -> Option<String> {
        #[derive(Deserialize)]
        struct HuluOembed {
            embed_url: String,
        }

        let watch_id = first_group(&self.watch_id, url)?;
        if let Some(embed_url) = lookup.cached(self.id(), &watch_id).await {
            return Some(embed_url);
        }
        let api_url = Self::oembed_url(url);
        let body = lookup.fetch(self.id(), &api_url).await?;
        let Ok(HuluOembed { embed_url }) = serde_json::from_str(&body) else {
            lookup.unreadable(self.id(), &api_url);
            return None;
        };
        lookup.remember(self.id(), &watch_id, &embed_url).await;
        Some(embed_url)
    }
}

/// Viddler. The player ID only appears in the markup returned by Viddler's
/// oEmbed endpoint.
pub struct ViddlerProvider {
    player_id: Option<Regex>,
}

impl ViddlerProvider {
    const OEMBED_URL: &'static str = "http://lab.viddler.com/services/oembed/?format=json&url=";

    /// Create the Viddler provider.
    pub fn new() -> Self {
        Self {
            player_id: Regex::new(r#"src="http://www\.viddler\.com/player/([a-zA-Z0-9]*?)/""#).ok(),
        }
    }

    /// Where to ask for the player markup of `url`.
    pub fn oembed_url(url: &str) -> String {
        format!("{}{}", Self::OEMBED_URL, urlencoding::encode(url))
    }
}

#[async_trait]
impl VideoProvider for ViddlerProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Viddler
    }

    fn domains(&self) -> &'static [&'static str] {
        &["viddler.com"]
    }

    fn aspect_ratio(&self) -> f64 {
        437.0 / 288.0
    }

    fn embed_template(&self) -> &'static str {
        r#"<object width="$width" height="$height" id="viddlerplayer-$video_id"><param name="movie" value="http://www.viddler.com/player/$video_id/" /><param name="allowScriptAccess" value="always" /><param name="wmode" value="transparent" /><param name="allowFullScreen" value="true" /><embed src="http://www.viddler.com/player/$video_id/" width="$width" height="$height" type="application/x-shockwave-flash" wmode="transparent" allowScriptAccess="always" allowFullScreen="true" name="viddlerplayer-$video_id" ></embed></object>"#
    }

    async fn extract_id(&self, url: &str, lookup: &MetadataLookup) -> Option<String> {
        #[derive(Deserialize)]
        struct ViddlerOembed {
            html: String,
        }

        // Public URLs carry no ID; the whole URL is the cache key.
        let cache_id = urlencoding::encode(url).into_owned();
        if let Some(player_id) = lookup.cached(self.id(), &cache_id).await {
            return Some(player_id);
        }
        let api_url = Self::oembed_url(url);
        let body = lookup.fetch(self.id(), &api_url).await?;
        let player_id = serde_json::from_str(&body)
            .ok()
            .and_then(|ViddlerOembed { html }| first_group(&self.player_id, &html));
        let Some(player_id) = player_id else {
            lookup.unreadable(self.id(), &api_url);
            return None;
        };
        lookup.remember(self.id(), &cache_id, &player_id).await;
        Some(player_id)
    }
}

/// blip.tv. The episode number in the URL is exchanged for an embed ID by
/// the page's API skin.
pub struct BlipTvProvider {
    episode: Option<Regex>,
    embed_lookup: Option<Regex>,
}

impl BlipTvProvider {
    /// Create the blip.tv provider.
    pub fn new() -> Self {
        Self {
            episode: Regex::new(r"/[a-zA-Z0-9\-]+/[a-zA-Z0-9\-]*-(\d+)").ok(),
            embed_lookup: Regex::new(r"<(?:\w+:)?embedLookup>\s*([^<\s]+)\s*</(?:\w+:)?embedLookup>")
                .ok(),
        }
    }

    /// The API form of an episode URL: query dropped, `?skin=api` added.
    pub fn api_url(url: &str) -> String {
        let page = url.split('?').next().unwrap_or(url);
        format!("{page}?skin=api")
    }
}

#[async_trait]
impl VideoProvider for BlipTvProvider {
    fn id(&self) -> ProviderId {
        ProviderId::BlipTv
    }

    fn domains(&self) -> &'static [&'static str] {
        &["blip.tv"]
    }

    fn aspect_ratio(&self) -> f64 {
        480.0 / 350.0
    }

    fn embed_template(&self) -> &'static str {
        r#"<iframe src="http://blip.tv/play/$video_id.html" width="$width" height="$height" frameborder="0" allowfullscreen></iframe>"#
    }

    async fn extract_id(&self, url: &str, lookup: &MetadataLookup) -> Option<String> {
        let episode = first_group(&self.episode, url)?;
        if let Some(embed_id) = lookup.cached(self.id(), &episode).await {
            return Some(embed_id);
        }
        let api_url = Self::api_url(url);
        let body = lookup.fetch(self.id(), &api_url).await?;
        let Some(embed_id) = first_group(&self.embed_lookup, &body) else {
            lookup.unreadable(self.id(), &api_url);
            return None;
        };
        lookup.remember(self.id(), &episode, &embed_id).await;
        Some(embed_id)
    }
}
