// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{MetadataLookup, ProviderId, VideoProvider};
use async_trait::async_trait;
use regex::Regex;

const EMBED_URL_PREFIX: &str = "https://www.youtube.com/embed/";

/// Matches watch, short, embed, legacy `/v/`, feed and channel URLs; the
/// 11-character video ID is the first group.
const VIDEO_ID_PATTERN: &str = r"(?i)(?:http|https|)(?:://|)(?:www.|)(?:youtu\.be/|youtube\.com(?:/embed/|/v/|/watch\?v=|/ytscreeningroom\?v=|/feeds/api/videos/|/user\S*[^\w\-\s]|\S*[^\w\-\s]))([\w\-]{11})[a-z0-9;:@?&%=+/$_.-]*";

/// Youtube.
pub struct YoutubeProvider {
    video_id: Option<Regex>,
}

impl YoutubeProvider {
    /// Create the Youtube provider.
    pub fn new() -> Self {
        Self {
            video_id: Regex::new(VIDEO_ID_PATTERN).ok(),
        }
    }

    /// The video ID, if `url` is any recognized form of Youtube URL.
    pub fn parse_video_id(&self, url: &str) -> Option<String> {
        self.video_id
            .as_ref()?
            .captures(url)?
            .get(1)
            .map(|m| m.as_str().to_string())
    }
}

impl Default for YoutubeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoProvider for YoutubeProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Youtube
    }

    fn domains(&self) -> &'static [&'static str] {
        &["youtu.be", "youtube.com", "youtube-nocookie.com"]
    }

    fn aspect_ratio(&self) -> f64 {
        560.0 / 315.0
    }

    fn embed_template(&self) -> &'static str {
        r#"<iframe width="$width" height="$height" src="https://www.youtube.com/embed/$video_id" frameborder="0" allowfullscreen></iframe>"#
    }

    async fn extract_id(&self, url: &str, _lookup: &MetadataLookup) -> Option<String> {
        self.parse_video_id(url)
    }
}
