// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::MetadataLookup;
use crate::serde_str;
use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identity of a supported video hosting service, as stored with a record.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ProviderId {
    /// blip.tv
    BlipTv,
    /// dailymotion.com
    DailyMotion,
    /// gametrailers.com
    GameTrailers,
    /// hulu.com
    Hulu,
    /// metacafe.com
    MetaCafe,
    /// movieclips.com
    MovieClips,
    /// myvideo.de
    MyVideo,
    /// southparkstudios.com
    SouthParkStudios,
    /// youtube.com, youtu.be
    Youtube,
    /// viddler.com
    Viddler,
    /// vimeo.com
    Vimeo,
    /// wegame.com
    WeGame,
}
serde_str!(ProviderId);

impl ProviderId {
    /// Every provider, in registration order.
    pub const ALL: [ProviderId; 12] = [
        Self::BlipTv,
        Self::DailyMotion,
        Self::GameTrailers,
        Self::Hulu,
        Self::MetaCafe,
        Self::MovieClips,
        Self::MyVideo,
        Self::SouthParkStudios,
        Self::Youtube,
        Self::Viddler,
        Self::Vimeo,
        Self::WeGame,
    ];

    /// The lowercase name persisted in `CurrentRecord::provider`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlipTv => "bliptv",
            Self::DailyMotion => "dailymotion",
            Self::GameTrailers => "gametrailers",
            Self::Hulu => "hulu",
            Self::MetaCafe => "metacafe",
            Self::MovieClips => "movieclips",
            Self::MyVideo => "myvideo",
            Self::SouthParkStudios => "southparkstudios",
            Self::Youtube => "youtube",
            Self::Viddler => "viddler",
            Self::Vimeo => "vimeo",
            Self::WeGame => "wegame",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("{s}: unknown video provider"))
    }
}

/// Dimensions of an embedded player, in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EmbedSize {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl EmbedSize {
    /// Width used when the caller doesn't ask for one.
    pub const DEFAULT_WIDTH: u32 = 400;
    /// Bounds of the plain `<video>` tag.
    pub const MAX: EmbedSize = EmbedSize {
        width: 425,
        height: 350,
    };

    /// Size with the given width and the height implied by `ratio` (width / height).
    pub fn from_width(width: u32, ratio: f64) -> Self {
        let height = if ratio.is_finite() && ratio > 0.0 {
            // Ratios like 560 / 315 aren't exact; don't floor 225 to 224.
            (width as f64 / ratio + 1e-9).floor() as u32
        } else {
            width
        };
        Self { width, height }
    }

    /// Size with each dimension replaced by the corresponding bound of `max`
    /// when it is zero or exceeds it.
    pub fn clamped(width: u32, height: u32, max: EmbedSize) -> Self {
        let clamp = |value: u32, max: u32| {
            if value == 0 || value > max {
                max
            } else {
                value
            }
        };
        Self {
            width: clamp(width, max.width),
            height: clamp(height, max.height),
        }
    }
}

/// Behavior of one video hosting service.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> ProviderId;

    /// Host suffixes served by the provider.
    fn domains(&self) -> &'static [&'static str];

    /// Player width divided by height.
    fn aspect_ratio(&self) -> f64;

    /// Embed markup with `$video_id`, `$width` and `$height` placeholders.
    fn embed_template(&self) -> &'static str;

    /// Finds the embeddable ID in a URL on the provider's site, asking the
    /// provider's API through `lookup` when the URL doesn't carry it.
    async fn extract_id(&self, url: &str, lookup: &MetadataLookup) -> Option<String>;

    /// Player markup for a video ID.
    fn render_embed(&self, video_id: &str, size: EmbedSize) -> String {
        render_template(self.embed_template(), video_id, size)
    }
}

/// Substitutes the placeholders of an embed template.
pub fn render_template(template: &str, video_id: &str, size: EmbedSize) -> String {
    template
        .replace("$video_id", video_id)
        .replace("$height", &size.height.to_string())
        .replace("$width", &size.width.to_string())
}
