// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{MetadataLookup, ProviderId, VideoProvider};
use async_trait::async_trait;
use regex::Regex;

/// A provider whose embed ID is the first group of a pattern over the URL.
pub struct RegexProvider {
    id: ProviderId,
    domains: &'static [&'static str],
    ratio: f64,
    video_id: Option<Regex>,
    id_prefix: &'static str,
    template: &'static str,
}

impl RegexProvider {
    fn new(
        id: ProviderId,
        domains: &'static [&'static str],
        ratio: f64,
        pattern: &str,
        template: &'static str,
    ) -> Self {
        Self {
            id,
            domains,
            ratio,
            video_id: Regex::new(pattern).ok(),
            id_prefix: "",
            template,
        }
    }

    fn with_id_prefix(self, id_prefix: &'static str) -> Self {
        Self { id_prefix, ..self }
    }

    /// Whether the pattern compiled.
    pub fn is_valid(&self) -> bool {
        self.video_id.is_some()
    }

    /// The embed ID in `url`, if any.
    pub fn parse_video_id(&self, url: &str) -> Option<String> {
        let id = self.video_id.as_ref()?.captures(url)?.get(1)?.as_str();
        Some(format!("{}{id}", self.id_prefix))
    }

    /// dailymotion.com
    pub fn dailymotion() -> Self {
        Self::new(
            ProviderId::DailyMotion,
            &["dailymotion.com"],
            425.0 / 335.0,
            r"(?i)dailymotion\.com/(?:swf|video|embed/video)/([A-Za-z0-9]+)",
            r#"<object width="$width" height="$height"><param name="movie" value="http://www.dailymotion.com/swf/$video_id"></param><param name="allowFullScreen" value="true"></param><param name="wmode" value="transparent"></param><embed src="http://www.dailymotion.com/swf/$video_id" type="application/x-shockwave-flash" width="$width" height="$height" wmode="transparent" allowFullScreen="true"></embed></object>"#,
        )
    }

    /// gametrailers.com
    pub fn gametrailers() -> Self {
        Self::new(
            ProviderId::GameTrailers,
            &["gametrailers.com"],
            480.0 / 392.0,
            r"(?i)gametrailers\.com/(?:[^?#]*/)?([\w\-]+)/?(?:[?#]|$)",
            r#"<object classid="clsid:d27cdb6e-ae6d-11cf-96b8-444553540000" id="gtembed" width="$width" height="$height"><param name="allowScriptAccess" value="sameDomain" /><param name="allowFullScreen" value="true" /><param name="movie" value="http://www.gametrailers.com/remote_wrap.php?mid=$video_id"/><param name="quality" value="high" /><embed src="http://www.gametrailers.com/remote_wrap.php?mid=$video_id" swLiveConnect="true" name="gtembed" align="middle" allowScriptAccess="sameDomain" allowFullScreen="true" quality="high" type="application/x-shockwave-flash" width="$width" height="$height"></embed></object>"#,
        )
    }

    /// metacafe.com
    pub fn metacafe() -> Self {
        Self::new(
            ProviderId::MetaCafe,
            &["metacafe.com"],
            400.0 / 345.0,
            r"(?i)metacafe\.com/watch/([\w\-]+(?:/[\w\-]+)?)",
            r#"<embed src="http://www.metacafe.com/fplayer/$video_id.swf" width="$width" height="$height" wmode="transparent" allowFullScreen="true" type="application/x-shockwave-flash"></embed>"#,
        )
    }

    /// movieclips.com
    pub fn movieclips() -> Self {
        Self::new(
            ProviderId::MovieClips,
            &["movieclips.com"],
            560.0 / 304.0,
            r"(?i)movieclips\.com/(?:[^?#]*/)?([\w\-]+)/?(?:[?#]|$)",
            r#"<embed src="http://movieclips.com/e/$video_id/" width="$width" height="$height" wmode="transparent" allowScriptAccess="always" allowfullscreen="true" type="application/x-shockwave-flash"> </embed>"#,
        )
    }

    /// myvideo.de
    pub fn myvideo() -> Self {
        Self::new(
            ProviderId::MyVideo,
            &["myvideo.de"],
            470.0 / 406.0,
            r"(?i)myvideo\.de/(?:watch|movie)/(\d+)",
            r#"<object style="width:$widthpx;height:$heightpx;" type="application/x-shockwave-flash" data="http://www.myvideo.de/movie/$video_id"><param name="wmode" value="transparent"><param name="movie" value="http://www.myvideo.de/movie/$video_id" /><param name="AllowFullscreen" value="true" /></object>"#,
        )
    }

    /// southparkstudios.com, played through the MTV Networks player.
    pub fn southparkstudios() -> Self {
        Self::new(
            ProviderId::SouthParkStudios,
            &["southparkstudios.com"],
            480.0 / 400.0,
            r"/clips/(\d+)/",
            r#"<embed src="http://media.mtvnservices.com/$video_id" width="$width" height="$height" type="application/x-shockwave-flash" wmode="window" allowFullScreen="true" allowScriptAccess="always" allownetworking="all"></embed>"#,
        )
        .with_id_prefix("mgid:cms:item:southparkstudios.com:")
    }

    /// vimeo.com
    pub fn vimeo() -> Self {
        Self::new(
            ProviderId::Vimeo,
            &["vimeo.com"],
            400.0 / 225.0,
            r"(?i)vimeo\.com/(?:[^?#]*/)?(\d+)/?(?:[?#]|$)",
            r#"<object width="$width" height="$height"><param name="allowfullscreen" value="true" /><param name="wmode" value="transparent"><param name="allowscriptaccess" value="always" /><param name="movie" value="http://vimeo.com/moogaloop.swf?clip_id=$video_id&amp;server=vimeo.com&amp;show_title=1&amp;show_byline=1&amp;show_portrait=0&amp;fullscreen=1" /><embed src="http://vimeo.com/moogaloop.swf?clip_id=$video_id&amp;server=vimeo.com&amp;show_title=1&amp;show_byline=1&amp;show_portrait=0&amp;fullscreen=1" type="application/x-shockwave-flash" allowfullscreen="true" allowscriptaccess="always" width="$width" height="$height"></embed></object>"#,
        )
    }

    /// wegame.com
    pub fn wegame() -> Self {
        Self::new(
            ProviderId::WeGame,
            &["wegame.com"],
            488.0 / 387.0,
            r"(?i)wegame\.com/watch/([\w\-]+)",
            r#"<object type="application/x-shockwave-flash" data="http://www.wegame.com/static/flash/player2.swf" width="$width" height="$height"><param name="flashvars" value="tag=$video_id"/></object>"#,
        )
    }
}

#[async_trait]
impl VideoProvider for RegexProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn domains(&self) -> &'static [&'static str] {
        self.domains
    }

    fn aspect_ratio(&self) -> f64 {
        self.ratio
    }

    fn embed_template(&self) -> &'static str {
        self.template
    }

    async fn extract_id(&self, url: &str, _lookup: &MetadataLookup) -> Option<String> {
        self.parse_video_id(url)
    }
}
