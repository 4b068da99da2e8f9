// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::VideoContext;
use crate::common::{Error, UploaderId, VideoName};
use crate::log::StringLogger;
use crate::store::{
    AddMode, AddOutcome, ArchiveName, ArchivedRecord, CurrentRecord, HistoryCursor,
    UndeleteOutcome, VersionStore,
};
use crate::time_id::UnixMillis;
use crate::videos::{EmbedSize, MetadataLookup, ProviderId, VideoProvider};

/// Handle on one named video, meant to live for one request. The live
/// record is loaded on first use and kept until this handle changes it.
pub struct Video {
    ctx: VideoContext,
    store: VersionStore,
    lookup: MetadataLookup,
    logger: StringLogger,
    name: VideoName,
    loaded: Option<Option<CurrentRecord>>,
}

impl Video {
    /// A handle on the video titled `name`, with a log of its own. Nothing
    /// is loaded yet.
    pub fn new_from_name(ctx: &VideoContext, name: &str) -> Result<Self, Error> {
        Self::with_logger(ctx, name, &ctx.logger())
    }

    /// A handle on the video titled `name`, logging to `logger` (typically
    /// shared by the handles of one request).
    pub fn with_logger(
        ctx: &VideoContext,
        name: &str,
        logger: &StringLogger,
    ) -> Result<Self, Error> {
        Ok(Self {
            ctx: ctx.clone(),
            store: ctx.store(logger),
            lookup: ctx.lookup(logger),
            logger: logger.child("video"),
            name: name.parse()?,
            loaded: None,
        })
    }

    /// What this handle has logged.
    pub fn logger(&self) -> &StringLogger {
        &self.logger
    }

    /// Canonical name.
    pub fn name(&self) -> &VideoName {
        &self.name
    }

    /// Human readable title.
    pub fn title(&self) -> String {
        self.name.display_title()
    }

    /// The live record, if there is one.
    pub async fn record(&mut self) -> Result<Option<&CurrentRecord>, Error> {
        if self.loaded.is_none() {
            let record = self.store.load(&self.name).await?;
            self.loaded = Some(record);
        }
        Ok(self.loaded.as_ref().and_then(Option::as_ref))
    }

    /// Whether there is a live record.
    pub async fn exists(&mut self) -> Result<bool, Error> {
        Ok(self.record().await?.is_some())
    }

    /// URL on the provider's site.
    pub async fn url(&mut self) -> Result<Option<String>, Error> {
        Ok(self.record().await?.map(|record| record.url.clone()))
    }

    /// Provider name as stored.
    pub async fn provider_id(&mut self) -> Result<Option<String>, Error> {
        Ok(self.record().await?.map(|record| record.provider.clone()))
    }

    /// Provider, if the stored name is a known one.
    pub async fn provider(&mut self) -> Result<Option<ProviderId>, Error> {
        Ok(self
            .record()
            .await?
            .and_then(|record| record.provider.parse().ok()))
    }

    /// Who made the live version.
    pub async fn uploader(&mut self) -> Result<Option<UploaderId>, Error> {
        Ok(self.record().await?.map(|record| record.uploader.clone()))
    }

    /// When the live version was made.
    pub async fn timestamp(&mut self) -> Result<Option<UnixMillis>, Error> {
        Ok(self.record().await?.map(|record| record.timestamp))
    }

    /// Resolves `raw` (a URL or pasted embed markup) and stores it as the
    /// new live version. Input that no provider can embed is refused
    /// before storage is touched.
    pub async fn add_video(
        &mut self,
        raw: &str,
        uploader: &UploaderId,
        mode: AddMode,
        now: UnixMillis,
    ) -> Result<AddOutcome, Error> {
        let (url, provider) = match self.check_input(raw).await {
            Ok(checked) => checked,
            Err(e) => {
                return self
                    .logger
                    .call(format!("add {} from {:?}", self.name, raw.trim()), Err(e))
            }
        };
        self.loaded = None;
        self.store
            .add_or_update(&self.name, &url, provider.as_str(), uploader, now, mode)
            .await
    }

    async fn check_input(&self, raw: &str) -> Result<(String, ProviderId), Error> {
        let resolution = self.ctx.registry().resolve(raw);
        let unknown = || {
            let shown = if resolution.url.is_empty() {
                raw.trim()
            } else {
                resolution.url.as_str()
            };
            Error::Resolution(format!("{shown}: could not determine video provider"))
        };
        let provider = resolution
            .provider
            .and_then(|id| self.ctx.registry().get(id))
            .ok_or_else(unknown)?;
        if provider
            .extract_id(&resolution.url, &self.lookup)
            .await
            .is_none()
        {
            return Err(Error::Extraction {
                provider: provider.id(),
                url: resolution.url,
            });
        }
        Ok((resolution.url, provider.id()))
    }

    /// Player markup for the live version. `width` defaults to the configured
    /// width and `height` to the one implied by the provider's aspect ratio;
    /// both are bounded by the configured maximum.
    ///
    /// Empty when there is no live version, its provider is unknown, or the
    /// provider can't find the video ID.
    pub async fn embed_code(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<String, Error> {
        let ctx = self.ctx.clone();
        let lookup = self.lookup.clone();
        let logger = self.logger.clone();
        let Some(record) = self.record().await? else {
            return Ok(String::new());
        };
        let Some(provider) = ctx.registry().get_by_name(&record.provider) else {
            logger.trace(format!("{}: no provider {:?}", record.name, record.provider));
            return Ok(String::new());
        };
        let Some(video_id) = provider.extract_id(&record.url, &lookup).await else {
            logger.warn(format!(
                "{}: {} video ID of {} not found",
                record.name,
                provider.id(),
                record.url
            ));
            return Ok(String::new());
        };
        let settings = ctx.settings();
        let width = width.unwrap_or(settings.default_width);
        let size = match height {
            Some(height) => EmbedSize { width, height },
            None => EmbedSize::from_width(width, provider.aspect_ratio()),
        };
        let max = EmbedSize {
            width: settings.max_width,
            height: settings.max_height,
        };
        let size = EmbedSize::clamped(size.width, size.height, max);
        Ok(provider.render_embed(&video_id, size))
    }

    /// Versions, live first and then newest to oldest.
    pub fn history(&self) -> HistoryCursor {
        self.store.history(&self.name)
    }

    /// Deleted or superseded versions, newest first.
    pub async fn archived(&self) -> Result<Vec<ArchivedRecord>, Error> {
        self.store.archived(&self.name).await
    }

    /// Archives and removes the live version, see `VersionStore::delete_video`.
    pub async fn delete(
        &mut self,
        now: UnixMillis,
        expected_timestamp: Option<UnixMillis>,
    ) -> Result<Option<ArchivedRecord>, Error> {
        self.loaded = None;
        self.store
            .delete_video(&self.name, now, expected_timestamp)
            .await
    }

    /// Makes the newest archived version live again.
    pub async fn undelete(&mut self) -> Result<UndeleteOutcome, Error> {
        self.loaded = None;
        self.store.undelete_video(&self.name).await
    }

    /// Makes an archived version live again, as a new version by `uploader`.
    pub async fn revert(
        &mut self,
        archive_name: &ArchiveName,
        uploader: &UploaderId,
        now: UnixMillis,
    ) -> Result<AddOutcome, Error> {
        self.loaded = None;
        self.store
            .revert(&self.name, archive_name, uploader, now)
            .await
    }

    /// Forgets the loaded record, so the next read goes to the cache or store.
    pub fn refresh(&mut self) {
        self.loaded = None;
    }
}
