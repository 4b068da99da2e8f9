// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Providers recognized by a pattern over the URL.
mod catalogue;
/// Outbound metadata lookups and their cache.
mod fetch;
/// Providers that ask their own API for an embed ID.
mod oembed;
/// Provider trait and shared types.
mod provider;
/// Host to provider lookup.
mod registry;
/// Raw input to URL and provider.
mod resolver;
/// Unit tests
mod tests;
/// Support for Youtube.
mod youtube;

pub use self::catalogue::RegexProvider;
#[cfg(feature = "http")]
pub use self::fetch::ReqwestFetcher;
pub use self::fetch::{CannedFetcher, MetadataFetcher, MetadataLookup};
pub use self::oembed::{BlipTvProvider, HuluProvider, ViddlerProvider};
pub use self::provider::{render_template, EmbedSize, ProviderId, VideoProvider};
pub use self::registry::ProviderRegistry;
pub use self::resolver::{is_url, resolve, url_from_embed_code, Resolution};
pub use self::youtube::YoutubeProvider;
