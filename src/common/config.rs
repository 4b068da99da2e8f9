// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[allow(deprecated)]
use std::env::home_dir;
use std::fs::read_to_string;
use std::time::Duration;

/// Configuration parameters, kept as TOML and unpacked on demand.
#[derive(Debug)]
pub struct VidConfig {
    debug_enabled: bool,
    toml: String,
}

impl VidConfig {
    /// Creates a configuration builder.
    pub fn builder() -> VidConfigBuilder {
        VidConfigBuilder {
            vid_config: None,
            debug_enabled: false,
            error: None,
        }
    }

    /// Returns `true` if debug is enabled.
    pub fn debug(&self) -> bool {
        self.debug_enabled
    }

    /// Returns configuration parameters.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        toml::from_str(&self.toml).map_err(|e: toml::de::Error| Error::String(format!("toml: {e}")))
    }

    /// Returns the video settings, with defaults for anything not configured.
    pub fn settings(&self) -> Result<VidSettings, Error> {
        VidSettings::from_config(self)
    }
}

/// Builds a `VidConfig` from a TOML string or file.
pub struct VidConfigBuilder {
    vid_config: Option<VidConfig>,
    debug_enabled: bool,
    error: Option<Error>,
}

impl VidConfigBuilder {
    /// Returns the configuration, or the first error encountered.
    pub fn build(self) -> Result<VidConfig, Error> {
        if let Some(error) = self.error {
            Err(error)
        } else if let Some(vid_config) = self.vid_config {
            Ok(vid_config)
        } else {
            Err(Error::String("config not set".to_string()))
        }
    }

    /// Enables or disables debug output.
    pub fn debug(self, debug_enabled: bool) -> Self {
        Self {
            vid_config: self.vid_config.map(|c| VidConfig {
                debug_enabled,
                toml: c.toml,
            }),
            debug_enabled,
            error: self.error,
        }
    }

    /// Reads TOML from `~/{file_name}`, falling back to `./{file_name}`.
    pub fn toml_file(self, file_name: &str) -> Self {
        let debug_enabled = self.debug_enabled;
        #[allow(deprecated)]
        let home_path = home_dir()
            .and_then(|pathbuf| pathbuf.to_str().map(|path| format!("{path}/{file_name}")));
        let local_path = format!("./{file_name}");
        let toml = home_path
            .and_then(|path| read_to_string(path).ok())
            .map(Ok)
            .unwrap_or_else(|| {
                read_to_string(&local_path)
                    .map_err(|_| Error::String(format!("{local_path}: cannot read")))
            });
        match toml {
            Ok(toml) => Self {
                vid_config: Some(VidConfig {
                    debug_enabled,
                    toml,
                }),
                debug_enabled,
                error: None,
            },
            Err(e) => Self {
                vid_config: None,
                debug_enabled,
                error: Some(e),
            },
        }
    }

    /// Uses the specified TOML text.
    pub fn toml_str(self, toml: &str) -> Self {
        self.toml_string(toml.to_string())
    }

    /// Uses the specified TOML text.
    pub fn toml_string(self, toml: String) -> Self {
        Self {
            vid_config: Some(VidConfig {
                debug_enabled: self.debug_enabled,
                toml,
            }),
            debug_enabled: self.debug_enabled,
            error: None,
        }
    }
}

/// Typed settings used by the cache, embed, fetch and storage layers.
#[derive(Clone, Debug, PartialEq)]
pub struct VidSettings {
    /// TTL of cached current records.
    pub record_ttl: Duration,
    /// TTL of cached provider metadata (remote embed ID lookups).
    pub metadata_ttl: Duration,
    /// Most entries the in-process cache holds.
    pub cache_capacity: u64,
    /// Embed width when the caller gives none.
    pub default_width: u32,
    /// Largest width an embed tag may ask for.
    pub max_width: u32,
    /// Largest height an embed tag may ask for.
    pub max_height: u32,
    /// Timeout of outbound metadata requests.
    pub fetch_timeout: Duration,
    /// Name of the current-record table.
    pub current_table: String,
    /// Name of the archived-record table.
    pub archive_table: String,
}

impl Default for VidSettings {
    fn default() -> Self {
        Self {
            record_ttl: Duration::from_secs(Self::RECORD_TTL_SECS),
            metadata_ttl: Duration::from_secs(Self::METADATA_TTL_SECS),
            cache_capacity: 10_000,
            default_width: 400,
            max_width: 425,
            max_height: 350,
            fetch_timeout: Duration::from_secs(5),
            current_table: "video".to_string(),
            archive_table: "oldvideo".to_string(),
        }
    }
}

impl VidSettings {
    /// One week.
    pub const RECORD_TTL_SECS: u64 = 60 * 60 * 24 * 7;
    /// One day.
    pub const METADATA_TTL_SECS: u64 = 60 * 60 * 24;

    /// Unpacks the `[cache]`, `[embed]`, `[fetch]` and `[dynamo]` sections.
    pub fn from_config(vid_config: &VidConfig) -> Result<Self, Error> {
        #[derive(Default, Deserialize)]
        struct CacheToml {
            record_ttl_secs: Option<u64>,
            metadata_ttl_secs: Option<u64>,
            capacity: Option<u64>,
        }
        #[derive(Default, Deserialize)]
        struct EmbedToml {
            default_width: Option<u32>,
            max_width: Option<u32>,
            max_height: Option<u32>,
        }
        #[derive(Default, Deserialize)]
        struct FetchToml {
            timeout_secs: Option<u64>,
        }
        #[derive(Default, Deserialize)]
        struct DynamoToml {
            current_table: Option<String>,
            archive_table: Option<String>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            #[serde(default)]
            cache: CacheToml,
            #[serde(default)]
            embed: EmbedToml,
            #[serde(default)]
            fetch: FetchToml,
            #[serde(default)]
            dynamo: DynamoToml,
        }

        let ConfigToml {
            cache,
            embed,
            fetch,
            dynamo,
        } = vid_config.get()?;
        let defaults = Self::default();
        Ok(Self {
            record_ttl: cache
                .record_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.record_ttl),
            metadata_ttl: cache
                .metadata_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.metadata_ttl),
            cache_capacity: cache.capacity.unwrap_or(defaults.cache_capacity),
            default_width: embed.default_width.unwrap_or(defaults.default_width),
            max_width: embed.max_width.unwrap_or(defaults.max_width),
            max_height: embed.max_height.unwrap_or(defaults.max_height),
            fetch_timeout: fetch
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            current_table: dynamo.current_table.unwrap_or(defaults.current_table),
            archive_table: dynamo.archive_table.unwrap_or(defaults.archive_table),
        })
    }
}
