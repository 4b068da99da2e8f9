// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{
    BlipTvProvider, HuluProvider, ProviderId, RegexProvider, VideoProvider, ViddlerProvider,
    YoutubeProvider,
};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Host suffix to provider, and provider to behavior. Immutable once built.
pub struct ProviderRegistry {
    domains: Vec<(&'static str, ProviderId)>,
    providers: HashMap<ProviderId, Box<dyn VideoProvider>>,
}

impl ProviderRegistry {
    /// Builds a registry; domain lookups follow the order of `providers`.
    pub fn new(providers: Vec<Box<dyn VideoProvider>>) -> Self {
        let mut domains = Vec::new();
        let mut by_id = HashMap::with_capacity(providers.len());
        for provider in providers {
            let id = provider.id();
            domains.extend(provider.domains().iter().map(|domain| (*domain, id)));
            by_id.insert(id, provider);
        }
        Self {
            domains,
            providers: by_id,
        }
    }

    /// The registry of every built-in provider.
    pub fn builtin() -> Self {
        Self::new(vec![
            Box::new(BlipTvProvider::new()),
            Box::new(RegexProvider::dailymotion()),
            Box::new(RegexProvider::gametrailers()),
            Box::new(HuluProvider::new()),
            Box::new(RegexProvider::metacafe()),
            Box::new(RegexProvider::movieclips()),
            Box::new(RegexProvider::myvideo()),
            Box::new(RegexProvider::southparkstudios()),
            Box::new(YoutubeProvider::new()),
            Box::new(ViddlerProvider::new()),
            Box::new(RegexProvider::vimeo()),
            Box::new(RegexProvider::wegame()),
        ])
    }

    /// The process-wide built-in registry, built on first use.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<ProviderRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::builtin)
    }

    /// Behavior of a provider.
    pub fn get(&self, id: ProviderId) -> Option<&dyn VideoProvider> {
        self.providers.get(&id).map(|provider| provider.as_ref())
    }

    /// Behavior of a provider by its stored name; `None` for unknown names.
    pub fn get_by_name(&self, name: &str) -> Option<&dyn VideoProvider> {
        self.get(name.parse().ok()?)
    }

    /// The first provider whose domain is `host` or a parent domain of it.
    pub fn provider_by_host(&self, host: &str) -> Option<ProviderId> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.domains
            .iter()
            .find(|(domain, _)| {
                host.strip_suffix(domain)
                    .map(|rest| rest.is_empty() || rest.ends_with('.'))
                    .unwrap_or(false)
            })
            .map(|(_, id)| *id)
    }

    /// The provider of a URL's host; `None` when it has no host or no provider serves it.
    pub fn provider_by_url(&self, url: &str) -> Option<ProviderId> {
        let url = Url::parse(url).ok()?;
        self.provider_by_host(url.host_str()?)
    }
}
