// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{ProviderId, ProviderRegistry};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// A raw input turned into a URL and, if recognized, its provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    /// The URL, or the URL found in embed markup (empty if there was none).
    pub url: String,
    /// `None` means the input cannot be embedded.
    pub provider: Option<ProviderId>,
}

/// Resolves `raw` with the global registry.
pub fn resolve(raw: &str) -> Resolution {
    ProviderRegistry::global().resolve(raw)
}

impl ProviderRegistry {
    /// Takes a URL as is, or else pulls the URL out of pasted embed markup,
    /// and looks up the provider of its host.
    pub fn resolve(&self, raw: &str) -> Resolution {
        let raw = raw.trim();
        let url = if is_url(raw) {
            raw.to_string()
        } else {
            url_from_embed_code(raw)
        };
        let provider = self.provider_by_url(&url);
        Resolution { url, provider }
    }
}

fn regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Whether `s` is an http, https or ftp URL.
pub fn is_url(s: &str) -> bool {
    static URL: OnceLock<Option<Regex>> = OnceLock::new();
    regex(&URL, r"(?i)^(?:http|https|ftp)://(?:www\.)?.*$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}

/// The `src` of an `<embed>` or `<iframe>` in `code`, or empty. An embed's
/// `flashvars` is appended as the query string.
pub fn url_from_embed_code(code: &str) -> String {
    const ATTRIBUTE_VALUE: &str = r#"\s*=\s*(?:"([^"<]*)"|'([^'<]*)'|([^\s"'<>]+))"#;
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    static FLASHVARS: OnceLock<Option<Regex>> = OnceLock::new();

    let Some(tag) = regex(
        &TAG,
        &format!(r"(?is)\b(embed|iframe)\b[^>]*?\bsrc{ATTRIBUTE_VALUE}[^>]*"),
    ) else {
        return String::new();
    };
    let Some(captures) = tag.captures(code) else {
        return String::new();
    };
    let mut url = attribute_value(&captures, 2);

    let is_embed = captures
        .get(1)
        .map(|m| m.as_str().eq_ignore_ascii_case("embed"))
        .unwrap_or(false);
    if is_embed {
        let whole_tag = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
        let flashvars = regex(&FLASHVARS, &format!(r"(?is)\bflashvars{ATTRIBUTE_VALUE}"))
            .and_then(|re| re.captures(whole_tag))
            .map(|captures| attribute_value(&captures, 1))
            .unwrap_or_default();
        if !flashvars.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&flashvars);
        }
    }
    url
}

/// The quoted, single quoted or bare alternative starting at group `first`.
fn attribute_value(captures: &Captures<'_>, first: usize) -> String {
    (first..first + 3)
        .find_map(|i| captures.get(i))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
