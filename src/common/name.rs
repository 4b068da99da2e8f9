// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::serde_str;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Longest allowed name, in bytes (after canonicalization).
pub const MAX_NAME_BYTES: usize = 255;

/// Canonical (database key) form of a video title, e.g. `Funny_cat_video`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VideoName(pub String);
crate::impl_wrapper_str!(VideoName);
serde_str!(VideoName);

impl VideoName {
    /// Returns the human readable form, with underscores shown as spaces.
    pub fn display_title(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl FromStr for VideoName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize_name(s)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// Canonicalization errors
pub enum NameError {
    /// Nothing is left after trimming.
    Empty,
    /// The canonical name has this many bytes, more than `MAX_NAME_BYTES`.
    TooLong(usize),
    /// The character isn't allowed.
    UnsupportedCharacter(char),
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NameError::Empty => f.write_str("name is empty"),
            NameError::TooLong(len) => {
                write!(f, "name is {len} bytes, at most {MAX_NAME_BYTES} allowed")
            }
            NameError::UnsupportedCharacter(c) => write!(f, "character {c:?} is not allowed"),
        }
    }
}

/// Convert the specified title into its canonical key so that surface
/// formatting (surrounding blanks, repeated spaces, underscores versus spaces,
/// a lowercase first letter) never yields two different records.
pub fn canonicalize_name(name: &str) -> Result<VideoName, NameError> {
    let mut ret = String::with_capacity(name.len());
    let mut separator_pending = false;
    for c in name.chars() {
        match canonicalize_char(c) {
            CanonicalizedChar::Canonical(cc) => {
                if separator_pending && !ret.is_empty() {
                    ret.push('_');
                }
                separator_pending = false;
                if ret.is_empty() {
                    ret.extend(cc.to_uppercase());
                } else {
                    ret.push(cc);
                }
            }
            CanonicalizedChar::Separator => separator_pending = true,
            CanonicalizedChar::Invalid => {
                return Err(NameError::UnsupportedCharacter(c));
            }
        }
    }
    if ret.is_empty() {
        Err(NameError::Empty)
    } else if ret.len() > MAX_NAME_BYTES {
        Err(NameError::TooLong(ret.len()))
    } else {
        Ok(VideoName(ret))
    }
}

enum CanonicalizedChar {
    Canonical(char),
    Separator,
    Invalid,
}

fn canonicalize_char(c: char) -> CanonicalizedChar {
    match c {
        ' ' | '_' | '\u{a0}' => CanonicalizedChar::Separator,
        '#' | '<' | '>' | '[' | ']' | '|' | '{' | '}' => CanonicalizedChar::Invalid,
        c if c.is_control() => CanonicalizedChar::Invalid,
        c => CanonicalizedChar::Canonical(c),
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_name, NameError, VideoName};

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(
            canonicalize_name("funny  cat_ video").unwrap(),
            VideoName("Funny_cat_video".to_string())
        );
    }

    #[test]
    fn trims_and_capitalizes() {
        assert_eq!(canonicalize_name("  __élan vital ").unwrap().as_str(), "Élan_vital");
    }

    #[test]
    fn rejects() {
        assert_eq!(canonicalize_name(" _ "), Err(NameError::Empty));
        assert_eq!(
            canonicalize_name("a|b"),
            Err(NameError::UnsupportedCharacter('|'))
        );
        assert_eq!(
            canonicalize_name(&"x".repeat(256)),
            Err(NameError::TooLong(256))
        );
    }

    #[test]
    fn display_title() {
        let name: VideoName = "Two words".parse().unwrap();
        assert_eq!(name.as_str(), "Two_words");
        assert_eq!(name.display_title(), "Two words");
    }

    #[test]
    fn serde_recanonicalizes() {
        let name: VideoName = serde_json::from_str("\"lower case\"").unwrap();
        assert_eq!(name.as_str(), "Lower_case");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Lower_case\"");
    }
}
