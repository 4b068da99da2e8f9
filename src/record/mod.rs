// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Storage, caches and settings shared by every handle.
mod context;
/// Per-video handle.
mod video;

pub use self::context::VideoContext;
pub use self::video::Video;
