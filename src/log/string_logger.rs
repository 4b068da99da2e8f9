// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct LoggerInner {
    pub(crate) lines: Vec<String>,
    pub(crate) warn: bool,
}

/// Thread-safe string logger, shared by the cache, store and resolver of one
/// `VideoContext`. Each component writes through a labeled child.
#[derive(Clone, Default)]
pub struct StringLogger {
    pub(crate) debug: bool,
    pub(crate) label: Option<&'static str>,
    pub(crate) inner: Arc<Mutex<LoggerInner>>,
}

impl StringLogger {
    /// Call a function and trace the result.
    pub fn call<T>(&self, line: String, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => self.trace(format!("{line} succeeded")),
            Err(e) if e.is_user_actionable() => self.trace(format!("{line} refused: {e}")),
            Err(e) => self.warn(format!("{line} failed\n{e:?}")),
        }
        result
    }

    /// Returns a logger writing to the same lines, prefixing each with `[label]`.
    pub fn child(&self, label: &'static str) -> Self {
        Self {
            debug: self.debug,
            label: Some(label),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether the log contains any warnings.
    pub fn contains_warnings(&self) -> bool {
        self.inner
            .lock()
            .ok()
            .map(|inner| inner.warn)
            .unwrap_or(false)
    }

    /// Returns a copy of the lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.clone())
            .unwrap_or_default()
    }

    /// Create a new string logger.
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            label: None,
            inner: Arc::new(Mutex::new(Default::default())),
        }
    }

    /// Add a trace line to this logger.
    pub fn trace(&self, line: String) {
        self.push(line, false);
    }

    /// Add a warning or error line to this logger.
    pub fn warn(&self, line: String) {
        self.push(line, true);
    }

    fn push(&self, line: String, warn: bool) {
        if line.is_empty() {
            return;
        }
        let line = match self.label {
            Some(label) => format!("[{label}] {line}"),
            None => line,
        };
        if self.debug {
            println!("{line}");
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.lines.push(line);
            inner.warn |= warn;
        }
    }
}

impl Display for StringLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Ok(inner) = self.inner.lock() {
            f.write_str(&inner.lines.join("\n"))
        } else {
            Ok(())
        }
    }
}
