//! Structured compilation diagnostics
//!
//! Traceur reports errors as free text on stderr. This module turns that
//! text into a [`Diagnostic`] pointing at the user's real source file, so
//! an editor or build UI can highlight the offending position.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// The single diagnostic shape Traceur is known to emit:
/// `[Error: <file>:<line>:<column>:<reason>`. Anything else degrades to an
/// unlocated diagnostic.
static COMPILATION_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Error: (.*):([0-9]+):([0-9]+):(.*)").expect("valid pattern"));

/// Title attached to every compilation diagnostic.
const TITLE: &str = "EcmaScript 6 Compilation Error";

/// A compilation failure located in a source file.
///
/// Line and column are both present or both absent; the constructors
/// enforce this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct Diagnostic {
    pub title: String,
    pub message: String,
    pub file: PathBuf,
    line: Option<u32>,
    column: Option<u32>,
}

impl Diagnostic {
    /// A diagnostic with a known source position.
    pub fn located(message: impl Into<String>, file: &Path, line: u32, column: u32) -> Self {
        Self {
            title: TITLE.to_string(),
            message: message.into(),
            file: file.to_path_buf(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// A file-scoped diagnostic without position information.
    pub fn unlocated(message: impl Into<String>, file: &Path) -> Self {
        Self {
            title: TITLE.to_string(),
            message: message.into(),
            file: file.to_path_buf(),
            line: None,
            column: None,
        }
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "{}: {} ({}:{}:{})",
                self.title,
                self.message,
                self.file.display(),
                line,
                column
            ),
            _ => write!(f, "{}: {} ({})", self.title, self.message, self.file.display()),
        }
    }
}

/// Translate raw compiler stderr into a [`Diagnostic`].
///
/// The first non-empty line is taken as the message (Traceur output often
/// starts with blank lines). The file path embedded in the tool's own
/// message is discarded: the tool may have compiled a temporary filtered
/// copy, but diagnostics must point at `source`, the user's real file.
pub fn translate(raw: &str, source: &Path) -> Diagnostic {
    let message = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");

    if let Some(caps) = COMPILATION_ERROR.captures(message) {
        let line = caps[2].parse::<u32>();
        let column = caps[3].parse::<u32>();
        if let (Ok(line), Ok(column)) = (line, column) {
            return Diagnostic::located(caps[4].trim(), source, line, column);
        }
    }

    Diagnostic::unlocated(message, source)
}
