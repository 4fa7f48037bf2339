//! Concatenated SDL source with per-document offset tracking.
//!
//! Several SDL documents are joined into one string before parsing. The
//! source map remembers where each document landed so that a byte offset
//! reported by the parser or the schema builder can be turned back into a
//! `path:line:column` location in the original file.

use std::fmt;
use std::path::{Path, PathBuf};

/// One document inside a [`SourceMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Byte offset of the document's first byte in the joined source.
    pub start: u32,
    /// Byte offset one past the document's trailing separator.
    pub end: u32,
}

/// A resolved source location. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.column)
    }
}

/// The joined SDL text of every input document.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    text: String,
    files: Vec<SourceFile>,
}

impl SourceMap {
    /// Creates an empty source map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document, followed by a newline separator.
    pub fn push(&mut self, path: impl Into<PathBuf>, contents: &str) {
        let start = offset(self.text.len());
        self.text.push_str(contents);
        self.text.push('\n');
        self.files.push(SourceFile {
            path: path.into(),
            start,
            end: offset(self.text.len()),
        });
    }

    /// Returns the joined source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the documents in the order they were appended.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns the paths of every document.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.path.as_path())
    }

    /// Resolves a byte offset into a location.
    ///
    /// Offsets at the very end of the source resolve into the last document.
    #[must_use]
    pub fn locate(&self, pos: u32) -> Option<Location> {
        let file = self
            .files
            .iter()
            .find(|file| pos >= file.start && pos < file.end)
            .or_else(|| self.files.last().filter(|file| pos == file.end))?;

        let before = &self.text.as_bytes()[file.start as usize..pos as usize];
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |i| i + 1);
        let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;

        Some(Location {
            path: file.path.clone(),
            line: memchr::memchr_iter(b'\n', before).count() + 1,
            column,
        })
    }
}

fn offset(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
