// Word list loading. A source yields entries in file order; nothing is
// filtered here, blank lines included. Normalization happens in the importer.

use crate::error::ServiceError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One line of the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    /// Free-form context. No source fills it yet.
    pub context: Option<String>,
}

impl WordEntry {
    pub fn new(text: impl Into<String>) -> Self {
        WordEntry {
            text: text.into(),
            context: None,
        }
    }

    /// Lowercased, trimmed form used for lookups.
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Anything that can produce a word list.
pub trait WordSource {
    fn read(&self) -> Result<Vec<WordEntry>, ServiceError>;
}

/// Plain text file, one word per line.
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
}

impl TextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextFile { path: path.into() }
    }
}

impl WordSource for TextFile {
    fn read(&self) -> Result<Vec<WordEntry>, ServiceError> {
        let data = std::fs::read_to_string(&self.path)?;
        let entries: Vec<WordEntry> = data.lines().map(WordEntry::new).collect();
        debug!(path = %self.path.display(), count = entries.len(), "loaded word list");
        Ok(entries)
    }
}

/// Shortcut for `TextFile::new(path).read()`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<WordEntry>, ServiceError> {
    TextFile::new(path.as_ref()).read()
}
