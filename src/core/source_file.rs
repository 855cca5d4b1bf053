//! Source file representation.

use std::path::{Path, PathBuf};

use super::{Language, Result};

/// A source file with its content loaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file.
    pub path: PathBuf,
    /// Detected language.
    pub language: Language,
    /// File content as bytes.
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Load a source file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let language = Language::detect(path).ok_or_else(|| super::Error::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            language,
            content,
        })
    }

    /// Create from existing content.
    pub fn from_content(path: impl Into<PathBuf>, language: Language, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            language,
            content,
        }
    }

    /// Get content as string (lossy conversion).
    pub fn content_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Count total lines.
    pub fn total_lines(&self) -> usize {
        self.content_str().lines().count()
    }
}
