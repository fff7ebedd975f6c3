//! The document being outlined

use crate::error::SitemapError;
use std::path::{Path, PathBuf};

/// Kind of document, selecting the extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Screen definition (`*.xml`): fields, views, commands, script, response, queries
    Screen,
    /// Message definition (`*message.xml`): actions inside a template
    Message,
}

impl DocumentKind {
    /// Detect the document kind from its path.
    ///
    /// Returns `None` for documents the outline does not apply to.
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_lowercase();

        if file_name.ends_with("message.xml") {
            Some(DocumentKind::Message)
        } else if file_name.ends_with(".xml") {
            Some(DocumentKind::Screen)
        } else {
            None
        }
    }
}

/// Whether focusing `path` should make the host re-request the outline
pub fn is_refresh_relevant(path: &Path) -> bool {
    DocumentKind::detect(path).is_some()
}

/// A read-only snapshot of the active text buffer
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
    lines: Vec<String>,
}

impl Document {
    /// Create from in-memory text
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.split('\n').map(String::from).collect();
        Self {
            path: path.into(),
            text,
            lines,
        }
    }

    /// Read a document from disk
    pub fn open(path: &Path) -> Result<Self, SitemapError> {
        let text = std::fs::read_to_string(path).map_err(|source| SitemapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines split on `\n`; index is the zero-based line number
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Directory against which entity paths are resolved
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::detect(&self.path)
    }
}
