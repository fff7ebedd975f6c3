//! Error types
//!
//! Only the outer surface (reading the main document, loading configuration,
//! rendering output) can fail. Extraction itself degrades to empty or
//! less-navigable results instead of returning errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers of the library's outer surface.
#[derive(Error, Debug)]
pub enum SitemapError {
    /// The main document could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read or parsed.
    #[error("Invalid configuration {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Output rendering failed.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A declared external entity whose file could not be loaded.
///
/// Recorded by the entity table and replaced by a placeholder; never
/// propagated out of an extraction pass.
#[derive(Error, Debug)]
#[error("Failed to read entity '{name}' from {path}: {source}")]
pub struct EntityError {
    pub name: String,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
