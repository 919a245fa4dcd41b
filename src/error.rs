//! Error types for post sessions, rendering and export

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing or exporting a post
#[derive(Error, Debug)]
pub enum Error {
    /// Platform identifier has no catalog entry
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Template id is not offered by the active platform
    #[error("Unknown template for {platform}: {template}")]
    UnknownTemplate { platform: String, template: String },

    /// Theme name is not allowed for the active platform
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Font family is not in the catalog
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    /// Form field name is not recognised
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Image slot name is not recognised
    #[error("Unknown image slot: {0}")]
    UnknownSlot(String),

    /// No platform/template is active, so there is no preview to export
    #[error("Nothing to render: no template selected")]
    NothingToRender,

    /// Uploaded bytes could not be decoded into an image
    #[error("Failed to decode image: {0}")]
    ImageDecodeError(String),

    /// Rasterizing or encoding the preview failed
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Another export has not finished yet
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error (consent store, saving exports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageDecodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
