//! Error types for the QR studio

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or exporting a QR symbol
#[derive(Error, Debug)]
pub enum Error {
    /// The content could not be encoded as a QR symbol
    #[error("QR encoding failed: {0}")]
    EncodeError(String),

    /// A data URI or its SVG payload could not be decoded
    #[error("Decode failed: {0}")]
    DecodeError(String),

    /// Failed to allocate, draw or encode the raster surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The download sink could not store the exported file
    #[error("Download failed: {0}")]
    DownloadError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
