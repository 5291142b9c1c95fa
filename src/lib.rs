//! QR Studio
//!
//! Renders QR codes as vector previews and exports them as PNG files.
//!
//! # Features
//!
//! - **Live preview**: every change to the [`GenerationRequest`] re-renders an
//!   SVG symbol (error-correction level H, no margin)
//! - **Raster export**: the preview is decoded off-task and drawn, unscaled,
//!   onto a `size` x `size` surface, then delivered as `qrcode.png`
//! - **Pluggable targets**: downloads go to a [`download::DownloadSink`] and
//!   confirmations to a [`notify::Notifier`]
//!
//! # Example
//!
//! ```no_run
//! use qrstudio::{Studio, StudioConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig {
//!     content: "https://www.rust-lang.org".to_string(),
//!     size: 384,
//!     ..Default::default()
//! };
//!
//! let mut studio = Studio::from_config(&config)?;
//! studio.set_foreground("#1e3a8a");
//! if let Some(report) = studio.download().await? {
//!     println!("saved {:?}", report.location);
//! }
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod data_uri;
pub mod download;
pub mod export;
pub mod notify;
pub mod rendering;
pub mod request;
pub mod studio;
pub mod symbol;

pub use data_uri::DataUri;
pub use export::{ExportReport, InFlightPolicy, RasterExporter, EXPORT_FILENAME};
pub use request::GenerationRequest;
pub use studio::Studio;
pub use symbol::{SymbolRenderer, VectorSymbol};

/// Configuration for a [`Studio`]
///
/// Defaults reproduce the initial form state: the placeholder URL in black
/// on white at 256px, saved as `qrcode.png` in the working directory.
/// Any field may be omitted from a JSON config file.
///
/// # Examples
///
/// ```
/// let cfg = qrstudio::StudioConfig::default();
/// assert_eq!(cfg.size, 256);
/// assert_eq!(cfg.filename, "qrcode.png");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Text to encode
    pub content: String,
    /// Module color, passed through to the SVG verbatim
    pub foreground: String,
    /// Background color, passed through to the SVG verbatim
    pub background: String,
    /// Output width and height in pixels (128..=512, steps of 64)
    pub size: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: usize,
    /// Name of the downloaded file
    pub filename: String,
    /// Directory downloads are written to
    pub output_dir: PathBuf,
    /// Whether to emit a confirmation after each download
    pub notify: bool,
    /// Behavior when an export is requested while one is running
    pub in_flight: InFlightPolicy,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            content: request::DEFAULT_CONTENT.to_string(),
            foreground: request::DEFAULT_FOREGROUND.to_string(),
            background: request::DEFAULT_BACKGROUND.to_string(),
            size: request::DEFAULT_SIZE,
            margin: 0,
            filename: EXPORT_FILENAME.to_string(),
            output_dir: PathBuf::from("."),
            notify: true,
            in_flight: InFlightPolicy::default(),
        }
    }
}

impl StudioConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !request::allowed_sizes().any(|s| s == self.size) {
            return Err(Error::ConfigError(format!(
                "size must be one of {}..={} in steps of {}, got {}",
                request::MIN_SIZE,
                request::MAX_SIZE,
                request::SIZE_STEP,
                self.size
            )));
        }
        if self.filename.is_empty() {
            return Err(Error::ConfigError("filename must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.content, "https://example.com");
        assert_eq!(config.foreground, "#000000");
        assert_eq!(config.background, "#ffffff");
        assert_eq!(config.size, 256);
        assert_eq!(config.margin, 0);
        assert!(config.notify);
        assert_eq!(config.in_flight, InFlightPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let config =
            StudioConfig::from_json_str(r#"{"size": 512, "foreground": "navy", "in_flight": "allow"}"#)
                .unwrap();
        assert_eq!(config.size, 512);
        assert_eq!(config.foreground, "navy");
        assert_eq!(config.background, "#ffffff");
        assert_eq!(config.in_flight, InFlightPolicy::Allow);
    }

    #[test]
    fn test_invalid_config() {
        for json in [
            r#"{"size": 100}"#,
            r#"{"size": 300}"#,
            r#"{"filename": ""}"#,
            r#"{"colour": "red"}"#,
            r#"{"size": "big"}"#,
        ] {
            let err = StudioConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, Error::ConfigError(_)), "accepted {}", json);
        }
    }
}
