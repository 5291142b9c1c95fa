//! Download targets for exported images.
//!
//! A sink receives the final PNG data URI together with the filename the
//! user should see, the same way a browser receives a synthetic download.

use crate::data_uri::DataUri;
use crate::{Error, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait DownloadSink: Send + Sync {
    /// Store `data` under `filename`. Returns the location written to, if
    /// the sink has one.
    fn deliver(&self, filename: &str, data: &DataUri) -> Result<Option<PathBuf>>;
}

/// Writes downloads into a directory, creating it on demand.
/// An existing file with the same name is overwritten.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, filename: &str, data: &DataUri) -> Result<Option<PathBuf>> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(Error::DownloadError(format!(
                "invalid download filename `{}`",
                filename
            )));
        }
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                Error::DownloadError(format!(
                    "failed to create {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
        }

        let path = self.dir.join(filename);
        fs::write(&path, data.bytes()).map_err(|e| {
            Error::DownloadError(format!("failed to write {}: {}", path.display(), e))
        })?;
        info!("saved {} ({} bytes)", path.display(), data.bytes().len());
        Ok(Some(path))
    }
}

/// A download captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub data: DataUri,
}

/// Keeps every download in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemorySink {
    downloads: Mutex<Vec<Download>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloads(&self) -> Vec<Download> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, filename: &str, data: &DataUri) -> Result<Option<PathBuf>> {
        self.downloads.lock().unwrap().push(Download {
            filename: filename.to_string(),
            data: data.clone(),
        });
        Ok(None)
    }
}
