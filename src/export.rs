//! Raster exporter: vector preview in, downloaded PNG out.
//!
//! One call to [`RasterExporter::export_as_image`] runs one export job:
//! serialize the symbol, wrap it in an SVG data URI, allocate a
//! `size` x `size` surface, decode (the only suspension point), draw at the
//! origin, encode PNG, hand it to the download sink and notify the user.

use crate::data_uri::DataUri;
use crate::download::DownloadSink;
use crate::notify::{Notification, Notifier};
use crate::rendering::{decode_image, DecodedImage, RasterSurface};
use crate::symbol::VectorSymbol;
use crate::Result;
use log::{debug, info, warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Filename every export is delivered under.
pub const EXPORT_FILENAME: &str = "qrcode.png";

/// What to do when an export is requested while another is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InFlightPolicy {
    /// Skip the new request (logged, no download).
    #[default]
    Reject,
    /// Run both; each delivers its own download.
    Allow,
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded PNG in bytes
    pub png_len: usize,
    /// Hex SHA-256 of the encoded PNG
    pub sha256: String,
    /// Where the sink stored the file, if it stores files
    pub location: Option<PathBuf>,
}

/// State for a single export. Owned by one call, never shared.
struct RasterExportJob {
    svg_uri: String,
    surface: RasterSurface,
}

impl RasterExportJob {
    fn new(symbol: &VectorSymbol, size: u32) -> Result<Self> {
        let markup = symbol.markup();
        let svg_uri = DataUri::svg(markup).to_string();
        let surface = RasterSurface::new(size, size)?;
        debug!(
            "export job: {} bytes of markup, {} byte data URI, {}x{} surface",
            markup.len(),
            svg_uri.len(),
            size,
            size
        );
        Ok(Self { svg_uri, surface })
    }

    fn draw(&mut self, image: &DecodedImage) {
        self.surface.draw_image(image);
    }

    fn encode(&self) -> Result<DataUri> {
        Ok(DataUri::png(self.surface.encode_png()?))
    }
}

/// Clears the in-flight flag when the claiming job ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RasterExporter {
    sink: Arc<dyn DownloadSink>,
    notifier: Arc<dyn Notifier>,
    filename: String,
    policy: InFlightPolicy,
    in_flight: AtomicBool,
}

impl RasterExporter {
    pub fn new(sink: Arc<dyn DownloadSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sink,
            notifier,
            filename: EXPORT_FILENAME.to_string(),
            policy: InFlightPolicy::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_policy(mut self, policy: InFlightPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn policy(&self) -> InFlightPolicy {
        self.policy
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether an export claimed under [`InFlightPolicy::Reject`] is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Export `source` as a `size` x `size` PNG.
    ///
    /// Returns `Ok(None)` without downloading or notifying when there is no
    /// source, or when another export is running and the policy is
    /// [`InFlightPolicy::Reject`].
    pub async fn export_as_image(
        &self,
        source: Option<&VectorSymbol>,
        size: u32,
    ) -> Result<Option<ExportReport>> {
        let Some(symbol) = source else {
            debug!("no vector symbol mounted; export skipped");
            return Ok(None);
        };

        let _claim = match self.policy {
            InFlightPolicy::Reject => match self.claim() {
                Some(claim) => Some(claim),
                None => {
                    warn!("export already in progress; request ignored");
                    return Ok(None);
                }
            },
            InFlightPolicy::Allow => None,
        };

        let mut job = RasterExportJob::new(symbol, size)?;
        let image = decode_image(job.svg_uri.clone()).wait().await?;
        if image.width() != size as f32 || image.height() != size as f32 {
            warn!(
                "decoded image is {}x{} but surface is {}x{}; drawing unscaled",
                image.width(),
                image.height(),
                size,
                size
            );
        }
        job.draw(&image);
        let png = job.encode()?;

        let report = ExportReport {
            filename: self.filename.clone(),
            width: job.surface.width(),
            height: job.surface.height(),
            png_len: png.bytes().len(),
            sha256: hex::encode(Sha256::digest(png.bytes())),
            location: None,
        };

        let location = self.sink.deliver(&self.filename, &png)?;
        self.notifier.notify(&Notification::downloaded());
        info!(
            "exported {} ({}x{}, {} bytes)",
            report.filename, report.width, report.height, report.png_len
        );

        Ok(Some(ExportReport { location, ..report }))
    }

    fn claim(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MemorySink;
    use crate::notify::RecordingNotifier;
    use crate::request::GenerationRequest;
    use crate::symbol::SymbolRenderer;

    fn exporter() -> (RasterExporter, Arc<MemorySink>, Arc<RecordingNotifier>) {
        let sink = Arc::new(MemorySink::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ex = RasterExporter::new(sink.clone(), notifier.clone());
        (ex, sink, notifier)
    }

    fn symbol(size: u32) -> VectorSymbol {
        let req = GenerationRequest::new("TEST", "#000000", "#ffffff", size);
        SymbolRenderer::new().render(&req).unwrap()
    }

    #[tokio::test]
    async fn export_delivers_png_and_notifies() {
        let (ex, sink, notifier) = exporter();
        let sym = symbol(256);
        let report = ex.export_as_image(Some(&sym), 256).await.unwrap().unwrap();

        assert_eq!(report.filename, "qrcode.png");
        assert_eq!((report.width, report.height), (256, 256));
        assert_eq!(report.sha256.len(), 64);
        assert!(report.location.is_none());

        let downloads = sink.downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].filename, "qrcode.png");
        assert_eq!(downloads[0].data.mime(), "image/png");
        assert_eq!(downloads[0].data.bytes().len(), report.png_len);
        assert_eq!(notifier.notifications(), vec![Notification::downloaded()]);
        assert!(!ex.is_busy());
    }

    #[tokio::test]
    async fn missing_source_is_a_silent_noop() {
        let (ex, sink, notifier) = exporter();
        let res = ex.export_as_image(None, 256).await.unwrap();
        assert!(res.is_none());
        assert!(sink.is_empty());
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn reject_policy_skips_while_busy() {
        let (ex, sink, notifier) = exporter();
        assert_eq!(ex.policy(), InFlightPolicy::Reject);
        let sym = symbol(128);

        let claim = ex.claim().unwrap();
        assert!(ex.is_busy());
        assert!(ex.export_as_image(Some(&sym), 128).await.unwrap().is_none());
        assert!(sink.is_empty());
        assert!(notifier.notifications().is_empty());

        drop(claim);
        assert!(!ex.is_busy());
        assert!(ex.export_as_image(Some(&sym), 128).await.unwrap().is_some());
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn allow_policy_runs_overlapping_jobs() {
        let (ex, sink, notifier) = exporter();
        let ex = ex.with_policy(InFlightPolicy::Allow);
        let a = symbol(128);
        let b = symbol(192);

        let (ra, rb) = tokio::join!(
            ex.export_as_image(Some(&a), 128),
            ex.export_as_image(Some(&b), 192)
        );
        assert_eq!(ra.unwrap().unwrap().width, 128);
        assert_eq!(rb.unwrap().unwrap().width, 192);
        assert_eq!(sink.len(), 2);
        assert_eq!(notifier.notifications().len(), 2);
    }

    #[tokio::test]
    async fn claim_is_released_after_a_failed_job() {
        let (ex, sink, _) = exporter();
        let sym = symbol(128);
        let err = ex.export_as_image(Some(&sym), 0).await.unwrap_err();
        assert!(matches!(err, crate::Error::RenderError(_)));
        assert!(!ex.is_busy());
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn mismatched_size_draws_unscaled() {
        let (ex, sink, _) = exporter();
        let report = ex.export_as_image(Some(&symbol(128)), 192).await.unwrap().unwrap();
        assert_eq!((report.width, report.height), (192, 192));

        let png = sink.downloads().remove(0).data.into_bytes();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        // Beyond the symbol's own 128px the surface stays untouched
        assert_eq!(img.get_pixel(191, 191).0[3], 0);
        assert_eq!(img.get_pixel(130, 5).0[3], 0);
    }

    #[tokio::test]
    async fn custom_filename_is_used() {
        let (ex, sink, _) = exporter();
        let ex = ex.with_filename("badge.png");
        ex.export_as_image(Some(&symbol(128)), 128).await.unwrap();
        assert_eq!(sink.downloads()[0].filename, "badge.png");
    }
}
