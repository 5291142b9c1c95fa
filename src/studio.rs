//! The studio ties the generation request, the live preview and the
//! exporter together.
//!
//! Every setter re-renders the preview synchronously, so the preview always
//! reflects the current request. Export reads the preview it is handed
//! directly; nothing is looked up by identifier.

use crate::download::{DirectorySink, DownloadSink};
use crate::export::{ExportReport, RasterExporter};
use crate::notify::{LogNotifier, Notifier, SilentNotifier};
use crate::request::GenerationRequest;
use crate::symbol::{SymbolRenderer, VectorSymbol};
use crate::{Result, StudioConfig};
use log::warn;
use std::sync::Arc;

pub struct Studio {
    request: GenerationRequest,
    renderer: SymbolRenderer,
    exporter: RasterExporter,
    mounted: bool,
    preview: Option<VectorSymbol>,
    render_error: Option<String>,
}

impl Studio {
    pub fn new(request: GenerationRequest, renderer: SymbolRenderer, exporter: RasterExporter) -> Self {
        let mut studio = Self {
            request,
            renderer,
            exporter,
            mounted: true,
            preview: None,
            render_error: None,
        };
        studio.refresh();
        studio
    }

    /// Build a studio that saves downloads into `config.output_dir`.
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        let notifier: Arc<dyn Notifier> = if config.notify {
            Arc::new(LogNotifier)
        } else {
            Arc::new(SilentNotifier)
        };
        Self::with_targets(config, Arc::new(DirectorySink::new(config.output_dir.clone())), notifier)
    }

    /// Build a studio from `config` with caller-provided download and
    /// notification targets.
    pub fn with_targets(
        config: &StudioConfig,
        sink: Arc<dyn DownloadSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        config.validate()?;
        let request = GenerationRequest::new(
            config.content.clone(),
            config.foreground.clone(),
            config.background.clone(),
            config.size,
        );
        let renderer = SymbolRenderer::new().with_margin(config.margin);
        let exporter = RasterExporter::new(sink, notifier)
            .with_filename(config.filename.clone())
            .with_policy(config.in_flight);
        Ok(Self::new(request, renderer, exporter))
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// The mounted preview, if any.
    pub fn preview(&self) -> Option<&VectorSymbol> {
        self.preview.as_ref()
    }

    pub fn preview_svg(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.markup())
    }

    /// Why the last render produced no preview, if it failed.
    pub fn render_error(&self) -> Option<&str> {
        self.render_error.as_deref()
    }

    pub fn exporter(&self) -> &RasterExporter {
        &self.exporter
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.request.set_content(content);
        self.refresh();
    }

    pub fn set_foreground(&mut self, color: impl Into<String>) {
        self.request.set_foreground(color);
        self.refresh();
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.request.set_background(color);
        self.refresh();
    }

    pub fn set_size(&mut self, size: u32) {
        self.request.set_size(size);
        self.refresh();
    }

    /// Remove the preview. Exports become no-ops until [`Studio::mount`].
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.refresh();
    }

    pub fn mount(&mut self) {
        self.mounted = true;
        self.refresh();
    }

    /// Export the current preview at the current size.
    pub async fn download(&self) -> Result<Option<ExportReport>> {
        self.exporter
            .export_as_image(self.preview.as_ref(), self.request.size())
            .await
    }

    fn refresh(&mut self) {
        self.render_error = None;
        if !self.mounted {
            self.preview = None;
            return;
        }
        match self.renderer.render(&self.request) {
            Ok(symbol) => self.preview = Some(symbol),
            Err(e) => {
                warn!("preview not rendered: {}", e);
                self.render_error = Some(e.to_string());
                self.preview = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MemorySink;
    use crate::notify::RecordingNotifier;

    fn studio() -> (Studio, Arc<MemorySink>, Arc<RecordingNotifier>) {
        let sink = Arc::new(MemorySink::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let s = Studio::with_targets(&StudioConfig::default(), sink.clone(), notifier.clone())
            .unwrap();
        (s, sink, notifier)
    }

    #[test]
    fn setters_rerender_the_preview() {
        let (mut s, _, _) = studio();
        let before = s.preview().unwrap().clone();
        assert_eq!(before.size(), 256);

        s.set_size(384);
        assert_eq!(s.preview().unwrap().size(), 384);

        s.set_foreground("#ff0000");
        assert!(s.preview_svg().unwrap().contains("fill=\"#ff0000\""));

        s.set_background("transparent");
        assert!(s.preview_svg().unwrap().contains("fill=\"transparent\""));

        s.set_content("something else");
        assert_ne!(s.preview().unwrap().markup(), before.markup());
    }

    #[test]
    fn oversized_content_unmounts_preview() {
        let (mut s, _, _) = studio();
        s.set_content("x".repeat(4000));
        assert!(s.preview().is_none());
        assert!(s.render_error().unwrap().contains("QR encoding failed"));

        s.set_content("ok");
        assert!(s.preview().is_some());
        assert!(s.render_error().is_none());
    }

    #[tokio::test]
    async fn download_uses_current_size() {
        let (mut s, sink, _) = studio();
        s.set_size(448);
        let report = s.download().await.unwrap().unwrap();
        assert_eq!((report.width, report.height), (448, 448));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn unmounted_preview_downloads_nothing() {
        let (mut s, sink, notifier) = studio();
        s.unmount();
        assert!(s.preview().is_none());
        assert!(s.download().await.unwrap().is_none());
        assert!(sink.is_empty());
        assert!(notifier.notifications().is_empty());

        s.mount();
        assert!(s.download().await.unwrap().is_some());
    }
}
