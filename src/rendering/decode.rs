//! Asynchronous SVG decoding.
//!
//! Decoding runs on a short-lived worker thread that owns the payload and
//! reports back on a oneshot channel, so the caller's task is suspended (not
//! blocked) until the image is ready.

use crate::data_uri::{DataUri, SVG_MIME};
use crate::{Error, Result};
use log::{debug, warn};
use resvg::usvg;
use std::thread;
use tokio::sync::oneshot;

/// A parsed vector image ready to be drawn.
pub struct DecodedImage {
    tree: usvg::Tree,
}

impl DecodedImage {
    /// Intrinsic width in pixels, from the root element's `width`.
    pub(crate) fn width(&self) -> f32 {
        self.tree.size().width()
    }

    pub(crate) fn height(&self) -> f32 {
        self.tree.size().height()
    }

    pub(crate) fn tree(&self) -> &usvg::Tree {
        &self.tree
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Handle for an in-progress decode. Resolves exactly once.
pub struct PendingImage {
    rx: oneshot::Receiver<Result<DecodedImage>>,
}

impl PendingImage {
    /// Wait for the decode to finish.
    pub async fn wait(self) -> Result<DecodedImage> {
        self.rx
            .await
            .map_err(|e| Error::Other(format!("Decode canceled: {}", e)))?
    }
}

/// Start decoding `src`, a base64 `image/svg+xml` data URI.
pub fn decode_image(src: String) -> PendingImage {
    let (tx, rx) = oneshot::channel();

    let spawned = thread::Builder::new()
        .name("qr-decode".into())
        .spawn(move || {
            let res = decode_blocking(&src);
            // Receiver may have been dropped; nothing to resume then
            let _ = tx.send(res);
        });
    if let Err(e) = spawned {
        // The sender went down with the closure, so `wait` reports cancelation
        warn!("Failed to spawn decode worker: {}", e);
    }

    PendingImage { rx }
}

fn decode_blocking(src: &str) -> Result<DecodedImage> {
    let uri = DataUri::parse(src)?;
    if uri.mime() != SVG_MIME {
        return Err(Error::DecodeError(format!(
            "expected {}, got {}",
            SVG_MIME,
            uri.mime()
        )));
    }

    let tree = usvg::Tree::from_data(uri.bytes(), &usvg::Options::default())
        .map_err(|e| Error::DecodeError(format!("invalid SVG: {}", e)))?;
    debug!(
        "decoded {} byte SVG ({}x{})",
        uri.bytes().len(),
        tree.size().width(),
        tree.size().height()
    );
    Ok(DecodedImage { tree })
}
