//! Offscreen raster surface backed by a `tiny_skia` pixmap.

use crate::rendering::DecodedImage;
use crate::{Error, Result};
use resvg::tiny_skia::{Pixmap, Transform};

pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Allocate a fully transparent `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::RenderError(format!("cannot allocate {}x{} surface", width, height))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Draw `image` at the origin at its intrinsic size. Anything outside
    /// the surface is clipped.
    pub fn draw_image(&mut self, image: &DecodedImage) {
        resvg::render(image.tree(), Transform::identity(), &mut self.pixmap.as_mut());
    }

    /// Straight (non-premultiplied) RGBA at (`x`, `y`), `None` outside the
    /// surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // Pixmap::pixel only bounds-checks the flat index, so a column past
        // the edge would wrap into the next row
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
