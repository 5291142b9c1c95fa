//! Rendering: decoding vector images and drawing them onto raster surfaces.

pub mod decode;
pub mod raster;

pub use decode::{decode_image, DecodedImage, PendingImage};
pub use raster::RasterSurface;
