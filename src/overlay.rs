// What the scratchable overlay looks like before any scratching.
//
// A painter fills a layer of exactly surface size. Painters know nothing about
// strokes or coverage; swapping one never touches the coverage engine.

use crate::types::{Color, Layer};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Fills the overlay layer. The layer arrives sized and fully transparent.
///
/// Painting must be deterministic for a given size: the compositor caches the
/// result and only repaints on resize or content change.
pub trait OverlayPainter {
    fn paint(&self, layer: &mut Layer);
}

/// One flat color over the whole surface.
#[derive(Clone, Copy, Debug)]
pub struct SolidPainter(pub Color);

impl OverlayPainter for SolidPainter {
    fn paint(&self, layer: &mut Layer) {
        layer.fill(self.0);
    }
}

/// A decoded image stretched (not cropped) to the surface bounds.
#[derive(Clone, Debug)]
pub struct ImagePainter {
    image: RgbaImage,
}

impl ImagePainter {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl OverlayPainter for ImagePainter {
    fn paint(&self, layer: &mut Layer) {
        let (w, h) = (layer.width as u32, layer.height as u32);
        if w == 0 || h == 0 || self.image.width() == 0 || self.image.height() == 0 {
            return;
        }
        let stretched;
        let src = if self.image.dimensions() == (w, h) {
            &self.image
        } else {
            stretched = imageops::resize(&self.image, w, h, FilterType::Triangle);
            &stretched
        };
        for (dst, px) in layer.pixels.iter_mut().zip(src.pixels()) {
            let [r, g, b, a] = px.0;
            *dst = Color::argb(a, r, g, b).0;
        }
    }
}

impl<P: OverlayPainter + ?Sized> OverlayPainter for Box<P> {
    fn paint(&self, layer: &mut Layer) {
        (**self).paint(layer)
    }
}
