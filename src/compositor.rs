// Builds the visible overlay: painted content with every stroke punched out.

use crate::overlay::OverlayPainter;
use crate::raster::erase_path;
use crate::smooth::smooth;
use crate::stroke::Stroke;
use crate::types::{Layer, Size};

/// Two layers: the painted content (cached until size or content changes)
/// and the output, rebuilt from that cache on every render.
///
/// Strokes are replayed in full each time, so a render never depends on what
/// the previous one drew.
#[derive(Debug, Default)]
pub struct OverlayCompositor {
    content: Layer,
    content_valid: bool,
    output: Layer,
}

impl OverlayCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the painter to run again on the next render (new image, new colors).
    pub fn invalidate_content(&mut self) {
        self.content_valid = false;
    }

    /// Paint (if needed), copy, then erase every stroke with "clear" blending.
    pub fn render(&mut self, size: Size, strokes: &[Stroke], brush_size: f32, painter: &dyn OverlayPainter) -> &Layer {
        if !self.content_valid || self.content.size() != size {
            self.content.reset_to(size);
            painter.paint(&mut self.content);
            self.content_valid = true;
            tracing::debug!(width = size.width, height = size.height, "overlay content painted");
        }

        self.output.width = self.content.width;
        self.output.height = self.content.height;
        self.output.pixels.clone_from(&self.content.pixels);

        for stroke in strokes {
            if let Some(path) = smooth(stroke.points(), brush_size) {
                erase_path(&mut self.output, &path, brush_size);
            }
        }
        &self.output
    }

    /// The most recent render.
    pub fn layer(&self) -> &Layer {
        &self.output
    }
}
