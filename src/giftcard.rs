// Procedural "gift card" overlay: gradient, ribbon cross, bow, and stars.
// Visual outcomes:
// - A vertical gradient from `top_color` to `bottom_color`.
// - A ribbon band across and down the middle, like a wrapped present.
// - A two-loop bow sitting on the ribbon crossing.
// - Small twinkling stars scattered over the card (same layout every paint).

use crate::config::ScratchConfig;
use crate::overlay::OverlayPainter;
use crate::raster::{add_glow, fill_ellipse, fill_rect, fill_vertical_gradient};
use crate::types::{Color, Layer, Point};

const DEFAULT_TOP: Color = Color::rgb(0xC9, 0xCC, 0xD3);
const DEFAULT_BOTTOM: Color = Color::rgb(0x8E, 0x93, 0x9C);
const DEFAULT_RIBBON: Color = Color::rgb(0xD6, 0x2F, 0x4B);
const DEFAULT_BOW: Color = Color::rgb(0xF2, 0x4E, 0x6A);
const STAR_COLOR: Color = Color::rgb(255, 236, 170);
const STAR_SEED: u32 = 0x5C2A_7C4D;

// ----------------------------- tiny RNG (no external crate) -----------------------------

/// Deterministic xorshift32, so stars land in the same place on every repaint.
#[derive(Clone)]
struct Rng32 {
    state: u32,
}

impl Rng32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
    #[inline]
    fn next_f32(&mut self) -> f32 {
        // Uniform [0,1)
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }
    #[inline]
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

// ----------------------------- painter ------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct GiftCardPainter {
    pub top: Color,
    pub bottom: Color,
    pub ribbon: Color,
    pub bow: Color,
}

impl Default for GiftCardPainter {
    fn default() -> Self {
        Self { top: DEFAULT_TOP, bottom: DEFAULT_BOTTOM, ribbon: DEFAULT_RIBBON, bow: DEFAULT_BOW }
    }
}

impl GiftCardPainter {
    /// Colors from config; `color` stands in for a missing gradient end.
    pub fn from_config(cfg: &ScratchConfig) -> Self {
        let d = Self::default();
        Self {
            top: cfg.top_color.or(cfg.color).unwrap_or(d.top),
            bottom: cfg.bottom_color.or(cfg.color).unwrap_or(d.bottom),
            ribbon: cfg.ribbon_color.unwrap_or(d.ribbon),
            bow: cfg.bow_color.unwrap_or(d.bow),
        }
    }

    fn paint_ribbon(&self, layer: &mut Layer, band: u32) {
        let (w, h) = (layer.width as i32, layer.height as i32);
        let half = band as i32 / 2;
        fill_rect(layer, 0, h / 2 - half, w as u32, band, self.ribbon);
        fill_rect(layer, w / 2 - half, 0, band, h as u32, self.ribbon);
    }

    /// Two loops leaning out from the crossing plus a round knot.
    fn paint_bow(&self, layer: &mut Layer, band: f32) {
        let c = Point::new(layer.width as f32 * 0.5, layer.height as f32 * 0.5);
        let loop_rx = band * 1.3;
        let loop_ry = band * 0.8;
        let inner = self.bow.lerp(Color::rgb(0, 0, 0), 0.25);
        for side in [-1.0f32, 1.0] {
            let lc = Point::new(c.x + side * loop_rx * 0.9, c.y - loop_ry * 0.3);
            fill_ellipse(layer, lc, loop_rx, loop_ry, self.bow);
            fill_ellipse(layer, lc, loop_rx * 0.45, loop_ry * 0.4, inner);
        }
        fill_ellipse(layer, c, band * 0.5, band * 0.5, self.bow);
    }

    /// Sparkles: a soft glow with a thin bright cross through it.
    fn paint_stars(&self, layer: &mut Layer) {
        let (w, h) = (layer.width as f32, layer.height as f32);
        let count = ((w * h) / 4000.0).clamp(4.0, 120.0) as usize;
        let mut rng = Rng32::from_seed(STAR_SEED);
        for _ in 0..count {
            let p = Point::new(rng.range(0.0, w), rng.range(0.0, h));
            let r = rng.range(2.0, 5.0);
            let strength = rng.range(0.35, 0.8);
            add_glow(layer, p, r * 1.8, STAR_COLOR, strength);
            let arm = r.round() as i32;
            let (x, y) = (p.x as i32, p.y as i32);
            fill_rect(layer, x - arm, y, (2 * arm + 1) as u32, 1, STAR_COLOR);
            fill_rect(layer, x, y - arm, 1, (2 * arm + 1) as u32, STAR_COLOR);
        }
    }
}

impl OverlayPainter for GiftCardPainter {
    fn paint(&self, layer: &mut Layer) {
        if layer.width == 0 || layer.height == 0 {
            return;
        }
        let band = (layer.width.min(layer.height) as f32 * 0.12).max(2.0);
        fill_vertical_gradient(layer, self.top, self.bottom);
        self.paint_stars(layer);
        self.paint_ribbon(layer, band as u32);
        self.paint_bow(layer, band);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paints_fully_opaque_and_repeatable() {
        let painter = GiftCardPainter::default();
        let mut a = Layer::new(120, 80);
        let mut b = Layer::new(120, 80);
        painter.paint(&mut a);
        painter.paint(&mut b);
        assert!(a.pixels.iter().all(|&p| p >> 24 == 0xFF));
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_ribbon_crosses_center() {
        let painter = GiftCardPainter {
            top: Color::rgb(0, 0, 0),
            bottom: Color::rgb(0, 0, 0),
            ribbon: Color::rgb(255, 0, 0),
            bow: Color::rgb(0, 0, 255),
        };
        let mut l = Layer::new(200, 200);
        painter.paint(&mut l);
        // Ribbon on the left edge at mid-height, bow knot at the center.
        assert_eq!(l.get(1, 100).r(), 255);
        assert_eq!(l.get(100, 100), Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_config_colors_fall_back() {
        let cfg = ScratchConfig { color: Some(Color::rgb(9, 9, 9)), ..ScratchConfig::default() };
        let p = GiftCardPainter::from_config(&cfg);
        assert_eq!(p.top, Color::rgb(9, 9, 9));
        assert_eq!(p.bottom, Color::rgb(9, 9, 9));
        assert_eq!(p.ribbon, DEFAULT_RIBBON);
    }
}
