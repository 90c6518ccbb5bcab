// Software rasterizer for the overlay layer.
// Visual effects provided here:
// 1) "Clear" erasure: discs and round-capped segments punch fully transparent
//    holes into a Layer (alpha -> 0), never blending with what's beneath.
// 2) Simple fills the overlay painters use (gradients, rects, ellipses, glows).
//
// A pixel is covered when its *center* (x+0.5, y+0.5) lies inside the shape.

use crate::smooth::SmoothPath;
use crate::types::{Color, Layer, Point};

/// Max pixel step when flattening smoothed curves for erasure.
pub const FLATTEN_TOLERANCE: f32 = 1.0;

/* ---------- Erasure ---------- */

/// Punch a filled disc out of the layer.
/// Visual: a round transparent hole; a single tap looks like this.
pub fn erase_disc(layer: &mut Layer, center: Point, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    for_pixels_in(layer, center.x - radius, center.y - radius, center.x + radius, center.y + radius, |px, py| {
        let dx = px - center.x;
        let dy = py - center.y;
        dx * dx + dy * dy <= r2
    });
}

/// Punch a capsule (segment with round caps) of half-width `radius`.
/// Visual: one straight piece of a scratch line.
pub fn erase_segment(layer: &mut Layer, a: Point, b: Point, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let (x0, x1) = (a.x.min(b.x) - radius, a.x.max(b.x) + radius);
    let (y0, y1) = (a.y.min(b.y) - radius, a.y.max(b.y) + radius);
    for_pixels_in(layer, x0, y0, x1, y1, |px, py| dist2_to_segment(px, py, a, b) <= r2);
}

/// Erase along a polyline. Consecutive capsules share their round caps, which
/// gives round joins for free.
pub fn erase_polyline(layer: &mut Layer, points: &[Point], radius: f32) {
    match points {
        [] => {}
        [only] => erase_disc(layer, *only, radius),
        _ => {
            for pair in points.windows(2) {
                erase_segment(layer, pair[0], pair[1], radius);
            }
        }
    }
}

/// Erase one smoothed stroke with a brush of `brush_size` (= stroke width).
pub fn erase_path(layer: &mut Layer, path: &SmoothPath, brush_size: f32) {
    match path {
        SmoothPath::Dot { center, radius } => erase_disc(layer, *center, *radius),
        SmoothPath::Curve { .. } => {
            let flat = path.flatten(FLATTEN_TOLERANCE);
            erase_polyline(layer, &flat, brush_size * 0.5);
        }
    }
}

/// Squared distance from (px,py) to segment ab.
#[inline]
fn dist2_to_segment(px: f32, py: f32, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((px - a.x) * abx + (py - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.x + abx * t - px;
    let cy = a.y + aby * t - py;
    cx * cx + cy * cy
}

/// Visit pixels whose centers fall in the (clipped) box and clear the ones
/// `inside` accepts.
fn for_pixels_in(layer: &mut Layer, x0: f32, y0: f32, x1: f32, y1: f32, inside: impl Fn(f32, f32) -> bool) {
    let Some((xs, xe, ys, ye)) = clip_box(layer, x0, y0, x1, y1) else {
        return;
    };
    let w = layer.width;
    for y in ys..=ye {
        let row = y * w;
        let py = y as f32 + 0.5;
        for x in xs..=xe {
            if inside(x as f32 + 0.5, py) {
                layer.pixels[row + x] = Color::TRANSPARENT.0;
            }
        }
    }
}

/// Integer pixel range covering [x0,x1] x [y0,y1], clipped to the layer.
fn clip_box(layer: &Layer, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(usize, usize, usize, usize)> {
    if layer.width == 0 || layer.height == 0 || x1 < 0.0 || y1 < 0.0 {
        return None;
    }
    let xs = x0.floor().max(0.0) as usize;
    let ys = y0.floor().max(0.0) as usize;
    let xe = (x1.ceil().max(0.0) as usize).min(layer.width - 1);
    let ye = (y1.ceil().max(0.0) as usize).min(layer.height - 1);
    if xs > xe || ys > ye {
        return None;
    }
    Some((xs, xe, ys, ye))
}

/* ---------- Fills used by overlay painters ---------- */

/// Top-to-bottom linear gradient over the whole layer.
pub fn fill_vertical_gradient(layer: &mut Layer, top: Color, bottom: Color) {
    let h = layer.height;
    let w = layer.width;
    for y in 0..h {
        let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
        let c = top.lerp(bottom, t).0;
        layer.pixels[y * w..(y + 1) * w].fill(c);
    }
}

/// Opaque axis-aligned rectangle (clipped).
pub fn fill_rect(layer: &mut Layer, x: i32, y: i32, w: u32, h: u32, color: Color) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = ((x as i64 + w as i64).max(0) as usize).min(layer.width);
    let y1 = ((y as i64 + h as i64).max(0) as usize).min(layer.height);
    for yy in y0..y1 {
        let row = yy * layer.width;
        layer.pixels[row + x0.min(x1)..row + x1].fill(color.0);
    }
}

/// Opaque ellipse centered at `c` with radii (rx, ry).
pub fn fill_ellipse(layer: &mut Layer, c: Point, rx: f32, ry: f32, color: Color) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let Some((xs, xe, ys, ye)) = clip_box(layer, c.x - rx, c.y - ry, c.x + rx, c.y + ry) else {
        return;
    };
    for y in ys..=ye {
        let ny = (y as f32 + 0.5 - c.y) / ry;
        for x in xs..=xe {
            let nx = (x as f32 + 0.5 - c.x) / rx;
            if nx * nx + ny * ny <= 1.0 {
                layer.pixels[y * layer.width + x] = color.0;
            }
        }
    }
}

/// Additive glow: a soft disc of light that brightens the layer's RGB and
/// leaves alpha alone.
/// Visual: a fuzzy dot, brightest at the center, fading to nothing at `radius`.
pub fn add_glow(layer: &mut Layer, c: Point, radius: f32, color: Color, strength: f32) {
    if radius <= 0.0 || strength <= 0.0 {
        return;
    }
    let r2 = radius * radius;
    let sigma = radius * 0.5; // softness; smaller = sharper edge
    let denom = 2.0 * sigma * sigma;
    let Some((xs, xe, ys, ye)) = clip_box(layer, c.x - radius, c.y - radius, c.x + radius, c.y + radius) else {
        return;
    };
    for y in ys..=ye {
        for x in xs..=xe {
            let dx = x as f32 + 0.5 - c.x;
            let dy = y as f32 + 0.5 - c.y;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 {
                continue;
            }
            // Gaussian falloff: 1.0 at center -> ~0 at edge
            let w = (-d2 / denom).exp() * strength;
            let idx = y * layer.width + x;
            let old = Color(layer.pixels[idx]);
            let add = |base: u8, light: u8| (base as f32 + light as f32 * w).round().min(255.0) as u8;
            layer.pixels[idx] =
                Color::argb(old.a(), add(old.r(), color.r()), add(old.g(), color.g()), add(old.b(), color.b())).0;
        }
    }
}
