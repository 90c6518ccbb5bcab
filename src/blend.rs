// Puts the overlay layer on top of the hidden content, in linear light.
// Visual: scratched holes show the prize underneath with clean edges, and the
// reveal dissolve fades the whole overlay without a muddy mid-tone dip.

use crate::error::{Error, Result};
use crate::types::{FrameBuffer, Layer};

/// sRGB <-> linear lookup tables so blending never calls powf per pixel.
pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1)
    to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255), index = (linear * 4095).round()
    to_srgb: [u8; 4096],
}

impl std::fmt::Debug for GammaLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GammaLut")
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    /// Build both tables once.
    pub fn new() -> Self {
        let mut to_linear = [0.0f32; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut to_srgb = [0u8; 4096];
        for (i, slot) in to_srgb.iter_mut().enumerate() {
            let l = i as f32 / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { to_linear, to_srgb }
    }

    #[inline]
    pub fn linear(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    pub fn srgb(&self, l: f32) -> u8 {
        self.to_srgb[(l.clamp(0.0, 1.0) * 4095.0).round() as usize]
    }

    /// Mix two sRGB channel values by `t` (0 = `under`, 1 = `over`) in linear light.
    #[inline]
    pub fn mix(&self, under: u8, over: u8, t: f32) -> u8 {
        self.srgb(self.linear(under) * (1.0 - t) + self.linear(over) * t)
    }
}

/// Write `content` with `overlay` drawn over it at `opacity` into `out`.
///
/// `overlay = None` (or opacity 0) shows the content untouched.
/// The overlay's own alpha is multiplied by `opacity`.
pub fn compose_over(
    content: &FrameBuffer,
    overlay: Option<&Layer>,
    opacity: f32,
    out: &mut FrameBuffer,
    lut: &GammaLut,
) -> Result<()> {
    let expected = (content.width, content.height);
    if (out.width, out.height) != expected {
        return Err(Error::SizeMismatch { expected, actual: (out.width, out.height) });
    }

    let opacity = opacity.clamp(0.0, 1.0);
    let overlay = match overlay {
        Some(layer) if opacity > 0.0 => layer,
        _ => {
            out.pixels.copy_from_slice(&content.pixels);
            return Ok(());
        }
    };
    if (overlay.width, overlay.height) != expected {
        return Err(Error::SizeMismatch { expected, actual: (overlay.width, overlay.height) });
    }

    for ((dst, &under), &over) in out.pixels.iter_mut().zip(&content.pixels).zip(&overlay.pixels) {
        let a = (over >> 24) as f32 / 255.0 * opacity;
        if a <= 0.0 {
            *dst = under & 0x00FF_FFFF; // visual: hole -> prize shows through
            continue;
        }
        if a >= 1.0 {
            *dst = over & 0x00FF_FFFF; // visual: untouched overlay
            continue;
        }
        let ch = |v: u32, shift: u32| ((v >> shift) & 0xFF) as u8;
        let r = lut.mix(ch(under, 16), ch(over, 16), a) as u32;
        let g = lut.mix(ch(under, 8), ch(over, 8), a) as u32;
        let b = lut.mix(ch(under, 0), ch(over, 0), a) as u32;
        *dst = (r << 16) | (g << 8) | b;
    }
    Ok(())
}
