// Core types shared by the scratch engine, the rasterizer and the compositor.

use crate::error::Error;
use serde::Deserialize;

/// A position in surface-local pixels (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Surface dimensions in pixels. Zero means "not laid out yet".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// True once both dimensions are known.
    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Pull a point into [0, width] x [0, height].
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.width as f32),
            p.y.clamp(0.0, self.height as f32),
        )
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Straight-alpha color packed as 0xAARRGGBB.
/// Config files spell it `#RRGGBB` (opaque) or `#AARRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }
    #[inline]
    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }
    #[inline]
    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }
    #[inline]
    pub fn b(self) -> u8 {
        self.0 as u8
    }

    /// Per-channel lerp in sRGB space; `t` = 0 gives `self`, 1 gives `other`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::argb(
            mix(self.a(), other.a()),
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
        )
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (the `#` is optional).
    pub fn parse(literal: &str) -> Result<Self, Error> {
        let hex = literal.trim().trim_start_matches('#');
        let bad = || Error::InvalidColor(literal.to_string());
        if !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let v = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
        match hex.len() {
            6 => Ok(Color(0xFF00_0000 | v)),
            8 => Ok(Color(v)),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

/// The picture the user finally sees: opaque pixels, 0x00RRGGBB for minifb.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn fill(&mut self, rgb: u32) {
        self.pixels.fill(rgb & 0x00FF_FFFF);
    }
}

/// Off-screen RGBA layer, straight alpha, 0xAARRGGBB per pixel.
/// The overlay lives here so "clear" erasure never touches what's beneath.
#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Layer {
    /// A fully transparent layer.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resize in place (contents become transparent).
    pub fn reset_to(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
        self.pixels.clear();
        self.pixels.resize(size.area(), 0);
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.0);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        Color(self.pixels[y * self.width + x])
    }

    /// Write a pixel if (x,y) is inside bounds.
    #[cfg(test)]
    pub(crate) fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.width + x] = color.0;
    }

    /// True if every pixel has alpha 0.
    #[cfg(test)]
    pub(crate) fn is_clear(&self) -> bool {
        self.pixels.iter().all(|p| p >> 24 == 0)
    }
}
