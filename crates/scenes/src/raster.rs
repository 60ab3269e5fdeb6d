//! CPU rasterizer: a [`Surface`] over an RGBA8 buffer.
//!
//! Always available (no feature gate) so the PNG snapshot path and tests
//! share the same pixels. Shapes get a one-pixel soft edge; strokes thinner
//! than a pixel are drawn one pixel wide at reduced coverage. Text has no
//! font behind it and is drawn as one block per non-space character.

use constellation_core::color::Rgba;
use constellation_core::error::SceneError;
use constellation_core::seed::pixel_count;
use constellation_core::surface::Surface;
use glam::DVec2;

const GLYPH_ADVANCE: f64 = 7.0;
const GLYPH_SIZE: DVec2 = DVec2::new(5.0, 8.0);
const GLYPH_COVERAGE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    background: Rgba,
    pixels: Vec<u8>,
}

impl Raster {
    /// A raster filled with `background` (alpha forced to 1).
    ///
    /// Returns `SceneError::InvalidDimensions` for zero sizes or more than
    /// [`MAX_PIXELS`](constellation_core::seed::MAX_PIXELS) pixels.
    pub fn new(width: usize, height: usize, background: Rgba) -> Result<Self, SceneError> {
        let len = pixel_count(width, height)? * 4;
        let mut raster = Self {
            width,
            height,
            background: background.with_alpha(1.0),
            pixels: vec![0; len],
        };
        raster.clear();
        Ok(raster)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major RGBA8, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Source-over blend of `color` at `coverage` into pixel `(x, y)`.
    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        let a = (color.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        let src = [color.r, color.g, color.b];
        for (c, s) in src.iter().enumerate() {
            let dst = f64::from(self.pixels[i + c]) / 255.0;
            let out = s.clamp(0.0, 1.0) * a + dst * (1.0 - a);
            self.pixels[i + c] = (out * 255.0).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    /// Pixel index range covering `[lo, hi]` along an axis of `extent`.
    fn span(lo: f64, hi: f64, extent: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(extent);
        start.min(end)..end
    }

    /// Pixel-snapped rectangle.
    fn fill_rect(&mut self, min: DVec2, max: DVec2, color: Rgba, coverage: f64) {
        let (min, max) = (min.round(), max.round());
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                self.blend(x, y, color, coverage);
            }
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Raster {
    fn clear(&mut self) {
        let [r, g, b, a] = self.background.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, a]);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let reach = radius + 1.0;
        for y in Self::span(center.y - reach, center.y + reach, self.height) {
            for x in Self::span(center.x - reach, center.x + reach, self.width) {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Rgba) {
        if !(width.is_finite() && width > 0.0) {
            return;
        }
        let half = width.max(1.0) / 2.0;
        let thin = width.min(1.0);
        let reach = half + 1.0;
        let min = from.min(to) - DVec2::splat(reach);
        let max = from.max(to) + DVec2::splat(reach);
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = distance_to_segment(p, from, to);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0) * thin;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, at: DVec2, color: Rgba) {
        let count = text.chars().count() as f64;
        let mut origin = at - DVec2::new(count * GLYPH_ADVANCE / 2.0, GLYPH_SIZE.y / 2.0);
        for ch in text.chars() {
            if !ch.is_whitespace() {
                self.fill_rect(origin, origin + GLYPH_SIZE, color, GLYPH_COVERAGE);
            }
            origin.x += GLYPH_ADVANCE;
        }
    }
}
