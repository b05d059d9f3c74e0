//! Raster surface: the fixed-size RGBA buffer strokes accumulate on.
//!
//! The surface is the image that gets submitted for prediction, so it is kept
//! independent of the browser canvas: the DOM element only mirrors what is
//! drawn here. Strokes are composited as round-capped capsules, one per
//! segment, which gives round joins wherever consecutive segments meet.
//!
//! INVARIANT
//! =========
//! Every pixel's alpha is 255 at all times. After construction and after
//! [`Surface::clear`] every pixel equals [`BACKGROUND_RGBA`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    AA_FRINGE_PX, BACKGROUND_RGBA, MAX_SURFACE_EDGE_PX, MIN_STROKE_WIDTH_PX, STROKE_RGB, STROKE_WIDTH_PX,
};
use crate::viewport::Point;

/// Error returned by surface construction and encoding.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Width or height was zero.
    #[error("surface dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
    /// An edge exceeds [`MAX_SURFACE_EDGE_PX`].
    #[error("surface dimensions {width}x{height} exceed {max}px per edge", max = MAX_SURFACE_EDGE_PX)]
    TooLarge { width: u32, height: u32 },
    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// How strokes are painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in pixels. Caps and joins are always round.
    pub width: f64,
    /// Solid stroke colour.
    pub rgb: [u8; 3],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { width: STROKE_WIDTH_PX, rgb: STROKE_RGB }
    }
}

impl StrokeStyle {
    /// Style with the given width, clamped to [`MIN_STROKE_WIDTH_PX`].
    #[must_use]
    pub fn with_width(width: f64) -> Self {
        Self { width: width.max(MIN_STROKE_WIDTH_PX), ..Self::default() }
    }

    /// CSS colour string for the 2D context.
    #[must_use]
    pub fn css_color(&self) -> String {
        let [r, g, b] = self.rgb;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// One continuous path from pointer-down to pointer-up, in surface-local
/// coordinates.
///
/// Serializes as a bare array of points so recorded sketches stay readable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    #[must_use]
    pub fn starting_at(at: Point) -> Self {
        Self { points: vec![at] }
    }
}

/// Fixed-size opaque RGBA raster.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create an opaque white surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EmptyDimensions`] if either dimension is zero
    /// and [`SurfaceError::TooLarge`] if either exceeds [`MAX_SURFACE_EDGE_PX`].
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyDimensions { width, height });
        }
        if width > MAX_SURFACE_EDGE_PX || height > MAX_SURFACE_EDGE_PX {
            return Err(SurfaceError::TooLarge { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(SurfaceError::TooLarge { width, height })?;
        let pixels = BACKGROUND_RGBA.repeat(len);
        Ok(Self { width, height, pixels })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Repaint every pixel opaque white.
    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&BACKGROUND_RGBA);
        }
    }

    /// RGBA value at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Whether the surface holds no ink at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px == BACKGROUND_RGBA)
    }

    /// Number of pixels that differ from the background.
    #[must_use]
    pub fn ink_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| *px != BACKGROUND_RGBA).count()
    }

    /// Composite a round-capped segment from `from` to `to`.
    ///
    /// Pixels whose centre lies within `width / 2` of the segment are painted
    /// solid; a one-pixel fringe is blended for anti-aliasing. Segments that
    /// fall partly or wholly outside the surface are clipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let radius = style.width / 2.0;
        let reach = radius + AA_FRINGE_PX;
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);

        let x0 = (from.x.min(to.x) - reach).floor();
        let x1 = (from.x.max(to.x) + reach).ceil();
        let y0 = (from.y.min(to.y) - reach).floor();
        let y1 = (from.y.max(to.y) + reach).ceil();
        if x1 < 0.0 || y1 < 0.0 || x0 > max_x || y0 > max_y {
            return;
        }

        let (x0, x1) = (x0.max(0.0) as u32, x1.min(max_x) as u32);
        let (y0, y1) = (y0.max(0.0) as u32, y1.min(max_y) as u32);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let d = distance_to_segment(center, from, to);
                let coverage = (radius + AA_FRINGE_PX * 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, style.rgb, coverage);
                }
            }
        }
    }

    /// Encode as a lossless RGBA8 PNG.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] if the PNG writer fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(self.as_rgba())?;
            writer.finish()?;
        }
        Ok(out)
    }

    /// Encode as a `data:image/png;base64,...` URI.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] if the PNG writer fails.
    pub fn to_data_uri(&self) -> Result<String, SurfaceError> {
        Ok(protocol::data_uri::encode_png(&self.encode_png()?))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], coverage: f64) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        for (channel, target) in self.pixels[i..i + 3].iter_mut().zip(rgb) {
            let old = f64::from(*channel);
            let new = old + (f64::from(target) - old) * coverage;
            *channel = new.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = 255;
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
