//! Shared numeric constants for the canvas crate.

// ── Surface ─────────────────────────────────────────────────────

/// Default surface width in pixels.
pub const SURFACE_WIDTH: u32 = 280;

/// Default surface height in pixels.
pub const SURFACE_HEIGHT: u32 = 280;

/// Largest accepted surface edge in pixels.
pub const MAX_SURFACE_EDGE_PX: u32 = 4096;

/// Opaque white, the background after init and every clear.
pub const BACKGROUND_RGBA: [u8; 4] = [255, 255, 255, 255];

/// CSS form of [`BACKGROUND_RGBA`] for the 2D context.
pub const BACKGROUND_CSS: &str = "#ffffff";

// ── Stroke ──────────────────────────────────────────────────────

/// Default stroke width. Thick strokes resemble MNIST digits after downscaling.
pub const STROKE_WIDTH_PX: f64 = 20.0;

/// Smallest stroke width accepted from configuration.
pub const MIN_STROKE_WIDTH_PX: f64 = 1.0;

/// Stroke colour (solid black).
pub const STROKE_RGB: [u8; 3] = [0, 0, 0];

/// Width of the anti-aliased fringe around a stroke, in pixels.
pub const AA_FRINGE_PX: f64 = 1.0;
