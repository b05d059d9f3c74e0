//! Handwritten-digit sketch pad.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but its core
//! builds natively too. It owns the drawing surface: translating raw pointer
//! input into strokes, rasterising them onto an opaque white RGBA buffer,
//! encoding that buffer as a PNG data URI, and tracking the result panel
//! through a predict round trip. The `browser` feature adds the DOM binding
//! that wires page elements and the HTTP endpoint to the engine.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`surface`] | RGBA raster, stroke compositing, PNG export |
//! | [`input`] | Pointer event types and the drawing state machine |
//! | [`viewport`] | Points and client-to-surface coordinate mapping |
//! | [`render`] | Mirrors engine actions onto a 2D canvas context |
//! | [`config`] | Widget settings (endpoint, size, stroke width) |
//! | [`consts`] | Shared numeric constants (surface size, stroke width, colours) |
//! | `widget` | DOM listeners and the fetch round trip (`browser` feature) |

pub mod config;
pub mod consts;
pub mod engine;
pub mod input;
pub mod render;
pub mod surface;
pub mod viewport;
#[cfg(feature = "browser")]
pub mod widget;

pub use config::WidgetConfig;
pub use engine::{Action, EngineCore, ResultPanel};
pub use surface::{Stroke, StrokeStyle, Surface, SurfaceError};
pub use viewport::Point;
