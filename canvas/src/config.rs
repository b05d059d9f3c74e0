//! Widget configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{SURFACE_HEIGHT, SURFACE_WIDTH, STROKE_WIDTH_PX};
use crate::surface::StrokeStyle;

/// Settings for a mounted sketch widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// URL the predict request is POSTed to. Relative URLs resolve against the page.
    pub endpoint: String,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Model sent when the selection control is empty.
    pub default_model: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint: protocol::PREDICT_PATH.to_owned(),
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            stroke_width: STROKE_WIDTH_PX,
            default_model: protocol::DEFAULT_MODEL.to_owned(),
        }
    }
}

impl WidgetConfig {
    /// Override the endpoint, ignoring blank values.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Option<&str>) -> Self {
        if let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            endpoint.clone_into(&mut self.endpoint);
        }
        self
    }

    /// Override the stroke width, ignoring missing, non-finite, and
    /// non-positive values.
    #[must_use]
    pub fn with_stroke_width(mut self, width: Option<f64>) -> Self {
        if let Some(width) = width.filter(|w| w.is_finite() && *w > 0.0) {
            self.stroke_width = width;
        }
        self
    }

    /// Stroke style derived from `stroke_width`.
    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::with_width(self.stroke_width)
    }

    /// The model to send for a selection control value.
    #[must_use]
    pub fn resolve_model<'a>(&'a self, selected: &'a str) -> &'a str {
        let selected = selected.trim();
        if selected.is_empty() { &self.default_model } else { selected }
    }
}
