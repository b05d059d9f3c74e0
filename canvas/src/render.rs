//! Rendering: mirrors engine actions onto a 2D context.
//!
//! Every draw call on the [`web_sys::CanvasRenderingContext2d`] goes through here.
//! The raster in [`crate::surface::Surface`] is what gets submitted; the
//! browser canvas only has to look the same, so each segment is stroked as
//! its own round-capped path exactly as the surface composites it.

use web_sys::CanvasRenderingContext2d;

use crate::consts::BACKGROUND_CSS;
use crate::engine::Action;
use crate::surface::StrokeStyle;

/// Set line width, round caps/joins, and stroke colour.
pub fn configure(ctx: &CanvasRenderingContext2d, style: &StrokeStyle) {
    ctx.set_line_width(style.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(&style.css_color());
}

/// Fill the whole surface opaque white.
pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.save();
    ctx.set_fill_style_str(BACKGROUND_CSS);
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.restore();
}

/// Apply a batch of engine actions.
pub fn apply(ctx: &CanvasRenderingContext2d, actions: &[Action], width: f64, height: f64) {
    for action in actions {
        match action {
            Action::SegmentDrawn { from, to } => {
                ctx.begin_path();
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                ctx.stroke();
            }
            Action::SurfaceCleared => clear(ctx, width, height),
            Action::StrokeStarted { .. } | Action::StrokeEnded | Action::PanelChanged => {}
        }
    }
}
