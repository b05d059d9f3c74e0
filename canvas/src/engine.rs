use protocol::{PanelText, PredictError, PredictRequest, Prediction, RequestSequencer, RequestToken};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::input::{DrawState, PointerEvent, Transition};
use crate::render;
use crate::surface::{Stroke, StrokeStyle, Surface, SurfaceError};
use crate::viewport::{Point, SurfaceRect};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A stroke began at `at`; nothing is painted until it extends.
    StrokeStarted { at: Point },
    /// The segment `from → to` was painted on the surface.
    SegmentDrawn { from: Point, to: Point },
    /// The active stroke was committed.
    StrokeEnded,
    /// The surface was repainted white.
    SurfaceCleared,
    /// The result panel's visibility or text changed.
    PanelChanged,
}

/// Presentation model of the result panel. The DOM mirrors this.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPanel {
    pub visible: bool,
    pub text: PanelText,
}

impl ResultPanel {
    pub fn show(&mut self, text: PanelText) {
        self.visible = true;
        self.text = text;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// A predict that has been issued but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPredict {
    pub token: RequestToken,
    pub request: PredictRequest,
}

/// Core engine state: everything that does not touch the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub surface: Surface,
    pub style: StrokeStyle,
    pub state: DrawState,
    pub panel: ResultPanel,
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    sequencer: RequestSequencer,
}

impl EngineCore {
    /// Create an engine over a blank `width`×`height` surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EmptyDimensions`] for a zero dimension and
    /// [`SurfaceError::TooLarge`] for an oversized one.
    pub fn new(width: u32, height: u32, style: StrokeStyle) -> Result<Self, SurfaceError> {
        Ok(Self {
            surface: Surface::new(width, height)?,
            style,
            state: DrawState::Idle,
            panel: ResultPanel::default(),
            strokes: Vec::new(),
            active: None,
            sequencer: RequestSequencer::new(),
        })
    }

    // --- Input ---

    pub fn on_pointer_down(&mut self, local: Point) -> Vec<Action> {
        self.handle(PointerEvent::Down(local))
    }

    pub fn on_pointer_move(&mut self, local: Point) -> Vec<Action> {
        self.handle(PointerEvent::Move(local))
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.handle(PointerEvent::Up)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.handle(PointerEvent::Cancel)
    }

    /// Run one event through the state machine and paint the result.
    pub fn handle(&mut self, event: PointerEvent) -> Vec<Action> {
        match self.state.step(event) {
            Transition::Begin { at, interrupted } => {
                let mut actions = Vec::with_capacity(2);
                if interrupted {
                    self.commit_active();
                    actions.push(Action::StrokeEnded);
                }
                log::trace!("stroke started at ({}, {})", at.x, at.y);
                self.active = Some(Stroke::starting_at(at));
                actions.push(Action::StrokeStarted { at });
                actions
            }
            Transition::Extend { from, to } => {
                self.surface.draw_segment(from, to, &self.style);
                if let Some(stroke) = self.active.as_mut() {
                    stroke.points.push(to);
                }
                vec![Action::SegmentDrawn { from, to }]
            }
            Transition::End => {
                self.commit_active();
                vec![Action::StrokeEnded]
            }
            Transition::Ignored => Vec::new(),
        }
    }

    fn commit_active(&mut self) {
        if let Some(stroke) = self.active.take() {
            log::trace!("stroke ended with {} points", stroke.points.len());
            self.strokes.push(stroke);
        }
    }

    /// Feed recorded strokes through the state machine as down/move…/up.
    ///
    /// Returns the number of segments painted.
    pub fn replay(&mut self, strokes: &[Stroke]) -> usize {
        let mut segments = 0;
        for stroke in strokes {
            let mut points = stroke.points.iter().copied();
            let Some(first) = points.next() else {
                continue;
            };
            self.on_pointer_down(first);
            for p in points {
                segments += self.on_pointer_move(p).len();
            }
            self.on_pointer_up();
        }
        segments
    }

    // --- Clear ---

    /// Repaint the surface white, drop all strokes, end any active stroke,
    /// hide the result panel, and discard in-flight predictions.
    pub fn clear(&mut self) -> Vec<Action> {
        self.surface.clear();
        self.strokes.clear();
        self.active = None;
        self.state = DrawState::Idle;
        self.panel.hide();
        self.sequencer.invalidate();
        vec![Action::SurfaceCleared, Action::PanelChanged]
    }

    // --- Predict ---

    /// Serialize the surface, show the pending panel, and issue a request token.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] if the surface cannot be encoded; the
    /// panel is left untouched in that case.
    pub fn begin_predict(&mut self, model: &str) -> Result<PendingPredict, SurfaceError> {
        let image = self.surface.to_data_uri()?;
        let request = PredictRequest::new(image, model);
        self.panel.show(PanelText::pending());
        if let Some(previous) = self.sequencer.pending() {
            log::debug!("predict #{} superseded before its response", previous.get());
        }
        let token = self.sequencer.issue();
        log::debug!("predict #{} issued (model={})", token.get(), request.model);
        Ok(PendingPredict { token, request })
    }

    /// Apply a finished predict to the panel if `token` is still the latest.
    ///
    /// Returns `false` when the result was superseded by a newer predict or
    /// invalidated by [`EngineCore::clear`].
    pub fn finish_predict(&mut self, token: RequestToken, outcome: &Result<Prediction, PredictError>) -> bool {
        if !self.sequencer.settle(token) {
            log::debug!("predict #{} discarded: superseded", token.get());
            return false;
        }
        if let Err(err) = outcome {
            log::warn!("predict #{} failed: {err}", token.get());
        } else {
            log::debug!("predict #{} applied", token.get());
        }
        self.panel.show(PanelText::from_outcome(outcome));
        true
    }

    // --- Queries ---

    /// Committed strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Bind to `canvas`, sizing its backing store to `width`×`height` and
    /// painting it white.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or the dimensions are zero.
    pub fn new(canvas: HtmlCanvasElement, width: u32, height: u32, style: StrokeStyle) -> Result<Self, JsValue> {
        let core = EngineCore::new(width, height, style).map_err(|e| JsValue::from_str(&e.to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::configure(&ctx, &style);
        render::clear(&ctx, f64::from(width), f64::from(height));
        Ok(Self { canvas, ctx, core })
    }

    /// Surface-local position of a client-space point.
    #[must_use]
    pub fn to_local(&self, client: Point) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        SurfaceRect::new(rect.left(), rect.top()).client_to_local(client)
    }

    // --- Input events (client coordinates) ---

    pub fn on_pointer_down(&mut self, client: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_down(self.to_local(client));
        self.render(&actions);
        actions
    }

    pub fn on_pointer_move(&mut self, client: Point) -> Vec<Action> {
        if !self.core.state.is_drawing() {
            return Vec::new();
        }
        let actions = self.core.on_pointer_move(self.to_local(client));
        self.render(&actions);
        actions
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.core.on_pointer_cancel()
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let actions = self.core.clear();
        self.render(&actions);
        actions
    }

    // --- Render ---

    fn render(&self, actions: &[Action]) {
        render::apply(
            &self.ctx,
            actions,
            f64::from(self.core.surface.width()),
            f64::from(self.core.surface.height()),
        );
    }
}
