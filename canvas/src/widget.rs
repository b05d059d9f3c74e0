//! Browser binding: wires DOM events and the prediction endpoint to an [`Engine`].
//!
//! ARCHITECTURE
//! ============
//! The host page hands every element the widget touches to
//! [`SketchWidget::mount`] (or the JS constructor); nothing is looked up by
//! id. Listeners close over an `Rc<RefCell<WidgetState>>`, and the predict
//! continuation re-borrows it after the request resolves, so no borrow is
//! held across an `.await`. The result panel is a projection of
//! [`crate::engine::ResultPanel`]: every change goes through
//! `WidgetState::sync_panel`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use protocol::{PredictError, PredictRequest, Prediction, interpret_body};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlSelectElement, MouseEvent,
    TouchEvent,
};

use crate::config::WidgetConfig;
use crate::engine::{Engine, ResultPanel};
use crate::input::PointerSource;
use crate::viewport::Point;

/// CSS class that hides the result panel.
const HIDDEN_CLASS: &str = "hidden";

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Page elements the widget reads from and writes to.
pub struct WidgetHandles {
    pub canvas: HtmlCanvasElement,
    pub clear_button: HtmlElement,
    pub predict_button: HtmlElement,
    pub model_select: HtmlSelectElement,
    pub result_box: HtmlElement,
    pub prediction_label: HtmlElement,
    pub detail_text: HtmlElement,
}

/// Result panel elements.
struct PanelView {
    result_box: HtmlElement,
    prediction_label: HtmlElement,
    detail_text: HtmlElement,
}

impl PanelView {
    fn sync(&self, panel: &ResultPanel) -> Result<(), JsValue> {
        let classes = self.result_box.class_list();
        if panel.visible {
            classes.remove_1(HIDDEN_CLASS)?;
        } else {
            classes.add_1(HIDDEN_CLASS)?;
        }
        self.prediction_label.set_text_content(Some(&panel.text.marker));
        self.detail_text.set_text_content(Some(&panel.text.detail));
        Ok(())
    }
}

struct WidgetState {
    engine: Engine,
    panel: PanelView,
    model_select: HtmlSelectElement,
    config: WidgetConfig,
}

impl WidgetState {
    fn sync_panel(&self) -> Result<(), JsValue> {
        self.panel.sync(&self.engine.core.panel)
    }
}

/// A registered DOM listener, removed again when the widget is dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Register `handler`. Non-passive listeners may call `preventDefault`,
    /// which touch handlers need to suppress scrolling and zooming.
    fn attach(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self { target: target.clone(), event, closure })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {err:?}", self.event);
        }
    }
}

/// The mounted sketch widget.
#[wasm_bindgen]
pub struct SketchWidget {
    state: Rc<RefCell<WidgetState>>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SketchWidget {
    /// JavaScript entry point:
    /// `new SketchWidget(canvas, clearBtn, predictBtn, modelSelect, resultBox, predDigit, probs, endpoint?, strokeWidth?)`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context or a listener cannot be registered.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        canvas: HtmlCanvasElement,
        clear_button: HtmlElement,
        predict_button: HtmlElement,
        model_select: HtmlSelectElement,
        result_box: HtmlElement,
        prediction_label: HtmlElement,
        detail_text: HtmlElement,
        endpoint: Option<String>,
        stroke_width: Option<f64>,
    ) -> Result<SketchWidget, JsValue> {
        let handles = WidgetHandles {
            canvas,
            clear_button,
            predict_button,
            model_select,
            result_box,
            prediction_label,
            detail_text,
        };
        let config = WidgetConfig::default()
            .with_endpoint(endpoint.as_deref())
            .with_stroke_width(stroke_width);
        Self::mount(handles, config)
    }

    /// Clear the surface and hide the result panel.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the panel cannot be updated.
    pub fn clear(&self) -> Result<(), JsValue> {
        clear(&self.state)
    }

    /// Submit the current surface for prediction.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface cannot be encoded or the panel cannot be updated.
    pub fn predict(&self) -> Result<(), JsValue> {
        predict(&self.state)
    }
}

impl SketchWidget {
    /// Bind to the given elements and start listening.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context, there is no `window`,
    /// or a listener cannot be registered.
    pub fn mount(handles: WidgetHandles, config: WidgetConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let engine = Engine::new(handles.canvas.clone(), config.width, config.height, config.style())?;
        let state = Rc::new(RefCell::new(WidgetState {
            engine,
            panel: PanelView {
                result_box: handles.result_box,
                prediction_label: handles.prediction_label,
                detail_text: handles.detail_text,
            },
            model_select: handles.model_select,
            config,
        }));
        state.borrow().sync_panel()?;

        let canvas: &EventTarget = handles.canvas.as_ref();
        let window: &EventTarget = window.as_ref();
        let clear_button: &EventTarget = handles.clear_button.as_ref();
        let predict_button: &EventTarget = handles.predict_button.as_ref();

        let listeners = vec![
            Listener::attach(canvas, "mousedown", true, on_mouse(&state, |engine, p| engine.on_pointer_down(p)))?,
            Listener::attach(canvas, "mousemove", true, on_mouse(&state, |engine, p| engine.on_pointer_move(p)))?,
            Listener::attach(window, "mouseup", true, on_release(&state))?,
            Listener::attach(canvas, "touchstart", false, on_touch(&state, |engine, p| engine.on_pointer_down(p)))?,
            Listener::attach(canvas, "touchmove", false, on_touch(&state, |engine, p| engine.on_pointer_move(p)))?,
            Listener::attach(canvas, "touchend", false, on_touch_end(&state, false))?,
            Listener::attach(canvas, "touchcancel", false, on_touch_end(&state, true))?,
            Listener::attach(clear_button, "click", true, {
                let state = Rc::clone(&state);
                move |_| report("clear", clear(&state))
            })?,
            Listener::attach(predict_button, "click", true, {
                let state = Rc::clone(&state);
                move |_| report("predict", predict(&state))
            })?,
        ];

        log::info!("sketch widget mounted (endpoint={})", state.borrow().config.endpoint);
        Ok(Self { state, _listeners: listeners })
    }
}

// =============================================================
// Event handlers
// =============================================================

fn mouse_point(ev: &MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

fn touch_source(ev: &TouchEvent) -> PointerSource {
    let list = ev.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    PointerSource::Touch { touches }
}

fn on_mouse(
    state: &Rc<RefCell<WidgetState>>,
    apply: impl Fn(&mut Engine, Point) -> Vec<crate::engine::Action> + 'static,
) -> impl FnMut(Event) + 'static {
    let state = Rc::clone(state);
    move |ev: Event| {
        if let Some(mouse) = ev.dyn_ref::<MouseEvent>() {
            let source = PointerSource::Mouse { client: mouse_point(mouse) };
            if let Some(client) = source.client_point() {
                apply(&mut state.borrow_mut().engine, client);
            }
        }
    }
}

fn on_touch(
    state: &Rc<RefCell<WidgetState>>,
    apply: impl Fn(&mut Engine, Point) -> Vec<crate::engine::Action> + 'static,
) -> impl FnMut(Event) + 'static {
    let state = Rc::clone(state);
    move |ev: Event| {
        ev.prevent_default();
        if let Some(touch) = ev.dyn_ref::<TouchEvent>() {
            if let Some(client) = touch_source(touch).client_point() {
                apply(&mut state.borrow_mut().engine, client);
            }
        }
    }
}

fn on_touch_end(state: &Rc<RefCell<WidgetState>>, cancelled: bool) -> impl FnMut(Event) + 'static {
    let state = Rc::clone(state);
    move |ev: Event| {
        ev.prevent_default();
        let engine = &mut state.borrow_mut().engine;
        if cancelled {
            engine.on_pointer_cancel();
        } else {
            engine.on_pointer_up();
        }
    }
}

fn on_release(state: &Rc<RefCell<WidgetState>>) -> impl FnMut(Event) + 'static {
    let state = Rc::clone(state);
    move |_: Event| {
        state.borrow_mut().engine.on_pointer_up();
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::error!("{what} failed: {err:?}");
    }
}

// =============================================================
// Operations
// =============================================================

fn clear(state: &Rc<RefCell<WidgetState>>) -> Result<(), JsValue> {
    let mut s = state.borrow_mut();
    s.engine.clear();
    s.sync_panel()
}

fn predict(state: &Rc<RefCell<WidgetState>>) -> Result<(), JsValue> {
    let (pending, endpoint) = {
        let mut s = state.borrow_mut();
        let selected = s.model_select.value();
        let model = s.config.resolve_model(&selected).to_owned();
        let pending = s
            .engine
            .core
            .begin_predict(&model)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        s.sync_panel()?;
        (pending, s.config.endpoint.clone())
    };

    let state = Rc::clone(state);
    spawn_local(async move {
        let outcome = match pending.request.validate() {
            Ok(()) => send(&endpoint, &pending.request).await,
            Err(err) => Err(err),
        };
        let mut s = state.borrow_mut();
        if s.engine.core.finish_predict(pending.token, &outcome) {
            report("panel update", s.sync_panel());
        }
    });
    Ok(())
}

/// POST the request and interpret whatever body comes back.
async fn send(endpoint: &str, request: &PredictRequest) -> Result<Prediction, PredictError> {
    let response = Request::post(endpoint)
        .json(request)
        .map_err(|e| PredictError::InvalidRequest(e.to_string()))?
        .send()
        .await
        .map_err(|e| PredictError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PredictError::Decode(e.to_string()))?;
    log::debug!("predict response status {status} ({} bytes)", body.len());
    interpret_body(&body)
}
