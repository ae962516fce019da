/// Shapes Web - WASM viewer for the browser
///
/// Draws the scene on a WebGL2 canvas from a `requestAnimationFrame` loop and
/// exposes the parameter panel to the JavaScript page in `client/`.
use std::cell::RefCell;
use std::rc::Rc;

use shapes_core::{AppContext, RenderLoop};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod renderer;

pub use renderer::{RenderError, WebGlRenderer};

/// Radians per dragged CSS pixel
const DRAG_SPEED: f32 = 0.005;
/// Zoom factor per wheel notch
const WHEEL_ZOOM: f32 = 1.1;

struct ViewerState {
    ctx: AppContext,
    renderer: WebGlRenderer,
    render_loop: RenderLoop,
    scheduled: bool,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen]
pub struct WebViewer {
    state: Rc<RefCell<ViewerState>>,
    frame: FrameCallback,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach to the canvas with the given element id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebViewer, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .and_then(|element| element.dyn_into().ok())
            .ok_or_else(|| RenderError::CanvasNotFound(canvas_id.to_string()))?;
        let gl: WebGl2RenderingContext = canvas
            .get_context("webgl2")?
            .and_then(|context| context.dyn_into().ok())
            .ok_or(RenderError::ContextUnavailable)?;

        let (width, height) = (canvas.width(), canvas.height());
        let renderer = WebGlRenderer::new(gl)?;
        renderer.set_viewport(width, height);

        Ok(WebViewer {
            state: Rc::new(RefCell::new(ViewerState {
                ctx: AppContext::new(width, height),
                renderer,
                render_loop: RenderLoop::new(),
                scheduled: false,
            })),
            frame: Rc::new(RefCell::new(None)),
        })
    }

    /// Begin (or resume) drawing on every animation frame
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.frame.borrow().is_none() {
            let state = self.state.clone();
            let frame = self.frame.clone();
            *self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
                on_frame(&state, &frame, now);
            }));
        }

        let mut state = self.state.borrow_mut();
        if !state.render_loop.is_running() {
            state.render_loop = RenderLoop::new();
        }
        if !state.scheduled {
            request_frame(&self.frame)?;
            state.scheduled = true;
        }
        Ok(())
    }

    /// Stop after the frame in flight
    pub fn stop(&self) {
        self.state.borrow().render_loop.stop_signal().stop();
    }

    pub fn is_running(&self) -> bool {
        let state = self.state.borrow();
        state.scheduled && state.render_loop.is_running()
    }

    /// Set a numeric control such as `sphere.radius`; returns the value actually applied
    pub fn set_param(&self, path: &str, value: f32) -> Result<f32, JsValue> {
        self.state.borrow_mut().ctx.set(path, value).map_err(to_js)
    }

    pub fn toggle(&self, path: &str) -> Result<bool, JsValue> {
        self.state.borrow_mut().ctx.toggle(path).map_err(to_js)
    }

    pub fn run_command(&self, line: &str) -> Result<String, JsValue> {
        self.state.borrow_mut().ctx.run_command(line).map_err(to_js)
    }

    /// Panel folders, ranges and current values as JSON
    pub fn panel_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.borrow().ctx.describe_panel()).map_err(to_js)
    }

    pub fn pointer_drag(&self, dx: f32, dy: f32) {
        self.state
            .borrow_mut()
            .ctx
            .controls
            .rotate(dx * DRAG_SPEED, dy * DRAG_SPEED);
    }

    /// Positive `delta_y` zooms out, as browsers report wheel scrolling down
    pub fn wheel(&self, delta_y: f32) {
        let factor = if delta_y > 0.0 { WHEEL_ZOOM } else { 1.0 / WHEEL_ZOOM };
        self.state.borrow_mut().ctx.controls.zoom(factor);
    }

    pub fn toggle_projection(&self) {
        let mut state = self.state.borrow_mut();
        state.ctx.camera.mode = state.ctx.camera.mode.toggled();
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.ctx.resize(width, height);
        state.renderer.set_viewport(width, height);
    }

    pub fn fps(&self) -> f32 {
        self.state.borrow().ctx.stats.fps()
    }
}

fn on_frame(state: &Rc<RefCell<ViewerState>>, frame: &FrameCallback, now: f64) {
    let mut guard = state.borrow_mut();
    let ViewerState {
        ctx,
        renderer,
        render_loop,
        scheduled,
    } = &mut *guard;
    *scheduled = false;
    if !render_loop.is_running() {
        return;
    }

    if let Err(err) = render_loop.tick(ctx, renderer, now) {
        web_sys::console::error_1(&JsValue::from(err));
        render_loop.stop_signal().stop();
        return;
    }

    match request_frame(frame) {
        Ok(()) => *scheduled = true,
        Err(err) => web_sys::console::error_1(&err),
    }
}

fn request_frame(frame: &FrameCallback) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let callback = frame.borrow();
    let callback = callback
        .as_ref()
        .ok_or_else(|| JsValue::from_str("frame callback missing"))?;
    window.request_animation_frame(callback.as_ref().unchecked_ref::<js_sys::Function>())?;
    Ok(())
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
