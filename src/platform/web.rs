//! Browser host for Flappy Love
//!
//! Keeps exactly one session controller in a thread-local slot and wires it
//! to the page: modal lifecycle calls from inline handlers, click/touch input,
//! `requestAnimationFrame` scheduling and the win/loss display timers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlVideoElement, Window};

use super::{Screen, seed_from_clock};
use crate::outcome::FetchReporter;
use crate::renderer::{CanvasRenderer, Renderer};
use crate::session::{FrameStep, FrameToken, SessionController, SessionPhase};
use crate::sim::Playfield;

const CANVAS_ID: &str = "flappyCanvas";
const MODAL_ID: &str = "gameModal";
const CONTROLS_ID: &str = "gameControls";
const END_VIDEO_ID: &str = "gameEndVideo";
const AGENT_SPRITE: &str = "my-pic.jpg";
const OUTCOME_ENDPOINT: &str = "/api/highscore";

struct WebHost {
    controller: SessionController<FetchReporter>,
    renderer: CanvasRenderer,
    canvas: HtmlCanvasElement,
    /// Pending `requestAnimationFrame` id
    frame_request: Option<i32>,
    /// Pending display `setTimeout` id
    display_timer: Option<i32>,
}

impl WebHost {
    fn render(&mut self) {
        if let Some(view) = self.controller.view() {
            self.renderer.draw(&view);
        }
    }

    /// Cancel any scheduled frame or display timer
    fn cancel_pending(&mut self, window: &Window) {
        if let Some(id) = self.frame_request.take() {
            let _ = window.cancel_animation_frame(id);
        }
        if let Some(id) = self.display_timer.take() {
            window.clear_timeout_with_handle(id);
        }
    }
}

type SharedHost = Rc<RefCell<WebHost>>;

thread_local! {
    static HOST: RefCell<Option<SharedHost>> = const { RefCell::new(None) };
}

fn host() -> Result<SharedHost, JsValue> {
    HOST.with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("game host not installed"))
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_display(document: &Document, id: &str, value: &str) {
    if let Some(el) = html_element(document, id) {
        let _ = el.style().set_property("display", value);
    }
}

/// Set up logging, the controller and input listeners. Called once on load.
pub fn install() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    log::info!("Flappy Love starting...");

    let document = document()?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("no game canvas"))?
        .dyn_into()?;

    // Only taps on the playfield steer
    for event in ["click", "touchstart"] {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Ok(shared) = host()
                && let Ok(mut h) = shared.try_borrow_mut()
            {
                h.controller.apply_control_impulse();
            }
        });
        canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    let renderer = CanvasRenderer::new(&canvas, AGENT_SPRITE)?;
    let controller = SessionController::new(
        FetchReporter::new(OUTCOME_ENDPOINT),
        Playfield::new(canvas.width() as f32, canvas.height() as f32),
    );
    let shared = Rc::new(RefCell::new(WebHost {
        controller,
        renderer,
        canvas,
        frame_request: None,
        display_timer: None,
    }));
    HOST.with(|slot| *slot.borrow_mut() = Some(shared));

    log::info!("Flappy Love ready");
    Ok(())
}

/// Show the game modal and start a session
#[wasm_bindgen]
pub fn open_game() -> Result<(), JsValue> {
    let document = document()?;
    if let Some(modal) = document.get_element_by_id(MODAL_ID) {
        modal.class_list().add_1("show")?;
    }
    if let Some(body) = document.body() {
        body.class_list().add_1("modal-open")?;
    }
    start(&host()?)
}

/// Hide the game modal and cancel the running cycle
#[wasm_bindgen]
pub fn close_game() -> Result<(), JsValue> {
    let host = host()?;
    let phase = {
        let mut h = host.borrow_mut();
        h.cancel_pending(&window()?);
        h.controller.stop();
        h.controller.phase()
    };

    let document = document()?;
    apply_screen(&document, Screen::for_phase(phase));
    if let Some(modal) = document.get_element_by_id(MODAL_ID) {
        modal.class_list().remove_1("show")?;
    }
    if let Some(body) = document.body() {
        body.class_list().remove_1("modal-open")?;
    }
    Ok(())
}

/// Discard the current session and start a new one
#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    start(&host()?)
}

fn start(host: &SharedHost) -> Result<(), JsValue> {
    let window = window()?;
    let (token, phase) = {
        let mut h = host.borrow_mut();
        h.cancel_pending(&window);

        let playfield = Playfield::new(h.canvas.width() as f32, h.canvas.height() as f32);
        h.controller.set_playfield(playfield);
        let seed = seed_from_clock(js_sys::Date::now() + js_sys::Math::random());
        let token = h.controller.start_session(seed);
        h.render();
        (token, h.controller.phase())
    };

    apply_screen(&document()?, Screen::for_phase(phase));
    request_frame(host, token)
}

fn request_frame(host: &SharedHost, token: FrameToken) -> Result<(), JsValue> {
    let next = Rc::clone(host);
    let callback = Closure::once_into_js(move |time: f64| on_frame(next, token, time));
    let id = window()?.request_animation_frame(callback.unchecked_ref())?;
    host.borrow_mut().frame_request = Some(id);
    Ok(())
}

fn on_frame(host: SharedHost, token: FrameToken, time: f64) {
    let step = {
        let mut h = host.borrow_mut();
        h.frame_request = None;
        let step = h.controller.advance_frame(token, time);
        h.render();
        step
    };

    let result = match step {
        FrameStep::Continue => request_frame(&host, token),
        FrameStep::Halt => enter_display(&host, token),
    };
    if let Err(e) = result {
        log::warn!("Frame scheduling failed: {:?}", e);
    }
}

/// Show the win/loss visual and arm the post-game timer
fn enter_display(host: &SharedHost, token: FrameToken) -> Result<(), JsValue> {
    let phase = {
        let h = host.borrow();
        if !h.controller.is_current(token) {
            return Ok(());
        }
        h.controller.phase()
    };

    apply_screen(&document()?, Screen::for_phase(phase));
    arm_display_timer(host, token)
}

fn arm_display_timer(host: &SharedHost, token: FrameToken) -> Result<(), JsValue> {
    let Some(remaining) = host.borrow().controller.display_remaining_ms(now_ms()) else {
        return Ok(());
    };

    let next = Rc::clone(host);
    let callback = Closure::once_into_js(move || on_display_timer(next, token));
    let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        remaining.ceil() as i32,
    )?;
    host.borrow_mut().display_timer = Some(id);
    Ok(())
}

fn on_display_timer(host: SharedHost, token: FrameToken) {
    let finished = {
        let mut h = host.borrow_mut();
        h.display_timer = None;
        h.controller.update_display(token, now_ms())
    };

    let result = if finished {
        show_post_game()
    } else if host.borrow().controller.is_current(token) {
        arm_display_timer(&host, token)
    } else {
        Ok(())
    };
    if let Err(e) = result {
        log::warn!("Display timer failed: {:?}", e);
    }
}

fn show_post_game() -> Result<(), JsValue> {
    apply_screen(&document()?, Screen::for_phase(SessionPhase::PostGame));
    Ok(())
}

fn apply_screen(document: &Document, screen: Screen) {
    set_display(document, CANVAS_ID, if screen.canvas { "block" } else { "none" });
    set_display(document, CONTROLS_ID, if screen.controls { "flex" } else { "none" });

    let Some(video) = document
        .get_element_by_id(END_VIDEO_ID)
        .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
    else {
        return;
    };
    if screen.end_video {
        let _ = video.style().set_property("display", "block");
        video.set_current_time(0.0);
        // Autoplay may be refused; the timer still moves on
        let _ = video.play();
    } else {
        let _ = video.pause();
        let _ = video.style().set_property("display", "none");
    }
}
