//! Browser wiring for both pages
//!
//! Each page keeps its app in a thread-local slot. Socket events, timers and
//! button handlers borrow the slot, feed the app, then flush its outbox and
//! sync the DOM.

use crate::controller::{ControllerApp, ControllerPhase};
use crate::input::{handle_key_down, handle_key_up};
use crate::network::{encode_client_message, socket_url};
use crate::screen::ScreenApp;
use game_core::{Config, FrameHandle, GameState, Renderer, Scheduler, Side};
use proto::{ClientMsg, Direction};
use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, CloseEvent, Document, Element, Event, HtmlCanvasElement,
    KeyboardEvent, MessageEvent, WebSocket, Window,
};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second page init on the same module finds the logger already set
    let _ = console_log::init_with_level(log::Level::Info);
}

fn set_hidden(document: &Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
    }
}

fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn send_all(socket: &WebSocket, outbox: Vec<ClientMsg>) {
    for msg in outbox {
        match encode_client_message(&msg) {
            Ok(text) => {
                if let Err(e) = socket.send_with_str(&text) {
                    log::warn!("Send failed: {e:?}");
                }
            }
            Err(e) => log::warn!("{e}"),
        }
    }
}

fn open_socket() -> Result<WebSocket, JsValue> {
    let location = window()?.location();
    let url = socket_url(&location.protocol()?, &location.host()?);
    log::info!("Connecting to {url}");
    WebSocket::new(&url)
}

fn on_event(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// ============================================================================
// Screen
// ============================================================================

enum Timer {
    Frame(i32),
    Timeout(i32),
}

/// `requestAnimationFrame` / `setTimeout` behind the loop's scheduler seam.
/// Handles come from our own counter so the two id spaces never collide.
#[derive(Default)]
pub struct RafScheduler {
    next: u32,
    timers: HashMap<FrameHandle, Timer>,
}

impl RafScheduler {
    fn next_handle(&mut self) -> FrameHandle {
        self.next = self.next.wrapping_add(1);
        FrameHandle(self.next)
    }

    /// Forget a timer the browser has already fired
    fn fired(&mut self, handle: FrameHandle) {
        self.timers.remove(&handle);
    }
}

impl Scheduler for RafScheduler {
    fn schedule_frame(&mut self) -> FrameHandle {
        let handle = self.next_handle();
        let callback = Closure::once_into_js(move |_time: f64| screen_frame(handle));
        match window().and_then(|w| w.request_animation_frame(callback.unchecked_ref())) {
            Ok(id) => {
                self.timers.insert(handle, Timer::Frame(id));
            }
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
        handle
    }

    fn schedule_after(&mut self, delay_ms: u32) -> FrameHandle {
        let handle = self.next_handle();
        let callback = Closure::once_into_js(move || screen_frame(handle));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay,
            )
        }) {
            Ok(id) => {
                self.timers.insert(handle, Timer::Timeout(id));
            }
            Err(e) => log::error!("setTimeout failed: {e:?}"),
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let Some(timer) = self.timers.remove(&handle) else {
            return;
        };
        let Ok(window) = window() else {
            return;
        };
        match timer {
            Timer::Frame(id) => {
                let _ = window.cancel_animation_frame(id);
            }
            Timer::Timeout(id) => window.clear_timeout_with_handle(id),
        }
    }
}

/// 2D canvas drawing of the table
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, ctx: None }
    }

    fn context(&mut self) -> Option<&CanvasRenderingContext2d> {
        if self.ctx.is_none() {
            self.ctx = self
                .canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        }
        self.ctx.as_ref()
    }
}

impl Renderer for CanvasRenderer {
    fn reset_context(&mut self) {
        self.ctx = None;
    }

    fn draw(&mut self, state: &GameState, config: &Config) {
        let width = f64::from(config.table_width);
        let height = f64::from(config.table_height);
        let Some(ctx) = self.context() else {
            log::warn!("No 2d context, skipping frame");
            return;
        };

        ctx.set_fill_style_str("#000000");
        ctx.fill_rect(0.0, 0.0, width, height);

        // Net
        ctx.set_fill_style_str("#444444");
        let mut x = 0.0;
        while x < width {
            ctx.fill_rect(x, height / 2.0 - 1.0, 12.0, 2.0);
            x += 24.0;
        }

        ctx.set_fill_style_str("#ffffff");
        for side in Side::BOTH {
            if let Some(paddle) = state.paddle(side) {
                ctx.fill_rect(
                    f64::from(paddle.pos.x),
                    f64::from(paddle.pos.y),
                    f64::from(paddle.width),
                    f64::from(paddle.height),
                );
            }
        }

        if let Some(ball) = state.ball() {
            ctx.begin_path();
            if ctx
                .arc(
                    f64::from(ball.pos.x),
                    f64::from(ball.pos.y),
                    f64::from(ball.radius),
                    0.0,
                    TAU,
                )
                .is_ok()
            {
                ctx.fill();
            }
        }

        ctx.set_font("32px monospace");
        ctx.set_text_align("left");
        let _ = ctx.fill_text(&state.score.player1.to_string(), 20.0, height / 2.0 - 20.0);
        let _ = ctx.fill_text(&state.score.player2.to_string(), 20.0, height / 2.0 + 44.0);
    }
}

struct ScreenPage {
    app: ScreenApp<RafScheduler, CanvasRenderer>,
    socket: WebSocket,
    document: Document,
    canvas_id: String,
}

impl ScreenPage {
    fn flush(&mut self) {
        if self.socket.ready_state() == WebSocket::OPEN {
            send_all(&self.socket, self.app.take_outbox());
        }
        self.sync_dom();
    }

    fn sync_dom(&self) {
        let view = self.app.view();
        set_hidden(&self.document, "qr-panel", !view.qr_visible);
        set_hidden(&self.document, &self.canvas_id, !view.canvas_visible);
        set_text(&self.document, "status", &view.status);
        if let Some(url) = &view.controller_url {
            set_text(&self.document, "qr-url", url);
        }
        if let (Some(image), Some(el)) = (&view.qr_image, self.document.get_element_by_id("qr-image")) {
            let _ = el.set_attribute("src", image);
        }
    }
}

thread_local! {
    static SCREEN: RefCell<Option<ScreenPage>> = const { RefCell::new(None) };
    static CONTROLLER: RefCell<Option<ControllerPage>> = const { RefCell::new(None) };
}

fn with_screen(f: impl FnOnce(&mut ScreenPage)) {
    SCREEN.with(|slot| {
        if let Some(page) = slot.borrow_mut().as_mut() {
            f(page);
            page.flush();
        }
    });
}

fn screen_frame(handle: FrameHandle) {
    with_screen(|page| {
        page.app.scheduler_mut().fired(handle);
        page.app.on_frame(handle);
    });
}

/// Boot the shared screen page
#[wasm_bindgen]
pub fn start_screen(canvas_id: &str) -> Result<(), JsValue> {
    init_logging();
    let document = document()?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas not found"))?
        .dyn_into()?;
    let config = Config::new();
    canvas.set_width(config.table_width as u32);
    canvas.set_height(config.table_height as u32);

    let socket = open_socket()?;
    let seed = js_sys::Date::now() as u64;
    let app = ScreenApp::new(RafScheduler::default(), CanvasRenderer::new(canvas), seed);

    on_event(&socket, "open", |_: Event| {
        let origin = window().ok().and_then(|w| w.location().origin().ok());
        with_screen(|page| page.app.register(origin));
    })?;
    on_event(&socket, "message", |event: Event| {
        let text = event
            .dyn_ref::<MessageEvent>()
            .and_then(|message| message.data().as_string());
        if let Some(text) = text {
            with_screen(|page| page.app.handle_text(&text));
        }
    })?;
    on_event(&socket, "close", |event: Event| {
        let code = event.dyn_ref::<CloseEvent>().map(CloseEvent::code);
        log::warn!("Relay connection closed ({code:?})");
        with_screen(|page| {
            page.app
                .handle_message(proto::ServerMsg::AllPlayersDisconnected);
            page.app.set_status("Lost connection to the relay");
        });
    })?;

    let page = ScreenPage {
        app,
        socket,
        document,
        canvas_id: canvas_id.to_string(),
    };
    page.sync_dom();
    SCREEN.with(|slot| *slot.borrow_mut() = Some(page));
    log::info!("Screen running");
    Ok(())
}

// ============================================================================
// Controller
// ============================================================================

const CONTROLLER_PANELS: [(&str, ControllerPhase); 5] = [
    ("panel-mode", ControllerPhase::ModeSelection),
    ("panel-waiting", ControllerPhase::WaitingForOpponent),
    ("panel-pad", ControllerPhase::Playing),
    ("panel-over", ControllerPhase::GameOver),
    ("panel-rejected", ControllerPhase::Rejected),
];

struct ControllerPage {
    app: ControllerApp,
    socket: WebSocket,
    document: Document,
}

impl ControllerPage {
    fn flush(&mut self) {
        if self.socket.ready_state() == WebSocket::OPEN {
            send_all(&self.socket, self.app.take_outbox());
        }
        if self.app.phase() == ControllerPhase::Disconnected
            && self.socket.ready_state() == WebSocket::OPEN
        {
            let _ = self.socket.close();
        }
        self.sync_dom();
    }

    fn sync_dom(&self) {
        let phase = self.app.phase();
        for (id, shown) in CONTROLLER_PANELS {
            set_hidden(&self.document, id, phase != shown);
        }
        set_text(&self.document, "status", &self.app.status_text());
    }
}

fn with_controller(f: impl FnOnce(&mut ControllerApp)) {
    CONTROLLER.with(|slot| {
        if let Some(page) = slot.borrow_mut().as_mut() {
            f(&mut page.app);
            page.flush();
        }
    });
}

fn bind_click(document: &Document, id: &str, action: fn(&mut ControllerApp)) -> Result<(), JsValue> {
    if let Some(el) = document.get_element_by_id(id) {
        on_event(&el, "click", move |_: Event| with_controller(action))?;
    }
    Ok(())
}

fn bind_hold(document: &Document, id: &str, direction: Direction) -> Result<(), JsValue> {
    let Some(el): Option<Element> = document.get_element_by_id(id) else {
        return Ok(());
    };
    for down in ["mousedown", "touchstart"] {
        on_event(&el, down, move |event: Event| {
            event.prevent_default();
            with_controller(|app| app.press(direction));
        })?;
    }
    for up in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
        on_event(&el, up, |_: Event| with_controller(ControllerApp::release))?;
    }
    Ok(())
}

/// Boot a phone controller page
#[wasm_bindgen]
pub fn start_controller() -> Result<(), JsValue> {
    init_logging();
    let window = window()?;
    let document = document()?;
    let socket = open_socket()?;

    on_event(&socket, "open", |_: Event| with_controller(ControllerApp::register))?;
    on_event(&socket, "message", |event: Event| {
        let text = event
            .dyn_ref::<MessageEvent>()
            .and_then(|message| message.data().as_string());
        if let Some(text) = text {
            with_controller(|app| app.handle_text(&text));
        }
    })?;
    on_event(&socket, "close", |_: Event| {
        with_controller(ControllerApp::connection_lost)
    })?;

    bind_hold(&document, "btn-left", Direction::Left)?;
    bind_hold(&document, "btn-right", Direction::Right)?;
    bind_click(&document, "btn-vs-ai", ControllerApp::play_vs_ai)?;
    bind_click(&document, "btn-vs-ai-later", ControllerApp::play_vs_ai)?;
    bind_click(&document, "btn-wait-opponent", ControllerApp::wait_for_opponent)?;
    bind_click(&document, "btn-play-again", ControllerApp::play_again)?;
    bind_click(&document, "btn-wait-players", ControllerApp::wait_for_players)?;
    bind_click(&document, "btn-exit", ControllerApp::exit)?;

    on_event(&window, "keydown", |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if key.repeat() {
            return;
        }
        if let Some(direction) = handle_key_down(&key.key()) {
            with_controller(|app| app.press(direction));
        }
    })?;
    on_event(&window, "keyup", |event: Event| {
        let released = event
            .dyn_ref::<KeyboardEvent>()
            .and_then(|key| handle_key_up(&key.key()));
        if released.is_some() {
            with_controller(ControllerApp::release);
        }
    })?;

    let page = ControllerPage {
        app: ControllerApp::new(),
        socket,
        document,
    };
    page.sync_dom();
    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(page));
    log::info!("Controller running");
    Ok(())
}
