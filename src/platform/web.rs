//! Browser host
//!
//! `WebGame` is the JS-facing handle. It owns the loop behind
//! `Rc<RefCell<_>>`, reschedules itself with `requestAnimationFrame`, and
//! hands snapshots, render views, events and the final result to JS
//! callbacks as JSON. Borrows are released before any callback runs so JS
//! may call back in. At most one animation frame is pending at a time.
//!
//! A panic aborts the module on this target; only tick errors are survived.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::FrameSlot;
use crate::driver::{FrameOutput, GameLoop};
use crate::rewards::RewardTier;
use crate::sim::Simulation;
use crate::snapshot::RenderView;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Tea Rush module loaded");
    }
}

#[derive(Default, Clone)]
struct Callbacks {
    snapshot: Option<Function>,
    events: Option<Function>,
    game_over: Option<Function>,
    frame: Option<Function>,
}

struct Host {
    game: GameLoop,
    callbacks: Callbacks,
    /// The pending `requestAnimationFrame`, if any
    frame_slot: FrameSlot,
}

/// Handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning` is an optional JSON override table
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, width: f32, height: f32, tuning: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let sim = Simulation::new(seed as u64, tuning, width, height).map_err(to_js)?;
        log::info!("Game created ({width}x{height}, seed {})", sim.seed());
        Ok(WebGame {
            host: Rc::new(RefCell::new(Host {
                game: GameLoop::new(sim),
                callbacks: Callbacks::default(),
                frame_slot: FrameSlot::default(),
            })),
        })
    }

    /// Called with the HUD snapshot JSON, at most every 100ms
    #[wasm_bindgen(js_name = onSnapshot)]
    pub fn on_snapshot(&self, callback: Function) {
        self.host.borrow_mut().callbacks.snapshot = Some(callback);
    }

    /// Called with a JSON array of audio/effect events
    #[wasm_bindgen(js_name = onEvents)]
    pub fn on_events(&self, callback: Function) {
        self.host.borrow_mut().callbacks.events = Some(callback);
    }

    /// Called once with `(score, rewardJson)`
    #[wasm_bindgen(js_name = onGameOver)]
    pub fn on_game_over(&self, callback: Function) {
        self.host.borrow_mut().callbacks.game_over = Some(callback);
    }

    /// Called every frame with the render view JSON
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&self, callback: Function) {
        self.host.borrow_mut().callbacks.frame = Some(callback);
    }

    pub fn start(&self) {
        let output = {
            let mut host = self.host.borrow_mut();
            if host.game.is_running() || host.frame_slot.is_pending() {
                return;
            }
            FrameOutput {
                events: host.game.start(now_ms()),
                running: host.game.is_running(),
                ..Default::default()
            }
        };
        let running = output.running;
        deliver(&self.host, output);
        if running {
            schedule(self.host.clone());
        }
    }

    pub fn stop(&self) {
        let events = {
            let mut host = self.host.borrow_mut();
            cancel_pending(&mut host);
            host.game.stop()
        };
        deliver(
            &self.host,
            FrameOutput {
                events,
                ..Default::default()
            },
        );
    }

    /// Absolute pointer x in CSS pixels
    #[wasm_bindgen(js_name = setPointerX)]
    pub fn set_pointer_x(&self, x: f32) {
        self.host.borrow_mut().game.sim_mut().set_pointer_x(x);
    }

    pub fn resize(&self, width: f32, height: f32) {
        if let Err(e) = self.host.borrow_mut().game.sim_mut().resize(width, height) {
            log::warn!("Resize rejected: {e}");
        }
    }

    #[wasm_bindgen(js_name = setAutopilot)]
    pub fn set_autopilot(&self, enabled: bool) {
        self.host.borrow_mut().game.sim_mut().autopilot = enabled;
        log::info!("Autopilot: {enabled}");
    }

    /// Current render view as JSON
    #[wasm_bindgen(js_name = renderState)]
    pub fn render_state(&self) -> Result<String, JsValue> {
        RenderView::from_sim(self.host.borrow().game.sim())
            .to_json()
            .map_err(to_js)
    }

    /// Unthrottled HUD snapshot as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.host.borrow().game.snapshot().to_json().map_err(to_js)
    }
}

fn to_js(e: crate::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn schedule(host: Rc<RefCell<Host>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window, frame loop not scheduled");
        return;
    };
    let ticket = host.borrow_mut().frame_slot.next_ticket();
    let next = host.clone();
    let closure = Closure::once(move |time: f64| frame_callback(next, ticket, time));
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(handle) => {
            host.borrow_mut().frame_slot.armed(handle);
            closure.forget();
        }
        Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
    }
}

fn cancel_pending(host: &mut Host) {
    let Some(handle) = host.frame_slot.cancel() else {
        return;
    };
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

fn frame_callback(host: Rc<RefCell<Host>>, ticket: u64, time: f64) {
    let (output, view) = {
        let mut host = host.borrow_mut();
        if !host.frame_slot.claim(ticket) {
            // Superseded by a stop/start since it was queued
            return;
        }
        let output = host.game.frame(time);
        if !output.running && output.game_over.is_none() {
            // Stopped from outside since the last frame
            return;
        }
        let view = host
            .callbacks
            .frame
            .is_some()
            .then(|| RenderView::from_sim(host.game.sim()));
        (output, view)
    };
    let running = output.running;
    let frame_cb = host.borrow().callbacks.frame.clone();
    if let (Some(view), Some(cb)) = (&view, &frame_cb) {
        call_json(cb, view);
    }
    deliver(&host, output);
    // JS may have stopped or restarted the loop from a callback
    let reschedule = {
        let h = host.borrow();
        running && h.game.is_running() && !h.frame_slot.is_pending()
    };
    if reschedule {
        schedule(host);
    }
}

fn deliver(host: &Rc<RefCell<Host>>, output: FrameOutput) {
    let callbacks = host.borrow().callbacks.clone();

    if !output.events.is_empty() {
        if let Some(cb) = &callbacks.events {
            call_json(cb, &output.events);
        }
    }
    if let (Some(snapshot), Some(cb)) = (&output.snapshot, &callbacks.snapshot) {
        call_json(cb, snapshot);
    }
    if let (Some(score), Some(cb)) = (output.game_over, &callbacks.game_over) {
        let reward = RewardTier::for_score(score).reward(score);
        match serde_json::to_string(&reward) {
            Ok(json) => {
                if let Err(e) = cb.call2(&JsValue::NULL, &JsValue::from_f64(score as f64), &JsValue::from_str(&json)) {
                    log::error!("Game over callback threw: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to serialize reward: {e}"),
        }
    }
}

fn call_json<T: Serialize>(cb: &Function, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(e) = cb.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::error!("Callback threw: {e:?}");
            }
        }
        Err(e) => log::error!("Failed to serialize callback payload: {e}"),
    }
}
