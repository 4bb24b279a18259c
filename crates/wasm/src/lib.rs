use std::sync::Mutex;

use scrolly_core::router::section_element_id as element_id;
use scrolly_core::views::{hit_test, render_frame};
use scrolly_core::{DeviceClass, Millis, Sequencer, SequencerConfig};
use scrolly_protocol::{
    DeviceProfile, HostEvent, IntersectionEntry, Listener, NavKey, Point, Viewport,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The page's sequencer. Mounted once at startup and kept until unload.
static SEQUENCER: Mutex<Option<Sequencer>> = Mutex::new(None);

/// What the page needs to wire up after mounting.
#[derive(Debug, Serialize)]
struct MountInfo<'a> {
    device_class: DeviceClass,
    listeners: &'a [Listener],
    total_steps: usize,
    transition_ms: u64,
    native_scroll_locked: bool,
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{message}");
}

/// `Event.timeStamp` and `performance.now()` are fractional milliseconds.
fn to_millis(now: f64) -> Millis {
    if now.is_finite() && now > 0.0 {
        now as Millis
    } else {
        0
    }
}

fn with_sequencer<T>(f: impl FnOnce(&mut Sequencer) -> T) -> Result<T, JsError> {
    let mut guard = SEQUENCER
        .lock()
        .map_err(|_| JsError::new("sequencer state poisoned"))?;
    let sequencer = guard
        .as_mut()
        .ok_or_else(|| JsError::new("sequencer not mounted"))?;
    Ok(f(sequencer))
}

fn device(viewport_width: f64, coarse_pointer: bool, can_hover: bool) -> DeviceProfile {
    DeviceProfile {
        viewport_width,
        coarse_pointer,
        can_hover,
    }
}

/// Mount the sequencer. Returns [`MountInfo`] as JSON; the page attaches
/// exactly the listed listeners and nothing else.
#[wasm_bindgen]
pub fn mount(
    config_json: Option<String>,
    viewport_width: f64,
    coarse_pointer: bool,
    can_hover: bool,
) -> Result<String, JsError> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let config = match config_json.as_deref() {
        Some(json) => {
            SequencerConfig::from_json(json).map_err(|e| JsError::new(&e.to_string()))?
        }
        None => SequencerConfig::default(),
    };

    let mut guard = SEQUENCER
        .lock()
        .map_err(|_| JsError::new("sequencer state poisoned"))?;
    if guard.is_some() {
        return Err(JsError::new("sequencer already mounted"));
    }
    let sequencer = Sequencer::mount(config, &device(viewport_width, coarse_pointer, can_hover))
        .map_err(|e| JsError::new(&e.to_string()))?;

    let info = MountInfo {
        device_class: sequencer.device_class(),
        listeners: sequencer.listeners(),
        total_steps: sequencer.step_map().total_steps(),
        transition_ms: sequencer.config().transition_ms,
        native_scroll_locked: sequencer.native_scroll_locked(),
    };
    let json = serde_json::to_string(&info).map_err(|e| JsError::new(&e.to_string()))?;
    log(&format!("scrolly: mounted {json}"));
    *guard = Some(sequencer);
    Ok(json)
}

/// Forward a `wheel` event. Returns true when the page should call
/// `preventDefault()`.
#[wasm_bindgen]
pub fn on_wheel(delta_y: f64, now: f64) -> Result<bool, JsError> {
    with_sequencer(|s| {
        let d = s.handle(&HostEvent::Wheel { delta_y }, to_millis(now));
        s.prevents_native_scroll(&d)
    })
}

/// Forward a `keydown` event by its `key` name. Keys the sequencer does not
/// handle return false and keep their default action.
#[wasm_bindgen]
pub fn on_key(key: &str, now: f64) -> Result<bool, JsError> {
    let Some(key) = NavKey::from_dom_key(key) else {
        return Ok(false);
    };
    with_sequencer(|s| {
        let d = s.handle(&HostEvent::Key { key }, to_millis(now));
        s.prevents_native_scroll(&d)
    })
}

/// Forward an `IntersectionObserver` batch as JSON
/// (`[{"element_id": "section-3", "ratio": 0.8}, ...]`). Returns true when
/// the current index changed.
#[wasm_bindgen]
pub fn on_intersections(entries_json: &str, now: f64) -> Result<bool, JsError> {
    let entries: Vec<IntersectionEntry> =
        serde_json::from_str(entries_json).map_err(|e| JsError::new(&e.to_string()))?;
    with_sequencer(|s| {
        s.handle(&HostEvent::Intersections { entries }, to_millis(now))
            .is_accepted()
    })
}

/// Window resized. Returns whether native scrolling should stay locked.
#[wasm_bindgen]
pub fn on_resize(
    viewport_width: f64,
    coarse_pointer: bool,
    can_hover: bool,
) -> Result<bool, JsError> {
    with_sequencer(|s| {
        s.resize(&device(viewport_width, coarse_pointer, can_hover));
        s.native_scroll_locked()
    })
}

/// Called from `requestAnimationFrame`. Returns true when the cooldown ended.
#[wasm_bindgen]
pub fn tick(now: f64) -> Result<bool, JsError> {
    with_sequencer(|s| s.tick(to_millis(now)))
}

/// Programmatic jump, e.g. from a "back to top" button.
#[wasm_bindgen]
pub fn go_to(index: i32, now: f64) -> Result<bool, JsError> {
    with_sequencer(|s| s.go_to(i64::from(index), to_millis(now)))
}

#[wasm_bindgen]
pub fn go_to_section(ordinal: usize, now: f64) -> Result<bool, JsError> {
    with_sequencer(|s| s.go_to_section(ordinal, to_millis(now)))
}

/// Called by the lead-capture overlay on open and close.
#[wasm_bindgen]
pub fn set_modal_open(open: bool) -> Result<(), JsError> {
    with_sequencer(|s| {
        s.set_modal_open(open);
    })
}

/// Current view snapshot as JSON.
#[wasm_bindgen]
pub fn view() -> Result<String, JsError> {
    let view = with_sequencer(|s| s.view())?;
    serde_json::to_string(&view).map_err(|e| JsError::new(&e.to_string()))
}

/// Story offset in `vh` at `now`, for the page's `translateY`.
#[wasm_bindgen]
pub fn offset_vh(now: f64) -> Result<f64, JsError> {
    with_sequencer(|s| s.animated_offset(to_millis(now)))
}

/// Render the story and navigation for a canvas, returning render commands
/// as JSON.
#[wasm_bindgen]
pub fn render(width: f64, height: f64, dpr: f64, now: f64) -> Result<String, JsError> {
    let viewport = Viewport { width, height, dpr };
    let commands = with_sequencer(|s| {
        let view = s.view();
        render_frame(s.step_map(), &view, &viewport, s.animated_offset(to_millis(now)))
    })?;
    serde_json::to_string(&commands).map_err(|e| JsError::new(&e.to_string()))
}

/// Handle a click on the canvas. Jumps to whatever target is under the
/// pointer and returns true if the index changed.
#[wasm_bindgen]
pub fn click(x: f64, y: f64, width: f64, height: f64, now: f64) -> Result<bool, JsError> {
    let viewport = Viewport::new(width, height);
    with_sequencer(|s| {
        let now = to_millis(now);
        let view = s.view();
        let commands = render_frame(s.step_map(), &view, &viewport, s.animated_offset(now));
        match hit_test(&commands, Point::new(x, y)) {
            Some(target) => s.go_to(target as i64, now),
            None => false,
        }
    })
}

/// DOM id the page must give the element rendering a logical index.
#[wasm_bindgen]
pub fn section_element_id(index: usize) -> String {
    element_id(index)
}
