//! The spin-the-wheel picker widget.
//!
//! This module is the browser glue: it builds the widget's DOM (canvas,
//! pointer, controls, item list, winner modal, notice), wires the event
//! listeners, and drives an active spin from a requestAnimationFrame loop.
//! The actual physics live in [`spin`] as a pure state machine; each frame
//! the loop feeds it the timestamp and applies the returned rotation and
//! tick effects to the page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, window};

pub mod audio;
pub mod render;
pub mod spin;
pub mod state;

use audio::FlickAudio;
use spin::{SpinParams, SpinSession};
use state::WheelState;

const CANVAS_SIZE: u32 = 400;
/// Duration of the pointer bounce restarted on every boundary crossing.
const FLICK_PULSE_MS: f64 = 150.0;
const FLICK_PULSE_SCALE: f64 = 0.3;
/// How long the warning notice stays up before the frame loop hides it.
const NOTICE_DURATION_MS: f64 = 2600.0;
const TICK_SOUND_SRC: &str = "clack.mp3";

/// Runtime widget state. One instance per page, owned by the thread-local
/// slot below; every listener and the frame loop go through it.
struct WidgetState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    wheel: WheelState,
    params: SpinParams,
    /// `Some` while spinning; a spin request is rejected until resolution.
    session: Option<SpinSession>,
    audio: FlickAudio,
    /// Start of the current pointer pulse; NEG_INFINITY when idle.
    flick_start_ms: f64,
    /// Deadline for hiding the notice overlay; NEG_INFINITY when hidden.
    notice_until_ms: f64,
}

thread_local! {
    static WIDGET_STATE: RefCell<Option<WidgetState>> = const { RefCell::new(None) };
}

// --- Widget setup ------------------------------------------------------------

pub fn start_wheel_widget(params: SpinParams) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the wheel canvas. The wheel graphic is drawn unrotated;
    // the spin is applied through the canvas's CSS transform each frame.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("lw-wheel-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("lw-wheel-canvas");
        c.set_width(CANVAS_SIZE);
        c.set_height(CANVAS_SIZE);
        c.set_attribute("style", &canvas_style(0.0)).ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;

    // Fixed pointer above the wheel rim. Hidden while the wheel is empty.
    if doc.get_element_by_id("lw-pointer").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("lw-pointer");
        div.set_attribute("style", &pointer_style(false, 1.0)).ok();
        doc.body().unwrap().append_child(&div)?;
    }

    // Controls row: text input plus add / spin / reset.
    if doc.get_element_by_id("lw-controls").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("lw-controls");
        div.set_attribute(
            "style",
            "position:fixed; bottom:24px; left:50%; transform:translateX(-50%); display:flex; gap:8px; z-index:40; font-family:Arial, sans-serif;",
        )
        .ok();
        div.set_inner_html(concat!(
            "<input id='lw-item-input' type='text' placeholder='Add an item' ",
            "style='padding:8px 10px; border:1px solid #333; border-radius:6px; background:#181818; color:#eee; min-width:180px;'/>",
            "<button id='lw-add-btn' style='padding:8px 14px; border:none; border-radius:6px; background:#4A90E2; color:#fff; cursor:pointer;'>Add</button>",
            "<button id='lw-spin-btn' style='padding:8px 14px; border:none; border-radius:6px; background:#F5A623; color:#fff; cursor:pointer; font-weight:bold;'>Spin</button>",
            "<button id='lw-reset-btn' style='padding:8px 14px; border:none; border-radius:6px; background:#555; color:#fff; cursor:pointer;'>Reset</button>",
        ));
        doc.body().unwrap().append_child(&div)?;
    }

    // Item list, kept in lock-step with WheelState by full re-render.
    if doc.get_element_by_id("lw-item-list").is_none() {
        let ul = doc.create_element("ul")?;
        ul.set_id("lw-item-list");
        ul.set_attribute(
            "style",
            "position:fixed; right:24px; top:10%; width:220px; max-height:72%; overflow-y:auto; list-style:none; padding:0; margin:0; z-index:40; color:#eee; font-family:Arial, sans-serif;",
        )
        .ok();
        doc.body().unwrap().append_child(&ul)?;
    }

    // Transient warning notice, hidden again by the frame loop.
    if doc.get_element_by_id("lw-notice").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("lw-notice");
        div.set_attribute("style", &notice_style(false)).ok();
        doc.body().unwrap().append_child(&div)?;
    }

    // Winner modal: panel with close icon, close button, and a dismissable
    // backdrop.
    if doc.get_element_by_id("lw-winner-modal").is_none() {
        let div = doc.create_element("div")?;
        div.set_id("lw-winner-modal");
        div.set_attribute("style", &modal_style(false)).ok();
        div.set_inner_html(concat!(
            "<div style='background:#222; color:#fff; padding:28px 36px; border-radius:12px; min-width:260px; text-align:center; position:relative; font-family:Arial, sans-serif;'>",
            "<span id='lw-modal-close-icon' style='position:absolute; top:8px; right:14px; cursor:pointer; font-size:20px; opacity:0.7;'>&times;</span>",
            "<div style='font-size:13px; letter-spacing:2px; opacity:0.7; margin-bottom:10px;'>WINNER</div>",
            "<div id='lw-winner-text' style='font-size:28px; font-weight:bold; margin-bottom:18px;'></div>",
            "<button id='lw-modal-close' style='padding:8px 18px; border:none; border-radius:6px; background:#4A90E2; color:#fff; cursor:pointer;'>Close</button>",
            "</div>",
        ));
        doc.body().unwrap().append_child(&div)?;
    }

    let widget = WidgetState {
        canvas: canvas.clone(),
        ctx: ctx.clone(),
        wheel: WheelState::new(),
        params,
        session: None,
        audio: FlickAudio::new(TICK_SOUND_SRC),
        flick_start_ms: f64::NEG_INFINITY,
        notice_until_ms: f64::NEG_INFINITY,
    };
    WIDGET_STATE.with(|cell| cell.replace(Some(widget)));

    attach_listeners(&doc)?;

    WIDGET_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            refresh_wheel_dom(state);
        }
    });

    start_frame_loop();
    log::info!("wheel widget mounted");
    Ok(())
}

fn attach_listeners(doc: &Document) -> Result<(), JsValue> {
    // Add button.
    if let Some(btn) = doc.get_element_by_id("lw-add-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            handle_add();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Enter in the input behaves exactly like the add button.
    if let Some(input) = doc.get_element_by_id("lw-item-input") {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" {
                evt.prevent_default();
                handle_add();
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Spin button.
    if let Some(btn) = doc.get_element_by_id("lw-spin-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            handle_spin();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Reset button.
    if let Some(btn) = doc.get_element_by_id("lw-reset-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            handle_reset();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Delegated delete clicks on the item list. The per-item buttons carry a
    // data-index attribute; anything else inside the list is ignored.
    if let Some(list) = doc.get_element_by_id("lw-item-list") {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(target) = evt.target() else { return };
            let Ok(el) = target.dyn_into::<web_sys::Element>() else {
                return;
            };
            if let Some(attr) = el.get_attribute("data-index") {
                if let Ok(index) = attr.parse::<usize>() {
                    handle_remove(index);
                }
            }
        }) as Box<dyn FnMut(_)>);
        list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Modal close paths: button, icon, backdrop click.
    for id in ["lw-modal-close", "lw-modal-close-icon"] {
        if let Some(el) = doc.get_element_by_id(id) {
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                set_modal_visible(false);
            }) as Box<dyn FnMut(_)>);
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }
    if let Some(modal) = doc.get_element_by_id("lw-winner-modal") {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(target) = evt.target() else { return };
            if let Ok(el) = target.dyn_into::<web_sys::Element>() {
                if el.id() == "lw-winner-modal" {
                    set_modal_visible(false);
                }
            }
        }) as Box<dyn FnMut(_)>);
        modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

// --- Event handlers ----------------------------------------------------------

fn handle_add() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(input) = doc
        .get_element_by_id("lw-item-input")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let text = input.value();
    WIDGET_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            // Empty input is silently ignored.
            if state.wheel.add_item(&text) {
                input.set_value("");
                log::debug!("added item ({} total)", state.wheel.item_count());
                refresh_wheel_dom(state);
            }
        }
    });
}

fn handle_remove(index: usize) {
    WIDGET_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if state.wheel.remove_item(index) {
                log::debug!("removed item {index} ({} left)", state.wheel.item_count());
                refresh_wheel_dom(state);
            }
        }
    });
}

fn handle_spin() {
    let now = performance_now();
    WIDGET_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            // Single in-flight spin: reject until the current one resolves.
            if state.session.is_some() {
                log::warn!("spin requested while already spinning; ignored");
                return;
            }
            let count = state.wheel.item_count();
            if count < state.params.min_items {
                let msg = if count == 0 {
                    "Add items first!".to_string()
                } else {
                    format!("You need at least {} items to spin!", state.params.min_items)
                };
                log::warn!("spin rejected: {count} items, {} required", state.params.min_items);
                show_notice(state, &msg, now);
                return;
            }

            let overshoot = sample_overshoot(&state.params);
            let session =
                SpinSession::begin(state.wheel.rotation_deg(), overshoot, count, now);
            log::info!(
                "spin started: {count} items, {:.0} -> {:.0} deg over {:.0} ms",
                session.start_angle(),
                session.target_angle(),
                state.params.duration_ms
            );
            state.session = Some(session);
        }
    });
}

fn handle_reset() {
    WIDGET_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            // Reset also cancels an in-flight spin.
            state.session = None;
            state.wheel.reset();
            state.flick_start_ms = f64::NEG_INFINITY;
            state.canvas.set_attribute("style", &canvas_style(0.0)).ok();
            refresh_wheel_dom(state);
            log::debug!("wheel reset");
        }
    });
    set_modal_visible(false);
}

// --- Frame loop --------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        WIDGET_STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                frame_tick(state, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn frame_tick(state: &mut WidgetState, now: f64) {
    // Advance an active spin and apply its effects.
    let mut resolved: Option<(SpinSession, f64)> = None;
    if let Some(session) = state.session.as_mut() {
        let upd = session.frame(now, &state.params);
        state.wheel.set_rotation_deg(upd.angle);
        state
            .canvas
            .set_attribute("style", &canvas_style(upd.angle))
            .ok();
        if upd.crossed_boundary {
            // Visual pulse always restarts; the audio gate decides sound.
            state.flick_start_ms = now;
            state.audio.trigger(now);
        }
        if upd.finished {
            resolved = Some((*session, upd.angle));
        }
    }
    if let Some((session, final_angle)) = resolved {
        state.session = None;
        let index = session.resolve(final_angle);
        match state.wheel.label(index) {
            Some(label) => {
                log::info!(
                    "spin resolved: {:.1} deg -> slice {index} ({label})",
                    spin::normalize_deg(final_angle)
                );
                show_winner(label);
            }
            // Items were removed mid-spin; there is nothing to announce.
            None => log::warn!(
                "winning slice {index} gone (wheel had {} items at spin start)",
                session.item_count()
            ),
        }
    }

    // Pointer pulse: quick kick on the boundary crossing, eased back.
    if state.flick_start_ms.is_finite() {
        let t = ((now - state.flick_start_ms) / FLICK_PULSE_MS).clamp(0.0, 1.0);
        let scale = 1.0 + FLICK_PULSE_SCALE * (1.0 - t);
        if let Some(doc) = window().and_then(|w| w.document()) {
            if let Some(el) = doc.get_element_by_id("lw-pointer") {
                el.set_attribute(
                    "style",
                    &pointer_style(state.wheel.item_count() > 0, scale),
                )
                .ok();
            }
        }
        if t >= 1.0 {
            state.flick_start_ms = f64::NEG_INFINITY;
        }
    }

    // Expire the warning notice.
    if state.notice_until_ms.is_finite() && now >= state.notice_until_ms {
        state.notice_until_ms = f64::NEG_INFINITY;
        if let Some(doc) = window().and_then(|w| w.document()) {
            if let Some(el) = doc.get_element_by_id("lw-notice") {
                el.set_attribute("style", &notice_style(false)).ok();
            }
        }
    }
}

// --- DOM sync ----------------------------------------------------------------

/// Redraw the wheel, rebuild the visible item list, and sync the pointer
/// visibility after any list mutation.
fn refresh_wheel_dom(state: &WidgetState) {
    render::draw_wheel(&state.canvas, &state.ctx, state.wheel.items());
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(el) = doc.get_element_by_id("lw-pointer") {
        el.set_attribute("style", &pointer_style(state.wheel.item_count() > 0, 1.0))
            .ok();
    }
    sync_item_list(&doc, &state.wheel);
}

fn sync_item_list(doc: &Document, wheel: &WheelState) {
    let Some(list) = doc.get_element_by_id("lw-item-list") else {
        return;
    };
    let mut html = String::new();
    for (i, label) in wheel.items().iter().enumerate() {
        html.push_str(&format!(
            concat!(
                "<li style='display:flex; justify-content:space-between; align-items:center; ",
                "padding:6px 10px; margin-bottom:6px; background:rgba(0,0,0,0.42); ",
                "border:1px solid #333; border-radius:6px;'>",
                "<span>{}</span>",
                "<button data-index='{}' style='background:none; border:none; cursor:pointer; font-size:16px;'>\u{1F5D1}\u{FE0F}</button>",
                "</li>",
            ),
            escape_html(label),
            i
        ));
    }
    list.set_inner_html(&html);
}

fn show_notice(state: &mut WidgetState, message: &str, now: f64) {
    state.notice_until_ms = now + NOTICE_DURATION_MS;
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("lw-notice") {
            el.set_text_content(Some(message));
            el.set_attribute("style", &notice_style(true)).ok();
        }
    }
}

fn show_winner(label: &str) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("lw-winner-text") {
            el.set_text_content(Some(label));
        }
    }
    set_modal_visible(true);
}

fn set_modal_visible(visible: bool) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("lw-winner-modal") {
            el.set_attribute("style", &modal_style(visible)).ok();
        }
    }
}

// --- Styles ------------------------------------------------------------------

fn canvas_style(rotation_deg: f64) -> String {
    format!(
        "position:fixed; left:50%; top:45%; transform:translate(-50%,-50%) rotate({rotation_deg}deg); z-index:20;"
    )
}

fn pointer_style(visible: bool, scale: f64) -> String {
    format!(
        concat!(
            "position:fixed; left:50%; top:45%; ",
            "transform:translate(-50%, -{}px) scale({}); ",
            "width:0; height:0; border-left:14px solid transparent; ",
            "border-right:14px solid transparent; border-top:30px solid #D0021B; ",
            "pointer-events:none; z-index:30; display:{};"
        ),
        render::WHEEL_RADIUS + 24.0,
        scale,
        if visible { "block" } else { "none" }
    )
}

fn notice_style(visible: bool) -> String {
    format!(
        concat!(
            "position:fixed; top:18px; left:50%; transform:translateX(-50%); ",
            "padding:8px 14px; background:rgba(208,2,27,0.92); color:#fff; ",
            "border-radius:6px; font-family:Arial, sans-serif; z-index:60; display:{};"
        ),
        if visible { "block" } else { "none" }
    )
}

fn modal_style(visible: bool) -> String {
    format!(
        concat!(
            "position:fixed; inset:0; background:rgba(0,0,0,0.55); ",
            "align-items:center; justify-content:center; z-index:50; display:{};"
        ),
        if visible { "flex" } else { "none" }
    )
}

// --- Helpers -----------------------------------------------------------------

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Uniform draw from the configured overshoot range.
fn sample_overshoot(params: &SpinParams) -> f64 {
    let span = (params.max_overshoot_deg - params.min_overshoot_deg).max(0.0);
    params.min_overshoot_deg + rand_unit() * span
}

/// Uniform f64 in [0, 1).
fn rand_unit() -> f64 {
    #[cfg(feature = "rng")]
    {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            return (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64;
        }
    }
    // performance.now()-based arithmetic fallback (not crypto secure)
    let mixed = performance_now()
        .to_bits()
        .wrapping_mul(1664525)
        .wrapping_add(1013904223);
    (mixed >> 11) as f64 / (1u64 << 53) as f64
}

/// Item labels are user text rendered through set_inner_html; escape them.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<img src=x onerror=alert('1')>"),
            "&lt;img src=x onerror=alert(&#39;1&#39;)&gt;"
        );
        assert_eq!(escape_html("Fish & Chips"), "Fish &amp; Chips");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn overshoot_sample_stays_in_range() {
        let params = SpinParams::default();
        for _ in 0..64 {
            let v = sample_overshoot(&params);
            assert!(v >= params.min_overshoot_deg && v < params.max_overshoot_deg);
        }
    }

    #[test]
    fn overshoot_handles_degenerate_range() {
        let params = SpinParams {
            min_overshoot_deg: 1800.0,
            max_overshoot_deg: 1800.0,
            ..SpinParams::default()
        };
        assert_eq!(sample_overshoot(&params), 1800.0);
    }
}
