//! Lucky Wheel core crate.
//!
//! A self-contained spin-the-wheel picker for the browser: the widget builds
//! its own DOM (canvas, pointer, input row, item list, winner modal), drives
//! the spin through a requestAnimationFrame loop, and maps the final rotation
//! back to a winning item under the fixed-pointer convention. The spin
//! physics and winner resolution live in [`wheel::spin`] and run natively
//! for tests; only the glue in [`wheel`] touches the browser.

use wasm_bindgen::prelude::*;

pub mod wheel;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// -----------------------------------------------------------------------------
// Shared wheel palette, cycled per slice (slice i is filled with
// WHEEL_COLORS[i % WHEEL_COLORS.len()] at reduced opacity).
// -----------------------------------------------------------------------------

pub const WHEEL_COLORS: &[&str] = &[
    "#4A90E2", "#50E3C2", "#F5A623", "#D0021B", "#BD10E0", "#B8E986",
];

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

/// Mount the widget with the default spin parameters (8 s quintic spin,
/// 4000-8000 degrees of overshoot, two items required to spin).
#[wasm_bindgen]
pub fn start_wheel() -> Result<(), JsValue> {
    wheel::start_wheel_widget(wheel::spin::SpinParams::default())
}

/// Mount the widget with explicit spin parameters. `easing` accepts
/// "cubic" or "quintic"; unknown names fall back to quintic.
#[wasm_bindgen]
pub fn start_wheel_with(
    duration_ms: f64,
    min_overshoot_deg: f64,
    max_overshoot_deg: f64,
    min_items: u32,
    easing: &str,
) -> Result<(), JsValue> {
    let params = wheel::spin::SpinParams {
        duration_ms,
        min_overshoot_deg,
        max_overshoot_deg,
        min_items: min_items as usize,
        easing: wheel::spin::Easing::from_name(easing),
    };
    wheel::start_wheel_widget(params)
}
