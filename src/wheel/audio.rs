//! Tick ("flick") sound playback with a rate limiter.
//!
//! Slices shrink as items are added, so near the end of a long spin the
//! boundary crossings can outrun the audio engine. The gate suppresses
//! audible ticks that land within a minimum gap of the previous one; the
//! visual pointer pulse is not gated and always restarts.

use web_sys::HtmlAudioElement;

/// Minimum spacing between audible ticks.
pub const MIN_TICK_GAP_MS: f64 = 90.0;

/// Pure debounce: `allow` answers whether a tick at `now` may be audible and
/// records it when it is.
#[derive(Clone, Copy, Debug)]
pub struct TickGate {
    min_gap_ms: f64,
    last_tick_ms: f64,
}

impl TickGate {
    pub fn new(min_gap_ms: f64) -> Self {
        Self {
            min_gap_ms,
            // Far in the past so the first tick is always audible.
            last_tick_ms: f64::NEG_INFINITY,
        }
    }

    pub fn allow(&mut self, now: f64) -> bool {
        if now - self.last_tick_ms > self.min_gap_ms {
            self.last_tick_ms = now;
            true
        } else {
            false
        }
    }
}

/// The clack sample. Created once at widget start; a missing or blocked
/// audio element degrades to a silent wheel rather than an error.
pub struct FlickAudio {
    element: Option<HtmlAudioElement>,
    gate: TickGate,
}

impl FlickAudio {
    pub fn new(src: &str) -> Self {
        Self {
            element: HtmlAudioElement::new_with_src(src).ok(),
            gate: TickGate::new(MIN_TICK_GAP_MS),
        }
    }

    /// Play the tick if the gate allows it. Restart-from-start on rapid
    /// re-trigger (stop, rewind, play), never overlapping playbacks.
    pub fn trigger(&mut self, now: f64) {
        if !self.gate.allow(now) {
            return;
        }
        if let Some(el) = &self.element {
            el.pause().ok();
            el.set_current_time(0.0);
            // Autoplay policies may reject the returned promise; ignore it.
            let _ = el.play();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_always_audible() {
        let mut gate = TickGate::new(MIN_TICK_GAP_MS);
        assert!(gate.allow(0.0));
    }

    #[test]
    fn gate_suppresses_ticks_inside_the_gap() {
        let mut gate = TickGate::new(90.0);
        assert!(gate.allow(1000.0));
        assert!(!gate.allow(1050.0));
        assert!(!gate.allow(1090.0)); // exactly at the gap is still too soon
        assert!(gate.allow(1091.0));
    }

    #[test]
    fn suppressed_ticks_do_not_extend_the_gap() {
        let mut gate = TickGate::new(90.0);
        assert!(gate.allow(0.0));
        assert!(!gate.allow(89.0));
        // 91ms after the last *audible* tick, not after the suppressed one.
        assert!(gate.allow(91.0));
    }
}
