//! Spin physics and winner resolution.
//!
//! Everything here is pure: the session is advanced by feeding it timestamps,
//! so the whole state machine runs under native `cargo test` with synthetic
//! clocks. The rAF driver in the parent module owns the real clock.

// --- Pointer frame constants -------------------------------------------------

/// Canvas angles start at 3 o'clock and grow clockwise; the pointer graphic
/// sits at the top of the wheel, 90 degrees past that origin. Both constants
/// follow from the pointer placement, not from tuning.
pub const POINTER_OFFSET_DEG: f64 = 90.0;
/// Position of the fixed pointer in the canvas's native angular frame.
pub const POINTER_ANGLE_DEG: f64 = 270.0;
pub const FULL_TURN_DEG: f64 = 360.0;

// --- Easing ------------------------------------------------------------------

/// Deceleration curve applied to normalized time progress. Cosmetic only:
/// the winner depends solely on the target angle, never on the path there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// 1 - (1-t)^3
    CubicOut,
    /// 1 - (1-t)^5, slower final approach than cubic
    QuinticOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuinticOut => 1.0 - (1.0 - t).powi(5),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "cubic" => Easing::CubicOut,
            _ => Easing::QuinticOut,
        }
    }
}

// --- Parameters --------------------------------------------------------------

/// Configuration for one widget instance. The defaults are the long-spin
/// preset (8 s, quintic); `duration_ms = 4000.0` with `Easing::CubicOut` and
/// 1800-3600 degrees of overshoot gives the short preset.
#[derive(Clone, Copy, Debug)]
pub struct SpinParams {
    /// Total animation wall-clock time.
    pub duration_ms: f64,
    /// Lower bound of the random extra rotation added at spin start.
    pub min_overshoot_deg: f64,
    /// Upper bound of the random extra rotation.
    pub max_overshoot_deg: f64,
    pub easing: Easing,
    /// Items required before a spin may start (2 canonical, 1 permitted).
    pub min_items: usize,
}

impl Default for SpinParams {
    fn default() -> Self {
        Self {
            duration_ms: 8000.0,
            min_overshoot_deg: 4000.0,
            max_overshoot_deg: 8000.0,
            easing: Easing::QuinticOut,
            min_items: 2,
        }
    }
}

// --- Angle helpers -----------------------------------------------------------

/// Angular span of one slice when `item_count` items share the wheel.
/// Callers guard `item_count == 0`.
pub fn slice_angle(item_count: usize) -> f64 {
    FULL_TURN_DEG / item_count as f64
}

/// Non-negative `v mod 360`. Plain `%` yields negative results for negative
/// operands, which would break the resolution formula.
pub fn normalize_deg(v: f64) -> f64 {
    ((v % FULL_TURN_DEG) + FULL_TURN_DEG) % FULL_TURN_DEG
}

/// Map a normalized rotation to the slice under the fixed pointer.
///
/// Slice 0 spans `[0, slice_angle)` in the wheel's own frame; rotating the
/// wheel clockwise by `actual_rotation` moves the boundaries, and the slice
/// under the pointer is recovered by measuring backward from
/// [`POINTER_ANGLE_DEG`]. Holds for every `item_count >= 1` and every
/// `actual_rotation` in `[0, 360)`.
pub fn winning_index(actual_rotation: f64, item_count: usize) -> usize {
    let offset = normalize_deg(POINTER_ANGLE_DEG - actual_rotation);
    let idx = (offset / slice_angle(item_count)).floor() as usize;
    // Rounding in the division can land exactly on item_count at the last
    // boundary; the index contract is [0, item_count).
    idx.min(item_count - 1)
}

// --- Spin session ------------------------------------------------------------

/// What one frame of an active spin produced.
#[derive(Clone, Copy, Debug)]
pub struct FrameUpdate {
    /// Cumulative rotation to display this frame.
    pub angle: f64,
    /// A slice boundary passed under the pointer since the previous frame.
    pub crossed_boundary: bool,
    /// Progress reached 1; the session is complete and must be resolved.
    pub finished: bool,
}

/// Transient state of a single spin, created at spin start and discarded at
/// resolution. Slice angle and item count are captured here so list edits
/// during the animation cannot skew tick detection or resolution.
#[derive(Clone, Copy, Debug)]
pub struct SpinSession {
    start_angle: f64,
    target_angle: f64,
    start_ms: f64,
    slice_angle: f64,
    item_count: usize,
    last_section: i64,
}

impl SpinSession {
    /// Begin a spin from `start_angle` (the wheel's current cumulative
    /// rotation) with a pre-sampled overshoot. `now` is the start timestamp
    /// in the same clock the frame loop feeds to [`SpinSession::frame`].
    pub fn begin(start_angle: f64, overshoot_deg: f64, item_count: usize, now: f64) -> Self {
        let slice = slice_angle(item_count);
        Self {
            start_angle,
            target_angle: start_angle + overshoot_deg,
            start_ms: now,
            slice_angle: slice,
            item_count,
            last_section: section_at(start_angle, slice),
        }
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn target_angle(&self) -> f64 {
        self.target_angle
    }

    /// Advance the session to `now`. Pure: no clock reads, no side effects.
    pub fn frame(&mut self, now: f64, params: &SpinParams) -> FrameUpdate {
        let elapsed = (now - self.start_ms).max(0.0);
        let progress = (elapsed / params.duration_ms).min(1.0);
        let eased = params.easing.apply(progress);
        let angle = self.start_angle + (self.target_angle - self.start_angle) * eased;

        let section = section_at(angle, self.slice_angle);
        let crossed_boundary = section > self.last_section;
        if crossed_boundary {
            self.last_section = section;
        }

        FrameUpdate {
            angle,
            crossed_boundary,
            finished: progress >= 1.0,
        }
    }

    /// Resolve the winning slice for the session's final angle. Uses the
    /// item count captured at spin start.
    pub fn resolve(&self, final_angle: f64) -> usize {
        winning_index(normalize_deg(final_angle), self.item_count)
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }
}

fn section_at(angle: f64, slice_angle: f64) -> i64 {
    ((angle + POINTER_OFFSET_DEG) / slice_angle).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_non_negative() {
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(725.0), 5.0);
        assert!((normalize_deg(-0.25) - 359.75).abs() < 1e-9);
    }

    #[test]
    fn winning_index_four_slices() {
        // Slices: A [0,90), B [90,180), C [180,270), D [270,360).
        assert_eq!(winning_index(0.0, 4), 3); // pointer at 270 -> "D"
        assert_eq!(winning_index(90.0, 4), 2); // normalize(180)/90 -> "C"
        assert_eq!(winning_index(180.0, 4), 1);
        assert_eq!(winning_index(270.0, 4), 0);
    }

    #[test]
    fn winning_index_single_item() {
        for deg in 0..360 {
            assert_eq!(winning_index(deg as f64, 1), 0);
        }
    }

    #[test]
    fn winning_index_stays_in_bounds() {
        for n in 1..=24usize {
            for tenth in 0..3600 {
                let rot = tenth as f64 / 10.0;
                assert!(winning_index(rot, n) < n, "n={n} rot={rot}");
            }
        }
    }

    #[test]
    fn easing_endpoints_and_order() {
        for e in [Easing::CubicOut, Easing::QuinticOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        // Quintic holds back the final approach longer than cubic.
        assert!(Easing::QuinticOut.apply(0.9) < Easing::CubicOut.apply(0.9));
    }

    #[test]
    fn session_ticks_once_per_boundary() {
        let params = SpinParams {
            duration_ms: 1000.0,
            easing: Easing::CubicOut,
            ..SpinParams::default()
        };
        // 4 slices, 360 degrees of travel: expect exactly 4 boundary ticks.
        let mut session = SpinSession::begin(0.0, 360.0, 4, 0.0);
        let mut ticks = 0;
        for step in 1..=1000 {
            let upd = session.frame(step as f64, &params);
            if upd.crossed_boundary {
                ticks += 1;
            }
        }
        assert_eq!(ticks, 4);
    }
}
