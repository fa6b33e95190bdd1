//! Animated value transitions and alarm pulsation.
//!
//! Two independent effects, at most one instance of each per widget:
//!
//! # Value Transition
//!
//! On a value change with smooth transitions enabled, the widget
//! interpolates across a fixed 20 discrete steps using a cubic ease-in-out
//! curve. The interpolation happens on the underlying domain value, and
//! percentage/LEDs/color are re-derived from it at every step; lerping the
//! rendered percentage instead would distort the non-linear bidirectional
//! mapping mid-flight. Starting a new transition cancels the one in flight
//! and restarts from the last rendered value.
//!
//! # Alarm Pulsation
//!
//! While the real (non-normalized) value sits inside the configured alarm
//! sub-range, a sinusoidal wave on a ~60 Hz cadence scales the center
//! glow between the configured minimum intensity and full intensity. The
//! wave phase is derived from elapsed time, not tick count, so a delayed
//! tick cannot distort the period. Leaving the range stops the effect and
//! restores the static glow from the last resolved color. Purely visual;
//! the numeric readout is never touched.

use std::f32::consts::TAU;
use std::time::Duration;

/// Number of discrete interpolation steps per value transition.
pub const TRANSITION_STEPS: u32 = 20;

/// Cadence of pulsation ticks (~60 updates per second).
pub const PULSE_TICK: Duration = Duration::from_millis(16);

/// Cubic ease-in-out: `t < 0.5: 4t³, else 1 − (−2t + 2)³ / 2`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

// =============================================================================
// Value Transition
// =============================================================================

/// One in-flight value transition. The scheduler drives [`advance`] once
/// per step; after [`TRANSITION_STEPS`] steps the owner drops the handle.
///
/// [`advance`]: ValueTransition::advance
#[derive(Clone, Copy, Debug)]
pub struct ValueTransition {
    from: f32,
    to: f32,
    step: u32,
}

impl ValueTransition {
    /// Start a transition. `from` is the last RENDERED value, which for a
    /// replaced transition is wherever the previous one got to, not its
    /// original start.
    pub const fn new(from: f32, to: f32) -> Self {
        Self { from, to, step: 0 }
    }

    pub const fn target(&self) -> f32 {
        self.to
    }

    /// Domain value at a given step. The final step returns the target
    /// exactly, so a completed transition is indistinguishable from a
    /// direct (non-animated) update.
    pub fn value_at(&self, step: u32) -> f32 {
        if step >= TRANSITION_STEPS {
            return self.to;
        }
        let progress = step as f32 / TRANSITION_STEPS as f32;
        let eased = ease_in_out_cubic(progress);
        (self.to - self.from).mul_add(eased, self.from)
    }

    /// Advance one step and return the interpolated domain value.
    pub fn advance(&mut self) -> f32 {
        self.step = (self.step + 1).min(TRANSITION_STEPS);
        self.value_at(self.step)
    }

    pub const fn is_complete(&self) -> bool {
        self.step >= TRANSITION_STEPS
    }

    /// Interval between steps for a configured total duration.
    pub fn step_duration(total: Duration) -> Duration {
        total / TRANSITION_STEPS
    }
}

// =============================================================================
// Alarm Pulsation
// =============================================================================

/// Pulsation parameters for the alarm glow.
#[derive(Clone, Copy, Debug)]
pub struct Pulsation {
    period: Duration,
    min_intensity: f32,
}

impl Pulsation {
    pub fn new(period: Duration, min_intensity: f32) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            min_intensity: min_intensity.clamp(0.0, 1.0),
        }
    }

    /// Glow intensity in `[min_intensity, 1]` at a point in the cycle.
    ///
    /// The wave starts at minimum intensity, peaks at half period and
    /// returns to minimum at the full period.
    pub fn intensity_at(&self, elapsed: Duration) -> f32 {
        let phase = (elapsed.as_secs_f32() / self.period.as_secs_f32()).fract();
        let wave = 0.5 - 0.5 * (TAU * phase).cos();
        (1.0 - self.min_intensity).mul_add(wave, self.min_intensity)
    }
}

/// Whether a real (non-normalized) value lies within the alarm sub-range.
pub fn in_alarm_range(value: f32, low: f32, high: f32) -> bool {
    value >= low && value <= high
}

// =============================================================================
// Unit Tests
// =============================================================================
