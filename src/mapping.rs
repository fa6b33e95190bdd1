//! Value-to-dial mapping engine.
//!
//! Pure math: converts a scalar value within a configured `[min, max]` range
//! into a normalized percentage, an angular dial position and an LED
//! activation count. No drawing happens here; the render layer is a thin
//! adapter over these functions.
//!
//! # Dial Angle Convention
//!
//! Dial angles are in degrees, `0` at the 12-o'clock position, increasing
//! clockwise. The layout applies the −90° rotation when
//! converting a dial angle to screen coordinates, so 0% renders at the top.
//!
//! # Bidirectional Mode
//!
//! The dial is split into two arcs around an adaptive reference point:
//! `0` if the range straddles zero, the range midpoint otherwise. Each
//! segment receives a share of the 360° circle (and of the LED count)
//! proportional to its share of the total range, so an asymmetric range
//! like `-10..90` does not waste half the dial on the smaller side.
//! Values at or above the reference walk clockwise from the top through
//! the upper allocation; values below walk counter-clockwise through the
//! lower allocation. The reference point always renders at the top.
//!
//! # Out-of-Range Values
//!
//! The primary update path does not clamp values into `[min, max]` before
//! computing the percentage; only the LED activation count is clamped into
//! the segment's allocation, and only marker positioning clamps the value
//! itself (see [`DialMapping::marker_angle`]).

/// LED activation result: how many cells light up and in which direction.
///
/// Clockwise activations start at LED index 0 (top); counter-clockwise
/// activations light the last `count` indices, walking backwards from the
/// top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedActivation {
    /// Number of lit LED cells within the segment's allocation.
    pub count: usize,
    /// Walk direction from the top of the dial.
    pub clockwise: bool,
}

/// Mapping from sensor values to dial geometry for one gauge instance.
#[derive(Clone, Copy, Debug)]
pub struct DialMapping {
    min: f32,
    max: f32,
    bidirectional: bool,
}

impl DialMapping {
    pub const fn new(min: f32, max: f32, bidirectional: bool) -> Self {
        Self { min, max, bidirectional }
    }

    /// Full-range normalized percentage: `(value - min) / (max - min) * 100`.
    ///
    /// Not clamped; values outside the range produce percentages outside
    /// `[0, 100]`. A zero-width range degenerates to 0 instead of dividing
    /// by zero.
    pub fn percentage(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range * 100.0
    }

    /// The adaptive reference point for bidirectional mode.
    ///
    /// `0` if the range straddles zero (`min <= 0 <= max`), the range
    /// midpoint otherwise.
    pub fn reference(&self) -> f32 {
        if self.min <= 0.0 && self.max >= 0.0 {
            0.0
        } else {
            (self.min + self.max) / 2.0
        }
    }

    /// Fraction of the total range below the reference point, in `[0, 1]`.
    ///
    /// The upper share is `1 - lower_share`; together they always account
    /// for the whole dial.
    pub fn lower_share(&self) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        ((self.reference() - self.min) / range).clamp(0.0, 1.0)
    }

    /// Dial angle for a value, honoring the configured mode.
    pub fn angle(&self, value: f32) -> f32 {
        if self.bidirectional {
            self.bidirectional_angle(value)
        } else {
            self.percentage(value) / 100.0 * 360.0
        }
    }

    /// Dial angle for a marker: the value is clamped into `[min, max]`
    /// before mapping, unlike the primary path.
    pub fn marker_angle(&self, value: f32) -> f32 {
        let clamped = if self.min <= self.max {
            value.clamp(self.min, self.max)
        } else {
            value
        };
        self.angle(clamped)
    }

    fn bidirectional_angle(&self, value: f32) -> f32 {
        let reference = self.reference();
        let lower_degrees = self.lower_share() * 360.0;
        let upper_degrees = 360.0 - lower_degrees;

        if value >= reference {
            let progress = segment_progress(value - reference, self.max - reference);
            progress * upper_degrees
        } else {
            let progress = segment_progress(reference - value, reference - self.min);
            // Counter-clockwise from the top; 360 wraps back to 0.
            (360.0 - progress * lower_degrees) % 360.0
        }
    }

    /// LED activation count and direction for a value.
    ///
    /// The count is `round(segment-progress × segment LED allocation)`,
    /// clamped into the allocation so out-of-range values can never light
    /// more cells than the segment owns.
    pub fn led_activation(&self, value: f32, led_count: usize) -> LedActivation {
        if !self.bidirectional {
            let progress = self.percentage(value) / 100.0;
            let count = round_clamped(progress * led_count as f32, led_count);
            return LedActivation { count, clockwise: true };
        }

        let reference = self.reference();
        let lower_leds = round_clamped(self.lower_share() * led_count as f32, led_count);
        let upper_leds = led_count - lower_leds;

        if value >= reference {
            let progress = segment_progress(value - reference, self.max - reference);
            LedActivation {
                count: round_clamped(progress * upper_leds as f32, upper_leds),
                clockwise: true,
            }
        } else {
            let progress = segment_progress(reference - value, reference - self.min);
            LedActivation {
                count: round_clamped(progress * lower_leds as f32, lower_leds),
                clockwise: false,
            }
        }
    }

    /// Split of the LED ring between the two segments: `(lower, upper)`.
    ///
    /// Sums to exactly `led_count`. In unidirectional mode the whole ring
    /// belongs to the upper (clockwise) walk.
    pub fn led_split(&self, led_count: usize) -> (usize, usize) {
        if !self.bidirectional {
            return (0, led_count);
        }
        let lower = round_clamped(self.lower_share() * led_count as f32, led_count);
        (lower, led_count - lower)
    }
}

/// Progress within one segment, degenerating to 0 for a zero-width segment.
fn segment_progress(offset: f32, span: f32) -> f32 {
    if span <= 0.0 { 0.0 } else { offset / span }
}

fn round_clamped(x: f32, max: usize) -> usize {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x.round() as usize).min(max)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn uni(min: f32, max: f32) -> DialMapping {
        DialMapping::new(min, max, false)
    }

    fn bidi(min: f32, max: f32) -> DialMapping {
        DialMapping::new(min, max, true)
    }

    // -------------------------------------------------------------------------
    // Percentage Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_percentage_endpoints() {
        let m = uni(0.0, 100.0);
        assert!((m.percentage(0.0) - 0.0).abs() < EPS, "percentage(min) must be 0");
        assert!((m.percentage(100.0) - 100.0).abs() < EPS, "percentage(max) must be 100");
    }

    #[test]
    fn test_percentage_offset_range() {
        let m = uni(-50.0, 150.0);
        assert!((m.percentage(-50.0)).abs() < EPS);
        assert!((m.percentage(50.0) - 50.0).abs() < EPS);
        assert!((m.percentage(150.0) - 100.0).abs() < EPS);
    }

    #[test]
    fn test_percentage_not_clamped_outside_range() {
        // Out-of-range primary values are deliberately not clamped.
        let m = uni(0.0, 100.0);
        assert!(m.percentage(120.0) > 100.0);
        assert!(m.percentage(-10.0) < 0.0);
    }

    #[test]
    fn test_percentage_zero_range_degenerates() {
        let m = uni(42.0, 42.0);
        assert_eq!(m.percentage(42.0), 0.0, "zero-width range must not divide by zero");
        assert_eq!(m.percentage(100.0), 0.0);
    }

    // -------------------------------------------------------------------------
    // Unidirectional Angle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_unidirectional_angle() {
        let m = uni(0.0, 100.0);
        assert!((m.angle(0.0)).abs() < EPS, "min renders at top (0 dial degrees)");
        assert!((m.angle(25.0) - 90.0).abs() < EPS);
        assert!((m.angle(50.0) - 180.0).abs() < EPS);
        assert!((m.angle(75.0) - 270.0).abs() < EPS);
    }

    // -------------------------------------------------------------------------
    // Bidirectional Reference Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_reference_straddles_zero() {
        assert_eq!(bidi(-50.0, 50.0).reference(), 0.0);
        assert_eq!(bidi(-10.0, 90.0).reference(), 0.0);
        assert_eq!(bidi(0.0, 100.0).reference(), 0.0, "min == 0 still straddles");
    }

    #[test]
    fn test_reference_midpoint_when_not_straddling() {
        assert_eq!(bidi(10.0, 30.0).reference(), 20.0);
        assert_eq!(bidi(-90.0, -10.0).reference(), -50.0);
    }

    #[test]
    fn test_reference_always_at_top() {
        // Angle of the reference point is 0 (top) for any range.
        for m in [bidi(-50.0, 50.0), bidi(-10.0, 90.0), bidi(10.0, 30.0), bidi(-90.0, -10.0)] {
            assert!(m.angle(m.reference()).abs() < EPS, "reference must render at the top");
        }
    }

    // -------------------------------------------------------------------------
    // Bidirectional Angle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_bidirectional_symmetric_negative_value() {
        // min=-50, max=50, value=-25.
        // Reference 0, lower segment spans 180 degrees, value is halfway
        // into the negative extent: counter-clockwise at 270 dial degrees.
        let m = bidi(-50.0, 50.0);
        assert!((m.angle(-25.0) - 270.0).abs() < EPS, "expected 270, got {}", m.angle(-25.0));
    }

    #[test]
    fn test_bidirectional_asymmetric_shares() {
        // -10..90 straddles zero: lower 10% of range, upper 90%.
        let m = bidi(-10.0, 90.0);
        assert!((m.lower_share() - 0.1).abs() < EPS);
        // Full positive extent lands 90% of the way around, clockwise.
        assert!((m.angle(90.0) - 324.0).abs() < EPS);
        // Full negative extent is 36 degrees counter-clockwise from top.
        assert!((m.angle(-10.0) - 324.0).abs() < EPS, "both extents meet opposite the reference");
    }

    #[test]
    fn test_bidirectional_segment_degrees_sum_to_360() {
        for m in [bidi(-50.0, 50.0), bidi(-10.0, 90.0), bidi(5.0, 25.0)] {
            let lower = m.lower_share() * 360.0;
            let upper = 360.0 - lower;
            assert!((lower + upper - 360.0).abs() < EPS);
        }
    }

    #[test]
    fn test_bidirectional_monotonic_within_segments() {
        let m = bidi(-50.0, 50.0);
        // Upper segment: clockwise angle grows with value.
        let mut prev = m.angle(0.0);
        for v in 1..=50 {
            let a = m.angle(v as f32);
            assert!(a >= prev, "upper segment angle must be monotonic");
            prev = a;
        }
        // Lower segment: counter-clockwise angle shrinks as value drops.
        let mut prev = m.angle(-1.0);
        for v in 2..=50 {
            let a = m.angle(-(v as f32));
            assert!(a <= prev, "lower segment angle must walk counter-clockwise");
            prev = a;
        }
    }

    #[test]
    fn test_bidirectional_zero_width_segment() {
        // min == reference: the lower segment has zero width. A value below
        // the reference must degenerate to 0% progress, not fault.
        let m = bidi(0.0, 100.0);
        assert_eq!(m.lower_share(), 0.0);
        assert!((m.angle(-5.0)).abs() < EPS, "zero-width segment degenerates to top");
        let act = m.led_activation(-5.0, 60);
        assert_eq!(act.count, 0);
    }

    // -------------------------------------------------------------------------
    // LED Activation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_led_activation_unidirectional() {
        // 0..100, value 75 -> 75% of the LED count.
        let m = uni(0.0, 100.0);
        let act = m.led_activation(75.0, 100);
        assert_eq!(act.count, 75);
        assert!(act.clockwise);
    }

    #[test]
    fn test_led_activation_rounds() {
        let m = uni(0.0, 100.0);
        assert_eq!(m.led_activation(50.0, 9).count, 5, "4.5 rounds up");
    }

    #[test]
    fn test_led_activation_clamped_to_allocation() {
        let m = uni(0.0, 100.0);
        assert_eq!(m.led_activation(150.0, 60).count, 60, "over-range lights at most every LED");
        assert_eq!(m.led_activation(-20.0, 60).count, 0, "under-range lights none");
    }

    #[test]
    fn test_led_activation_bidirectional_directions() {
        let m = bidi(-50.0, 50.0);
        let up = m.led_activation(25.0, 60);
        assert!(up.clockwise);
        assert_eq!(up.count, 15, "half of the upper 30-LED allocation");

        let down = m.led_activation(-25.0, 60);
        assert!(!down.clockwise);
        assert_eq!(down.count, 15, "half of the lower 30-LED allocation");
    }

    #[test]
    fn test_led_split_sums_to_total() {
        for (m, n) in [(bidi(-50.0, 50.0), 60), (bidi(-10.0, 90.0), 100), (bidi(3.0, 17.0), 33)] {
            let (lower, upper) = m.led_split(n);
            assert_eq!(lower + upper, n, "segment LED shares must sum to the configured count");
        }
    }

    #[test]
    fn test_led_split_unidirectional() {
        assert_eq!(uni(0.0, 100.0).led_split(100), (0, 100));
    }

    // -------------------------------------------------------------------------
    // Marker Angle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_marker_angle_clamps() {
        let m = uni(0.0, 100.0);
        assert!((m.marker_angle(150.0) - 360.0).abs() < EPS || m.marker_angle(150.0).abs() < EPS);
        assert!((m.marker_angle(-10.0)).abs() < EPS, "under-range markers pin to min");
    }
}

// =============================================================================
// Property Tests
// =============================================================================
