//! Severity band resolution: maps a normalized value to a color token.
//!
//! Bands are declared in real-world sensor units (liters, degrees) and are
//! converted into percentage space using the gauge's configured `min`/`max`
//! at evaluation time, not at configuration time. This lets a band list be
//! shared between gauges whose ranges differ.
//!
//! Evaluation walks the band list in declared order; the first band whose
//! converted threshold is at or above the value's percentage wins. When no
//! band matches, the neutral over-range sentinel applies.

use embedded_graphics::pixelcolor::Rgb565;

use crate::colors::{OVER_RANGE, SEVERITY_GREEN, SEVERITY_RED, SEVERITY_YELLOW};

/// One coloring rule: values up to `threshold` (in sensor units) use `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeverityBand {
    /// Upper bound in real-world sensor units.
    pub threshold: f32,
    pub color: Rgb565,
}

/// Built-in default thresholds, in percentage space:
/// up to 20% green, up to 50% yellow, up to 100% red.
const DEFAULT_THRESHOLDS: [(f32, Rgb565); 3] = [
    (20.0, SEVERITY_GREEN),
    (50.0, SEVERITY_YELLOW),
    (100.0, SEVERITY_RED),
];

/// Resolve the color for a full-range normalized percentage.
///
/// `bands` is the configured list (empty means "use the built-in default").
/// Declared thresholds are converted to percentage space with the same
/// `(t - min) / (max - min) * 100` formula the mapping engine uses for
/// values, so resolution is invariant under uniform rescaling of the range.
pub fn resolve(percentage: f32, bands: &[SeverityBand], min: f32, max: f32) -> Rgb565 {
    if bands.is_empty() {
        for (threshold, color) in DEFAULT_THRESHOLDS {
            if percentage <= threshold {
                return color;
            }
        }
        return OVER_RANGE;
    }

    let range = max - min;
    for band in bands {
        let threshold_pct = if range == 0.0 {
            0.0
        } else {
            (band.threshold - min) / range * 100.0
        };
        if percentage <= threshold_pct {
            return band.color;
        }
    }
    OVER_RANGE
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, WHITE};

    #[test]
    fn test_default_bands() {
        assert_eq!(resolve(0.0, &[], 0.0, 100.0), SEVERITY_GREEN);
        assert_eq!(resolve(20.0, &[], 0.0, 100.0), SEVERITY_GREEN, "band bounds are inclusive");
        assert_eq!(resolve(35.0, &[], 0.0, 100.0), SEVERITY_YELLOW);
        assert_eq!(resolve(75.0, &[], 0.0, 100.0), SEVERITY_RED, "75% is red (75 > 50)");
        assert_eq!(resolve(100.0, &[], 0.0, 100.0), SEVERITY_RED);
    }

    #[test]
    fn test_default_over_range() {
        assert_eq!(resolve(120.0, &[], 0.0, 100.0), OVER_RANGE, "no band matches above 100%");
    }

    #[test]
    fn test_unit_space_thresholds() {
        // 0..3000 L tank: "red until 750 L" means the band threshold is a
        // real value, compared at 25% after conversion.
        let bands = [
            SeverityBand { threshold: 750.0, color: SEVERITY_RED },
            SeverityBand { threshold: 3000.0, color: SEVERITY_GREEN },
        ];
        assert_eq!(resolve(10.0, &bands, 0.0, 3000.0), SEVERITY_RED);
        assert_eq!(resolve(25.0, &bands, 0.0, 3000.0), SEVERITY_RED, "exactly at the converted bound");
        assert_eq!(resolve(26.0, &bands, 0.0, 3000.0), SEVERITY_GREEN);
    }

    #[test]
    fn test_declared_order_wins() {
        // First matching band wins even if a later band also matches.
        let bands = [
            SeverityBand { threshold: 50.0, color: WHITE },
            SeverityBand { threshold: 50.0, color: BLACK },
        ];
        assert_eq!(resolve(40.0, &bands, 0.0, 100.0), WHITE);
    }

    #[test]
    fn test_rescale_invariance() {
        // Same relative position, uniformly rescaled range and thresholds:
        // the resolved color must not change.
        let small = [
            SeverityBand { threshold: 20.0, color: SEVERITY_GREEN },
            SeverityBand { threshold: 100.0, color: SEVERITY_RED },
        ];
        let large = [
            SeverityBand { threshold: 2000.0, color: SEVERITY_GREEN },
            SeverityBand { threshold: 10000.0, color: SEVERITY_RED },
        ];
        for pct in [0.0, 10.0, 20.0, 21.0, 55.0, 100.0] {
            assert_eq!(
                resolve(pct, &small, 0.0, 100.0),
                resolve(pct, &large, 0.0, 10000.0),
                "resolution must be invariant under uniform rescaling at {pct}%"
            );
        }
    }

    #[test]
    fn test_zero_range_uses_sentinel_past_zero() {
        let bands = [SeverityBand { threshold: 50.0, color: SEVERITY_GREEN }];
        // Zero-width range converts every threshold to 0%.
        assert_eq!(resolve(0.0, &bands, 42.0, 42.0), SEVERITY_GREEN);
        assert_eq!(resolve(1.0, &bands, 42.0, 42.0), OVER_RANGE);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Rescaling min/max and thresholds by the same positive factor
        /// never changes the resolved color.
        #[test]
        fn rescale_invariant(pct in -20.0f32..140.0, scale in 0.01f32..1000.0) {
            // Stay away from band boundaries where float rounding of the
            // converted threshold could legitimately flip the result.
            prop_assume!([30.0f32, 70.0, 100.0].iter().all(|t| (pct - t).abs() > 1e-2));
            let base = [
                SeverityBand { threshold: 30.0, color: SEVERITY_GREEN },
                SeverityBand { threshold: 70.0, color: SEVERITY_YELLOW },
                SeverityBand { threshold: 100.0, color: SEVERITY_RED },
            ];
            let scaled: Vec<SeverityBand> = base
                .iter()
                .map(|b| SeverityBand { threshold: b.threshold * scale, color: b.color })
                .collect();
            prop_assert_eq!(
                resolve(pct, &base, 0.0, 100.0),
                resolve(pct, &scaled, 0.0, 100.0 * scale)
            );
        }
    }
}
