//! Color constants and conversions for the LED ring gauge.
//!
//! # Rgb565 Color Format
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! - Red: 0-31 (5 bits)
//! - Green: 0-63 (6 bits)
//! - Blue: 0-31 (5 bits)
//!
//! Configuration colors are authored as `#rrggbb` hex strings and converted
//! to Rgb565 once at configuration-parse time.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use embedded_graphics::prelude::IntoStorage;

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Theme backgrounds and dark text.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Readout text on dark themes, default marker color.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Topmost default severity band.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure yellow. Middle default severity band.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Gauge Palette
// =============================================================================

/// Default severity green (material `#4caf50`).
pub const SEVERITY_GREEN: Rgb565 = Rgb565::new(9, 43, 10);

/// Default severity yellow (material `#ffeb3b`).
pub const SEVERITY_YELLOW: Rgb565 = Rgb565::new(31, 58, 7);

/// Default severity red (material `#f44336`).
pub const SEVERITY_RED: Rgb565 = Rgb565::new(30, 16, 6);

/// Sentinel color when no severity band matches (value over range).
/// A neutral `#555` gray.
pub const OVER_RANGE: Rgb565 = Rgb565::new(10, 21, 10);

/// Unlit LED cell fill (`#333`).
pub const UNLIT: Rgb565 = Rgb565::new(6, 12, 6);

/// Secondary text (units, labels) on dark themes.
pub const SECONDARY_TEXT: Rgb565 = Rgb565::new(27, 55, 27);

/// Trend arrow colors: rising green, falling red, flat yellow.
pub const TREND_RISING: Rgb565 = SEVERITY_GREEN;
pub const TREND_FALLING: Rgb565 = SEVERITY_RED;
pub const TREND_FLAT: Rgb565 = SEVERITY_YELLOW;

// =============================================================================
// Conversion Helpers
// =============================================================================

/// Parse a `#rrggbb` (or `#rgb`) hex color string into Rgb565.
///
/// Returns `None` for anything that is not a well-formed hex color.
pub fn parse_hex(s: &str) -> Option<Rgb565> {
    let hex = s.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        6 => (
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ),
        3 => {
            let c = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
            (c(0).ok()?, c(1).ok()?, c(2).ok()?)
        }
        _ => return None,
    };
    Some(Rgb888::new(r, g, b).into())
}

/// Automatic color for a dynamic marker, keyed by the source's domain.
///
/// Unrecognized domains fall back to green, same as an unset color.
pub fn domain_color(domain: &str) -> Rgb565 {
    match domain {
        "sensor" => Rgb565::new(4, 37, 30),         // blue #2196f3
        "input_number" => SEVERITY_GREEN,           // green #4caf50
        "climate" => Rgb565::new(31, 38, 0),        // orange #ff9800
        "light" => Rgb565::new(31, 48, 1),          // amber #ffc107
        "switch" => Rgb565::new(19, 9, 22),         // purple #9c27b0
        "binary_sensor" => Rgb565::new(0, 47, 26),  // cyan #00bcd4
        _ => SEVERITY_GREEN,
    }
}

/// Scale a color toward black by `intensity` in [0, 1].
///
/// Used to render the pulsating glow: full intensity keeps the resolved
/// color, lower intensities dim it. Intensity is clamped to [0, 1].
pub fn scale(color: Rgb565, intensity: f32) -> Rgb565 {
    let t = intensity.clamp(0.0, 1.0);
    let raw = color.into_storage();
    let r = f32::from((raw >> 11) & 0x1F) * t;
    let g = f32::from((raw >> 5) & 0x3F) * t;
    let b = f32::from(raw & 0x1F) * t;
    Rgb565::new(r as u8, g as u8, b as u8)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_six_digits() {
        // #ff0000 -> pure red in Rgb565
        assert_eq!(parse_hex("#ff0000"), Some(RED));
        assert_eq!(parse_hex("#000000"), Some(BLACK));
        assert_eq!(parse_hex("#ffffff"), Some(WHITE));
    }

    #[test]
    fn test_parse_hex_three_digits() {
        // #f00 expands to #ff0000
        assert_eq!(parse_hex("#f00"), parse_hex("#ff0000"));
        assert_eq!(parse_hex("#fff"), Some(WHITE));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("red").is_none(), "named colors are not supported");
        assert!(parse_hex("#zzz").is_none(), "non-hex digits should fail");
        assert!(parse_hex("#12345").is_none(), "wrong length should fail");
        assert!(parse_hex("").is_none(), "empty string should fail");
    }

    #[test]
    fn test_domain_color_known_domains() {
        assert_ne!(domain_color("sensor"), domain_color("switch"));
        assert_eq!(domain_color("input_number"), SEVERITY_GREEN);
    }

    #[test]
    fn test_domain_color_fallback() {
        assert_eq!(domain_color("media_player"), SEVERITY_GREEN, "unknown domains fall back to green");
    }

    #[test]
    fn test_scale_full_intensity_is_identity() {
        assert_eq!(scale(SEVERITY_RED, 1.0), SEVERITY_RED);
        assert_eq!(scale(WHITE, 1.0), WHITE);
    }

    #[test]
    fn test_scale_zero_intensity_is_black() {
        assert_eq!(scale(SEVERITY_RED, 0.0), BLACK);
        assert_eq!(scale(WHITE, 0.0), BLACK);
    }

    #[test]
    fn test_scale_clamps_out_of_range_intensity() {
        assert_eq!(scale(WHITE, 2.0), WHITE, "intensity above 1 clamps to 1");
        assert_eq!(scale(WHITE, -1.0), BLACK, "negative intensity clamps to 0");
    }

    #[test]
    fn test_scale_half_dims_each_channel() {
        let dimmed = scale(WHITE, 0.5);
        let raw = dimmed.into_storage();
        let r = (raw >> 11) & 0x1F;
        let g = (raw >> 5) & 0x3F;
        assert!(r >= 14 && r <= 16, "red channel should be near half of 31, got {r}");
        assert!(g >= 30 && g <= 32, "green channel should be near half of 63, got {g}");
    }
}
