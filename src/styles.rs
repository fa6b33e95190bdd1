//! Pre-computed static text styles to avoid per-frame object construction.
//!
//! `MonoTextStyle` and `TextStyle` are cheap stack objects, but the gauge
//! redraws text every frame while animating; defining the styles as `const`
//! keeps them in the binary's read-only data section with no runtime
//! construction at all.
//!
//! Styles whose color depends on live state (theme text, severity-tinted
//! readouts) build a `MonoTextStyle::new(FONT, color)` at the call site
//! from the exposed font references; only the color varies, the font
//! reference is shared.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::FONT_6X10,
    },
    pixelcolor::Rgb565,
    text::{Alignment, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_12_POINT, PROFONT_24_POINT};

use crate::colors::SECONDARY_TEXT;

// =============================================================================
// Text Alignment Styles (const - zero runtime cost)
// =============================================================================

/// Centered text alignment. Used for the readout value, unit and name.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text. Used for marker labels right of the dial.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Right-aligned text. Used for marker labels left of the dial.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Large readout font (`ProFont` 24pt). The numeric value is tinted with
/// the theme text color: `MonoTextStyle::new(VALUE_FONT, theme.text)`.
pub const VALUE_FONT: &MonoFont = &PROFONT_24_POINT;

/// Medium font (`ProFont` 12pt) for the unit line and button icons.
pub const UNIT_FONT: &MonoFont = &PROFONT_12_POINT;

/// Small font (6x10) for the entity name and marker labels.
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

// =============================================================================
// Pre-computed Text Styles (const - zero runtime cost)
// =============================================================================

/// Small dimmed text for the entity name and unit on dark themes.
pub const LABEL_STYLE_SECONDARY: MonoTextStyle<'static, Rgb565> =
    MonoTextStyle::new(&FONT_6X10, SECONDARY_TEXT);
