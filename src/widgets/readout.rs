//! Center readout: disc, glow, numeric value, unit, name and trend arrow.
//!
//! The numeric readout always shows the real value formatted to the
//! configured decimal count. Visual effects (glow pulsation, transitions)
//! never touch the displayed number; during a transition the caller passes
//! the interpolated value, which converges on the exact target at the final
//! step.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{self, TREND_FALLING, TREND_FLAT, TREND_RISING};
use crate::config::Theme;
use crate::layout::GaugeLayout;
use crate::styles::{CENTERED, LABEL_STYLE_SECONDARY, UNIT_FONT, VALUE_FONT};

/// Direction of recent value movement, shown as a small arrow under the
/// readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

impl Trend {
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Rising => TREND_RISING,
            Self::Falling => TREND_FALLING,
            Self::Flat => TREND_FLAT,
        }
    }
}

/// Format a value with a fixed number of decimals into a stack string.
///
/// Width 16 covers any f32 at up to 6 decimals; on the absurd overflow
/// case the string truncates rather than panicking.
pub fn format_value(value: f32, decimals: u32) -> String<16> {
    let mut s = String::new();
    write!(s, "{:.*}", decimals as usize, value).ok();
    s
}

/// Draw the pulsating glow behind the center disc as concentric rings
/// fading outward. `intensity` in [0, 1] scales both the glow color and
/// its geometry (ring count and reach), so the pulsation visibly grows
/// and shrinks the halo rather than only dimming it.
pub fn draw_glow<D>(
    display: &mut D,
    layout: &GaugeLayout,
    color: Rgb565,
    intensity: f32,
    blur: u32,
    spread: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let intensity = intensity.clamp(0.0, 1.0);
    // One ring per 2px of effective blur, reaching the effective spread
    // past the disc edge.
    let rings = ((blur as f32 * intensity / 2.0) as u32).max(1);
    let reach = spread.max(1) as f32 * intensity;
    for i in 0..rings {
        let t = i as f32 / rings as f32;
        let radius = layout.center_radius as f32 + t * reach;
        let ring_color = colors::scale(color, intensity * (1.0 - t));
        Circle::with_center(layout.center, (radius * 2.0) as u32)
            .into_styled(PrimitiveStyle::with_stroke(ring_color, 2))
            .draw(display)
            .ok();
    }
}

/// Draw the center disc and its text stack: name above, value in the
/// middle, unit below, optional trend arrow under the unit.
pub fn draw_readout<D>(
    display: &mut D,
    layout: &GaugeLayout,
    theme: Theme,
    name: &str,
    value_text: &str,
    unit: &str,
    trend: Option<Trend>,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(layout.center, layout.center_radius * 2)
        .into_styled(PrimitiveStyle::with_fill(theme.background))
        .draw(display)
        .ok();

    let cx = layout.center.x;
    let cy = layout.center.y;

    if !name.is_empty() {
        Text::with_text_style(name, Point::new(cx, cy - 28), LABEL_STYLE_SECONDARY, CENTERED)
            .draw(display)
            .ok();
    }

    let value_style = MonoTextStyle::new(VALUE_FONT, theme.text);
    Text::with_text_style(value_text, Point::new(cx, cy + 8), value_style, CENTERED)
        .draw(display)
        .ok();

    if !unit.is_empty() {
        let unit_style = MonoTextStyle::new(UNIT_FONT, theme.secondary_text);
        Text::with_text_style(unit, Point::new(cx, cy + 26), unit_style, CENTERED)
            .draw(display)
            .ok();
    }

    if let Some(trend) = trend {
        draw_trend_arrow(display, cx, cy + 38, trend);
    }
}

/// Small 8px trend arrow: shaft plus two arrowhead segments, or a flat
/// bar when the value is stable.
fn draw_trend_arrow<D>(display: &mut D, x: i32, y: i32, trend: Trend)
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(trend.color(), 1);
    match trend {
        Trend::Rising => {
            Line::new(Point::new(x, y + 4), Point::new(x, y - 4))
                .into_styled(style)
                .draw(display)
                .ok();
            Line::new(Point::new(x - 3, y - 1), Point::new(x, y - 4))
                .into_styled(style)
                .draw(display)
                .ok();
            Line::new(Point::new(x + 3, y - 1), Point::new(x, y - 4))
                .into_styled(style)
                .draw(display)
                .ok();
        }
        Trend::Falling => {
            Line::new(Point::new(x, y - 4), Point::new(x, y + 4))
                .into_styled(style)
                .draw(display)
                .ok();
            Line::new(Point::new(x - 3, y + 1), Point::new(x, y + 4))
                .into_styled(style)
                .draw(display)
                .ok();
            Line::new(Point::new(x + 3, y + 1), Point::new(x, y + 4))
                .into_styled(style)
                .draw(display)
                .ok();
        }
        Trend::Flat => {
            Line::new(Point::new(x - 4, y), Point::new(x + 4, y))
                .into_styled(style)
                .draw(display)
                .ok();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
